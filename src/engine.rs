use anyhow::{anyhow, Result};
use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::GameConfig;
use crate::envelope::{normalize, DEFAULT_SPEAKER};
use crate::llm::{ChatMessage, LlmClient};
use crate::prompts::PromptBuilder;
use crate::types::{Suspect, TranscriptEntry};

/// One interrogation room: a suspect plus both views of the conversation
#[derive(Debug, Clone)]
pub struct Room {
    pub suspect: Suspect,
    /// What the player sees, already formatted
    pub messages: Vec<TranscriptEntry>,
    /// What the model sees; the system prompt comes first once the room is opened
    pub model: Vec<ChatMessage>,
}

impl Room {
    fn new(suspect: Suspect) -> Self {
        Self {
            suspect,
            messages: Vec::new(),
            model: Vec::new(),
        }
    }
}

/// Runs interrogations against an LLM-backed suspect per room
pub struct InterrogationEngine {
    config: GameConfig,

    /// The agent service playing the suspects
    llm_client: Arc<dyn LlmClient>,

    /// Rooms keyed by suspect id
    rooms: Arc<Mutex<BTreeMap<String, Room>>>,

    prompt_builder: PromptBuilder,
}

impl InterrogationEngine {
    /// Create an engine with no suspects
    pub fn new(config: GameConfig, llm_client: impl LlmClient + 'static) -> Self {
        let prompt_builder = PromptBuilder::new(&config.data_path);
        Self {
            config,
            llm_client: Arc::new(llm_client),
            rooms: Arc::new(Mutex::new(BTreeMap::new())),
            prompt_builder,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn lock_rooms(&self) -> Result<MutexGuard<'_, BTreeMap<String, Room>>> {
        self.rooms
            .lock()
            .map_err(|_| anyhow!("Room state lock poisoned"))
    }

    fn with_room<T>(&self, id: &str, f: impl FnOnce(&mut Room) -> T) -> Result<T> {
        let mut rooms = self.lock_rooms()?;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| anyhow!("No interrogation room for suspect '{}'", id))?;
        Ok(f(room))
    }

    /// Open a room for a suspect, replacing any room with the same id
    pub fn add_suspect(&self, suspect: Suspect) -> Result<()> {
        log::debug!("Opening room for suspect {}", suspect.id);
        self.lock_rooms()?
            .insert(suspect.id.clone(), Room::new(suspect));
        Ok(())
    }

    /// Load every suspect under `<data_path>/suspects`
    pub fn load_suspects(&self) -> Result<usize> {
        let loader = self.prompt_builder.loader();
        let ids = loader.list_suspects()?;
        for id in &ids {
            let suspect = loader.load_suspect(id)?;
            self.add_suspect(suspect)?;
        }
        log::info!("📂 Loaded {} suspects from {:?}", ids.len(), self.config.data_path);
        Ok(ids.len())
    }

    /// All suspects, ordered by id
    pub fn suspects(&self) -> Result<Vec<Suspect>> {
        Ok(self
            .lock_rooms()?
            .values()
            .map(|room| room.suspect.clone())
            .collect())
    }

    /// The player-facing transcript of a room
    pub fn transcript(&self, id: &str) -> Result<Vec<TranscriptEntry>> {
        self.with_room(id, |room| room.messages.clone())
    }

    /// The model conversation of a room
    pub fn history(&self, id: &str) -> Result<Vec<ChatMessage>> {
        self.with_room(id, |room| room.model.clone())
    }

    /// Answers from a room that revealed a core statement
    pub fn core_reveals(&self, id: &str) -> Result<Vec<TranscriptEntry>> {
        self.with_room(id, |room| {
            room.messages
                .iter()
                .filter(|entry| entry.is_core())
                .cloned()
                .collect()
        })
    }

    /// Clear both conversations of a room, keeping the suspect
    pub fn reset_room(&self, id: &str) -> Result<()> {
        self.with_room(id, |room| {
            room.messages.clear();
            room.model.clear();
        })?;
        log::info!("🧹 Reset room {}", id);
        Ok(())
    }

    /// Ask one suspect a question and record the formatted answer
    pub async fn interrogate(&self, id: &str, question: &str) -> Result<TranscriptEntry> {
        let (suspect, speaker_ids, needs_system) = {
            let rooms = self.lock_rooms()?;
            let room = rooms
                .get(id)
                .ok_or_else(|| anyhow!("No interrogation room for suspect '{}'", id))?;
            let ids: Vec<String> = rooms.keys().cloned().collect();
            (room.suspect.clone(), ids, room.model.is_empty())
        };

        // Built outside the lock; it reads prompt files from disk.
        let system_prompt = if needs_system {
            Some(self.prompt_builder.build_system_prompt(&suspect, &speaker_ids)?)
        } else {
            None
        };

        let user_message = ChatMessage::user(format!("{}{}", self.config.question_prefix, question));
        let messages = self.with_room(id, |room| {
            if room.model.is_empty() {
                if let Some(prompt) = system_prompt {
                    room.model.push(ChatMessage::system(prompt));
                }
            }
            room.messages.push(TranscriptEntry::user(question));
            room.model.push(user_message.clone());
            room.model.clone()
        })?;

        log::info!("🕵️ Interrogating {}: {}", id, question);
        let reply = match self.llm_client.chat(&messages, &self.config).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Failed to get answer from {}: {}", id, e);
                self.with_room(id, |room| {
                    if let Some(pos) = room.model.iter().rposition(|m| *m == user_message) {
                        room.model.remove(pos);
                    }
                })?;
                return Err(e.context(format!("Suspect {} did not answer", id)));
            }
        };

        let normalized = normalize(reply.as_str());
        let speaker = if normalized.speaker == DEFAULT_SPEAKER {
            suspect.id.clone()
        } else {
            normalized.speaker.clone()
        };
        let entry = TranscriptEntry::assistant(
            speaker,
            normalized.display_text,
            normalized.utterance_type,
        );

        self.with_room(id, |room| {
            room.model.push(ChatMessage::assistant(reply));
            room.messages.push(entry.clone());
        })?;

        if entry.is_core() {
            log::info!("🟡 {} revealed a core statement", id);
        } else {
            log::info!("  💬 {}: {}", id, entry.content);
        }

        Ok(entry)
    }

    /// Interrogate several rooms concurrently, one result per question.
    ///
    /// A room may appear once per call; repeats get an error instead of
    /// interleaving that room's history.
    pub async fn interrogate_many(
        &self,
        questions: &[(String, String)],
    ) -> Vec<Result<TranscriptEntry>> {
        log::debug!("Interrogating {} rooms in parallel", questions.len());
        let mut seen = HashSet::new();
        let futures: Vec<_> = questions
            .iter()
            .map(|(id, question)| {
                let first = seen.insert(id.as_str());
                async move {
                    if !first {
                        log::warn!("Skipping repeated question for room {}", id);
                        return Err(anyhow!("Room '{}' was asked twice in one batch", id));
                    }
                    self.interrogate(id, question).await
                }
            })
            .collect();
        join_all(futures).await
    }
}

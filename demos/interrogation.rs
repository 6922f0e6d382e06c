use anyhow::Result;
use async_trait::async_trait;
use interrogation_npc::{
    ChatMessage, EntryRole, GameConfig, InterrogationEngine, LlmClient, Suspect,
};

/// Stands in for the model so the demo runs offline
struct ScriptedSuspect;

#[async_trait]
impl LlmClient for ScriptedSuspect {
    async fn chat(&self, messages: &[ChatMessage], _config: &GameConfig) -> Result<String> {
        let question = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        let reply = if question.contains("범인") {
            r#"{"json_list":[
                {"w":"난","bold":true},{"w":"아니다","bold":true},{"w":".","bold":false},
                {"w":"C도","bold":true},{"w":"아니다","bold":true},{"w":".","bold":false},
                {"w":"/","bold":false},{"w":"D가","bold":true},{"w":"했다","bold":true},{"w":".","bold":false}
            ],"speaker":"A","utterance_type":"core"}"#
        } else {
            r#"{"json_list":[{"w":"그","bold":false},{"w":"시간엔","bold":false},{"w":"/밖에","bold":false},{"w":"있었다","bold":false},{"w":".","bold":false}],"speaker":"A","utterance_type":"normal"}"#
        };
        Ok(reply.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("=== Interrogation Example ===\n");

    let engine = InterrogationEngine::new(GameConfig::from_env(), ScriptedSuspect);
    engine.add_suspect(
        Suspect::new("A", "A")
            .with_core_statements(["나는 죽이지 않았다.", "C도 죽이지 않았다.", "D가 죽였다."])
            .with_sheet("직설/단호"),
    )?;

    engine.interrogate("A", "21시 30분에 어디 있었지?").await?;
    engine.interrogate("A", "범인은 누구라고 생각해?").await?;

    for entry in engine.transcript("A")? {
        match entry.role {
            EntryRole::User => println!("> {}", entry.content),
            EntryRole::Assistant => println!(
                "{}: {}\n",
                entry.speaker.as_deref().unwrap_or("?"),
                entry.content
            ),
        }
    }

    println!("Core reveals: {}", engine.core_reveals("A")?.len());
    Ok(())
}

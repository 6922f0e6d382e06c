use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A single word emitted by the agent, with its emphasis flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedToken {
    #[serde(rename = "w")]
    pub word: String,
    #[serde(rename = "bold")]
    pub emphasized: bool,
}

impl AnnotatedToken {
    /// Creates a plain (non-emphasized) token
    pub fn plain(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            emphasized: false,
        }
    }

    /// Creates an emphasized token
    pub fn bold(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            emphasized: true,
        }
    }

    /// Builds a token from any JSON value the agent produced.
    ///
    /// Objects are read through `w`/`word` and `bold`/`emphasized`. Any other
    /// value is taken as a bare plain word.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let word = map.get("w").or_else(|| map.get("word"));
                let emphasized = map.get("bold").or_else(|| map.get("emphasized"));
                Self {
                    word: word.map(coerce_word).unwrap_or_default(),
                    emphasized: emphasized.map(is_truthy).unwrap_or(false),
                }
            }
            other => Self::plain(coerce_word(other)),
        }
    }
}

impl<'de> Deserialize<'de> for AnnotatedToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Coerces a JSON value into word text
pub fn coerce_word(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Reads an emphasis flag. Only `true`, non-zero numbers and the strings
/// "true", "1" and "yes" count as set.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1" || s.eq_ignore_ascii_case("yes")
        }
        _ => false,
    }
}

/// Classification of an agent utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum UtteranceType {
    /// A core statement was revealed
    Core,
    #[default]
    Normal,
    Confession,
    Summary,
    /// Any tag this crate has no special handling for
    Other(String),
}

impl UtteranceType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "core" => Self::Core,
            "normal" => Self::Normal,
            "confession" => Self::Confession,
            "summary" => Self::Summary,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Core => "core",
            Self::Normal => "normal",
            Self::Confession => "confession",
            Self::Summary => "summary",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, Self::Core)
    }
}

impl fmt::Display for UtteranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UtteranceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UtteranceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

/// A suspect that can be interrogated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspect {
    /// Short identifier, also the speaker tag the agent is asked to use
    pub id: String,
    pub name: String,
    /// Statements the suspect only reveals under questioning
    pub core_statements: Vec<String>,
    /// Character sheet: background, alibi, speech style
    pub sheet: String,
}

impl Suspect {
    /// Creates a suspect with no core statements or sheet
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            core_statements: Vec::new(),
            sheet: String::new(),
        }
    }

    pub fn with_core_statements<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_statements = statements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }
}

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    User,
    Assistant,
}

/// One rendered line of a room's transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: EntryRole,
    pub speaker: Option<String>,
    pub content: String,
    pub utterance_type: Option<UtteranceType>,
    pub ts: DateTime<Utc>,
}

impl TranscriptEntry {
    /// A question typed by the player
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: EntryRole::User,
            speaker: None,
            content: content.into(),
            utterance_type: None,
            ts: Utc::now(),
        }
    }

    /// An answer attributed to a suspect
    pub fn assistant(
        speaker: impl Into<String>,
        content: impl Into<String>,
        utterance_type: UtteranceType,
    ) -> Self {
        Self {
            role: EntryRole::Assistant,
            speaker: Some(speaker.into()),
            content: content.into(),
            utterance_type: Some(utterance_type),
            ts: Utc::now(),
        }
    }

    pub fn is_core(&self) -> bool {
        self.utterance_type
            .as_ref()
            .map(UtteranceType::is_core)
            .unwrap_or(false)
    }
}

//! Envelope normalizer.
//!
//! Turns whatever the agent returned (a JSON record, or text that should hold
//! one) into display text plus speaker and utterance metadata. Nothing here
//! fails: malformed input degrades to documented defaults.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::format::format_tokens;
use crate::parser::decode_record;
use crate::types::{AnnotatedToken, UtteranceType};

/// Speaker used when the envelope names none
pub const DEFAULT_SPEAKER: &str = "assistant";

/// Marker line placed above a core statement
pub const CORE_MARKER: &str = "🟡 **핵심 진술**";

/// Raw agent output, as received
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// Text expected to encode a record
    Text(String),
    /// An already decoded record
    Record(Map<String, Value>),
}

impl From<String> for RawResponse {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawResponse {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Map<String, Value>> for RawResponse {
    fn from(record: Map<String, Value>) -> Self {
        Self::Record(record)
    }
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(record) => Self::Record(record),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Canonical view of one agent turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub tokens: Vec<AnnotatedToken>,
    /// Agent-rendered text; only kept when non-empty
    pub combined_text: Option<String>,
    pub speaker: String,
    pub utterance_type: UtteranceType,
    /// The record exactly as received
    pub raw: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Extracts the recognised fields of a record, applying defaults
    pub fn from_record(raw: Map<String, Value>) -> Self {
        let tokens = field(&raw, &["json_list", "tokens"])
            .and_then(Value::as_array)
            .map(|items| items.iter().map(AnnotatedToken::from_value).collect())
            .unwrap_or_default();

        let combined_text = field(&raw, &["combined_text_md", "combined_text"])
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let speaker = field(&raw, &["speaker"])
            .and_then(non_empty_text)
            .unwrap_or_else(|| {
                log::debug!("Envelope has no speaker, using default");
                DEFAULT_SPEAKER.to_string()
            });

        let utterance_type = field(&raw, &["utterance_type"])
            .and_then(non_empty_text)
            .map(|tag| UtteranceType::parse(&tag))
            .unwrap_or_default();

        Self {
            tokens,
            combined_text,
            speaker,
            utterance_type,
            raw,
        }
    }

    /// Text to show for this turn, before any presentation rule
    pub fn body_text(&self) -> String {
        match &self.combined_text {
            Some(text) => text.clone(),
            None => format_tokens(&self.tokens),
        }
    }
}

/// First present key wins
fn field<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| raw.get(*key))
}

/// Text of a scalar field, or `None` when it is absent or empty
fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Display-ready result of normalizing one agent turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResponse {
    pub display_text: String,
    pub speaker: String,
    pub utterance_type: UtteranceType,
    pub envelope: ResponseEnvelope,
}

impl NormalizedResponse {
    /// Splits into `(display_text, speaker, utterance_type, record)`
    pub fn into_parts(self) -> (String, String, String, Map<String, Value>) {
        (
            self.display_text,
            self.speaker,
            self.utterance_type.as_str().to_string(),
            self.envelope.raw,
        )
    }

    /// Display text prefixed with the speaker's label
    pub fn render(&self) -> String {
        format!("{}{}", speaker_label(&self.speaker), self.display_text)
    }
}

/// Bold `"X: "` label for a named speaker; empty for the default speaker
pub fn speaker_label(speaker: &str) -> String {
    if speaker.is_empty() || speaker == DEFAULT_SPEAKER {
        String::new()
    } else {
        format!("**{}:** ", speaker)
    }
}

/// Normalizes raw agent output into display text and metadata
pub fn normalize(raw: impl Into<RawResponse>) -> NormalizedResponse {
    let record = match raw.into() {
        RawResponse::Record(record) => record,
        RawResponse::Text(text) => match decode_record(&text) {
            Some(record) => record,
            None => {
                log::debug!("Agent output is not a JSON record, passing text through");
                return NormalizedResponse {
                    display_text: text,
                    speaker: DEFAULT_SPEAKER.to_string(),
                    utterance_type: UtteranceType::Normal,
                    envelope: ResponseEnvelope {
                        speaker: DEFAULT_SPEAKER.to_string(),
                        ..ResponseEnvelope::default()
                    },
                };
            }
        },
    };

    let envelope = ResponseEnvelope::from_record(record);
    let mut display_text = envelope.body_text();
    if envelope.utterance_type.is_core() {
        display_text = format!("{}\n\n{}", CORE_MARKER, display_text);
    }

    NormalizedResponse {
        display_text,
        speaker: envelope.speaker.clone(),
        utterance_type: envelope.utterance_type.clone(),
        envelope,
    }
}

//! # Interrogation NPC Library
//!
//! Runs a chat-based interrogation game where LLM-driven suspects answer
//! questions with word-level emphasis annotations.
//!
//! ## Features
//!
//! - **Token Merge Formatter**: Collapses `{ "w", "bold" }` word tokens into Markdown with one bold span per emphasized run
//! - **Envelope Normalizer**: Turns raw agent output (JSON record or text) into display text, speaker and utterance type
//! - **Interrogation Engine**: One room per suspect, with player transcript and model history
//! - **Prompt System**: Per-suspect system prompts built from case data on disk
//! - **LLM Integration**: Built-in client for OpenAI-compatible chat APIs
//!
//! ## Example
//!
//! ```rust
//! use interrogation_npc::normalize;
//! use serde_json::json;
//!
//! let reply = json!({
//!     "json_list": [
//!         {"w": "난", "bold": true},
//!         {"w": "아니다", "bold": true},
//!         {"w": ".", "bold": false}
//!     ],
//!     "speaker": "A"
//! });
//!
//! let answer = normalize(reply);
//! assert_eq!(answer.display_text, "**난 아니다**.");
//! assert_eq!(answer.speaker, "A");
//! ```

pub mod config;
pub mod engine;
pub mod envelope;
pub mod format;
pub mod llm;
pub mod parser;
pub mod prompts;
pub mod types;

// Re-export main types for convenience
pub use config::GameConfig;
pub use engine::{InterrogationEngine, Room};
pub use envelope::{
    normalize, speaker_label, NormalizedResponse, RawResponse, ResponseEnvelope, CORE_MARKER,
    DEFAULT_SPEAKER,
};
pub use format::{clean_spacing, format_tokens, strip_emphasis, EmphasisState, BOLD_MARKER};
pub use llm::{ChatMessage, LlmClient, OpenAiClient, Role};
pub use types::{AnnotatedToken, EntryRole, Suspect, TranscriptEntry, UtteranceType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

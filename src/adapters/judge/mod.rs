//! HTTP adapters for the external judgment oracle and quest suggester.

pub mod http;

pub use http::{HttpJudgeClient, HttpQuestSuggester};

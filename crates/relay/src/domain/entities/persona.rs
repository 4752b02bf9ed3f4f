//! Persona - Named System Prompt
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

/// Persona - a named system prompt applied to chat completions
///
/// The prompt text travels as `persona` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(rename = "persona")]
    pub prompt_text: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, prompt_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_text: prompt_text.into(),
        }
    }
}

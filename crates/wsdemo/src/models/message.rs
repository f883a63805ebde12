use super::role::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    fn new(role: Role) -> Self {
        Message {
            role,
            content: String::new(),
        }
    }

    /// Create a new empty user message
    pub fn user() -> Self {
        Self::new(Role::User)
    }

    /// Create a new empty assistant message
    pub fn assistant() -> Self {
        Self::new(Role::Assistant)
    }

    /// Append text to the message
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content.push_str(&text.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}

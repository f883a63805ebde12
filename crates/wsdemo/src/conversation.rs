use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::message::Message;
use crate::models::role::Role;
use crate::prompt_template::render_system_prompt;

/// A history entry as sent by the frontend.
///
/// The role stays a plain string here so that one bad entry does not reject the
/// whole request; it is checked when the conversation is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl HistoryEntry {
    pub fn new<R: Into<String>, C: Into<String>>(role: R, content: C) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    fn to_message(&self) -> Option<Message> {
        match Role::from_str(&self.role) {
            Ok(Role::User) => Some(Message::user().with_text(self.content.as_str())),
            Ok(Role::Assistant) => Some(Message::assistant().with_text(self.content.as_str())),
            Err(_) => {
                tracing::warn!("Dropping history entry with unknown role: {:?}", self.role);
                None
            }
        }
    }
}

/// Everything a provider needs for one completion.
///
/// The system prompt always goes first; providers place it according to their own
/// wire format. `messages` holds the history in order followed by the new user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub system: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn assemble(
        system_prompt: &str,
        system_prompt_filename: &str,
        history: &[HistoryEntry],
        user_message: &str,
    ) -> Self {
        let mut messages: Vec<Message> = history.iter().filter_map(HistoryEntry::to_message).collect();
        messages.push(Message::user().with_text(user_message));

        Self {
            system: render_system_prompt(system_prompt, system_prompt_filename),
            messages,
        }
    }
}

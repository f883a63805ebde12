use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The author of a message in a conversation.
///
/// The system prompt is not a role here, it travels beside the messages and each
/// provider decides how to place it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

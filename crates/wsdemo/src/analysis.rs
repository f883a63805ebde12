//! Separates the model's hidden analysis block from the reply shown to the user.
//!
//! Prompts instruct the model to wrap its notes about the conversation in
//! `<AI_ANALYSIS>...</AI_ANALYSIS>`. Only the first complete block is extracted; a
//! second block is left in the reply as-is.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const ANALYSIS_OPEN_TAG: &str = "<AI_ANALYSIS>";
pub const ANALYSIS_CLOSE_TAG: &str = "</AI_ANALYSIS>";

lazy_static! {
    // Non-greedy and dot-matches-newline: first opening tag to the first closing tag after it.
    static ref ANALYSIS_BLOCK: Regex = Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(ANALYSIS_OPEN_TAG),
        regex::escape(ANALYSIS_CLOSE_TAG)
    ))
    .expect("analysis block pattern is valid");
}

/// The user-facing reply and the analysis extracted from one completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    pub reply: String,
    /// Empty when the completion carried no analysis block
    pub analysis: String,
}

impl SplitResult {
    pub fn has_analysis(&self) -> bool {
        !self.analysis.is_empty()
    }
}

/// Split a raw completion into reply and analysis.
///
/// The whole matched block, tags included, is removed from the reply. Both parts are
/// trimmed at their outer edges. Never fails: a missing or malformed block just means
/// the analysis is empty.
pub fn split_reply(raw: &str) -> SplitResult {
    let Some(captures) = ANALYSIS_BLOCK.captures(raw) else {
        return SplitResult {
            reply: raw.trim().to_string(),
            analysis: String::new(),
        };
    };

    // Group 0 always exists on a match, group 1 always participates.
    let block = captures.get(0).map(|m| m.range()).unwrap_or(0..0);
    let analysis = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let mut reply = String::with_capacity(raw.len() - block.len());
    reply.push_str(&raw[..block.start]);
    reply.push_str(&raw[block.end..]);

    SplitResult {
        reply: reply.trim().to_string(),
        analysis: analysis.trim().to_string(),
    }
}

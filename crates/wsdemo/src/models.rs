//! These models represent the conversation passed between the server and the LLM
//!
//! There are a few related formats we need to interact with:
//! - the chat history sent by the demo frontend, as loosely typed role/content pairs
//! - openai-style messages, sent to openai and ollama
//! - gemini `contents`, sent to the google generative language api
//!
//! Incoming data is converted into these internal structs at the boundary and each
//! provider converts them into its own wire format.
pub mod message;
pub mod role;

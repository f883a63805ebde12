pub mod analysis;
pub mod conversation;
pub mod models;
pub mod prompt_store;
pub mod prompt_template;
pub mod providers;

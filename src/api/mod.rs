//! OpenAI REST API client
//!
//! [`OpenAIClient`] covers chat completions (plain and streamed) and the
//! Assistants beta endpoints through the [`Assistants`] trait.

mod assistants;
mod chat;
mod client;
pub mod models;

pub use assistants::Assistants;
pub use client::OpenAIClient;
pub use models::{
    Assistant, AssistantFile, AssistantRequest, AssistantTool, DeleteResponse, ListParams,
    ListResponse, SortOrder,
};

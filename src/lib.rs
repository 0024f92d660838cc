//! OpenAI API client with streaming chat-message assembly
//!
//! Streamed chat completions arrive as a sequence of partial deltas. The
//! [`MessageAssembler`] folds those deltas back into one complete
//! [`ChatMessage`], including interleaved tool calls. The rest of the crate
//! wraps the HTTP side: SSE decoding, chat endpoints and the Assistants beta.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod streaming;

pub use crate::api::{Assistants, OpenAIClient};
pub use crate::chat::{
    collect_completion, ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ChatDelta,
    ChatMessage, CompletionAssembler, MessageAssembler, ToolCallAssembler,
};
pub use crate::config::Config;
pub use crate::error::{ClientError, ClientResult};
pub use crate::streaming::ChunkStream;

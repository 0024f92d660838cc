//! SSE (Server-Sent Events) streaming utilities
//!
//! Turns the byte stream of a streamed chat completion into typed chunks that
//! the assemblers in [`crate::chat`] consume.

mod decode;
mod sse;

use std::pin::Pin;

use futures::Stream;

use crate::chat::ChatCompletionChunk;
use crate::error::ClientResult;

pub use decode::decode_chunks;
pub use sse::{SseLine, SseLineBuffer};

/// Stream of decoded chat completion chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = ClientResult<ChatCompletionChunk>> + Send>>;

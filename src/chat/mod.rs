//! Chat completion types and streaming assembly
//!
//! This module defines the chat wire types and the assemblers that rebuild
//! finished messages from streamed deltas.

pub mod assembler;
pub mod completion;
pub mod response;
pub mod types;

// Re-export key types for convenience
pub use assembler::{MessageAssembler, ToolCallAssembler};
pub use completion::{collect_completion, CompletionAssembler};
pub use response::{
    ChatChoice, ChatChunk, ChatCompletion, ChatCompletionChunk, ChatDelta, ToolCallDelta, Usage,
};
pub use types::{
    ChatCompletionRequest, ChatMessage, FunctionCall, FunctionDefinition, Role, StreamOptions,
    Tool, ToolCall,
};

//! Response types for chat completions
//!
//! Defines the chat completion response and the streaming chunk structures
//! that the assemblers consume.

use serde::{Deserialize, Serialize};

use super::types::{ChatMessage, FunctionCall, Role};

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// A completion choice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatChoice {
    /// Index of this choice
    pub index: u32,
    /// The generated message
    pub message: ChatMessage,
    /// Reason the generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Chat completion response (non-streaming, or assembled from a stream)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatCompletion {
    /// Unique identifier for this completion
    pub id: String,
    /// Unix timestamp of creation
    #[serde(default)]
    pub created: u64,
    /// Model used for completion
    pub model: String,
    /// List of completion choices
    pub choices: Vec<ChatChoice>,
    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Message of the first choice, if any
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

// =============================================================================
// Streaming Types
// =============================================================================

/// Tool call fragment in a streaming delta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ToolCallDelta {
    /// Index of this tool call in the parallel set
    pub index: u32,
    /// Tool call ID (usually only in the first fragment for this index)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Type of tool call (usually only in the first fragment)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    /// Function name and argument fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCall>,
}

/// Delta content in a streaming chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatDelta {
    /// Role (usually only present in the first chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Content fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Legacy function call fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    /// Tool call fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// A choice in a streaming chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatChunk {
    /// Index of the choice this fragment belongs to
    #[serde(default)]
    pub index: u32,
    /// Delta content
    #[serde(default)]
    pub delta: ChatDelta,
    /// Reason the generation stopped (only in the final chunk of a choice)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Streaming chunk for chat completion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatCompletionChunk {
    /// Identifier shared by every chunk of one completion
    #[serde(default)]
    pub id: String,
    /// Unix timestamp of creation
    #[serde(default)]
    pub created: u64,
    /// Model used for completion
    #[serde(default)]
    pub model: String,
    /// List of choices with delta content
    #[serde(default)]
    pub choices: Vec<ChatChunk>,
    /// Token usage (only in the final chunk when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

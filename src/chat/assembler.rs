//! Streaming chat-message assembly
//!
//! Folds the ordered deltas of one streamed message back into a finished
//! [`ChatMessage`]. Text buffers only ever grow; scalar fields follow
//! last-writer-wins. Nothing here validates or parses what it receives.

use indexmap::IndexMap;
use tracing::debug;

use super::response::{ChatChunk, ChatDelta, ToolCallDelta};
use super::types::{ChatMessage, FunctionCall, Role, ToolCall};

/// Accumulates the fragments of one tool call.
///
/// The function name is replaced by each fragment that carries one, while
/// argument fragments are appended. Upstream sends a tool call name whole in
/// its first fragment and never splits it.
#[derive(Debug, Clone, Default)]
pub struct ToolCallAssembler {
    index: Option<u32>,
    id: Option<String>,
    call_type: Option<String>,
    function_name: Option<String>,
    function_arguments: String,
}

impl ToolCallAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one tool call fragment.
    pub fn merge(&mut self, delta: &ToolCallDelta) -> &mut Self {
        self.index = Some(delta.index);
        if let Some(ref id) = delta.id {
            self.id = Some(id.clone());
        }
        if let Some(ref call_type) = delta.call_type {
            self.call_type = Some(call_type.clone());
        }
        if let Some(ref function) = delta.function {
            if let Some(ref name) = function.name {
                self.function_name = Some(name.clone());
            }
            if let Some(ref arguments) = function.arguments {
                self.function_arguments.push_str(arguments);
            }
        }
        self
    }

    /// Build the tool call from everything merged so far.
    pub fn build(&self) -> ToolCall {
        let has_name = self
            .function_name
            .as_deref()
            .is_some_and(|name| !name.is_empty());

        let function = (has_name || !self.function_arguments.is_empty()).then(|| FunctionCall {
            name: self.function_name.clone(),
            arguments: Some(self.function_arguments.clone()),
        });

        ToolCall {
            index: self.index,
            id: self.id.clone(),
            call_type: self.call_type.clone(),
            function,
        }
    }
}

/// Accumulates the deltas of one streamed chat message.
///
/// Create one per streamed message, [`merge`](Self::merge) every delta in
/// arrival order, then [`build`](Self::build) once the stream has ended.
///
/// ```
/// use openai_client::chat::{ChatDelta, MessageAssembler};
///
/// let mut assembler = MessageAssembler::new();
/// assembler
///     .merge(&ChatDelta { content: Some("Hel".into()), ..Default::default() })
///     .merge(&ChatDelta { content: Some("lo".into()), ..Default::default() });
///
/// assert_eq!(assembler.build().content, "Hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageAssembler {
    role: Option<Role>,
    content: String,
    function_name: String,
    function_arguments: String,
    /// Keyed by stream index, iterated in first-seen order
    tool_calls: IndexMap<u32, ToolCallAssembler>,
}

impl MessageAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one delta into the message being assembled.
    pub fn merge(&mut self, delta: &ChatDelta) -> &mut Self {
        if let Some(ref role) = delta.role {
            self.role = Some(role.clone());
        }
        if let Some(ref content) = delta.content {
            self.content.push_str(content);
        }
        if let Some(ref call) = delta.function_call {
            if let Some(ref name) = call.name {
                self.function_name.push_str(name);
            }
            if let Some(ref arguments) = call.arguments {
                self.function_arguments.push_str(arguments);
            }
        }
        if let Some(ref tool_calls) = delta.tool_calls {
            for tool_call in tool_calls {
                let assembler = self.tool_calls.entry(tool_call.index).or_insert_with(|| {
                    debug!(index = tool_call.index, "Opening streamed tool call");
                    ToolCallAssembler::new()
                });
                assembler.merge(tool_call);
            }
        }
        self
    }

    /// Merge the delta carried by one streamed choice.
    pub fn merge_chunk(&mut self, chunk: &ChatChunk) -> &mut Self {
        self.merge(&chunk.delta)
    }

    /// Number of distinct tool call indices seen so far
    pub fn tool_call_count(&self) -> usize {
        self.tool_calls.len()
    }

    /// Build the message from everything merged so far.
    ///
    /// Does not change the assembler, so calling it twice without an
    /// intervening merge returns equal messages.
    pub fn build(&self) -> ChatMessage {
        let mut message = ChatMessage {
            role: self.role.clone(),
            content: self.content.clone(),
            ..ChatMessage::default()
        };

        if !self.function_name.is_empty() || !self.function_arguments.is_empty() {
            message.function_call = Some(FunctionCall {
                name: Some(self.function_name.clone()),
                arguments: Some(self.function_arguments.clone()),
            });
            message.name = Some(self.function_name.clone());
        }

        if !self.tool_calls.is_empty() {
            message.tool_calls = Some(
                self.tool_calls
                    .values()
                    .map(ToolCallAssembler::build)
                    .collect(),
            );
        }

        message
    }

    /// Consume the assembler and build the message.
    pub fn finish(self) -> ChatMessage {
        self.build()
    }
}

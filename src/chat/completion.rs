//! Whole-completion assembly
//!
//! A streamed completion may carry several choices (`n > 1`), each with its own
//! message. [`CompletionAssembler`] routes every streamed choice to its own
//! [`MessageAssembler`] and keeps the completion-level metadata.

use futures::{Stream, StreamExt};
use indexmap::IndexMap;
use tracing::debug;

use super::assembler::MessageAssembler;
use super::response::{ChatChoice, ChatCompletion, ChatCompletionChunk, Usage};
use crate::error::ClientResult;

#[derive(Debug, Default)]
struct ChoiceState {
    message: MessageAssembler,
    finish_reason: Option<String>,
}

/// Accumulates whole streaming chunks into a [`ChatCompletion`].
#[derive(Debug, Default)]
pub struct CompletionAssembler {
    id: String,
    created: u64,
    model: String,
    usage: Option<Usage>,
    choices: IndexMap<u32, ChoiceState>,
    chunks_seen: usize,
}

impl CompletionAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one streaming chunk.
    pub fn merge(&mut self, chunk: &ChatCompletionChunk) -> &mut Self {
        self.chunks_seen += 1;

        if self.id.is_empty() && !chunk.id.is_empty() {
            self.id = chunk.id.clone();
        }
        if self.model.is_empty() && !chunk.model.is_empty() {
            self.model = chunk.model.clone();
        }
        if self.created == 0 {
            self.created = chunk.created;
        }
        if let Some(ref usage) = chunk.usage {
            self.usage = Some(usage.clone());
        }

        for choice in &chunk.choices {
            let state = self.choices.entry(choice.index).or_default();
            state.message.merge_chunk(choice);
            if let Some(ref reason) = choice.finish_reason {
                state.finish_reason = Some(reason.clone());
            }
        }
        self
    }

    /// Number of chunks merged so far
    pub fn chunks_seen(&self) -> usize {
        self.chunks_seen
    }

    /// Build the completion from everything merged so far.
    ///
    /// Choices appear in the order their index was first seen.
    pub fn build(&self) -> ChatCompletion {
        ChatCompletion {
            id: self.id.clone(),
            created: self.created,
            model: self.model.clone(),
            choices: self
                .choices
                .iter()
                .map(|(index, state)| ChatChoice {
                    index: *index,
                    message: state.message.build(),
                    finish_reason: state.finish_reason.clone(),
                })
                .collect(),
            usage: self.usage.clone(),
        }
    }
}

/// Drain a chunk stream into a finished completion.
///
/// Stops at the first stream error and returns it; chunks merged before the
/// error are discarded.
pub async fn collect_completion<S>(stream: S) -> ClientResult<ChatCompletion>
where
    S: Stream<Item = ClientResult<ChatCompletionChunk>>,
{
    futures::pin_mut!(stream);

    let mut assembler = CompletionAssembler::new();
    while let Some(chunk) = stream.next().await {
        assembler.merge(&chunk?);
    }

    debug!(
        chunks = assembler.chunks_seen(),
        choices = assembler.choices.len(),
        "Streamed completion assembled"
    );
    Ok(assembler.build())
}

//! Chunk decoding for streamed chat completions

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::sse::{SseLine, SseLineBuffer};
use super::ChunkStream;
use crate::chat::ChatCompletionChunk;
use crate::error::{ApiErrorResponse, ClientError, ClientResult};

/// Turn a raw SSE byte stream into a stream of chat completion chunks.
///
/// The returned stream ends at `data: [DONE]` or when the body ends. A data
/// line that cannot be decoded ends the stream with [`ClientError::Stream`];
/// an in-band error payload ends it with [`ClientError::Api`].
pub fn decode_chunks<S>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut buffer = SseLineBuffer::new();
        let mut chunks = 0usize;
        futures::pin_mut!(bytes);

        'body: while let Some(read) = bytes.next().await {
            let read = match read {
                Ok(read) => read,
                Err(e) => {
                    warn!(error = %e, "Chat stream body failed");
                    yield Err(ClientError::from(e));
                    return;
                }
            };
            for line in buffer.feed(&read) {
                match decode_line(&line) {
                    Ok(Decoded::Chunk(chunk)) => {
                        chunks += 1;
                        yield Ok(chunk);
                    }
                    Ok(Decoded::Done) => break 'body,
                    Ok(Decoded::Skip) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if let Some(tail) = buffer.finish() {
            match decode_line(&tail) {
                Ok(Decoded::Chunk(chunk)) => {
                    chunks += 1;
                    yield Ok(chunk);
                }
                Ok(_) => {}
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        debug!(chunks, "Chunk stream finished");
    })
}

enum Decoded {
    Chunk(ChatCompletionChunk),
    Done,
    Skip,
}

fn decode_line(line: &str) -> ClientResult<Decoded> {
    let payload = match SseLine::parse(line) {
        SseLine::Data(payload) => payload,
        SseLine::Done => return Ok(Decoded::Done),
        SseLine::Ignored => return Ok(Decoded::Skip),
    };

    if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(payload) {
        warn!(message = ?error.error.message, "Error event in chat stream");
        return Err(error.error.into_client_error(200));
    }

    serde_json::from_str::<ChatCompletionChunk>(payload)
        .map(Decoded::Chunk)
        .map_err(|e| {
            let preview: String = payload.chars().take(500).collect();
            warn!(error = %e, sse_line = %preview, "Failed to parse chat stream chunk");
            ClientError::Stream(format!("Failed to parse chunk: {}", e))
        })
}

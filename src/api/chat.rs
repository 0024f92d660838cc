//! Chat completion endpoints

use reqwest::header::{HeaderValue, ACCEPT};
use tracing::{debug, instrument};

use super::client::OpenAIClient;
use crate::{
    chat::{collect_completion, ChatCompletion, ChatCompletionRequest},
    error::ClientResult,
    streaming::{decode_chunks, ChunkStream},
};

impl OpenAIClient {
    /// Create a chat completion in one round trip.
    ///
    /// `stream` on the request is sent as given; use
    /// [`Self::chat_completions_stream`] for streamed responses.
    #[instrument(
        skip(self, request),
        fields(model = %request.model, messages = request.messages.len())
    )]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> ClientResult<ChatCompletion> {
        let url = self.url("/chat/completions");
        debug!(url = %url, "Creating chat completion");

        let response = self
            .send(
                "chat_completion",
                self.client().post(&url).headers(self.headers()?).json(request),
            )
            .await?;

        Self::parse("chat_completion", response).await
    }

    /// Create a streamed chat completion and return its decoded chunks.
    ///
    /// The request is sent with `stream: true` whatever it carried. A non-2xx
    /// status fails here; errors later in the body surface on the stream.
    #[instrument(
        skip(self, request),
        fields(model = %request.model, messages = request.messages.len())
    )]
    pub async fn chat_completions_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> ClientResult<ChunkStream> {
        let url = self.url("/chat/completions");
        let mut request = request.clone();
        request.stream = Some(true);

        debug!(url = %url, "Opening chat completion stream");

        let response = self
            .send(
                "chat_completions_stream",
                self.client()
                    .post(&url)
                    .headers(self.headers()?)
                    .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
                    .json(&request),
            )
            .await?;

        Ok(decode_chunks(response.bytes_stream()))
    }

    /// Stream a chat completion and assemble it into the shape of a
    /// non-streamed response.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat_completion_streamed(
        &self,
        request: &ChatCompletionRequest,
    ) -> ClientResult<ChatCompletion> {
        let stream = self.chat_completions_stream(request).await?;
        collect_completion(stream).await
    }
}

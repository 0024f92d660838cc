//! Assistants endpoints (beta)
//!
//! Every request carries the `OpenAI-Beta: assistants=<version>` header.
//! Lookups and deletes treat a 404 as "absent" instead of an error.

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::client::OpenAIClient;
use super::models::{
    Assistant, AssistantFile, AssistantFileRequest, AssistantRequest, DeleteResponse, ListParams,
    ListResponse,
};
use crate::error::ClientResult;

/// Assistants API operations
#[async_trait]
pub trait Assistants: Send + Sync {
    /// Create an assistant
    async fn create_assistant(&self, request: &AssistantRequest) -> ClientResult<Assistant>;

    /// Retrieve an assistant, `None` if it does not exist
    async fn assistant(&self, assistant_id: &str) -> ClientResult<Option<Assistant>>;

    /// Modify an assistant. Fields left unset on `request` are unchanged.
    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: &AssistantRequest,
    ) -> ClientResult<Assistant>;

    /// Delete an assistant. Returns `false` if it did not exist.
    async fn delete_assistant(&self, assistant_id: &str) -> ClientResult<bool>;

    /// List assistants
    async fn assistants(&self, params: &ListParams) -> ClientResult<ListResponse<Assistant>>;

    /// Attach an uploaded file to an assistant
    async fn create_assistant_file(
        &self,
        assistant_id: &str,
        file_id: &str,
    ) -> ClientResult<AssistantFile>;

    /// Retrieve an assistant file, `None` if it does not exist
    async fn assistant_file(
        &self,
        assistant_id: &str,
        file_id: &str,
    ) -> ClientResult<Option<AssistantFile>>;

    /// List the files attached to an assistant
    async fn assistant_files(
        &self,
        assistant_id: &str,
        params: &ListParams,
    ) -> ClientResult<ListResponse<AssistantFile>>;

    /// Detach a file from an assistant. Returns `false` if it was not attached.
    async fn delete_assistant_file(&self, assistant_id: &str, file_id: &str) -> ClientResult<bool>;
}

#[async_trait]
impl Assistants for OpenAIClient {
    #[instrument(skip(self, request), fields(model = ?request.model))]
    async fn create_assistant(&self, request: &AssistantRequest) -> ClientResult<Assistant> {
        let url = self.url("/assistants");
        debug!(url = %url, "Creating assistant");

        let response = self
            .send(
                "create_assistant",
                self.client()
                    .post(&url)
                    .headers(self.assistants_headers()?)
                    .json(request),
            )
            .await?;

        Self::parse("create_assistant", response).await
    }

    #[instrument(skip(self))]
    async fn assistant(&self, assistant_id: &str) -> ClientResult<Option<Assistant>> {
        let url = self.url(&format!("/assistants/{}", assistant_id));
        debug!(url = %url, "Fetching assistant");

        let result = async {
            let response = self
                .send(
                    "assistant",
                    self.client().get(&url).headers(self.assistants_headers()?),
                )
                .await?;
            Self::parse::<Assistant>("assistant", response).await
        }
        .await;

        found(result)
    }

    #[instrument(skip(self, request))]
    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: &AssistantRequest,
    ) -> ClientResult<Assistant> {
        let url = self.url(&format!("/assistants/{}", assistant_id));
        debug!(url = %url, "Updating assistant");

        let response = self
            .send(
                "update_assistant",
                self.client()
                    .post(&url)
                    .headers(self.assistants_headers()?)
                    .json(request),
            )
            .await?;

        Self::parse("update_assistant", response).await
    }

    #[instrument(skip(self))]
    async fn delete_assistant(&self, assistant_id: &str) -> ClientResult<bool> {
        let url = self.url(&format!("/assistants/{}", assistant_id));
        debug!(url = %url, "Deleting assistant");

        let result = async {
            let response = self
                .send(
                    "delete_assistant",
                    self.client().delete(&url).headers(self.assistants_headers()?),
                )
                .await?;
            Self::parse::<DeleteResponse>("delete_assistant", response).await
        }
        .await;

        Ok(found(result)?.is_some_and(|deleted| deleted.deleted))
    }

    #[instrument(skip(self))]
    async fn assistants(&self, params: &ListParams) -> ClientResult<ListResponse<Assistant>> {
        let url = self.url("/assistants");
        debug!(url = %url, "Listing assistants");

        let response = self
            .send(
                "assistants",
                self.client()
                    .get(&url)
                    .headers(self.assistants_headers()?)
                    .query(&params.query()),
            )
            .await?;

        let page: ListResponse<Assistant> = Self::parse("assistants", response).await?;
        debug!(count = page.data.len(), has_more = page.has_more, "Listed assistants");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn create_assistant_file(
        &self,
        assistant_id: &str,
        file_id: &str,
    ) -> ClientResult<AssistantFile> {
        let url = self.url(&format!("/assistants/{}/files", assistant_id));
        debug!(url = %url, "Attaching file to assistant");

        let response = self
            .send(
                "create_assistant_file",
                self.client()
                    .post(&url)
                    .headers(self.assistants_headers()?)
                    .json(&AssistantFileRequest { file_id }),
            )
            .await?;

        Self::parse("create_assistant_file", response).await
    }

    #[instrument(skip(self))]
    async fn assistant_file(
        &self,
        assistant_id: &str,
        file_id: &str,
    ) -> ClientResult<Option<AssistantFile>> {
        let url = self.url(&format!("/assistants/{}/files/{}", assistant_id, file_id));
        debug!(url = %url, "Fetching assistant file");

        let result = async {
            let response = self
                .send(
                    "assistant_file",
                    self.client().get(&url).headers(self.assistants_headers()?),
                )
                .await?;
            Self::parse::<AssistantFile>("assistant_file", response).await
        }
        .await;

        found(result)
    }

    #[instrument(skip(self))]
    async fn assistant_files(
        &self,
        assistant_id: &str,
        params: &ListParams,
    ) -> ClientResult<ListResponse<AssistantFile>> {
        let url = self.url(&format!("/assistants/{}/files", assistant_id));
        debug!(url = %url, "Listing assistant files");

        let response = self
            .send(
                "assistant_files",
                self.client()
                    .get(&url)
                    .headers(self.assistants_headers()?)
                    .query(&params.query()),
            )
            .await?;

        Self::parse("assistant_files", response).await
    }

    #[instrument(skip(self))]
    async fn delete_assistant_file(&self, assistant_id: &str, file_id: &str) -> ClientResult<bool> {
        let url = self.url(&format!("/assistants/{}/files/{}", assistant_id, file_id));
        debug!(url = %url, "Detaching file from assistant");

        let result = async {
            let response = self
                .send(
                    "delete_assistant_file",
                    self.client().delete(&url).headers(self.assistants_headers()?),
                )
                .await?;
            Self::parse::<DeleteResponse>("delete_assistant_file", response).await
        }
        .await;

        Ok(found(result)?.is_some_and(|deleted| deleted.deleted))
    }
}

/// Map a 404 to `None`
fn found<T>(result: ClientResult<T>) -> ClientResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            debug!("Resource not found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

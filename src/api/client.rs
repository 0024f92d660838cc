//! OpenAI API client
//!
//! HTTP client for the OpenAI REST API. Endpoint groups live in sibling
//! modules as further `impl` blocks and traits over [`OpenAIClient`].

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::{
    config::Config,
    error::{ClientError, ClientResult},
};

/// OpenAI API client
#[derive(Clone)]
pub struct OpenAIClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    organization: Option<String>,
    assistants_beta: String,
}

impl OpenAIClient {
    /// Create a new client on top of an existing HTTP client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            organization: config.organization.clone(),
            assistants_beta: config.assistants_beta.clone(),
        }
    }

    /// Create a client with its own HTTP client using the configured timeout
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::new(client, config))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorization, content type and organization headers
    pub(crate) fn headers(&self) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.api_key), "API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(ref organization) = self.organization {
            headers.insert(
                "openai-organization",
                header_value(organization, "organization")?,
            );
        }
        Ok(headers)
    }

    /// [`Self::headers`] plus `OpenAI-Beta: assistants=<version>`
    pub(crate) fn assistants_headers(&self) -> ClientResult<HeaderMap> {
        let mut headers = self.headers()?;
        headers.insert(
            "openai-beta",
            header_value(
                &format!("assistants={}", self.assistants_beta),
                "assistants beta version",
            )?,
        );
        Ok(headers)
    }

    /// Send a request and turn any non-success status into [`ClientError::Api`]
    pub(crate) async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> ClientResult<Response> {
        let response = request.send().await?;

        let status = response.status();
        debug!(status = %status, operation, "OpenAI response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, operation, "OpenAI request failed");
            return Err(ClientError::from_response(status.as_u16(), &text));
        }

        Ok(response)
    }

    /// Read a success response body as JSON
    pub(crate) async fn parse<T: DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> ClientResult<T> {
        let body = response.text().await?;
        debug!(body = %body, operation, "OpenAI response body");

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, operation, "Failed to parse OpenAI response");
            ClientError::Json(e)
        })
    }
}

fn header_value(value: &str, what: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ClientError::Config(format!("Invalid {}", what)))
}

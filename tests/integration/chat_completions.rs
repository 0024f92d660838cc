//! Chat completions endpoint integration tests
//!
//! Tests for non-streamed POST /chat/completions:
//! - Successful completion parsing
//! - Error payload mapping

use pretty_assertions::assert_eq;

use openai_client::chat::{ChatCompletionRequest, ChatMessage, Role};
use openai_client::{ClientError, Config, OpenAIClient};

use crate::common::{constants::TEST_MODEL, test_client};
use crate::mocks::{MockOpenAI, OpenAITestData};

fn request() -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        TEST_MODEL,
        vec![
            ChatMessage::system("Be brief."),
            ChatMessage::user("What is Rust?"),
        ],
    )
}

#[tokio::test]
async fn test_chat_completion_success() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_completion(OpenAITestData::completion("A systems language."))
        .await;

    let client = test_client(&mock.uri());
    let completion = client.chat_completion(&request()).await.unwrap();

    assert_eq!(completion.id, "chatcmpl-test");
    let message = completion.first_message().unwrap();
    assert_eq!(message.role, Some(Role::Assistant));
    assert_eq!(message.content, "A systems language.");
    assert_eq!(completion.usage.unwrap().total_tokens, 21);
}

#[tokio::test]
async fn test_chat_completion_sends_messages() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_completion(OpenAITestData::completion("ok")).await;

    let client = test_client(&mock.uri());
    client.chat_completion(&request()).await.unwrap();

    let bodies = mock.received_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["messages"][0]["role"], "system");
    assert_eq!(bodies[0]["messages"][1]["content"], "What is Rust?");
    assert!(bodies[0].get("stream").is_none());
}

#[tokio::test]
async fn test_chat_completion_unauthorized() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_error(401, "Invalid API key provided", "invalid_request_error")
        .await;

    let client = test_client(&mock.uri());
    let err = client.chat_completion(&request()).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "API error 401: Invalid API key provided");
}

#[tokio::test]
async fn test_chat_completion_server_error() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_error(500, "The server had an error", "server_error")
        .await;

    let client = test_client(&mock.uri());
    let err = client.chat_completion(&request()).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_wrong_api_key_does_not_match() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_completion(OpenAITestData::completion("ok")).await;

    let client = OpenAIClient::from_config(&Config::new(mock.uri(), "sk-other")).unwrap();
    let err = client.chat_completion(&request()).await.unwrap_err();

    // wiremock answers unmatched requests with 404
    assert!(err.is_not_found());
}

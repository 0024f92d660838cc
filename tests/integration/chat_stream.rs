//! Streamed chat completion integration tests
//!
//! Tests for POST /chat/completions with `stream: true`:
//! - SSE decoding into chunks
//! - Message assembly from content and tool-call deltas
//! - Whole-completion assembly with usage
//! - Error statuses and in-band stream errors

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;

use openai_client::chat::{
    ChatCompletionRequest, ChatMessage, FunctionCall, Role, StreamOptions, ToolCall,
};
use openai_client::{ClientError, MessageAssembler};

use crate::common::{constants::TEST_MODEL, test_client};
use crate::mocks::{MockOpenAI, OpenAITestData};

fn request(prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest::new(TEST_MODEL, vec![ChatMessage::user(prompt)])
}

#[tokio::test]
async fn test_stream_assembles_content() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream(OpenAITestData::content_chunks(&["Hel", "lo", " world"]))
        .await;

    let client = test_client(&mock.uri());
    let mut stream = client.chat_completions_stream(&request("Say hello")).await.unwrap();

    let mut assembler = MessageAssembler::new();
    let mut chunks = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        chunks += 1;
        for choice in &chunk.choices {
            assembler.merge_chunk(choice);
        }
    }

    // role chunk + 3 fragments + stop chunk
    assert_eq!(chunks, 5);
    let message = assembler.finish();
    assert_eq!(message.role, Some(Role::Assistant));
    assert_eq!(message.content, "Hello world");
    assert!(message.tool_calls.is_none());
    assert!(message.function_call.is_none());
}

#[tokio::test]
async fn test_stream_keeps_unlisted_role() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream(vec![
        OpenAITestData::chunk(json!({"role": "critic", "content": "Too "}), None),
        OpenAITestData::chunk(json!({"content": "long."}), Some("stop")),
    ])
    .await;

    let client = test_client(&mock.uri());
    let completion = client.chat_completion_streamed(&request("Review this")).await.unwrap();

    let message = completion.first_message().unwrap();
    assert_eq!(message.role, Some(Role::Other("critic".to_string())));
    assert_eq!(message.content, "Too long.");
    assert_eq!(
        serde_json::to_value(message).unwrap()["role"],
        json!("critic")
    );
}

#[tokio::test]
async fn test_stream_request_forces_stream_flag() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream(OpenAITestData::content_chunks(&["ok"])).await;

    let client = test_client(&mock.uri());
    let mut req = request("ping");
    req.stream = Some(false);

    let completion = client.chat_completion_streamed(&req).await.unwrap();
    assert_eq!(completion.first_message().unwrap().content, "ok");

    let bodies = mock.received_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["stream"], json!(true));
    assert_eq!(bodies[0]["model"], json!(TEST_MODEL));
}

#[tokio::test]
async fn test_stream_assembles_interleaved_tool_calls() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream(vec![
        OpenAITestData::chunk(json!({"role": "assistant", "content": null}), None),
        OpenAITestData::chunk(
            OpenAITestData::tool_call_delta(0, Some("call_a"), Some("get_weather"), ""),
            None,
        ),
        OpenAITestData::chunk(OpenAITestData::tool_call_delta(0, None, None, "{\"city\":"), None),
        OpenAITestData::chunk(
            OpenAITestData::tool_call_delta(1, Some("call_b"), Some("get_time"), "{\"tz\":"),
            None,
        ),
        OpenAITestData::chunk(OpenAITestData::tool_call_delta(0, None, None, "\"Paris\"}"), None),
        OpenAITestData::chunk(OpenAITestData::tool_call_delta(1, None, None, "\"CET\"}"), None),
        OpenAITestData::chunk(json!({}), Some("tool_calls")),
    ])
    .await;

    let client = test_client(&mock.uri());
    let completion = client
        .chat_completion_streamed(&request("Weather and time in Paris?"))
        .await
        .unwrap();

    assert_eq!(completion.choices.len(), 1);
    assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("tool_calls"));

    let message = &completion.choices[0].message;
    assert_eq!(message.role, Some(Role::Assistant));
    assert_eq!(message.content, "");

    let mut first = ToolCall::function("call_a", "get_weather", "{\"city\":\"Paris\"}");
    first.index = Some(0);
    let mut second = ToolCall::function("call_b", "get_time", "{\"tz\":\"CET\"}");
    second.index = Some(1);
    assert_eq!(message.tool_calls, Some(vec![first, second]));
}

#[tokio::test]
async fn test_stream_assembles_legacy_function_call() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream(vec![
        OpenAITestData::chunk(
            json!({"role": "assistant", "function_call": {"name": "lookup", "arguments": ""}}),
            None,
        ),
        OpenAITestData::chunk(json!({"function_call": {"arguments": "{\"q\":"}}), None),
        OpenAITestData::chunk(json!({"function_call": {"arguments": "\"rust\"}"}}), None),
        OpenAITestData::chunk(json!({}), Some("function_call")),
    ])
    .await;

    let client = test_client(&mock.uri());
    let completion = client.chat_completion_streamed(&request("search")).await.unwrap();

    let message = completion.first_message().unwrap();
    assert_eq!(
        message.function_call,
        Some(FunctionCall::new("lookup", "{\"q\":\"rust\"}"))
    );
    assert_eq!(message.name.as_deref(), Some("lookup"));
    assert!(message.tool_calls.is_none());
}

#[tokio::test]
async fn test_streamed_completion_keeps_usage_and_metadata() {
    let mock = MockOpenAI::start().await;
    let mut chunks = OpenAITestData::content_chunks(&["4"]);
    chunks.push(OpenAITestData::usage_chunk(12, 1));
    mock.mock_chat_stream(chunks).await;

    let client = test_client(&mock.uri());
    let mut req = request("2+2?");
    req.stream_options = Some(StreamOptions { include_usage: true });

    let completion = client.chat_completion_streamed(&req).await.unwrap();

    assert_eq!(completion.id, "chatcmpl-test");
    assert_eq!(completion.model, TEST_MODEL);
    assert_eq!(completion.created, 1_700_000_000);
    assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
    let usage = completion.usage.expect("usage chunk should be kept");
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.total_tokens, 13);

    let bodies = mock.received_bodies().await;
    assert_eq!(bodies[0]["stream_options"], json!({"include_usage": true}));
}

#[tokio::test]
async fn test_streamed_completion_with_multiple_choices() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream(vec![
        OpenAITestData::choice_chunk(1, json!({"role": "assistant", "content": "B"}), None),
        OpenAITestData::choice_chunk(0, json!({"role": "assistant", "content": "A"}), None),
        OpenAITestData::choice_chunk(1, json!({"content": "b"}), Some("stop")),
        OpenAITestData::choice_chunk(0, json!({"content": "a"}), Some("length")),
    ])
    .await;

    let client = test_client(&mock.uri());
    let mut req = request("two answers");
    req.n = Some(2);
    let completion = client.chat_completion_streamed(&req).await.unwrap();

    let summary: Vec<_> = completion
        .choices
        .iter()
        .map(|c| (c.index, c.message.content.as_str(), c.finish_reason.as_deref()))
        .collect();
    // First-seen order, not sorted
    assert_eq!(summary, vec![(1, "Bb", Some("stop")), (0, "Aa", Some("length"))]);
}

#[tokio::test]
async fn test_stream_error_status_fails_before_streaming() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_error(429, "Rate limit exceeded", "rate_limit_error").await;

    let client = test_client(&mock.uri());
    let result = client.chat_completions_stream(&request("hi")).await;

    match result {
        Err(ClientError::Api {
            status,
            message,
            error_type,
            ..
        }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit exceeded");
            assert_eq!(error_type.as_deref(), Some("rate_limit_error"));
        }
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("expected an error status"),
    }
}

#[tokio::test]
async fn test_in_band_error_ends_stream() {
    let mock = MockOpenAI::start().await;
    let first = OpenAITestData::chunk(json!({"role": "assistant", "content": "par"}), None);
    let body = format!(
        "data: {}\n\ndata: {}\n\n",
        first,
        OpenAITestData::error("The server is overloaded", "server_error")
    );
    mock.mock_chat_stream_body(body).await;

    let client = test_client(&mock.uri());
    let mut stream = client.chat_completions_stream(&request("hi")).await.unwrap();

    let chunk = stream.next().await.unwrap().unwrap();
    assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("par"));

    match stream.next().await {
        Some(Err(ClientError::Api { status, message, .. })) => {
            assert_eq!(status, 200);
            assert_eq!(message, "The server is overloaded");
        }
        other => panic!("unexpected item: {other:?}"),
    }
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_malformed_chunk_fails_collect() {
    let mock = MockOpenAI::start().await;
    mock.mock_chat_stream_body("data: {\"choices\": [oops]}\n\ndata: [DONE]\n\n".to_string())
        .await;

    let client = test_client(&mock.uri());
    let result = client.chat_completion_streamed(&request("hi")).await;

    assert!(matches!(result, Err(ClientError::Stream(_))));
}

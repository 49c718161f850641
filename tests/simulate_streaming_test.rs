//! Simulated streaming over single-shot backends.

mod support;

use std::sync::Arc;

use futures::StreamExt;

use lm_middleware::middleware::{
    ExtractReasoningMiddleware, MiddlewareConfig, SimulateStreamingMiddleware, WrapOptions,
    build_auto_middlewares, wrap_language_model,
};
use lm_middleware::prelude::*;
use lm_middleware::streaming::{SimulatedStream, validate_chunk_order};
use support::MockLanguageModel;

fn kinds(chunks: &[StreamChunk]) -> Vec<&'static str> {
    chunks.iter().map(StreamChunk::kind).collect()
}

#[tokio::test]
async fn text_and_two_tool_calls_in_canonical_order() {
    let result = GenerateResult::new("checking the weather")
        .with_tool_call(ToolCall::new("1", "weather", r#"{"city":"Paris"}"#))
        .with_tool_call(ToolCall::new("2", "weather", r#"{"city":"Rome"}"#))
        .with_usage(Usage::new(10, 20))
        .with_finish_reason(FinishReason::ToolCalls);

    let chunks: Vec<StreamChunk> = SimulatedStream::new(result)
        .map(|item| item.unwrap())
        .collect()
        .await;

    assert_eq!(
        kinds(&chunks),
        vec!["text", "tool-call", "tool-call", "usage", "finish"]
    );
    match (&chunks[1], &chunks[2]) {
        (StreamChunk::ToolCall { call: a }, StreamChunk::ToolCall { call: b }) => {
            assert_eq!(a.id, "1");
            assert_eq!(b.id, "2");
        }
        other => panic!("unexpected chunks {other:?}"),
    }
    assert_eq!(
        chunks[4],
        StreamChunk::Finish {
            reason: FinishReason::ToolCalls,
            usage: Usage::new(10, 20),
        }
    );
    assert_eq!(validate_chunk_order(&chunks), Ok(()));
}

#[tokio::test]
async fn empty_text_yields_usage_and_finish_only() {
    let chunks: Vec<StreamChunk> = SimulatedStream::new(GenerateResult::new(""))
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(kinds(&chunks), vec!["usage", "finish"]);
}

#[tokio::test]
async fn middleware_never_calls_base_stream() {
    let mock = MockLanguageModel::new()
        .with_text("<think>hmm</think>fine")
        .with_stream_error(LlmError::UnsupportedOperation("no streaming".into()));
    let model = wrap_language_model(
        mock.clone().into_model(),
        vec![
            Arc::new(ExtractReasoningMiddleware::default()),
            Arc::new(SimulateStreamingMiddleware::new()),
        ],
        WrapOptions::new(),
    );

    let collected = collect_stream(model.do_stream(CallOptions::default()).await.unwrap())
        .await
        .unwrap();
    assert_eq!(collected.text, "fine");
    assert_eq!(collected.reasoning, "hmm");
    assert_eq!(validate_chunk_order(&collected.chunks), Ok(()));
    assert!(mock.calls().iter().all(|(call_type, _)| *call_type == CallType::Generate));
}

#[tokio::test]
async fn auto_selected_chain_handles_reasoning_json_and_simulation() {
    let mock = MockLanguageModel::new()
        .with_ids("deepseek", "deepseek-r1")
        .with_text("<think>shape</think>```json\n{\"n\": 1}\n```");
    let config = MiddlewareConfig::new("deepseek", "deepseek-r1")
        .with_extract_json(true)
        .with_simulate_streaming(true);
    let model = build_auto_middlewares(&config).wrap(mock.into_model(), WrapOptions::new());

    let collected = collect_stream(model.do_stream(CallOptions::default()).await.unwrap())
        .await
        .unwrap();
    assert_eq!(collected.reasoning, "shape");
    assert_eq!(collected.text, "{\"n\": 1}");

    let single = model.do_generate(CallOptions::default()).await.unwrap();
    assert_eq!(single.text, "{\"n\": 1}");
    assert_eq!(single.reasoning.as_deref(), Some("shape"));
}

#[tokio::test]
async fn closing_mid_stream_ends_it() {
    let mut stream = SimulatedStream::new(
        GenerateResult::new("x").with_tool_call(ToolCall::new("1", "t", "{}")),
    );
    assert!(stream.next().await.is_some());
    stream.close();
    assert!(stream.is_closed());
    assert!(stream.next().await.is_none());
}

use futures::StreamExt;
use serde_json::json;
use thinkstream::feed::{jsonl_items, parse_item};
use thinkstream::conversation::ConversationState;
use thinkstream::models::{StreamItem, ToolCallRequest};
use thinkstream::orchestrator::{run_turn, CancelReason, OrchestratorContext, TurnOutcome};
use thinkstream::sink::NullSink;
use thinkstream::ThinkStreamError;

#[test]
fn test_parse_assistant_chunk() {
    let item = parse_item(
        r#"{"type":"assistant_chunk","content":"hi","tool_calls":[{"name":"search","args":{"q":"x"}}]}"#,
        false,
    );
    assert_eq!(
        item,
        StreamItem::AssistantChunk {
            content: "hi".to_string(),
            tool_calls: vec![ToolCallRequest::new("search", json!({"q": "x"}))],
        }
    );
}

#[test]
fn test_parse_defaults_missing_fields() {
    assert_eq!(
        parse_item(r#"{"type":"assistant_chunk","content":"only text"}"#, false),
        StreamItem::text("only text")
    );
    assert_eq!(
        parse_item(r#"{"type":"tool_result","tool_name":"ls"}"#, false),
        StreamItem::tool_result("ls", "", false)
    );
}

#[test]
fn test_unrecognized_lines_become_unknown() {
    assert_eq!(parse_item(r#"{"type":"image","url":"x"}"#, false), StreamItem::Unknown);
    assert_eq!(parse_item("not json at all", false), StreamItem::Unknown);
    assert_eq!(parse_item(r#"{"content":"no type"}"#, false), StreamItem::Unknown);
}

#[tokio::test]
async fn test_jsonl_items_skips_blank_lines() {
    let input = concat!(
        r#"{"type":"assistant_chunk","content":"<think>a</think>"}"#,
        "\n\n",
        r#"{"type":"tool_result","tool_name":"t","content":"r","is_error":true}"#,
        "\n",
        "garbage\n",
    );

    let items: Vec<StreamItem> = jsonl_items(input.as_bytes(), false)
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(
        items,
        vec![
            StreamItem::text("<think>a</think>"),
            StreamItem::tool_result("t", "r", true),
            StreamItem::Unknown,
        ]
    );
    assert_eq!(items[1].type_name(), "tool_result");
}

#[tokio::test]
async fn test_read_error_ends_feed_with_err() {
    let mut input = Vec::new();
    input.extend_from_slice(br#"{"type":"assistant_chunk","content":"The answer is"}"#);
    input.extend_from_slice(b"\n\xff\xfe broken\n");
    input.extend_from_slice(br#"{"type":"assistant_chunk","content":" 42"}"#);
    input.push(b'\n');

    let items: Vec<_> = jsonl_items(input.as_slice(), false).collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].as_ref().unwrap(),
        &StreamItem::text("The answer is")
    );
    assert!(matches!(items[1], Err(ThinkStreamError::IoError(_))));
}

#[tokio::test]
async fn test_read_error_cancels_turn() {
    let input: &[u8] = b"{\"type\":\"assistant_chunk\",\"content\":\"partial\"}\n\xff\n";
    let mut state = ConversationState::new();
    let mut sink = NullSink;

    let report = run_turn(
        &OrchestratorContext::default(),
        &mut state,
        Some("question"),
        jsonl_items(input, false),
        &mut sink,
        std::future::pending::<()>(),
    )
    .await;

    assert!(matches!(
        report.outcome,
        TurnOutcome::Cancelled(CancelReason::FeedError { .. })
    ));
    let contents: Vec<&str> = state.log().all().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["question"]);
}

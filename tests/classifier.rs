use thinkstream::models::ReasoningMarkers;
use thinkstream::stream::{classify, ChunkClassifier, Classification, Segment};

fn markers() -> ReasoningMarkers {
    ReasoningMarkers::default()
}

/// Concatenate segments into (reasoning, response) text.
fn split(segments: &[Segment]) -> (String, String) {
    let mut reasoning = String::new();
    let mut response = String::new();
    for segment in segments {
        match segment {
            Segment::Reasoning(text) => reasoning.push_str(text),
            Segment::Response(text) => response.push_str(text),
            Segment::Open | Segment::Close => {}
        }
    }
    (reasoning, response)
}

#[test]
fn test_classify_plain_text_outside() {
    let result = classify("just an answer", false, &markers());
    assert_eq!(
        result,
        Classification {
            reasoning_part: String::new(),
            response_part: "just an answer".to_string(),
            entered_reasoning: false,
            exited_reasoning: false,
        }
    );
}

#[test]
fn test_classify_opening_marker_without_close() {
    let result = classify("Sure. <think>let me see", false, &markers());
    assert_eq!(result.response_part, "Sure. ");
    assert_eq!(result.reasoning_part, "let me see");
    assert!(result.entered_reasoning);
    assert!(!result.exited_reasoning);
}

#[test]
fn test_classify_open_and_close_in_one_fragment() {
    let result = classify("a<think>b</think>c", false, &markers());
    assert_eq!(result.response_part, "ac");
    assert_eq!(result.reasoning_part, "b");
    assert!(!result.entered_reasoning);
    assert!(result.exited_reasoning);
}

#[test]
fn test_classify_inside_with_close() {
    let result = classify("still thinking</think>answer", true, &markers());
    assert_eq!(result.reasoning_part, "still thinking");
    assert_eq!(result.response_part, "answer");
    assert!(result.exited_reasoning);
    assert!(!result.entered_reasoning);
}

#[test]
fn test_classify_inside_without_close() {
    let result = classify("more thoughts", true, &markers());
    assert_eq!(result.reasoning_part, "more thoughts");
    assert!(result.response_part.is_empty());
    assert!(!result.entered_reasoning);
    assert!(!result.exited_reasoning);
}

#[test]
fn test_classify_keeps_text_after_close_as_response() {
    let result = classify("<think>a</think>b<think>c", false, &markers());
    assert_eq!(result.reasoning_part, "a");
    assert_eq!(result.response_part, "b<think>c");
    assert!(result.exited_reasoning);
}

#[test]
fn test_split_opening_marker_is_detected() {
    let mut classifier = ChunkClassifier::new(markers());

    let first = classifier.push("Hello <th");
    assert_eq!(first, vec![Segment::Response("Hello ".to_string())]);
    assert_eq!(classifier.held(), "<th");

    let second = classifier.push("ink>deep");
    assert_eq!(
        second,
        vec![Segment::Open, Segment::Reasoning("deep".to_string())]
    );
    assert!(classifier.is_inside());
}

#[test]
fn test_split_closing_marker_is_detected() {
    let mut classifier = ChunkClassifier::new(markers());
    let mut segments = classifier.push("<think>plan</");
    segments.extend(classifier.push("thi"));
    segments.extend(classifier.push("nk>done"));

    assert!(segments.contains(&Segment::Close));
    let (reasoning, response) = split(&segments);
    assert_eq!(reasoning, "plan");
    assert_eq!(response, "done");
    assert!(!classifier.is_inside());
}

#[test]
fn test_one_character_fragments() {
    let text = "x<think>why</think>y";
    let mut classifier = ChunkClassifier::new(markers());
    let mut segments = Vec::new();
    for ch in text.chars() {
        segments.extend(classifier.push(&ch.to_string()));
    }
    segments.extend(classifier.finish());

    let (reasoning, response) = split(&segments);
    assert_eq!(reasoning, "why");
    assert_eq!(response, "xy");
}

#[test]
fn test_finish_releases_dangling_partial_marker_as_text() {
    let mut classifier = ChunkClassifier::new(markers());
    let segments = classifier.push("a < b, and a <th");
    assert_eq!(split(&segments).1, "a < b, and a ");

    let rest = classifier.finish();
    assert_eq!(rest, vec![Segment::Response("<th".to_string())]);
    assert_eq!(classifier.held(), "");
}

#[test]
fn test_finish_closes_unterminated_block() {
    let mut classifier = ChunkClassifier::new(markers());
    classifier.push("<think>half a thought");
    let rest = classifier.finish();
    assert_eq!(rest, vec![Segment::Close]);
    assert!(!classifier.is_inside());
}

#[test]
fn test_second_block_in_one_fragment_is_carried() {
    let mut classifier = ChunkClassifier::new(markers());
    let segments = classifier.push("<think>a</think>b<think>c</think>d");
    assert_eq!(split(&segments), ("a".to_string(), "b".to_string()));
    assert_eq!(classifier.held(), "<think>c</think>d");

    let next = classifier.push("");
    assert_eq!(split(&next), ("c".to_string(), "d".to_string()));
}

#[test]
fn test_reset_returns_held_text_and_leaves_block() {
    let mut classifier = ChunkClassifier::new(markers());
    classifier.push("<think>abc</thi");
    assert!(classifier.is_inside());

    let held = classifier.reset();
    assert_eq!(held, "</thi");
    assert!(!classifier.is_inside());
    assert_eq!(classifier.held(), "");
}

#[test]
fn test_custom_markers() {
    let markers = ReasoningMarkers::new("[[reason]]", "[[/reason]]").unwrap();
    let mut classifier = ChunkClassifier::new(markers);
    let mut segments = classifier.push("ok [[rea");
    segments.extend(classifier.push("son]]because[[/reason]] <think>literal"));
    segments.extend(classifier.finish());

    let (reasoning, response) = split(&segments);
    assert_eq!(reasoning, "because");
    assert_eq!(response, "ok  <think>literal");
}

#[test]
fn test_invalid_markers_are_rejected() {
    assert!(ReasoningMarkers::new("", "</think>").is_err());
    assert!(ReasoningMarkers::new("<t>", "<t>").is_err());
}

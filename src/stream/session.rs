use super::classifier::{ChunkClassifier, Segment};
use crate::models::ReasoningMarkers;

/// Block currently being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    InReasoning,
    InResponse,
}

/// State transition produced while consuming a fragment, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ResponseText(String),
    ReasoningOpened,
    ReasoningText(String),
    /// A reasoning block ended. Carries the finalized text, which is empty
    /// when the block was empty or had already been finalized.
    ReasoningClosed(String),
}

/// Aggregation state for one in-flight agent turn.
///
/// Pure state machine: it never logs or renders. The orchestrator turns the
/// returned [`SessionEvent`]s into log entries and render calls.
#[derive(Debug, Clone)]
pub struct StreamSession {
    classifier: ChunkClassifier,
    mode: Mode,
    reasoning_buffer: String,
    response_buffer: String,
    reasoning_finalized: bool,
    has_response_content: bool,
}

impl StreamSession {
    pub fn new(markers: ReasoningMarkers) -> Self {
        Self {
            classifier: ChunkClassifier::new(markers),
            mode: Mode::Idle,
            reasoning_buffer: String::new(),
            response_buffer: String::new(),
            reasoning_finalized: false,
            has_response_content: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn reasoning_buffer(&self) -> &str {
        &self.reasoning_buffer
    }

    pub fn is_reasoning_finalized(&self) -> bool {
        self.reasoning_finalized
    }

    /// Bytes currently held by the session, including classifier carry-over.
    pub fn buffered_len(&self) -> usize {
        self.reasoning_buffer.len() + self.response_buffer.len() + self.classifier.held().len()
    }

    /// Consume a fragment, returning the reasoning block it closed, if any.
    pub fn process_fragment(&mut self, text: &str) -> Option<String> {
        self.ingest(text).into_iter().find_map(|event| match event {
            SessionEvent::ReasoningClosed(finalized) if !finalized.is_empty() => Some(finalized),
            _ => None,
        })
    }

    /// Consume a fragment, reporting every transition in order.
    pub fn ingest(&mut self, text: &str) -> Vec<SessionEvent> {
        let segments = self.classifier.push(text);
        self.apply(segments)
    }

    /// Release classifier carry-over and close an unterminated reasoning block.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        let segments = self.classifier.finish();
        self.apply(segments)
    }

    pub fn finalize_reasoning(&mut self) -> String {
        if self.reasoning_buffer.is_empty() || self.reasoning_finalized {
            return String::new();
        }
        self.reasoning_finalized = true;
        self.reasoning_buffer.clone()
    }

    pub fn peek_pending_response(&self) -> bool {
        !self.response_buffer.is_empty() && self.has_response_content
    }

    pub fn take_pending_response(&mut self) -> String {
        self.has_response_content = false;
        if self.mode == Mode::InResponse {
            self.mode = Mode::Idle;
        }
        std::mem::take(&mut self.response_buffer)
    }

    /// Start a clean reasoning phase after a tool interruption.
    ///
    /// The response buffer is left untouched: unflushed response text stays
    /// pending until the caller takes it.
    pub fn reset_for_new_reasoning(&mut self) {
        let was_inside = self.classifier.is_inside();
        let held = self.classifier.reset();
        if !was_inside {
            self.append_response(&held);
        }

        self.reasoning_buffer.clear();
        self.reasoning_finalized = false;
        self.mode = if self.response_buffer.is_empty() {
            Mode::Idle
        } else {
            Mode::InResponse
        };
    }

    fn apply(&mut self, segments: Vec<Segment>) -> Vec<SessionEvent> {
        let mut events = Vec::with_capacity(segments.len());

        for segment in segments {
            match segment {
                Segment::Open => {
                    if self.reasoning_finalized {
                        self.reasoning_buffer.clear();
                        self.reasoning_finalized = false;
                    }
                    self.mode = Mode::InReasoning;
                    events.push(SessionEvent::ReasoningOpened);
                }
                Segment::Reasoning(text) => {
                    self.reasoning_buffer.push_str(&text);
                    events.push(SessionEvent::ReasoningText(text));
                }
                Segment::Close => {
                    let finalized = self.finalize_reasoning();
                    self.mode = Mode::Idle;
                    events.push(SessionEvent::ReasoningClosed(finalized));
                }
                Segment::Response(text) => {
                    if self.append_response(&text) {
                        events.push(SessionEvent::ResponseText(text));
                    }
                }
            }
        }

        events
    }

    fn append_response(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if text.chars().any(|c| !c.is_whitespace()) {
            self.has_response_content = true;
        }
        self.response_buffer.push_str(text);
        self.mode = Mode::InResponse;
        true
    }
}

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use tokio::sync::mpsc;

/// Receiver of live render events for an in-flight turn.
///
/// Implementations draw, forward or record; they never feed back into the
/// stream processing.
pub trait RenderSink: Send {
    fn on_reasoning_open(&mut self);
    fn on_reasoning_chunk(&mut self, text: &str);
    fn on_reasoning_close(&mut self, final_text: &str);
    fn on_response_chunk(&mut self, text: &str);
    fn on_tool_call(&mut self, name: &str, args: &Value);
    fn on_tool_response(&mut self, name: &str, content: &str, is_error: bool);
}

/// Owned form of a render call, suitable for channels and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    ReasoningOpen,
    ReasoningChunk { text: String },
    ReasoningClose { text: String },
    ResponseChunk { text: String },
    ToolCall { name: String, args: Value },
    ToolResponse { name: String, content: String, is_error: bool },
}

impl RenderEvent {
    /// Replay this event against a sink.
    pub fn dispatch(&self, sink: &mut dyn RenderSink) {
        match self {
            RenderEvent::ReasoningOpen => sink.on_reasoning_open(),
            RenderEvent::ReasoningChunk { text } => sink.on_reasoning_chunk(text),
            RenderEvent::ReasoningClose { text } => sink.on_reasoning_close(text),
            RenderEvent::ResponseChunk { text } => sink.on_response_chunk(text),
            RenderEvent::ToolCall { name, args } => sink.on_tool_call(name, args),
            RenderEvent::ToolResponse {
                name,
                content,
                is_error,
            } => sink.on_tool_response(name, content, *is_error),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn on_reasoning_open(&mut self) {}
    fn on_reasoning_chunk(&mut self, _text: &str) {}
    fn on_reasoning_close(&mut self, _final_text: &str) {}
    fn on_response_chunk(&mut self, _text: &str) {}
    fn on_tool_call(&mut self, _name: &str, _args: &Value) {}
    fn on_tool_response(&mut self, _name: &str, _content: &str, _is_error: bool) {}
}

/// Keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<RenderEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenation of all response chunks seen so far.
    pub fn response_text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::ResponseChunk { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn on_reasoning_open(&mut self) {
        self.events.push(RenderEvent::ReasoningOpen);
    }

    fn on_reasoning_chunk(&mut self, text: &str) {
        self.events.push(RenderEvent::ReasoningChunk {
            text: text.to_string(),
        });
    }

    fn on_reasoning_close(&mut self, final_text: &str) {
        self.events.push(RenderEvent::ReasoningClose {
            text: final_text.to_string(),
        });
    }

    fn on_response_chunk(&mut self, text: &str) {
        self.events.push(RenderEvent::ResponseChunk {
            text: text.to_string(),
        });
    }

    fn on_tool_call(&mut self, name: &str, args: &Value) {
        self.events.push(RenderEvent::ToolCall {
            name: name.to_string(),
            args: args.clone(),
        });
    }

    fn on_tool_response(&mut self, name: &str, content: &str, is_error: bool) {
        self.events.push(RenderEvent::ToolResponse {
            name: name.to_string(),
            content: content.to_string(),
            is_error,
        });
    }
}

/// Forwards events into an unbounded channel.
///
/// Once the receiver is dropped events are silently discarded; rendering is
/// never allowed to fail a turn.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RenderEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<RenderEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: RenderEvent) {
        let _ = self.tx.send(event);
    }
}

impl RenderSink for ChannelSink {
    fn on_reasoning_open(&mut self) {
        self.send(RenderEvent::ReasoningOpen);
    }

    fn on_reasoning_chunk(&mut self, text: &str) {
        self.send(RenderEvent::ReasoningChunk {
            text: text.to_string(),
        });
    }

    fn on_reasoning_close(&mut self, final_text: &str) {
        self.send(RenderEvent::ReasoningClose {
            text: final_text.to_string(),
        });
    }

    fn on_response_chunk(&mut self, text: &str) {
        self.send(RenderEvent::ResponseChunk {
            text: text.to_string(),
        });
    }

    fn on_tool_call(&mut self, name: &str, args: &Value) {
        self.send(RenderEvent::ToolCall {
            name: name.to_string(),
            args: args.clone(),
        });
    }

    fn on_tool_response(&mut self, name: &str, content: &str, is_error: bool) {
        self.send(RenderEvent::ToolResponse {
            name: name.to_string(),
            content: content.to_string(),
            is_error,
        });
    }
}

/// Write each event received from a [`ChannelSink`] as one JSON line until
/// every sender is dropped. Returns the number of events written.
pub async fn write_events<W: Write>(
    mut rx: mpsc::UnboundedReceiver<RenderEvent>,
    mut out: W,
) -> Result<usize> {
    let mut written = 0;
    while let Some(event) = rx.recv().await {
        serde_json::to_writer(&mut out, &event)?;
        writeln!(out)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

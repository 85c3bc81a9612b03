use crate::config::{Config, TurnLimits};
use crate::conversation::ConversationState;
use crate::error::Result;
use crate::format::{format_tool_args, format_tool_result, FormatOutcome};
use crate::models::{
    tool_call_metadata, tool_response_metadata, MessageKind, Metadata, ReasoningMarkers, Role,
    StreamItem, ToolCallRequest,
};
use crate::sink::RenderSink;
use crate::stream::{SessionEvent, StreamSession};
use colored::*;
use futures::{Stream, StreamExt};
use std::fmt;
use std::future::{self, Future};
use tokio::time::{sleep_until, timeout, Instant};

pub struct OrchestratorContext {
    pub markers: ReasoningMarkers,
    pub limits: TurnLimits,
    pub verbose: bool,
}

impl OrchestratorContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            markers: config.markers.clone(),
            limits: config.limits.clone(),
            verbose: config.verbose,
        }
    }
}

impl Default for OrchestratorContext {
    fn default() -> Self {
        Self {
            markers: ReasoningMarkers::default(),
            limits: TurnLimits::default(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancel signal fired.
    Requested,
    ItemTimeout,
    TurnTimeout,
    BufferLimit { limit: usize },
    ToolCallLimit { limit: usize },
    /// The item feed failed before its end.
    FeedError { message: String },
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Requested => write!(f, "cancelled by request"),
            CancelReason::ItemTimeout => write!(f, "no stream item within the item timeout"),
            CancelReason::TurnTimeout => write!(f, "maximum turn duration exceeded"),
            CancelReason::BufferLimit { limit } => {
                write!(f, "buffered text exceeded {} bytes", limit)
            }
            CancelReason::ToolCallLimit { limit } => {
                write!(f, "more than {} tool calls in one turn", limit)
            }
            CancelReason::FeedError { message } => write!(f, "stream feed failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Cancelled(CancelReason),
}

/// Recoverable problems met while processing a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnWarning {
    UnknownItem { index: usize },
    /// Tool-call arguments were not valid JSON and are shown raw.
    ArgsFallback { tool_name: String, reason: String },
    /// A tool result was not valid JSON and is shown raw.
    FormatFallback { tool_name: String, reason: String },
    /// Formatting a tool result failed; the error was logged in its place.
    FormatFailed { tool_name: String, error: String },
}

#[derive(Debug, Clone)]
pub struct TurnReport {
    pub conversation_id: String,
    pub outcome: TurnOutcome,
    /// Messages appended to the log during this turn.
    pub appended: usize,
    pub warnings: Vec<TurnWarning>,
}

impl TurnReport {
    pub fn is_completed(&self) -> bool {
        self.outcome == TurnOutcome::Completed
    }
}

/// Drives one turn's stream items through a [`StreamSession`] into the
/// conversation log and a render sink.
///
/// Turn segmentation rules:
/// - a chunk's tool calls are preceded by a flush of pending response text;
/// - a tool call or tool result ends the current reasoning phase;
/// - the end of the stream closes any open block and flushes the response.
pub struct StreamOrchestrator<'a> {
    context: &'a OrchestratorContext,
    state: &'a mut ConversationState,
    sink: &'a mut dyn RenderSink,
    session: StreamSession,
    tool_calls: usize,
    appended: usize,
    warnings: Vec<TurnWarning>,
}

impl<'a> StreamOrchestrator<'a> {
    pub fn new(
        context: &'a OrchestratorContext,
        state: &'a mut ConversationState,
        sink: &'a mut dyn RenderSink,
    ) -> Self {
        Self {
            session: StreamSession::new(context.markers.clone()),
            context,
            state,
            sink,
            tool_calls: 0,
            appended: 0,
            warnings: Vec::new(),
        }
    }

    /// Record the user query that started this turn.
    pub fn begin(&mut self, query: &str) {
        self.append(Role::User, MessageKind::Text, query.to_string(), None);
    }

    /// Process one stream item. Returns a reason when a limit forces the turn
    /// to stop.
    pub fn handle_item(&mut self, index: usize, item: StreamItem) -> Option<CancelReason> {
        match item {
            StreamItem::AssistantChunk {
                content,
                tool_calls,
            } => {
                if !content.is_empty() {
                    let events = self.session.ingest(&content);
                    self.apply_events(events);
                }
                if !tool_calls.is_empty() {
                    let limit = self.context.limits.max_tool_calls;
                    if self.tool_calls + tool_calls.len() > limit {
                        return Some(CancelReason::ToolCallLimit { limit });
                    }
                    self.record_tool_calls(tool_calls);
                }
            }
            StreamItem::ToolResult {
                tool_name,
                content,
                is_error,
            } => self.record_tool_result(&tool_name, &content, is_error),
            StreamItem::Unknown => {
                if self.context.verbose {
                    eprintln!(
                        "{}",
                        format!("[turn] Ignoring unknown stream item at index {}", index).yellow()
                    );
                }
                self.warnings.push(TurnWarning::UnknownItem { index });
            }
        }

        let limit = self.context.limits.max_buffer_bytes;
        if self.session.buffered_len() > limit {
            return Some(CancelReason::BufferLimit { limit });
        }
        None
    }

    /// End of stream: close open blocks and flush the response.
    pub fn finish(mut self) -> TurnReport {
        let events = self.session.drain();
        self.apply_events(events);
        self.flush_response();

        if self.context.verbose {
            eprintln!(
                "{}",
                format!(
                    "[turn] Completed: {} message(s) appended, {} warning(s)",
                    self.appended,
                    self.warnings.len()
                )
                .dimmed()
            );
        }
        self.report(TurnOutcome::Completed)
    }

    /// Abandon the turn. Messages already appended stay; the partially built
    /// session and any pending response text are dropped.
    pub fn cancel(self, reason: CancelReason) -> TurnReport {
        if self.context.verbose {
            eprintln!(
                "{}",
                format!(
                    "[turn] Cancelled ({:?}); discarding {} buffered byte(s)",
                    reason,
                    self.session.buffered_len()
                )
                .yellow()
            );
        }
        self.report(TurnOutcome::Cancelled(reason))
    }

    fn record_tool_calls(&mut self, calls: Vec<ToolCallRequest>) {
        let events = self.session.drain();
        self.apply_events(events);
        self.flush_response();

        for call in calls {
            let (args, fallback) = format_tool_args(&call.args);
            if let Some(reason) = fallback {
                if self.context.verbose {
                    eprintln!(
                        "{}",
                        format!("[turn] Arguments for '{}' are not valid JSON: {}", call.name, reason)
                            .yellow()
                    );
                }
                self.warnings.push(TurnWarning::ArgsFallback {
                    tool_name: call.name.clone(),
                    reason,
                });
            }

            self.append(
                Role::Assistant,
                MessageKind::ToolCall,
                format!("Calling tool: {}", call.name),
                Some(tool_call_metadata(&call.name, args.clone())),
            );
            self.sink.on_tool_call(&call.name, &args);
            self.tool_calls += 1;
        }

        // A tool call always ends the current reasoning phase.
        self.session.reset_for_new_reasoning();
    }

    fn record_tool_result(&mut self, tool_name: &str, content: &str, is_error: bool) {
        let events = self.session.drain();
        self.apply_events(events);

        let outcome = format_tool_result(content);
        let error = match &outcome {
            FormatOutcome::Formatted(_) => is_error,
            FormatOutcome::Fallback { reason, .. } => {
                self.warnings.push(TurnWarning::FormatFallback {
                    tool_name: tool_name.to_string(),
                    reason: reason.clone(),
                });
                is_error
            }
            FormatOutcome::Failed { error } => {
                self.warnings.push(TurnWarning::FormatFailed {
                    tool_name: tool_name.to_string(),
                    error: error.clone(),
                });
                true
            }
        };
        let text = outcome.display_text().to_string();

        if self.context.verbose {
            eprintln!(
                "{}",
                format!("[turn] Tool result from '{}' ({} bytes, error={})", tool_name, text.len(), error)
                    .dimmed()
            );
        }

        self.append(
            Role::Assistant,
            MessageKind::ToolResponse,
            text.clone(),
            Some(tool_response_metadata(tool_name, error)),
        );
        self.sink.on_tool_response(tool_name, &text, error);

        self.session.reset_for_new_reasoning();
    }

    fn apply_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::ResponseText(text) => self.sink.on_response_chunk(&text),
                SessionEvent::ReasoningOpened => self.sink.on_reasoning_open(),
                SessionEvent::ReasoningText(text) => self.sink.on_reasoning_chunk(&text),
                SessionEvent::ReasoningClosed(finalized) => {
                    self.append(Role::Assistant, MessageKind::Reasoning, finalized.clone(), None);
                    self.sink.on_reasoning_close(&finalized);
                }
            }
        }
    }

    /// Append the pending response. Whitespace-only text is taken and
    /// discarded instead of logged.
    fn flush_response(&mut self) {
        let has_content = self.session.peek_pending_response();
        let pending = self.session.take_pending_response();
        if has_content {
            self.append(Role::Assistant, MessageKind::Text, pending, None);
        }
    }

    fn append(&mut self, role: Role, kind: MessageKind, content: String, metadata: Option<Metadata>) {
        if let Some(message) = self.state.log_mut().append(role, kind, content, metadata) {
            if self.context.verbose {
                eprintln!(
                    "{}",
                    format!("[turn] #{} {} {}", message.id, message.role, message.kind).dimmed()
                );
            }
            self.appended += 1;
        }
    }

    fn report(self, outcome: TurnOutcome) -> TurnReport {
        TurnReport {
            conversation_id: self.state.id().to_string(),
            outcome,
            appended: self.appended,
            warnings: self.warnings,
        }
    }
}

/// Run one full turn over `items`.
///
/// `cancel` resolving aborts the turn; limits in the context abort it the
/// same way, as does an `Err` from the feed. A turn duration too large to
/// represent as a deadline means the turn has none. Use [`ConversationRegistry::begin_turn`] to obtain exclusive
/// access to a shared conversation first.
///
/// [`ConversationRegistry::begin_turn`]: crate::conversation::ConversationRegistry::begin_turn
pub async fn run_turn<I, C>(
    context: &OrchestratorContext,
    state: &mut ConversationState,
    query: Option<&str>,
    items: I,
    sink: &mut dyn RenderSink,
    cancel: C,
) -> TurnReport
where
    I: Stream<Item = Result<StreamItem>>,
    C: Future<Output = ()>,
{
    let mut orchestrator = StreamOrchestrator::new(context, state, sink);
    if let Some(query) = query {
        orchestrator.begin(query);
    }

    tokio::pin!(items);
    tokio::pin!(cancel);
    let deadline = Instant::now().checked_add(context.limits.max_turn_duration);
    let turn_deadline = async move {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => future::pending().await,
        }
    };
    tokio::pin!(turn_deadline);
    let mut index = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = &mut cancel => return orchestrator.cancel(CancelReason::Requested),
            _ = &mut turn_deadline => return orchestrator.cancel(CancelReason::TurnTimeout),
            next = timeout(context.limits.item_timeout, items.next()) => next,
        };

        match next {
            Ok(Some(Ok(item))) => {
                if let Some(reason) = orchestrator.handle_item(index, item) {
                    return orchestrator.cancel(reason);
                }
                index += 1;
            }
            Ok(Some(Err(e))) => {
                if context.verbose {
                    eprintln!("{}", format!("[turn] Stream feed failed: {}", e).red());
                }
                return orchestrator.cancel(CancelReason::FeedError {
                    message: e.to_string(),
                });
            }
            Ok(None) => break,
            Err(_) => {
                if context.verbose {
                    eprintln!(
                        "{}",
                        format!(
                            "[turn] No stream item received for {} seconds",
                            context.limits.item_timeout.as_secs()
                        )
                        .red()
                    );
                }
                return orchestrator.cancel(CancelReason::ItemTimeout);
            }
        }
    }

    orchestrator.finish()
}

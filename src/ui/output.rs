use crate::sink::RenderSink;
use crate::ui::highlight::{panel_footer, panel_header, MarkdownStream};
use colored::*;
use serde_json::Value;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const FLUSH_INTERVAL: Duration = Duration::from_millis(50);

/// Draws a turn on the terminal as it streams.
pub struct TerminalSink {
    markdown: MarkdownStream,
    hide_reasoning: bool,
    reasoning_open: bool,
    reasoning_ends_with_newline: bool,
    last_flush: Instant,
}

impl TerminalSink {
    pub fn new(hide_reasoning: bool) -> Self {
        Self {
            markdown: MarkdownStream::new(),
            hide_reasoning,
            reasoning_open: false,
            reasoning_ends_with_newline: true,
            last_flush: Instant::now(),
        }
    }

    /// Print whatever the markdown renderer still holds.
    pub fn finish(&mut self) {
        let remaining = self.markdown.flush();
        if !remaining.is_empty() {
            print!("{}", remaining.trim_end());
        }
        println!();
        let _ = io::stdout().flush();
    }

    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        print!("{}", text);
        if self.last_flush.elapsed() > FLUSH_INTERVAL {
            let _ = io::stdout().flush();
            self.last_flush = Instant::now();
        }
    }

    fn flush_markdown(&mut self) {
        let remaining = self.markdown.flush();
        if !remaining.is_empty() {
            print!("{}", remaining);
            if !remaining.ends_with('\n') {
                println!();
            }
        }
    }

    fn display_tool_block(&mut self, title: &str, content: &str) {
        self.flush_markdown();
        let sep = if content.ends_with('\n') { "" } else { "\n" };
        let body = if serde_json::from_str::<Value>(content).is_ok() {
            self.markdown.highlighter().highlight(content, Some("json"))
        } else {
            content.to_string()
        };
        print!("{}{}{}{}", panel_header(title), body, sep, panel_footer());
        let _ = io::stdout().flush();
    }
}

impl RenderSink for TerminalSink {
    fn on_reasoning_open(&mut self) {
        if self.hide_reasoning {
            return;
        }
        self.flush_markdown();
        println!();
        print!("{}", panel_header("REASONING"));
        self.reasoning_open = true;
        self.reasoning_ends_with_newline = true;
    }

    fn on_reasoning_chunk(&mut self, text: &str) {
        if self.hide_reasoning || !self.reasoning_open {
            return;
        }
        // Markdown emphasis is noise inside the dimmed panel.
        let display = text.replace("**", "");
        if display.is_empty() {
            return;
        }
        self.reasoning_ends_with_newline = display.ends_with('\n');
        self.write(&display.dimmed().to_string());
    }

    fn on_reasoning_close(&mut self, _final_text: &str) {
        if self.hide_reasoning || !self.reasoning_open {
            return;
        }
        if !self.reasoning_ends_with_newline {
            println!();
        }
        print!("{}", panel_footer());
        self.reasoning_open = false;
        let _ = io::stdout().flush();
    }

    fn on_response_chunk(&mut self, text: &str) {
        let formatted = self.markdown.append(text);
        self.write(&formatted);
    }

    fn on_tool_call(&mut self, name: &str, args: &Value) {
        self.flush_markdown();
        println!("{}", format!("Calling tool: {}...", name).cyan());
        let has_args = match args {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        };
        if has_args {
            println!("{}", format!("    args: {}", args).dimmed());
        }
    }

    fn on_tool_response(&mut self, name: &str, content: &str, is_error: bool) {
        if is_error {
            self.display_tool_block(&format!("TOOL ERROR: {}", name), content);
        } else {
            self.display_tool_block(&format!("TOOL: {}", name), content);
        }
    }
}


use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const FENCE: &str = "```";
const RULE: &str = "──────────────────────────────────────────────────";

pub fn panel_header(title: &str) -> String {
    format!("{}[{}]{}\n", "┌─".dimmed(), title.cyan(), RULE.dimmed())
}

pub fn panel_footer() -> String {
    format!("{}{}{}\n", "└".dimmed(), RULE.dimmed(), "────────".dimmed())
}

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Terminal-escaped rendering of `code`; plain text when the language or
    /// theme is unavailable.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let theme = match self
            .theme_set
            .themes
            .get("Solarized (dark)")
            .or_else(|| self.theme_set.themes.values().next())
        {
            Some(theme) => theme,
            None => return code.to_string(),
        };

        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let ranges: Vec<(Style, &str)> = ranges;
                    output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                }
                Err(_) => output.push_str(line),
            }
        }
        output
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Streaming markdown renderer: prose passes through untouched, fenced code
/// blocks are drawn as highlighted panels one complete line at a time.
pub struct MarkdownStream {
    highlighter: Highlighter,
    pending: String,
    /// Language of the open fence; `Some(None)` for a fence without one.
    fence: Option<Option<String>>,
}

impl MarkdownStream {
    pub fn new() -> Self {
        Self {
            highlighter: Highlighter::new(),
            pending: String::new(),
            fence: None,
        }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn append(&mut self, text: &str) -> String {
        self.pending.push_str(text);
        let mut output = String::new();

        loop {
            match &self.fence {
                None => {
                    let Some(start) = self.pending.find(FENCE) else {
                        // Hold back trailing backticks that may start a fence.
                        let keep = self.pending.len() - self.pending.trim_end_matches('`').len();
                        let emit = self.pending.len() - keep.min(FENCE.len() - 1);
                        output.push_str(&self.pending[..emit]);
                        self.pending.drain(..emit);
                        break;
                    };
                    let Some(newline) = self.pending[start..].find('\n') else {
                        output.push_str(&self.pending[..start]);
                        self.pending.drain(..start);
                        break;
                    };

                    output.push_str(&self.pending[..start]);
                    let lang = self.pending[start + FENCE.len()..start + newline].trim();
                    output.push_str(&panel_header(if lang.is_empty() { "code" } else { lang }));
                    self.fence = Some((!lang.is_empty()).then(|| lang.to_string()));
                    self.pending.drain(..start + newline + 1);
                }
                Some(lang) => {
                    let Some(newline) = self.pending.find('\n') else {
                        break;
                    };
                    let line: String = self.pending.drain(..=newline).collect();
                    if line.trim_start().starts_with(FENCE) {
                        output.push_str(&panel_footer());
                        self.fence = None;
                    } else {
                        let lang = lang.clone();
                        output.push_str(&self.highlighter.highlight(&line, lang.as_deref()));
                    }
                }
            }
        }

        output
    }

    /// Emit everything still held, closing an unterminated fence.
    pub fn flush(&mut self) -> String {
        let pending = std::mem::take(&mut self.pending);
        match self.fence.take() {
            Some(lang) => {
                let mut output = String::new();
                let rest = pending.trim_end_matches(FENCE);
                if !rest.is_empty() {
                    output.push_str(&self.highlighter.highlight(rest, lang.as_deref()));
                    if !rest.ends_with('\n') {
                        output.push('\n');
                    }
                }
                output.push_str(&panel_footer());
                output
            }
            None => pending,
        }
    }
}

impl Default for MarkdownStream {
    fn default() -> Self {
        Self::new()
    }
}

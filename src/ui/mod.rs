pub mod highlight;
pub mod output;

pub use highlight::{MarkdownStream, Highlighter};
pub use output::TerminalSink;

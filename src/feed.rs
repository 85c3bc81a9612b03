use crate::error::{Result, ThinkStreamError};
use crate::models::StreamItem;
use colored::*;
use futures::stream::{self, Stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Parse one JSON line into a stream item.
///
/// Lines that are not valid items become [`StreamItem::Unknown`] so a single
/// bad record never ends the feed.
pub fn parse_item(line: &str, verbose: bool) -> StreamItem {
    match serde_json::from_str::<StreamItem>(line) {
        Ok(item) => item,
        Err(e) => {
            if verbose {
                eprintln!("{}", format!("[stream] JSON parse error: {}", e).dimmed());
            }
            StreamItem::Unknown
        }
    }
}

/// Stream items read as JSON Lines. Blank lines are skipped.
///
/// A read error (including invalid UTF-8) is yielded once as `Err` and ends
/// the feed, so callers can tell it apart from a clean end of input.
pub fn jsonl_items<R>(reader: R, verbose: bool) -> impl Stream<Item = Result<StreamItem>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(Some(reader.lines()), move |state| async move {
        let Some(mut lines) = state else {
            return None;
        };
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some((Ok(parse_item(&line, verbose)), Some(lines)));
                }
                Ok(None) => return None,
                Err(e) => {
                    if verbose {
                        eprintln!("{}", format!("[stream] Read error: {}", e).dimmed());
                    }
                    return Some((Err(ThinkStreamError::IoError(e)), None));
                }
            }
        }
    })
}

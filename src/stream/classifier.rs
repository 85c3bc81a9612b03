use crate::models::ReasoningMarkers;

/// Split of one fragment into reasoning and response text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub reasoning_part: String,
    pub response_part: String,
    /// An opening marker was seen and the block is still open.
    pub entered_reasoning: bool,
    /// A closing marker was seen.
    pub exited_reasoning: bool,
}

/// Ordered piece of classified input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Response(String),
    Open,
    Reasoning(String),
    Close,
}

struct Scan {
    segments: Vec<Segment>,
    consumed: usize,
    inside: bool,
}

/// Classify a single fragment given whether a reasoning block is open.
///
/// Pure and stateless: a marker split across two fragments is not detected
/// here. Use [`ChunkClassifier`] for incremental input.
pub fn classify(fragment: &str, in_reasoning: bool, markers: &ReasoningMarkers) -> Classification {
    let step = scan(fragment, in_reasoning, markers);
    let mut classification = Classification::default();
    let mut opened = false;

    for segment in step.segments {
        match segment {
            Segment::Response(text) => classification.response_part.push_str(&text),
            Segment::Reasoning(text) => classification.reasoning_part.push_str(&text),
            Segment::Open => opened = true,
            Segment::Close => classification.exited_reasoning = true,
        }
    }

    // Anything after the first close is response text, markers included.
    classification
        .response_part
        .push_str(&fragment[step.consumed..]);
    classification.entered_reasoning = opened && !classification.exited_reasoning;
    classification
}

/// One classification step over `text`.
///
/// Stops after at most one closing marker; if the text following that close
/// opens another block, the scan ends right before the opening marker.
fn scan(text: &str, inside: bool, markers: &ReasoningMarkers) -> Scan {
    let mut segments = Vec::new();
    let mut pos = 0;

    if !inside {
        match text.find(&markers.open) {
            None => {
                push_text(&mut segments, Segment::Response, text);
                return Scan {
                    segments,
                    consumed: text.len(),
                    inside: false,
                };
            }
            Some(start) => {
                push_text(&mut segments, Segment::Response, &text[..start]);
                segments.push(Segment::Open);
                pos = start + markers.open.len();
            }
        }
    }

    let rest = &text[pos..];
    match rest.find(&markers.close) {
        None => {
            push_text(&mut segments, Segment::Reasoning, rest);
            Scan {
                segments,
                consumed: text.len(),
                inside: true,
            }
        }
        Some(end) => {
            push_text(&mut segments, Segment::Reasoning, &rest[..end]);
            segments.push(Segment::Close);

            let tail_start = pos + end + markers.close.len();
            let tail = &text[tail_start..];
            let tail_len = tail.find(&markers.open).unwrap_or(tail.len());
            push_text(&mut segments, Segment::Response, &tail[..tail_len]);
            Scan {
                segments,
                consumed: tail_start + tail_len,
                inside: false,
            }
        }
    }
}

fn push_text(segments: &mut Vec<Segment>, make: fn(String) -> Segment, text: &str) {
    if !text.is_empty() {
        segments.push(make(text.to_string()));
    }
}

/// Length of the longest suffix of `text` that is a proper prefix of `marker`.
fn partial_marker_suffix(text: &str, marker: &str) -> usize {
    let max = marker.len().saturating_sub(1).min(text.len());
    (1..=max)
        .rev()
        .find(|&n| marker.is_char_boundary(n) && text.ends_with(&marker[..n]))
        .unwrap_or(0)
}

/// Incremental tag-boundary detector.
///
/// Tracks whether a reasoning block is open and holds back any trailing text
/// that could be the start of the next marker, so markers split across
/// fragments are still recognized.
#[derive(Debug, Clone)]
pub struct ChunkClassifier {
    markers: ReasoningMarkers,
    inside: bool,
    pending: String,
}

impl ChunkClassifier {
    pub fn new(markers: ReasoningMarkers) -> Self {
        Self {
            markers,
            inside: false,
            pending: String::new(),
        }
    }

    pub fn markers(&self) -> &ReasoningMarkers {
        &self.markers
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Text held back from previous fragments, not yet classified.
    pub fn held(&self) -> &str {
        &self.pending
    }

    /// Classify the next fragment.
    ///
    /// At most one reasoning block is closed per call. Input that would open
    /// a further block is kept and classified on the next call (or by
    /// [`finish`](Self::finish)).
    pub fn push(&mut self, fragment: &str) -> Vec<Segment> {
        self.pending.push_str(fragment);
        let text = std::mem::take(&mut self.pending);

        let step = scan(&text, self.inside, &self.markers);
        self.inside = step.inside;
        let mut segments = step.segments;

        if step.consumed < text.len() {
            self.pending = text[step.consumed..].to_string();
            return segments;
        }

        let expected = if self.inside {
            &self.markers.close
        } else {
            &self.markers.open
        };

        let mut emptied = false;
        if let Some(Segment::Response(tail) | Segment::Reasoning(tail)) = segments.last_mut() {
            let held = partial_marker_suffix(tail, expected);
            if held > 0 {
                let split = tail.len() - held;
                self.pending = tail[split..].to_string();
                tail.truncate(split);
                emptied = tail.is_empty();
            }
        }
        if emptied {
            segments.pop();
        }

        segments
    }

    /// Release everything held back and close an unterminated block.
    ///
    /// A partial marker still held at this point is literal text.
    pub fn finish(&mut self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut text = std::mem::take(&mut self.pending);

        while !text.is_empty() {
            let step = scan(&text, self.inside, &self.markers);
            self.inside = step.inside;
            segments.extend(step.segments);
            text = text[step.consumed..].to_string();
        }

        if self.inside {
            segments.push(Segment::Close);
            self.inside = false;
        }

        segments
    }

    /// Force the OUTSIDE state, returning any held-back text.
    pub fn reset(&mut self) -> String {
        self.inside = false;
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_suffix_matches_marker_prefixes_only() {
        assert_eq!(partial_marker_suffix("hello <th", "<think>"), 3);
        assert_eq!(partial_marker_suffix("hello <", "<think>"), 1);
        assert_eq!(partial_marker_suffix("hello", "<think>"), 0);
        assert_eq!(partial_marker_suffix("<think", "<think>"), 6);
        assert_eq!(partial_marker_suffix("", "<think>"), 0);
    }

    #[test]
    fn scan_stops_before_second_block() {
        let markers = ReasoningMarkers::default();
        let text = "<think>a</think>b<think>c</think>d";
        let step = scan(text, false, &markers);
        assert_eq!(
            step.segments,
            vec![
                Segment::Open,
                Segment::Reasoning("a".to_string()),
                Segment::Close,
                Segment::Response("b".to_string()),
            ]
        );
        assert_eq!(&text[step.consumed..], "<think>c</think>d");
        assert!(!step.inside);
    }
}

// Highlight Reconstructor
// Re-locates problem paragraphs inside the original text and wraps them in a marker

use std::ops::Range;
use tracing::debug;

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ff0000";
pub const LINE_BREAK_MARKUP: &str = "<br>";
const CLOSE_TAG: &str = "</span>";

/// Escape the characters that are significant in HTML text content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape `text` and render its line breaks as `<br>`.
pub fn render_text(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "\n")
        .replace('\n', LINE_BREAK_MARKUP)
}

/// Problem paragraph reduced to its words; matches wherever the same words
/// appear separated by any run of whitespace.
struct WhitespaceTolerant<'a> {
    pieces: Vec<&'a str>,
}

impl<'a> WhitespaceTolerant<'a> {
    fn new(problem: &'a str) -> Option<Self> {
        let pieces: Vec<&str> = problem.split_whitespace().collect();
        if pieces.is_empty() {
            None
        } else {
            Some(Self { pieces })
        }
    }

    /// End offset of a match starting exactly at `start`.
    fn match_at(&self, text: &str, start: usize) -> Option<usize> {
        let mut pos = start;
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                let rest = &text[pos..];
                let gap = rest.len() - rest.trim_start().len();
                if gap == 0 {
                    return None;
                }
                pos += gap;
            }
            if !text[pos..].starts_with(piece) {
                return None;
            }
            pos += piece.len();
        }
        Some(pos)
    }

    /// Leftmost non-overlapping matches, in text order.
    fn find_iter(&self, text: &str) -> Vec<Range<usize>> {
        let first = self.pieces[0];
        let step = first.chars().next().map_or(1, char::len_utf8);
        let mut found = Vec::new();
        let mut from = 0;
        while let Some(offset) = text[from..].find(first) {
            let start = from + offset;
            match self.match_at(text, start) {
                Some(end) => {
                    found.push(start..end);
                    from = end;
                }
                None => from = start + step,
            }
        }
        found
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    open_tag: String,
}

impl Highlighter {
    pub fn new(color: &str) -> Self {
        Self {
            open_tag: format!(r#"<span style="background-color:{};">"#, color),
        }
    }

    /// Byte ranges of every occurrence of every problem paragraph, in text order.
    ///
    /// Occurrences overlapping a range already claimed by an earlier problem are
    /// skipped, so no text is ever wrapped twice.
    pub fn find_spans(&self, original: &str, problems: &[String]) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();

        for (index, problem) in problems.iter().enumerate() {
            let Some(pattern) = WhitespaceTolerant::new(problem) else {
                continue;
            };

            let mut matched = false;
            for range in pattern.find_iter(original) {
                if spans.iter().any(|s| overlaps(s, &range)) {
                    continue;
                }
                matched = true;
                spans.push(range);
            }

            if !matched {
                debug!(problem_index = index, "highlight.unmatched");
            }
        }

        spans.sort_by_key(|r| r.start);
        spans
    }

    /// Wrap every problem occurrence in the marker, keeping the original
    /// characters (HTML-escaped), then render line breaks as `<br>`.
    pub fn highlight(&self, original: &str, problems: &[String]) -> String {
        let spans = self.find_spans(original, problems);

        let mut out = String::with_capacity(original.len() + spans.len() * 48);
        let mut cursor = 0;
        for span in spans {
            out.push_str(&render_text(&original[cursor..span.start]));
            out.push_str(&self.open_tag);
            out.push_str(&render_text(&original[span.clone()]));
            out.push_str(CLOSE_TAG);
            cursor = span.end;
        }
        out.push_str(&render_text(&original[cursor..]));
        out
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_COLOR)
    }
}

/// Highlight with the default red marker
pub fn highlight(original: &str, problems: &[String]) -> String {
    Highlighter::default().highlight(original, problems)
}

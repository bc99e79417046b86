// Text Processing Service
// Line-ending normalization and paragraph segmentation

/// Characters that mark a chunk as a list item continuing the current paragraph.
pub const LIST_MARKERS: [char; 3] = ['•', '+', '-'];

/// Normalize line endings (CRLF -> LF)
pub fn normalize_line_endings(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace("\r\n", "\n")
}

fn is_list_chunk(chunk: &str) -> bool {
    chunk.starts_with(&LIST_MARKERS[..])
}

/// Split a document into paragraphs.
///
/// Chunks are separated by blank lines. A chunk starting with a list marker is
/// joined onto the current paragraph with a single line break instead of
/// opening a new one. A hyphen-led ordinary sentence is indistinguishable from
/// a list item here.
pub fn segment_paragraphs(document: &str) -> Vec<String> {
    let normalized = normalize_line_endings(document);

    let chunks = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for chunk in chunks {
        if is_list_chunk(chunk) {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(chunk);
            continue;
        }

        if !current.is_empty() {
            paragraphs.push(std::mem::take(&mut current));
        }
        current.push_str(chunk);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_boundary() {
        assert_eq!(segment_paragraphs("A\n\nB"), vec!["A", "B"]);
    }

    #[test]
    fn test_inline_list_stays_in_paragraph() {
        let paras = segment_paragraphs("A\n- item1\n- item2\n\nB");
        assert_eq!(paras, vec!["A\n- item1\n- item2", "B"]);
    }

    #[test]
    fn test_separated_list_items_join_previous_paragraph() {
        let text = "We share data with:\n\n• advertisers\n\n+ partners\n\n- affiliates\n\nContact us.";
        let paras = segment_paragraphs(text);
        assert_eq!(
            paras,
            vec![
                "We share data with:\n• advertisers\n+ partners\n- affiliates",
                "Contact us.",
            ]
        );
    }

    #[test]
    fn test_leading_list_chunk_becomes_first_paragraph() {
        let paras = segment_paragraphs("- first\n\n- second\n\nBody");
        assert_eq!(paras, vec!["- first\n- second", "Body"]);
    }

    #[test]
    fn test_crlf_and_extra_blank_lines() {
        let paras = segment_paragraphs("  A line\r\n\r\n\r\n\r\n  B line  \r\n");
        assert_eq!(paras, vec!["A line", "B line"]);
    }

    #[test]
    fn test_hyphen_led_sentence_is_treated_as_list() {
        let paras = segment_paragraphs("Fees apply.\n\n-5 credits are deducted monthly.");
        assert_eq!(paras.len(), 1);
    }

    #[test]
    fn test_empty_and_whitespace_documents() {
        assert!(segment_paragraphs("").is_empty());
        assert!(segment_paragraphs(" \n\n \n\n\t").is_empty());
    }
}

//! Line-oriented conflict-marker scanner.
//!
//! Recognizes standard Git conflict blocks:
//!
//! ```text
//! <<<<<<< HEAD
//! <ours lines>
//! =======
//! <theirs lines>
//! >>>>>>> <label>
//! ```
//!
//! The scanner is an explicit state machine over whole lines rather than a
//! multi-line regex, so it cannot backtrack and a malformed block (missing
//! separator, unterminated end line) falls out of the machine untouched.
//! Marker lines seen *inside* an open block are ordinary payload: the first
//! completed outer block wins and scanning resumes after its end line.

use tracing::debug;

// ---------------------------------------------------------------------------
// Marker grammar
// ---------------------------------------------------------------------------

/// Line opening a conflict block; the "ours" (HEAD) region follows.
pub const OURS_MARKER: &str = "<<<<<<< HEAD";

/// Line separating the "ours" region from the "theirs" region.
pub const SEPARATOR_MARKER: &str = "=======";

/// Prefix of the line closing a conflict block. The rest of the line is a
/// free-form label (branch name or commit reference) and must be non-empty.
pub const THEIRS_MARKER_PREFIX: &str = ">>>>>>> ";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A well-formed conflict block found in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictBlock {
    /// 1-indexed line number of the `<<<<<<< HEAD` line.
    pub start_line: usize,
    /// 1-indexed line number of the `>>>>>>> ` line.
    pub end_line: usize,
    /// Raw "ours" payload: the lines between the start marker and the
    /// separator, each newline-terminated. Empty when the region has no lines.
    pub ours: String,
    /// Raw "theirs" payload, in the same form as `ours`.
    pub theirs: String,
    /// Text after `>>>>>>> ` on the end line.
    pub label: String,
    /// Byte range of the whole block (all marker lines and both payloads)
    /// within the scanned buffer.
    pub(crate) span: std::ops::Range<usize>,
}

impl ConflictBlock {
    /// Number of lines the block occupies, markers included.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Scanner states, carrying the offsets of the block under construction.
/// A block is only emitted once the machine has walked Scanning -> InOurs ->
/// InTheirs and seen a valid end line.
#[derive(Clone, Copy)]
enum ScanState {
    /// Outside any block.
    Scanning,
    /// Between the start marker and the separator.
    InOurs {
        start_offset: usize,
        start_line: usize,
        ours_start: usize,
    },
    /// Between the separator and the end line.
    InTheirs {
        start_offset: usize,
        start_line: usize,
        ours_start: usize,
        ours_end: usize,
        theirs_start: usize,
    },
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Cheap pre-filter: does the buffer contain the start token anywhere?
///
/// This is a substring check, not a line check. The batch engine uses it to
/// decide whether a file is worth resolving and rewriting at all.
pub fn contains_marker(content: &str) -> bool {
    content.contains(OURS_MARKER)
}

/// Find all well-formed conflict blocks in `content`.
///
/// Matching is non-overlapping and left-to-right. Markers are matched as
/// whole lines only; the end line must carry a non-empty label and be
/// newline-terminated. Anything that never completes the three-marker
/// grammar is not reported.
pub fn scan(content: &str) -> Vec<ConflictBlock> {
    let mut blocks = Vec::new();
    let mut state = ScanState::Scanning;
    let mut offset = 0;
    let mut line_no = 0;

    for line in content.split_inclusive('\n') {
        line_no += 1;
        let next_offset = offset + line.len();
        // A line missing its terminator can only be the last line of the
        // buffer; it can never complete a marker.
        let body = line.strip_suffix('\n');

        match state {
            ScanState::Scanning => {
                if body == Some(OURS_MARKER) {
                    state = ScanState::InOurs {
                        start_offset: offset,
                        start_line: line_no,
                        ours_start: next_offset,
                    };
                }
            }
            ScanState::InOurs {
                start_offset,
                start_line,
                ours_start,
            } => {
                if body == Some(SEPARATOR_MARKER) {
                    state = ScanState::InTheirs {
                        start_offset,
                        start_line,
                        ours_start,
                        ours_end: offset,
                        theirs_start: next_offset,
                    };
                }
            }
            ScanState::InTheirs {
                start_offset,
                start_line,
                ours_start,
                ours_end,
                theirs_start,
            } => {
                let label = body.and_then(|b| b.strip_prefix(THEIRS_MARKER_PREFIX));
                if let Some(label) = label.filter(|l| !l.is_empty()) {
                    blocks.push(ConflictBlock {
                        start_line,
                        end_line: line_no,
                        ours: content[ours_start..ours_end].to_string(),
                        theirs: content[theirs_start..offset].to_string(),
                        label: label.to_string(),
                        span: start_offset..next_offset,
                    });
                    state = ScanState::Scanning;
                }
            }
        }

        offset = next_offset;
    }

    debug!(blocks = blocks.len(), "conflict scan complete");
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers() {
        assert!(scan("plain text\nno conflicts here\n").is_empty());
        assert!(!contains_marker("plain text\n"));
    }

    #[test]
    fn test_single_block() {
        let content = "<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> branch\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        let b = &blocks[0];
        assert_eq!(b.start_line, 1);
        assert_eq!(b.end_line, 5);
        assert_eq!(b.ours, "A\n");
        assert_eq!(b.theirs, "B\n");
        assert_eq!(b.label, "branch");
        assert_eq!(b.line_count(), 5);
    }

    #[test]
    fn test_block_with_surrounding_text() {
        let content = "before\n<<<<<<< HEAD\nours1\nours2\n=======\ntheirs\n>>>>>>> abc123\nafter\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        let b = &blocks[0];
        assert_eq!(b.start_line, 2);
        assert_eq!(b.end_line, 7);
        assert_eq!(b.ours, "ours1\nours2\n");
        assert_eq!(b.theirs, "theirs\n");
        assert_eq!(&content[b.span.clone()], "<<<<<<< HEAD\nours1\nours2\n=======\ntheirs\n>>>>>>> abc123\n");
    }

    #[test]
    fn test_two_blocks() {
        let content = "\
<<<<<<< HEAD\na\n=======\nb\n>>>>>>> x\n\
middle\n\
<<<<<<< HEAD\nc\n=======\nd\n>>>>>>> y\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].ours, "a\n");
        assert_eq!(blocks[1].ours, "c\n");
        assert_eq!(blocks[1].start_line, 7);
    }

    #[test]
    fn test_empty_ours_region() {
        // One empty line of ours payload.
        let blocks = scan("<<<<<<< HEAD\n\n=======\nB\n>>>>>>> branch\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].ours, "\n");

        // Zero lines of ours payload: separator directly after the start line.
        let blocks = scan("<<<<<<< HEAD\n=======\nB\n>>>>>>> branch\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].ours, "");
        assert_eq!(blocks[0].theirs, "B\n");
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        assert!(scan("<<<<<<< HEAD\nA\n>>>>>>> branch\n").is_empty());
    }

    #[test]
    fn test_missing_end_is_malformed() {
        assert!(scan("<<<<<<< HEAD\nA\n=======\nB\n").is_empty());
    }

    #[test]
    fn test_unterminated_end_line_is_malformed() {
        // The end line must be newline-terminated.
        assert!(scan("<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> branch").is_empty());
    }

    #[test]
    fn test_end_line_requires_label() {
        assert!(scan("<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> \n").is_empty());
        assert!(scan("<<<<<<< HEAD\nA\n=======\nB\n>>>>>>>\n").is_empty());
    }

    #[test]
    fn test_markers_must_be_whole_lines() {
        assert!(scan("x<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> branch\n").is_empty());
        assert!(scan("<<<<<<< HEAD trailing\nA\n=======\nB\n>>>>>>> branch\n").is_empty());
        // The substring pre-filter is deliberately looser.
        assert!(contains_marker("x<<<<<<< HEAD\n"));
    }

    #[test]
    fn test_stray_markers_outside_block_are_text() {
        assert!(scan("=======\nplain\n>>>>>>> branch\n").is_empty());
    }

    #[test]
    fn test_nested_start_is_ours_payload() {
        // A second start line before the separator belongs to the ours
        // region; the outer block wins.
        let content = "<<<<<<< HEAD\nX\n<<<<<<< HEAD\nY\n=======\nZ\n>>>>>>> b\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].ours, "X\n<<<<<<< HEAD\nY\n");
        assert_eq!(blocks[0].theirs, "Z\n");
    }

    #[test]
    fn test_second_separator_is_theirs_payload() {
        let content = "<<<<<<< HEAD\nA\n=======\nB\n=======\nC\n>>>>>>> b\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].theirs, "B\n=======\nC\n");
    }

    #[test]
    fn test_end_prefix_inside_ours_is_payload() {
        // An end line before any separator does not close anything; it is
        // swallowed into the ours region of the eventual block.
        let content =
            "<<<<<<< HEAD\nA\n>>>>>>> x\nplain\n<<<<<<< HEAD\nB\n=======\nC\n>>>>>>> y\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].ours, "A\n>>>>>>> x\nplain\n<<<<<<< HEAD\nB\n");
        assert_eq!(blocks[0].theirs, "C\n");
        assert_eq!(blocks[0].label, "y");
    }

    #[test]
    fn test_multibyte_payload() {
        let content = "<<<<<<< HEAD\n解决冲突\n=======\n内容分析\n>>>>>>> feature/报表\n";
        let blocks = scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].ours, "解决冲突\n");
        assert_eq!(blocks[0].label, "feature/报表");
    }
}

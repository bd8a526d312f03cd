//! Conflict resolution: keep the "ours" side.
//!
//! The [`Resolver`] replaces every well-formed conflict block with its ours
//! (HEAD) payload. The policy is deliberate and non-configurable; it is only
//! appropriate when the caller already knows HEAD is authoritative, e.g. an
//! automated re-apply step.

use tracing::debug;

use super::scanner::{self, ConflictBlock};

/// The result of resolving a buffer.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The resolved content. Equal to the input when no well-formed block
    /// was found.
    pub content: String,
    /// The blocks that were substituted, in buffer order.
    pub blocks: Vec<ConflictBlock>,
}

impl Resolved {
    /// Whether any substitution was made.
    pub fn changed(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// Stateless conflict resolution.
pub struct Resolver;

impl Resolver {
    /// Replace every well-formed conflict block in `content` with its ours
    /// payload followed by exactly one line break, removing all marker lines
    /// and the theirs payload. Every other byte is unchanged.
    ///
    /// This is a pure function: no side effects, no error conditions. A
    /// buffer with malformed or absent markers comes back byte-for-byte
    /// identical.
    pub fn resolve(content: &str) -> Resolved {
        let blocks = scanner::scan(content);
        if blocks.is_empty() {
            return Resolved {
                content: content.to_string(),
                blocks,
            };
        }

        let mut out = String::with_capacity(content.len());
        let mut cursor = 0;
        for block in &blocks {
            out.push_str(&content[cursor..block.span.start]);
            if block.ours.is_empty() {
                // An empty ours payload still yields one line break.
                out.push('\n');
            } else {
                // Payload lines are newline-terminated already.
                out.push_str(&block.ours);
            }
            cursor = block.span.end;
        }
        out.push_str(&content[cursor..]);

        debug!(blocks = blocks.len(), "kept ours side");
        Resolved {
            content: out,
            blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_on_conflict_free_input() {
        let input = "fn main() {\n    println!(\"hello\");\n}\n";
        let resolved = Resolver::resolve(input);
        assert_eq!(resolved.content, input);
        assert!(!resolved.changed());
    }

    #[test]
    fn test_single_block() {
        let resolved = Resolver::resolve("<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> branch\n");
        assert_eq!(resolved.content, "A\n");
        assert_eq!(resolved.blocks.len(), 1);
    }

    #[test]
    fn test_multi_block_with_intervening_text() {
        let input = "\
keep1\n\
<<<<<<< HEAD\nours-a\n=======\ntheirs-a\n>>>>>>> x\n\
keep2\n\
<<<<<<< HEAD\nours-b\n=======\ntheirs-b\n>>>>>>> y\n\
keep3\n";
        let resolved = Resolver::resolve(input);
        assert_eq!(resolved.content, "keep1\nours-a\nkeep2\nours-b\nkeep3\n");
        assert_eq!(resolved.blocks.len(), 2);
    }

    #[test]
    fn test_empty_payload_block() {
        let resolved = Resolver::resolve("<<<<<<< HEAD\n\n=======\nB\n>>>>>>> branch\n");
        assert_eq!(resolved.content, "\n");
    }

    #[test]
    fn test_zero_line_payload_block() {
        let resolved = Resolver::resolve("<<<<<<< HEAD\n=======\nB\n>>>>>>> branch\n");
        assert_eq!(resolved.content, "\n");
    }

    #[test]
    fn test_malformed_block_left_alone() {
        let input = "<<<<<<< HEAD\nA\nno separator here\n";
        let resolved = Resolver::resolve(input);
        assert_eq!(resolved.content, input);
        assert!(!resolved.changed());

        let input = "<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> unterminated";
        assert_eq!(Resolver::resolve(input).content, input);
    }

    #[test]
    fn test_nested_start_resolves_as_ours_payload() {
        // Mirrors the behavior of a lazy dot-matches-newline regex: the
        // inner start line survives inside the kept ours payload.
        let input = "<<<<<<< HEAD\nX\n<<<<<<< HEAD\nY\n=======\nZ\n>>>>>>> b\n";
        assert_eq!(Resolver::resolve(input).content, "X\n<<<<<<< HEAD\nY\n");
    }

    #[test]
    fn test_output_never_longer_than_input() {
        let inputs = [
            "plain\n",
            "<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> branch\n",
            "<<<<<<< HEAD\n\n=======\nB\n>>>>>>> branch\n",
            "a\n<<<<<<< HEAD\nb\n=======\nc\n>>>>>>> d\ne\n",
        ];
        for input in inputs {
            assert!(Resolver::resolve(input).content.len() <= input.len());
        }
    }

    #[test]
    fn test_resolution_is_idempotent_on_plain_payloads() {
        let input = "x\n<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>> br\ny\n";
        let once = Resolver::resolve(input).content;
        let twice = Resolver::resolve(&once).content;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let input = "前\n<<<<<<< HEAD\n保留这一侧\n=======\n丢弃这一侧\n>>>>>>> 分支\n后\n";
        assert_eq!(Resolver::resolve(input).content, "前\n保留这一侧\n后\n");
    }
}

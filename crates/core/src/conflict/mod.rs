//! Conflict-marker scanning and resolution.
//!
//! The conflict subsystem is responsible for:
//! 1. **Scanning** -- recognizing well-formed Git conflict blocks with a
//!    line-oriented state machine.
//! 2. **Resolution** -- replacing each block with its "ours" (HEAD) payload.

pub mod resolver;
pub mod scanner;

pub use resolver::{Resolved, Resolver};
pub use scanner::{
    contains_marker, scan, ConflictBlock, OURS_MARKER, SEPARATOR_MARKER, THEIRS_MARKER_PREFIX,
};

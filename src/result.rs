//! The parser's output type (spec.md §3/§6).
//!
//! Grounded on `apollo-parser::SyntaxTree`'s shape (a tree handle plus an
//! accumulated `Vec<Error>` and an `errors().next().is_none()` success
//! check), adapted to own an [`Arena`] rather than a `rowan::GreenNode` and
//! to carry the allocation statistics spec.md §6 asks callers be able to
//! inspect ("nodes created, arena high-water mark, tokens consumed").

use crate::arena::{Arena, NodeId};
use crate::error::FailureRecord;

/// Allocation and work statistics for one parse, independent of whether it
/// succeeded (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    pub nodes_created: usize,
    pub arena_high_water_bytes: usize,
    pub tokens_consumed: usize,
    pub max_depth_reached: u32,
}

/// The result of parsing one statement or one script.
///
/// `root` is `Some` whenever at least a partial tree was built — even a
/// failed parse in script mode may have produced a recovered, partially
/// built tree for the failing statement's neighbors (spec.md §4.8's panic
/// mode recovery). `failures` is empty iff the parse fully succeeded.
pub struct ParseOutcome {
    pub arena: Arena,
    pub roots: Vec<NodeId>,
    pub failures: Vec<FailureRecord>,
    pub stats: ParseStats,
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }
}

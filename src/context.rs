//! Parse context stack (spec.md §4.7: "the expression parser consults the
//! enclosing clause to resolve context-sensitive grammar, e.g. whether a
//! bare `*` is multiplication or a star-projection").
//!
//! No direct teacher precedent — GraphQL's grammar has no context-sensitive
//! expression grammar to borrow the pattern from — so this is a plain stack
//! built from the same "small `Vec`-backed scope stack" shape the teacher
//! uses for its `Parser`'s token-limit bookkeeping (`limit.rs`), rather than
//! a bespoke structure.

use crate::node::NodeFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    SelectList,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    JoinCondition,
    Case,
    FunctionArg,
    Subquery,
}

impl ParseContext {
    fn tag(self) -> u32 {
        match self {
            ParseContext::SelectList => 1,
            ParseContext::From => 2,
            ParseContext::Where => 3,
            ParseContext::GroupBy => 4,
            ParseContext::Having => 5,
            ParseContext::OrderBy => 6,
            ParseContext::JoinCondition => 7,
            ParseContext::Case => 8,
            ParseContext::FunctionArg => 9,
            ParseContext::Subquery => 10,
        }
    }

    fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            1 => ParseContext::SelectList,
            2 => ParseContext::From,
            3 => ParseContext::Where,
            4 => ParseContext::GroupBy,
            5 => ParseContext::Having,
            6 => ParseContext::OrderBy,
            7 => ParseContext::JoinCondition,
            8 => ParseContext::Case,
            9 => ParseContext::FunctionArg,
            10 => ParseContext::Subquery,
            _ => return None,
        })
    }

    /// Pack `self` into the node flag word's reserved upper byte.
    pub fn to_flag_bits(self) -> NodeFlags {
        NodeFlags::from_bits_retain(self.tag() << NodeFlags::CONTEXT_SHIFT)
    }

    /// Recover whichever context (if any) is recorded in `flags`' upper byte.
    pub fn from_flag_bits(flags: NodeFlags) -> Option<Self> {
        Self::from_tag((flags.bits() & NodeFlags::CONTEXT_MASK) >> NodeFlags::CONTEXT_SHIFT)
    }
}

#[derive(Debug, Default)]
pub struct ContextStack {
    stack: Vec<ParseContext>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, ctx: ParseContext) {
        self.stack.push(ctx);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn current(&self) -> Option<ParseContext> {
        self.stack.last().copied()
    }

    pub fn is_in(&self, ctx: ParseContext) -> bool {
        self.stack.contains(&ctx)
    }

    /// The flag bits for [`current`](Self::current), or no bits set at the
    /// top level.
    pub fn current_flag_bits(&self) -> NodeFlags {
        self.current().map(ParseContext::to_flag_bits).unwrap_or(NodeFlags::empty())
    }
}

/// RAII scope for a [`ParseContext`] — mirrors [`crate::depth_guard::DepthGuard`]'s
/// "push on entry, pop on every exit path" shape.
pub struct ContextGuard<'a> {
    stack: &'a mut ContextStack,
}

impl<'a> ContextGuard<'a> {
    pub fn enter(stack: &'a mut ContextStack, ctx: ParseContext) -> Self {
        stack.push(ctx);
        Self { stack }
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_pushes_and_pops() {
        let mut stack = ContextStack::new();
        {
            let _g = ContextGuard::enter(&mut stack, ParseContext::SelectList);
            assert_eq!(stack.current(), Some(ParseContext::SelectList));
        }
        assert_eq!(stack.current(), None);
    }

    #[test]
    fn flag_bits_round_trip_through_the_upper_byte() {
        for ctx in [ParseContext::SelectList, ParseContext::Where, ParseContext::Subquery] {
            let bits = ctx.to_flag_bits();
            assert!(NodeFlags::CONTEXT_MASK.count_ones() >= 4);
            assert_eq!(ParseContext::from_flag_bits(bits), Some(ctx));
        }
        assert_eq!(ParseContext::from_flag_bits(NodeFlags::empty()), None);
    }

    #[test]
    fn is_in_sees_through_nesting() {
        let mut stack = ContextStack::new();
        let _g1 = ContextGuard::enter(&mut stack, ParseContext::Subquery);
        let _g2 = ContextGuard::enter(&mut stack, ParseContext::Where);
        assert!(stack.is_in(ParseContext::Subquery));
        assert!(stack.is_in(ParseContext::Where));
        assert!(!stack.is_in(ParseContext::Having));
    }
}

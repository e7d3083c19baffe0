//! Intra-parser semantic validation (spec.md §4.8/§7: `INVALID_CONSTRUCT`).
//!
//! No direct teacher precedent — GraphQL's grammar has no clause-level
//! semantic gate like this — built directly from spec.md's own worked
//! example E6 ("`HAVING` with no `GROUP BY` and no aggregate in the select
//! list is syntactically well-formed but semantically invalid at parse
//! time, not merely at a later analysis phase").
//!
//! These checks run once a `SelectCore` subtree is fully built, operating
//! purely over the arena (no parser state), which is what keeps them
//! testable in isolation (`tests/invariants.rs`).

use crate::arena::{Arena, NodeId};
use crate::error::{FailureKind, FailureRecord};
use crate::node::{Node, NodeKind};

const AGGREGATE_NAMES: &[&str] = &["COUNT", "SUM", "AVG", "MIN", "MAX"];

/// Run every `SelectCore`-level semantic check, appending any failures
/// found to `out`. Does not stop at the first failure — spec.md's script
/// mode wants every locally-detectable problem, not just the first.
pub fn validate_select_core(arena: &Arena, select_core: NodeId, out: &mut Vec<FailureRecord>) {
    check_having_requires_aggregation(arena, select_core, out);
    check_select_list_not_empty(arena, select_core, out);
}

fn find_child(arena: &Arena, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
    arena.children(parent).find(|&c| arena.node(c).kind == kind)
}

fn check_having_requires_aggregation(arena: &Arena, select_core: NodeId, out: &mut Vec<FailureRecord>) {
    let Some(having) = find_child(arena, select_core, NodeKind::HavingClause) else {
        return;
    };
    if find_child(arena, select_core, NodeKind::GroupByClause).is_some() {
        return;
    }
    let Some(select_list) = find_child(arena, select_core, NodeKind::SelectList) else {
        return;
    };
    if subtree_contains_aggregate(arena, select_list) || subtree_contains_aggregate(arena, having) {
        return;
    }
    let node = arena.node(having);
    out.push(
        FailureRecord::new(
            FailureKind::InvalidConstruct,
            "HAVING requires GROUP BY or an aggregate function in the select list",
            node.start,
        )
        .with_hint("add a GROUP BY clause or wrap a select-list expression in an aggregate like COUNT(...)"),
    );
}

fn check_select_list_not_empty(arena: &Arena, select_core: NodeId, out: &mut Vec<FailureRecord>) {
    let Some(select_list) = find_child(arena, select_core, NodeKind::SelectList) else {
        return;
    };
    if arena.children(select_list).next().is_none() {
        let node = arena.node(select_list);
        out.push(FailureRecord::new(
            FailureKind::InvalidConstruct,
            "SELECT list must project at least one column",
            node.start,
        ));
    }
}

/// Validate that both sides of a `UNION`/`INTERSECT`/`EXCEPT` project the
/// same number of columns (spec.md §7's set-op arity check).
pub fn validate_set_operation(arena: &Arena, left: NodeId, right: NodeId, op_site: &Node, out: &mut Vec<FailureRecord>) {
    let left_arity = select_list_arity(arena, left);
    let right_arity = select_list_arity(arena, right);
    if let (Some(l), Some(r)) = (left_arity, right_arity) {
        if l != r {
            out.push(FailureRecord::new(
                FailureKind::InvalidConstruct,
                format!("set operation operands have different column counts ({l} vs {r})"),
                op_site.start,
            ));
        }
    }
}

fn select_list_arity(arena: &Arena, select_core_or_set_op: NodeId) -> Option<usize> {
    let select_list = find_child(arena, select_core_or_set_op, NodeKind::SelectList)?;
    Some(arena.children(select_list).count())
}

fn subtree_contains_aggregate(arena: &Arena, root: NodeId) -> bool {
    let node = arena.node(root);
    if node.kind == NodeKind::FunctionCall {
        if let Some(name_node) = arena.children(root).next() {
            let name = arena.node(name_node);
            if name.kind == NodeKind::Identifier {
                let text = arena.resolve(name.text).to_ascii_uppercase();
                if AGGREGATE_NAMES.contains(&text.as_str()) {
                    return true;
                }
            }
        }
    }
    arena.children(root).any(|child| subtree_contains_aggregate(arena, child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::node::{Node, NodeKind};

    fn leaf(arena: &mut Arena, kind: NodeKind) -> NodeId {
        arena.alloc_node(Node::new(kind)).unwrap()
    }

    #[test]
    fn having_without_group_by_or_aggregate_is_invalid() {
        let mut arena = Arena::default();
        let core = leaf(&mut arena, NodeKind::SelectCore);
        let select_list = leaf(&mut arena, NodeKind::SelectList);
        let item = leaf(&mut arena, NodeKind::Identifier);
        arena.append_child(select_list, item);
        let having = leaf(&mut arena, NodeKind::HavingClause);
        arena.append_child(core, select_list);
        arena.append_child(core, having);

        let mut failures = Vec::new();
        validate_select_core(&arena, core, &mut failures);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::InvalidConstruct);
    }

    #[test]
    fn having_with_group_by_is_fine() {
        let mut arena = Arena::default();
        let core = leaf(&mut arena, NodeKind::SelectCore);
        let select_list = leaf(&mut arena, NodeKind::SelectList);
        let item = leaf(&mut arena, NodeKind::Identifier);
        arena.append_child(select_list, item);
        let group_by = leaf(&mut arena, NodeKind::GroupByClause);
        let having = leaf(&mut arena, NodeKind::HavingClause);
        arena.append_child(core, select_list);
        arena.append_child(core, group_by);
        arena.append_child(core, having);

        let mut failures = Vec::new();
        validate_select_core(&arena, core, &mut failures);
        assert!(failures.is_empty());
    }

    #[test]
    fn empty_select_list_is_invalid() {
        let mut arena = Arena::default();
        let core = leaf(&mut arena, NodeKind::SelectCore);
        let select_list = leaf(&mut arena, NodeKind::SelectList);
        arena.append_child(core, select_list);

        let mut failures = Vec::new();
        validate_select_core(&arena, core, &mut failures);
        assert_eq!(failures.len(), 1);
    }
}

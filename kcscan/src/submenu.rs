//! Submenu reconstruction.
//!
//! Kconfig files frequently declare a `menuconfig`-style item followed by a
//! flat run of siblings that all depend on it. This pass regroups such runs
//! into nested submenus after the whole tree exists: within each scope, a
//! Config/MenuConfig child becomes the candidate parent, and every following
//! sibling whose accumulated conditions require the candidate's symbol is
//! re-parented under it.
//!
//! The dependency test is [`Expr::requires`](crate::expr::Expr::requires)
//! with its asymmetric `||` rule, so an item guarded by `A || B` is *not*
//! pulled under `A`.
//!
//! The pass is idempotent: re-parented items no longer sit as siblings of
//! their former candidate, so a second run leaves the tree unchanged.

use crate::tree::{ItemId, ItemKind, ItemTree};

/// Regroups dependent siblings into submenus, depth-first from the root.
pub fn rebuild_submenus(tree: &mut ItemTree) {
    rebuild_scope(tree, ItemTree::ROOT);
}

fn rebuild_scope(tree: &mut ItemTree, scope: ItemId) {
    let children: Vec<ItemId> = tree.get(scope).children().to_vec();
    let mut kept: Vec<ItemId> = Vec::with_capacity(children.len());
    let mut parent: Option<ItemId> = None;
    let mut pending: Vec<ItemId> = Vec::new();

    for child in children {
        if let Some(p) = parent
            && depends_on(tree, child, p)
        {
            pending.push(child);
            continue;
        }
        flush(tree, parent, &mut pending);
        match tree.get(child).kind {
            ItemKind::Config | ItemKind::MenuConfig => parent = Some(child),
            _ => parent = None,
        }
        kept.push(child);
    }
    flush(tree, parent, &mut pending);
    tree.set_children(scope, kept);

    for child in tree.get(scope).children().to_vec() {
        rebuild_scope(tree, child);
    }
}

/// Whether any accumulated condition of `child` requires `candidate`'s symbol.
fn depends_on(tree: &ItemTree, child: ItemId, candidate: ItemId) -> bool {
    let Some(symbol) = tree.get(candidate).symbol.as_ref() else {
        return false;
    };
    tree.get(child)
        .conditions
        .iter()
        .any(|condition| condition.requires(symbol))
}

fn flush(tree: &mut ItemTree, parent: Option<ItemId>, pending: &mut Vec<ItemId>) {
    let Some(parent) = parent else {
        // No candidate: orphaned dependents stay flat.
        debug_assert!(pending.is_empty());
        return;
    };
    for child in pending.drain(..) {
        tree.adopt(parent, child);
    }
}

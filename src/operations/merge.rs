//! Conflict-checked recursive merge of two trees.

use std::sync::Arc;

use crate::error::RouterError;
use crate::node::{Children, Node, ParamEdge};

/// Merges two trees into one, erroring on conflict.
///
/// Handlers and error handlers conflict when both sides carry one and they
/// are not equal (for the async [`crate::Handler`], equality is pointer
/// identity, so merging a node with itself is a no-op). Middleware is
/// checked asymmetrically: a non-empty stack on `b` must equal `a`'s stack,
/// which lets a freshly built route, whose interior nodes carry no
/// middleware, merge cleanly into a node whose middleware was already set
/// by `use`. Wildcard and catchall edges must agree on their parameter
/// name; their children merge recursively, as do children present on both
/// sides of the child map.
///
/// Under the no-conflict precondition the merge is commutative (modulo
/// which side's error surfaces first) and associative.
pub fn merge_trees<T: Clone + PartialEq>(a: &Node<T>, b: &Node<T>) -> Result<Node<T>, RouterError> {
    let handler = merged_handler(&a.handler, &b.handler, RouterError::ConflictingHandlers)?;
    let not_found = merged_handler(
        &a.not_found,
        &b.not_found,
        RouterError::ConflictingNotFoundHandlers,
    )?;
    let method_not_allowed = merged_handler(
        &a.method_not_allowed,
        &b.method_not_allowed,
        RouterError::ConflictingMethodNotAllowedHandlers,
    )?;

    if !b.middleware.is_empty() && a.middleware != b.middleware {
        return Err(RouterError::ConflictingMiddleware);
    }
    let middleware = if a.middleware.is_empty() {
        b.middleware.clone()
    } else {
        a.middleware.clone()
    };

    let wildcard = merged_edge(&a.wildcard, &b.wildcard, |left, right| {
        RouterError::ConflictingWildcards { left, right }
    })?;
    let catchall = merged_edge(&a.catchall, &b.catchall, |left, right| {
        RouterError::ConflictingCatchalls { left, right }
    })?;

    let mut children = Children::default();
    for (key, child) in &a.children {
        let merged = match b.children.get(key) {
            Some(other) => Arc::new(merge_trees(child, other)?),
            None => Arc::clone(child),
        };
        children.insert(key.clone(), merged);
    }
    for (key, child) in &b.children {
        if !a.children.contains_key(key) {
            children.insert(key.clone(), Arc::clone(child));
        }
    }

    Ok(Node {
        handler,
        middleware,
        children,
        wildcard,
        catchall,
        not_found,
        method_not_allowed,
    })
}

fn merged_handler<T: Clone + PartialEq>(
    a: &Option<T>,
    b: &Option<T>,
    conflict: RouterError,
) -> Result<Option<T>, RouterError> {
    match (a, b) {
        (Some(x), Some(y)) if x != y => Err(conflict),
        (Some(x), _) => Ok(Some(x.clone())),
        (None, y) => Ok(y.clone()),
    }
}

fn merged_edge<T: Clone + PartialEq>(
    a: &Option<ParamEdge<T>>,
    b: &Option<ParamEdge<T>>,
    conflict: impl FnOnce(String, String) -> RouterError,
) -> Result<Option<ParamEdge<T>>, RouterError> {
    match (a, b) {
        (Some(x), Some(y)) => {
            if x.name != y.name {
                return Err(conflict(x.name.clone(), y.name.clone()));
            }
            Ok(Some(ParamEdge {
                name: x.name.clone(),
                child: Arc::new(merge_trees(&x.child, &y.child)?),
            }))
        }
        (Some(edge), None) | (None, Some(edge)) => Ok(Some(edge.clone())),
        (None, None) => Ok(None),
    }
}

//! The one-shot tree transform required before dispatch.

use std::sync::Arc;

use crate::node::{Children, Node, ParamEdge};
use crate::middleware::Middleware;

/// Rewrites a tree so that every node carries the error-path handlers that
/// govern it and every dispatch leaf carries its full middleware chain.
///
/// Error handlers cascade top-down: a node without its own not-found
/// handler inherits the default in force, and a node with its own makes it
/// the new default for its subtree (the nearest-ancestor override rule);
/// likewise for method-not-allowed handlers. Callers supply the root
/// defaults, so after finalization both handlers are present on every node.
///
/// Middleware accumulates along the path from the root and settles on
/// dispatch leaves as `middleware ++ ancestors ++ own`, outermost first.
/// Interior nodes give their middleware up once it has been pushed into the
/// leaves below them, which is what makes the transform idempotent:
/// finalizing an already-finalized tree with the same defaults yields an
/// equal tree.
pub fn finalize_tree<T: Clone>(
    node: &Node<T>,
    default_not_found: &T,
    default_method_not_allowed: &T,
    middleware: &[Middleware<T>],
) -> Node<T> {
    let not_found = node
        .not_found()
        .cloned()
        .unwrap_or_else(|| default_not_found.clone());
    let method_not_allowed = node
        .method_not_allowed()
        .cloned()
        .unwrap_or_else(|| default_method_not_allowed.clone());

    let mut chain = middleware.to_vec();
    chain.extend(node.middleware().iter().cloned());

    let children: Children<T> = node
        .children()
        .iter()
        .map(|(key, child)| {
            (
                key.clone(),
                Arc::new(finalize_tree(child, &not_found, &method_not_allowed, &chain)),
            )
        })
        .collect();

    let wildcard = node.wildcard().map(|edge| ParamEdge {
        name: edge.name().to_string(),
        child: Arc::new(finalize_tree(
            edge.child(),
            &not_found,
            &method_not_allowed,
            &chain,
        )),
    });
    let catchall = node.catchall().map(|edge| ParamEdge {
        name: edge.name().to_string(),
        child: Arc::new(finalize_tree(
            edge.child(),
            &not_found,
            &method_not_allowed,
            &chain,
        )),
    });

    Node {
        handler: node.handler().cloned(),
        middleware: if node.handler().is_some() { chain } else { Vec::new() },
        children,
        wildcard,
        catchall,
        not_found: Some(not_found),
        method_not_allowed: Some(method_not_allowed),
    }
}

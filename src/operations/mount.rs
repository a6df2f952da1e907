//! Installing one tree under a literal prefix of another.

use std::sync::Arc;

use tracing::trace;

use crate::error::RouterError;
use crate::middleware::Middleware;
use crate::node::{Children, Node, ParamEdge};
use crate::operations::add::construct_sub_tree;
use crate::operations::merge::merge_trees;

/// Mounts `child` under `prefix` of `parent`, returning the new tree.
///
/// The prefix must begin with `/`, must not end with `/` unless it is the
/// bare root, and must be literal (no `{...}` markers). Before merging, the
/// child's node-level middleware (typically registered through `use` on a
/// sub-router) is cascaded into its dispatch leaves, so the middleware
/// travels with the routes instead of being stranded on the mounting
/// boundary. A consequence is that the child's middleware stack is frozen
/// at mount time; middleware the parent registers later wraps it from the
/// outside via the finalize cascade.
pub fn mount_tree<T: Clone + PartialEq>(
    prefix: &str,
    parent: &Node<T>,
    child: &Node<T>,
) -> Result<Node<T>, RouterError> {
    if !prefix.starts_with('/') {
        return Err(RouterError::InvalidPath {
            path: prefix.to_string(),
        });
    }
    if prefix.len() > 1 && prefix.ends_with('/') {
        return Err(RouterError::MountPrefixTrailingSlash {
            prefix: prefix.to_string(),
        });
    }
    if prefix.contains(['{', '}']) {
        return Err(RouterError::MountPrefixNotLiteral {
            prefix: prefix.to_string(),
        });
    }

    trace!(prefix, "mounting subtree");

    let child = if child.middleware().is_empty() {
        child.clone()
    } else {
        cascade_middleware(child, &[])
    };

    if prefix == "/" {
        return merge_trees(parent, &child);
    }
    let sub_tree = construct_sub_tree(prefix, child)?;
    merge_trees(parent, &sub_tree)
}

/// Cascades accumulated middleware down a tree, settling it on dispatch
/// leaves only: a leaf's stack becomes `prefix ++ ancestors ++ own`, and
/// interior nodes are left without middleware once theirs has been pushed
/// down. Re-running the cascade is therefore a no-op.
pub(crate) fn cascade_middleware<T: Clone>(node: &Node<T>, prefix: &[Middleware<T>]) -> Node<T> {
    let mut chain = prefix.to_vec();
    chain.extend(node.middleware().iter().cloned());

    let middleware = if node.handler().is_some() {
        chain.clone()
    } else {
        Vec::new()
    };

    let children: Children<T> = node
        .children()
        .iter()
        .map(|(key, child)| {
            (
                key.clone(),
                Arc::new(cascade_middleware(child, &chain)),
            )
        })
        .collect();

    let wildcard = node.wildcard().map(|edge| ParamEdge {
        name: edge.name().to_string(),
        child: Arc::new(cascade_middleware(edge.child(), &chain)),
    });
    let catchall = node.catchall().map(|edge| ParamEdge {
        name: edge.name().to_string(),
        child: Arc::new(cascade_middleware(edge.child(), &chain)),
    });

    Node {
        handler: node.handler().cloned(),
        middleware,
        children,
        wildcard,
        catchall,
        not_found: node.not_found().cloned(),
        method_not_allowed: node.method_not_allowed().cloned(),
    }
}

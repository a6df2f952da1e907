//! Single-route tree construction and the `add_route` entry point.

use tracing::trace;

use crate::error::RouterError;
use crate::method::MethodToken;
use crate::middleware::Middleware;
use crate::node::Node;
use crate::operations::merge::merge_trees;
use crate::operations::util::{RouteSegment, parse_segment, split_route};
use crate::types::SegmentKey;

/// Constructs the minimal tree encoding a single route.
///
/// The path must begin with `/`; its segments are materialized from right
/// to left around a dispatch leaf holding `handler` and `middleware`, keyed
/// by `method`. `{name}` segments become wildcard edges, `{name...}` a
/// catchall edge (which must be the final segment), and any other segment,
/// including the empty segment produced by a trailing `/`, an exact-match
/// child.
pub fn construct_route_tree<T>(
    method: MethodToken,
    path: &str,
    handler: T,
    middleware: Vec<Middleware<T>>,
) -> Result<Node<T>, RouterError> {
    let leaf = Node::new().with_handler(handler).with_middleware(middleware);
    let terminal = Node::new().with_child(SegmentKey::Method(method), leaf);
    construct_sub_tree(path, terminal)
}

/// Wraps an existing node in a chain of nodes spelling out `path`.
///
/// This is the shared skeleton of route construction and mounting: the
/// innermost node is `child`, and each path segment adds one enclosing
/// level, processed right to left.
pub fn construct_sub_tree<T>(path: &str, child: Node<T>) -> Result<Node<T>, RouterError> {
    let segments = split_route(path)?;
    let last = segments.len() - 1;

    let mut node = child;
    for (i, segment) in segments.iter().enumerate().rev() {
        node = match parse_segment(segment)? {
            RouteSegment::Catchall(name) => {
                if i != last {
                    return Err(RouterError::InvalidSegment {
                        segment: (*segment).to_string(),
                        reason: "catchall must be the final segment".to_string(),
                    });
                }
                Node::new().with_catchall(name, node)
            }
            RouteSegment::Wildcard(name) => Node::new().with_wildcard(name, node),
            RouteSegment::Literal(literal) => {
                Node::new().with_child(SegmentKey::Literal(literal.to_string()), node)
            }
        };
    }

    Ok(node)
}

/// Adds a route to `tree`, returning the new tree.
///
/// Builds the single-route tree and merges it in; any conflict with an
/// existing registration surfaces as the corresponding [`RouterError`].
pub fn add_route<T: Clone + PartialEq>(
    tree: &Node<T>,
    method: MethodToken,
    path: &str,
    handler: T,
    middleware: Vec<Middleware<T>>,
) -> Result<Node<T>, RouterError> {
    trace!(%method, path, "adding route");
    let route = construct_route_tree(method, path, handler, middleware)?;
    merge_trees(tree, &route)
}

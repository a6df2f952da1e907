//! The lookup engine: resolves `(method, path)` against a finalized tree.

use crate::error::RouterError;
use crate::method::MethodToken;
use crate::node::Node;
use crate::operations::util::split_request;
use crate::types::{Params, Resolved, SegmentKeyRef};

/// Traverses the tree to find the best-match handler for a request.
///
/// Each path segment resolves with the priority exact match > wildcard >
/// catchall; a catchall consumes the rest of the path unconditionally. The
/// traversal is greedy: it commits to the best edge at each level and
/// never backtracks, so lookups are deterministic and linear in the number
/// of segments.
///
/// If no edge applies at some level, the resolution is the governing
/// not-found handler. After the segments are consumed, the terminal node's
/// children are probed for the request's method token, falling back to
/// [`MethodToken::AnyHttp`]; if method-token children exist but none match,
/// the resolution is the governing method-not-allowed handler (keeping the
/// parameters accumulated so far), and if no method-token children exist at
/// all the path is under-defined and resolves as not-found.
///
/// Error-path resolutions carry an empty middleware stack and an empty
/// route pattern. A missing error handler (possible only on a tree that
/// was never finalized) is a configuration error, not a panic.
pub fn find_handler<T: Clone>(
    tree: &Node<T>,
    method: MethodToken,
    path: &str,
) -> Result<Resolved<T>, RouterError> {
    let segments = split_request(path);

    let mut current = tree;
    let mut params = Params::default();
    let mut route_parts: Vec<String> = Vec::with_capacity(segments.len());

    let mut index = 0;
    while index < segments.len() {
        let segment = segments[index];

        if let Some(child) = current.get_child(SegmentKeyRef::Literal(segment)) {
            route_parts.push(segment.to_string());
            current = child.as_ref();
            index += 1;
            continue;
        }

        if let Some(edge) = current.wildcard() {
            params.insert(edge.name().to_string(), segment.to_string());
            route_parts.push(format!("{{{}}}", edge.name()));
            current = edge.child();
            index += 1;
            continue;
        }

        if let Some(edge) = current.catchall() {
            params.insert(edge.name().to_string(), segments[index..].join("/"));
            route_parts.push(format!("{{{}...}}", edge.name()));
            current = edge.child();
            break;
        }

        return not_found(current);
    }

    let leaf = current
        .get_child(SegmentKeyRef::Method(method))
        .or_else(|| current.get_child(SegmentKeyRef::Method(MethodToken::AnyHttp)));

    let Some(leaf) = leaf else {
        if current.has_method_children() {
            // The path is routable; only the method is wrong.
            let handler = current
                .method_not_allowed()
                .cloned()
                .ok_or(RouterError::MissingMethodNotAllowedHandler)?;
            return Ok(Resolved {
                handler,
                middleware: Vec::new(),
                params,
                route: String::new(),
            });
        }
        return not_found(current);
    };

    let Some(handler) = leaf.handler().cloned() else {
        return not_found(current);
    };

    Ok(Resolved {
        handler,
        middleware: leaf.middleware().to_vec(),
        params,
        route: format!("/{}", route_parts.join("/")),
    })
}

fn not_found<T: Clone>(node: &Node<T>) -> Result<Resolved<T>, RouterError> {
    let handler = node
        .not_found()
        .cloned()
        .ok_or(RouterError::MissingNotFoundHandler)?;
    Ok(Resolved {
        handler,
        middleware: Vec::new(),
        params: Params::default(),
        route: String::new(),
    })
}

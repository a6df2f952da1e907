//! The segment-based trie node, the core data structure of the router.
//!
//! A [`Node`] is structurally immutable: every transform in
//! [`crate::operations`] produces a fresh node that shares unchanged
//! children through [`Arc`]. The sole mutation primitive is copy-with-
//! overrides, exposed as the `with_*` methods, which consume a node and
//! return a new one with a single field replaced.
//!
//! Nodes compare equal iff all fields compare equal. Handler equality is
//! whatever `T`'s `PartialEq` says; for the async [`crate::Handler`] that
//! is pointer identity, which makes re-merging a node with itself a no-op
//! rather than a conflict.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::middleware::Middleware;
use crate::types::{SegmentKey, SegmentKeyRef};

/// The child map of a node: insertion-ordered, keyed by the segment-key
/// sum type, hashed with ahash.
pub type Children<T> = IndexMap<SegmentKey, Arc<Node<T>>, ahash::RandomState>;

/// A named single-segment (wildcard) or rest-of-path (catchall) edge.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamEdge<T> {
    pub(crate) name: String,
    pub(crate) child: Arc<Node<T>>,
}

impl<T> ParamEdge<T> {
    /// Creates an edge binding `name` over `child`.
    pub fn new(name: impl Into<String>, child: Node<T>) -> Self {
        ParamEdge {
            name: name.into(),
            child: Arc::new(child),
        }
    }

    /// The parameter name this edge binds.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The subtree below this edge.
    pub fn child(&self) -> &Node<T> {
        &self.child
    }
}

/// A node of the routing trie.
///
/// Dispatch leaves are children keyed by a method token; they carry the
/// `handler` and `middleware` and have no children of their own. Interior
/// nodes route by segment: exact-match `children` first, then the
/// `wildcard` edge, then the `catchall` edge. The error-path handlers
/// cascade through the tree at finalize time so that, post-finalize, every
/// node carries both.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node<T> {
    pub(crate) handler: Option<T>,
    pub(crate) middleware: Vec<Middleware<T>>,
    pub(crate) children: Children<T>,
    pub(crate) wildcard: Option<ParamEdge<T>>,
    pub(crate) catchall: Option<ParamEdge<T>>,
    pub(crate) not_found: Option<T>,
    pub(crate) method_not_allowed: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node {
            handler: None,
            middleware: Vec::new(),
            children: Children::default(),
            wildcard: None,
            catchall: None,
            not_found: None,
            method_not_allowed: None,
        }
    }
}

impl<T> Node<T> {
    /// Constructs an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// The handler, present only on dispatch leaves.
    pub fn handler(&self) -> Option<&T> {
        self.handler.as_ref()
    }

    /// The middleware attached to this node, outermost first.
    pub fn middleware(&self) -> &[Middleware<T>] {
        &self.middleware
    }

    /// The exact-match and method-token children.
    pub fn children(&self) -> &Children<T> {
        &self.children
    }

    /// The single-segment parameter edge, if any.
    pub fn wildcard(&self) -> Option<&ParamEdge<T>> {
        self.wildcard.as_ref()
    }

    /// The rest-of-path parameter edge, if any.
    pub fn catchall(&self) -> Option<&ParamEdge<T>> {
        self.catchall.as_ref()
    }

    /// The not-found handler governing this subtree, if set.
    pub fn not_found(&self) -> Option<&T> {
        self.not_found.as_ref()
    }

    /// The method-not-allowed handler governing this subtree, if set.
    pub fn method_not_allowed(&self) -> Option<&T> {
        self.method_not_allowed.as_ref()
    }

    /// True if any child is keyed by a method token, i.e. this node is the
    /// terminal segment of at least one registered route.
    pub fn has_method_children(&self) -> bool {
        self.children.keys().any(SegmentKey::is_method)
    }

    pub(crate) fn get_child(&self, key: SegmentKeyRef<'_>) -> Option<&Arc<Node<T>>> {
        self.children.get(&key)
    }

    /// Copy-with-overrides: replaces the handler.
    pub fn with_handler(mut self, handler: T) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Copy-with-overrides: replaces the middleware list.
    pub fn with_middleware(mut self, middleware: Vec<Middleware<T>>) -> Self {
        self.middleware = middleware;
        self
    }

    /// Copy-with-overrides: inserts (or replaces) one child.
    pub fn with_child(mut self, key: SegmentKey, child: Node<T>) -> Self {
        self.children.insert(key, Arc::new(child));
        self
    }

    /// Copy-with-overrides: replaces the whole child map.
    pub fn with_children(mut self, children: Children<T>) -> Self {
        self.children = children;
        self
    }

    /// Copy-with-overrides: replaces the wildcard edge.
    pub fn with_wildcard(mut self, name: impl Into<String>, child: Node<T>) -> Self {
        self.wildcard = Some(ParamEdge::new(name, child));
        self
    }

    /// Copy-with-overrides: replaces the catchall edge.
    pub fn with_catchall(mut self, name: impl Into<String>, child: Node<T>) -> Self {
        self.catchall = Some(ParamEdge::new(name, child));
        self
    }

    /// Copy-with-overrides: replaces the not-found handler.
    pub fn with_not_found(mut self, handler: T) -> Self {
        self.not_found = Some(handler);
        self
    }

    /// Copy-with-overrides: replaces the method-not-allowed handler.
    pub fn with_method_not_allowed(mut self, handler: T) -> Self {
        self.method_not_allowed = Some(handler);
        self
    }
}

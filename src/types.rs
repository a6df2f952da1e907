//! Contains type definitions used throughout the `weft` router.
//!
//! This module defines the segment-key sum type that keys a node's child
//! map, the path-parameter map, and the result of a lookup.

use std::hash::{Hash, Hasher};

use ahash::AHashMap;
use indexmap::Equivalent;

use crate::method::MethodToken;
use crate::middleware::Middleware;

/// Path parameters extracted at lookup time, keyed by parameter name.
pub type Params = AHashMap<String, String>;

/// The key of a node's child map: either a literal path segment or a
/// dispatch method token.
///
/// Literal segments and method tokens are different branches of this sum
/// type, so they can never collide in the child map even though both live
/// in a single keyed collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SegmentKey {
    /// An exact-match path segment. May be empty: a trailing `/` in a route
    /// produces an empty final segment literal.
    Literal(String),
    /// A dispatch leaf key.
    Method(MethodToken),
}

impl SegmentKey {
    /// True if this key addresses a dispatch leaf.
    pub fn is_method(&self) -> bool {
        matches!(self, SegmentKey::Method(_))
    }
}

// SegmentKey and SegmentKeyRef must hash identically; both write a
// discriminant byte followed by the payload.
impl Hash for SegmentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            SegmentKey::Literal(segment) => {
                state.write_u8(0);
                segment.hash(state);
            }
            SegmentKey::Method(method) => {
                state.write_u8(1);
                state.write_u8(*method as u8);
            }
        }
    }
}

/// Borrowed mirror of [`SegmentKey`] so that lookups can probe the child
/// map with request-path segments without allocating a `String` per level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SegmentKeyRef<'a> {
    Literal(&'a str),
    Method(MethodToken),
}

impl Hash for SegmentKeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            SegmentKeyRef::Literal(segment) => {
                state.write_u8(0);
                segment.hash(state);
            }
            SegmentKeyRef::Method(method) => {
                state.write_u8(1);
                state.write_u8(*method as u8);
            }
        }
    }
}

impl Equivalent<SegmentKey> for SegmentKeyRef<'_> {
    fn equivalent(&self, key: &SegmentKey) -> bool {
        match (self, key) {
            (SegmentKeyRef::Literal(a), SegmentKey::Literal(b)) => *a == b.as_str(),
            (SegmentKeyRef::Method(a), SegmentKey::Method(b)) => a == b,
            _ => false,
        }
    }
}

/// The result of a successful lookup: an already-resolved dispatch pipeline.
///
/// For 404/405 resolutions the `middleware` stack is empty and `route` is
/// the empty string; a 405 resolution still carries the parameters
/// accumulated on the way to the matched node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolved<T> {
    /// The handler to invoke.
    pub handler: T,
    /// The middleware stack to fold around the handler, outermost first.
    pub middleware: Vec<Middleware<T>>,
    /// Path parameters bound during traversal.
    pub params: Params,
    /// The matched route pattern (e.g. `/user/{id}`), or `""` when the
    /// resolution fell through to an error handler.
    pub route: String,
}

/// A printable name for values stored in the tree, used by route listings.
pub trait Label {
    /// The display name.
    fn label(&self) -> &str;
}

impl Label for &str {
    fn label(&self) -> &str {
        self
    }
}

impl Label for String {
    fn label(&self) -> &str {
        self
    }
}

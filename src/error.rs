//! Defines the error types used throughout the `weft` crate.
//!
//! Every variant is a build-time failure: a malformed route pattern, a
//! registration that conflicts with an existing route, or a finalization
//! attempted before the router is fully configured. Request-time 404/405
//! outcomes are not errors; they dispatch to the configured handlers.

use thiserror::Error;

/// The primary error type for `weft` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A route or mount path did not begin with `/`.
    #[error("path must start with '/', provided '{path}'")]
    InvalidPath {
        /// The offending path.
        path: String,
    },

    /// A segment of a route pattern could not be parsed.
    #[error("invalid segment '{segment}': {reason}")]
    InvalidSegment {
        /// The problematic segment.
        segment: String,
        /// The reason why the segment is invalid.
        reason: String,
    },

    /// A mount prefix ended with `/` (only the bare root prefix `/` may).
    #[error("mount prefix cannot end with '/', provided '{prefix}'")]
    MountPrefixTrailingSlash {
        /// The offending prefix.
        prefix: String,
    },

    /// A mount prefix contained `{` or `}`; mounts use literal prefixes only.
    #[error("mount prefix must be a literal path, provided '{prefix}'")]
    MountPrefixNotLiteral {
        /// The offending prefix.
        prefix: String,
    },

    /// Two merged nodes both carry a handler and the handlers differ.
    #[error("nodes have conflicting handlers")]
    ConflictingHandlers,

    /// Two merged nodes carry distinct not-found handlers.
    #[error("nodes have conflicting not found handlers")]
    ConflictingNotFoundHandlers,

    /// Two merged nodes carry distinct method-not-allowed handlers.
    #[error("nodes have conflicting method not allowed handlers")]
    ConflictingMethodNotAllowedHandlers,

    /// A node being merged in carries middleware that differs from the
    /// middleware already present on the target node.
    #[error("node being merged in has conflicting middleware")]
    ConflictingMiddleware,

    /// Two merged nodes disagree on a wildcard parameter name.
    #[error("nodes have conflicting wildcards: '{{{left}}}' vs '{{{right}}}'")]
    ConflictingWildcards {
        /// Wildcard name on the existing node.
        left: String,
        /// Wildcard name on the node being merged in.
        right: String,
    },

    /// Two merged nodes disagree on a catchall parameter name.
    #[error("nodes have conflicting catchalls: '{{{left}...}}' vs '{{{right}...}}'")]
    ConflictingCatchalls {
        /// Catchall name on the existing node.
        left: String,
        /// Catchall name on the node being merged in.
        right: String,
    },

    /// `not_found` was called on a router that already has one.
    #[error("not found handler is already set")]
    NotFoundAlreadySet,

    /// `method_not_allowed` was called on a router that already has one.
    #[error("method not allowed handler is already set")]
    MethodNotAllowedAlreadySet,

    /// Finalization (or lookup on an unfinalized subtree) found no
    /// not-found handler to fall back on.
    #[error("router does not have a not found handler")]
    MissingNotFoundHandler,

    /// Finalization (or lookup on an unfinalized subtree) found no
    /// method-not-allowed handler to fall back on.
    #[error("router does not have a method not allowed handler")]
    MissingMethodNotAllowedHandler,

    /// A registration was attempted after the router was finalized.
    #[error("routes cannot be registered after finalize")]
    AlreadyFinalized,

    /// A request carried an HTTP method outside the closed token set.
    #[error("unknown HTTP method '{method}'")]
    UnknownMethod {
        /// The method string as received from the runtime.
        method: String,
    },
}

//! # weft
//!
//! weft is a trie-based HTTP/WebSocket request multiplexer for Rust.
//! Routes compose into an immutable segment trie; a lookup resolves a
//! request to an already-composed pipeline of middleware around a handler,
//! with path parameters and the matched route pattern surfaced to the
//! handler through a task-local channel instead of its signature.
//!
//! The crate is runtime-agnostic: it assumes a host server that delivers a
//! request context and a response protocol object per request (see
//! [`protocol`]) and never touches the wire itself.
//!
//! ## Features
//!
//! - Exact, wildcard (`/{id}`), and catchall (`/{path...}`) segment
//!   matching, with exact > wildcard > catchall priority.
//! - Method-token dispatch for the nine HTTP methods, an any-method
//!   fallback, and a distinct websocket channel.
//! - Per-route and router-wide middleware, composed right-to-left and
//!   conflict-checked by identity.
//! - Nested routers via `mount`, with 404/405 handlers cascading to the
//!   nearest ancestor override.
//! - A bounded LRU over resolved lookups.
//! - Structured build-time errors with `thiserror`; 404/405 are ordinary
//!   dispatches, never errors.
//!
//! ## Example
//!
//! The trie algebra is usable on its own, over any handler type:
//!
//! ```rust
//! use weft::{MethodToken, Node, add_route, finalize_tree, find_handler};
//!
//! let tree: Node<&str> = Node::new();
//! let tree = add_route(&tree, MethodToken::Get, "/user/{id}", "user_profile", Vec::new())
//!     .expect("failed to add /user/{id}");
//! let tree = add_route(&tree, MethodToken::Get, "/static/{path...}", "static_files", Vec::new())
//!     .expect("failed to add /static/{path...}");
//! let tree = finalize_tree(&tree, &"not_found", &"method_not_allowed", &[]);
//!
//! let hit = find_handler(&tree, MethodToken::Get, "/user/42").unwrap();
//! assert_eq!(hit.handler, "user_profile");
//! assert_eq!(hit.params.get("id").unwrap(), "42");
//! assert_eq!(hit.route, "/user/{id}");
//!
//! let asset = find_handler(&tree, MethodToken::Get, "/static/css/site.css").unwrap();
//! assert_eq!(asset.params.get("path").unwrap(), "css/site.css");
//!
//! let miss = find_handler(&tree, MethodToken::Get, "/nonexistent").unwrap();
//! assert_eq!(miss.handler, "not_found");
//! assert_eq!(miss.route, "");
//! ```
//!
//! Applications normally go through [`Router`], which fixes the handler
//! type to the async [`Handler`], adds the lookup cache, and performs
//! dispatch; see its documentation for a full example.

pub mod cache;
pub mod context;
pub mod error;
pub mod handler;
pub mod method;
pub mod middleware;
pub mod node;
pub mod operations;
pub mod protocol;
pub mod router;
pub mod types;

pub use error::RouterError;
pub use handler::{BoxError, Handler, HandlerFuture, HandlerResult};
pub use method::MethodToken;
pub use middleware::{Middleware, compose};
pub use node::{Node, ParamEdge};
pub use operations::{
    FormatOptions, add_route, construct_route_tree, construct_sub_tree, finalize_tree,
    find_handler, format_routes, merge_trees, mount_tree,
};
pub use protocol::{
    HttpProtocol, Protocol, ProtocolError, ProtocolFamily, RequestContext, StreamTransport,
    WebsocketMessage, WebsocketProtocol, WebsocketTransport,
};
pub use router::Router;
pub use types::{Label, Params, Resolved, SegmentKey};

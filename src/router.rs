//! The router façade: registration, composition, and request dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::LruCache;
use crate::context;
use crate::error::RouterError;
use crate::handler::{Handler, HandlerResult};
use crate::method::MethodToken;
use crate::middleware::{Middleware, compose};
use crate::node::Node;
use crate::operations::format::{FormatOptions, format_routes};
use crate::operations::{add_route, finalize_tree, find_handler, mount_tree};
use crate::protocol::{Protocol, ProtocolFamily, RequestContext};
use crate::types::Resolved;

/// Capacity of the lookup cache, in resolved routes.
const LOOKUP_CACHE_CAPACITY: usize = 1024;

#[derive(Clone, Eq, Hash, PartialEq)]
struct CacheKey {
    method: MethodToken,
    path: String,
    // root pointer identity: a finalized tree is never mutated, so the
    // pointer changing is exactly the tree changing
    tree: usize,
}

/// An HTTP/WebSocket request multiplexer.
///
/// Routes are registered against a compiled trie; [`Router::dispatch`]
/// resolves `(method, path)` to an already-composed middleware/handler
/// pipeline and awaits it under a request-scoped context binding.
///
/// Registration happens during startup and is not concurrency-safe with
/// respect to in-flight dispatches. Once the router is finalized (explicitly,
/// at runtime startup, or lazily on first dispatch) the tree
/// is immutable and read freely from any number of tasks.
///
/// ```rust
/// use weft::{Handler, HandlerResult, Protocol, RequestContext, Router};
///
/// async fn user_profile(_ctx: Box<dyn RequestContext>, _proto: Protocol) -> HandlerResult {
///     // path parameters come from the task-local channel:
///     let _id = weft::context::path_params().get("id").cloned();
///     Ok(())
/// }
/// async fn missing(_ctx: Box<dyn RequestContext>, _proto: Protocol) -> HandlerResult {
///     Ok(())
/// }
/// async fn bad_method(_ctx: Box<dyn RequestContext>, _proto: Protocol) -> HandlerResult {
///     Ok(())
/// }
///
/// let router = Router::new();
/// router.get("/user/{id}", Handler::named("user_profile", user_profile), []).unwrap();
/// router.not_found(Handler::named("missing", missing)).unwrap();
/// router.method_not_allowed(Handler::named("bad_method", bad_method)).unwrap();
/// router.finalize().unwrap();
/// ```
pub struct Router {
    tree: RwLock<Arc<Node<Handler>>>,
    finalized: AtomicBool,
    cache: LruCache<CacheKey, Resolved<Handler>>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Router {
            tree: RwLock::new(Arc::new(Node::new())),
            finalized: AtomicBool::new(false),
            cache: LruCache::new(LOOKUP_CACHE_CAPACITY),
        }
    }

    /// Creates a router with both error handlers already configured.
    pub fn with_error_handlers(not_found: Handler, method_not_allowed: Handler) -> Self {
        let router = Router::new();
        {
            let mut tree = router.tree.write();
            *tree = Arc::new(
                Node::new()
                    .with_not_found(not_found)
                    .with_method_not_allowed(method_not_allowed),
            );
        }
        router
    }

    fn guard_unfinalized(&self) -> Result<(), RouterError> {
        if self.finalized.load(Ordering::Acquire) {
            return Err(RouterError::AlreadyFinalized);
        }
        Ok(())
    }

    /// Registers `handler` at `path` for `method`, with optional
    /// middleware applying to this route only.
    pub fn route(
        &self,
        method: MethodToken,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.guard_unfinalized()?;
        let middleware: Vec<Middleware<Handler>> = middleware.into_iter().collect();
        debug!(%method, path, handler = handler.name(), "registering route");
        let mut tree = self.tree.write();
        let next = add_route(&tree, method, path, handler, middleware)?;
        *tree = Arc::new(next);
        Ok(())
    }

    /// Registers an HTTP handler for `CONNECT` requests at `path`.
    pub fn connect(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Connect, path, handler, middleware)
    }

    /// Registers an HTTP handler for `DELETE` requests at `path`.
    pub fn delete(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Delete, path, handler, middleware)
    }

    /// Registers an HTTP handler for `GET` requests at `path`.
    pub fn get(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Get, path, handler, middleware)
    }

    /// Registers an HTTP handler for `HEAD` requests at `path`.
    pub fn head(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Head, path, handler, middleware)
    }

    /// Registers an HTTP handler for `OPTIONS` requests at `path`.
    pub fn options(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Options, path, handler, middleware)
    }

    /// Registers an HTTP handler for `PATCH` requests at `path`.
    pub fn patch(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Patch, path, handler, middleware)
    }

    /// Registers an HTTP handler for `POST` requests at `path`.
    pub fn post(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Post, path, handler, middleware)
    }

    /// Registers an HTTP handler for `PUT` requests at `path`.
    pub fn put(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Put, path, handler, middleware)
    }

    /// Registers an HTTP handler for `TRACE` requests at `path`.
    pub fn trace(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Trace, path, handler, middleware)
    }

    /// Registers a websocket handler at `path`.
    pub fn websocket(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::Websocket, path, handler, middleware)
    }

    /// Registers a handler matching any HTTP method at `path`, consulted
    /// after specific-method lookup fails.
    pub fn any(
        &self,
        path: &str,
        handler: Handler,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.route(MethodToken::AnyHttp, path, handler, middleware)
    }

    /// Appends middleware applying to every route of this router.
    ///
    /// Order-insensitive with respect to route registration: the stack is
    /// cascaded into dispatch leaves at finalize time, in front of each
    /// route's own middleware.
    pub fn use_middleware(
        &self,
        middleware: impl IntoIterator<Item = Middleware<Handler>>,
    ) -> Result<(), RouterError> {
        self.guard_unfinalized()?;
        let mut tree = self.tree.write();
        let mut stack = tree.middleware().to_vec();
        stack.extend(middleware);
        *tree = Arc::new((**tree).clone().with_middleware(stack));
        Ok(())
    }

    /// Merges another router's routes in under `prefix`, consuming it.
    ///
    /// The child's `use`-registered middleware travels with its routes,
    /// frozen as of this call; middleware registered on `self` wraps it
    /// from the outside once this router is finalized.
    pub fn mount(&self, prefix: &str, child: Router) -> Result<(), RouterError> {
        self.guard_unfinalized()?;
        debug!(prefix, "mounting router");
        let child_tree = child.tree.into_inner();
        let mut tree = self.tree.write();
        *tree = Arc::new(mount_tree(prefix, &tree, &child_tree)?);
        Ok(())
    }

    /// Registers the handler dispatched when path resolution fails.
    /// Setting it twice is an error.
    pub fn not_found(&self, handler: Handler) -> Result<(), RouterError> {
        self.guard_unfinalized()?;
        let mut tree = self.tree.write();
        if tree.not_found().is_some() {
            return Err(RouterError::NotFoundAlreadySet);
        }
        *tree = Arc::new((**tree).clone().with_not_found(handler));
        Ok(())
    }

    /// Registers the handler dispatched when the path resolves but the
    /// method does not. Setting it twice is an error.
    pub fn method_not_allowed(&self, handler: Handler) -> Result<(), RouterError> {
        self.guard_unfinalized()?;
        let mut tree = self.tree.write();
        if tree.method_not_allowed().is_some() {
            return Err(RouterError::MethodNotAllowedAlreadySet);
        }
        *tree = Arc::new((**tree).clone().with_method_not_allowed(handler));
        Ok(())
    }

    /// Finalizes the routing tree: cascades the error handlers and the
    /// `use`-registered middleware into every subtree and freezes the tree
    /// for the life of the process.
    ///
    /// Idempotent. Requires both error handlers to be configured. Called
    /// automatically on first dispatch, but runtimes with a startup phase
    /// should call it there, before forking workers, so that misconfiguration
    /// surfaces at boot and the first request pays no extra cost.
    pub fn finalize(&self) -> Result<(), RouterError> {
        if self.finalized.load(Ordering::Acquire) {
            return Ok(());
        }
        let mut tree = self.tree.write();
        if self.finalized.load(Ordering::Acquire) {
            return Ok(());
        }
        let not_found = tree
            .not_found()
            .cloned()
            .ok_or(RouterError::MissingNotFoundHandler)?;
        let method_not_allowed = tree
            .method_not_allowed()
            .cloned()
            .ok_or(RouterError::MissingMethodNotAllowedHandler)?;
        debug!("finalizing routing tree");
        *tree = Arc::new(finalize_tree(&tree, &not_found, &method_not_allowed, &[]));
        self.finalized.store(true, Ordering::Release);
        Ok(())
    }

    /// Resolves a request through the lookup cache.
    fn resolve(&self, method: MethodToken, path: &str) -> Result<Resolved<Handler>, RouterError> {
        self.finalize()?;
        let tree = Arc::clone(&self.tree.read());
        let key = CacheKey {
            method,
            path: path.to_string(),
            tree: Arc::as_ptr(&tree) as *const () as usize,
        };
        if let Some(hit) = self.cache.get(&key) {
            trace!(%method, path, "lookup cache hit");
            return Ok(hit);
        }
        let resolved = find_handler(&tree, method, path)?;
        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Dispatches one request: resolves the handler, folds its middleware
    /// stack around it (outermost first), binds the request-scoped context
    /// and awaits the pipeline.
    ///
    /// 404/405 outcomes are successful dispatches to the configured error
    /// handlers, with no middleware and an empty matched route. Errors out
    /// of the handler propagate unchanged; errors produced here only
    /// reflect misconfiguration (an unfinalizable tree, an unknown HTTP
    /// method string).
    pub async fn dispatch(
        &self,
        ctx: Box<dyn RequestContext>,
        protocol: Protocol,
    ) -> HandlerResult {
        let method = match ctx.family() {
            ProtocolFamily::Websocket => MethodToken::Websocket,
            ProtocolFamily::Http => ctx.method().parse::<MethodToken>()?,
        };
        let resolved = self.resolve(method, ctx.path())?;
        debug!(
            %method,
            path = ctx.path(),
            route = %resolved.route,
            handler = resolved.handler.name(),
            "dispatching"
        );
        let pipeline = compose(&resolved.middleware, resolved.handler);
        context::bind(
            resolved.params,
            resolved.route,
            pipeline.call(ctx, protocol),
        )
        .await
    }

    /// Formats the registered routes; see
    /// [`format_routes`](crate::operations::format_routes).
    pub fn format_routes(&self, options: FormatOptions) -> String {
        format_routes(&self.tree.read(), options)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

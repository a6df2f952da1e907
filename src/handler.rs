//! Handler trait and type erasure.
//!
//! The routing tree stores handlers of one uniform type, but users write
//! plain `async fn`s with arbitrary concrete future types. [`Handler`]
//! bridges the two: it wraps any async callable of the right shape behind
//! an `Arc<dyn ErasedHandler>`, so that storing, cloning, and invoking a
//! handler costs one atomic increment plus one virtual call per request.
//!
//! Handlers compare by pointer identity. Clones of one `Handler` are the
//! same handler (registering them on two routes is not a conflict); two
//! separately constructed handlers are always distinct, even when built
//! from the same function.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::protocol::{Protocol, RequestContext};
use crate::types::Label;

/// A type-erased error escaping a handler. The router neither catches nor
/// transforms these; they propagate to the runtime unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a handler invocation resolves to.
pub type HandlerResult = Result<(), BoxError>;

/// A heap-allocated, type-erased handler future.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'static>>;

trait ErasedHandler: Send + Sync {
    fn call(&self, context: Box<dyn RequestContext>, protocol: Protocol) -> HandlerFuture;
}

/// An async request handler: `(request context, response protocol) →
/// completes`.
///
/// Construct one from any `async fn` (or closure returning a `Send`
/// future) with the signature
/// `(Box<dyn RequestContext>, Protocol) -> HandlerResult`:
///
/// ```rust
/// use weft::{Handler, HandlerResult, Protocol, RequestContext};
///
/// async fn home(_ctx: Box<dyn RequestContext>, _proto: Protocol) -> HandlerResult {
///     Ok(())
/// }
///
/// let handler = Handler::named("home", home);
/// assert_eq!(handler.name(), "home");
/// assert_eq!(handler, handler.clone());
/// ```
pub struct Handler {
    inner: Arc<dyn ErasedHandler>,
    name: Arc<str>,
}

impl Handler {
    /// Wraps an async callable, deriving the display name from its type.
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(Box<dyn RequestContext>, Protocol) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::named(std::any::type_name::<F>(), func)
    }

    /// Wraps an async callable under an explicit display name.
    pub fn named<F, Fut>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(Box<dyn RequestContext>, Protocol) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Handler {
            inner: Arc::new(FnHandler(func)),
            name: name.into(),
        }
    }

    /// The display name, used by route listings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the handler. Middleware wrapping an inner handler calls
    /// this to continue the chain.
    pub fn call(&self, context: Box<dyn RequestContext>, protocol: Protocol) -> HandlerFuture {
        self.inner.call(context, protocol)
    }
}

impl Clone for Handler {
    fn clone(&self) -> Self {
        Handler {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
        }
    }
}

/// Pointer identity, like middleware equality.
impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name).finish()
    }
}

impl Label for Handler {
    fn label(&self) -> &str {
        self.name()
    }
}

struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Box<dyn RequestContext>, Protocol) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, context: Box<dyn RequestContext>, protocol: Protocol) -> HandlerFuture {
        Box::pin((self.0)(context, protocol))
    }
}

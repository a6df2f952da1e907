//! Middleware as identity-compared handler transformers.
//!
//! A middleware is a function from handler to handler. The router never
//! looks inside it: composition folds the stack right-to-left around the
//! matched handler, and conflict detection during tree merges compares
//! middleware by pointer identity, the way the routing tree compares
//! handlers. Two structurally identical closures are therefore distinct
//! middleware; register a shared value when two routes should agree.

use std::fmt;
use std::sync::Arc;

/// A handler transformer applied around a route's handler at dispatch time.
///
/// `Middleware` is cheap to clone (one atomic increment) and carries a
/// display label used in route listings.
pub struct Middleware<T> {
    func: Arc<dyn Fn(T) -> T + Send + Sync>,
    name: Arc<str>,
}

impl<T> Middleware<T> {
    /// Wraps a transformer function under a display label.
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        Middleware {
            func: Arc::new(func),
            name: name.into(),
        }
    }

    /// The display label, used by route listings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the transformer to a handler.
    pub fn wrap(&self, handler: T) -> T {
        (self.func)(handler)
    }
}

impl<T> Clone for Middleware<T> {
    fn clone(&self) -> Self {
        Middleware {
            func: Arc::clone(&self.func),
            name: Arc::clone(&self.name),
        }
    }
}

/// Pointer identity: clones of one `Middleware` are equal, everything else
/// is not, no matter how the closures compare structurally.
impl<T> PartialEq for Middleware<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.func) as *const (),
            Arc::as_ptr(&other.func) as *const (),
        )
    }
}

impl<T> Eq for Middleware<T> {}

impl<T> fmt::Debug for Middleware<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name).finish()
    }
}

/// Folds a middleware stack around a handler, right-to-left, so that the
/// first middleware in the stack is outermost: `(m1, m2, m3)` produces
/// `m1(m2(m3(handler)))`.
pub fn compose<T>(middleware: &[Middleware<T>], handler: T) -> T {
    middleware
        .iter()
        .rev()
        .fold(handler, |handler, m| m.wrap(handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_not_structure() {
        let a: Middleware<i32> = Middleware::new("inc", |n| n + 1);
        let b: Middleware<i32> = Middleware::new("inc", |n| n + 1);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn compose_is_right_to_left() {
        let double: Middleware<i32> = Middleware::new("double", |n| n * 2);
        let add_one: Middleware<i32> = Middleware::new("add_one", |n| n + 1);
        // add_one is innermost: (5 + 1) * 2
        assert_eq!(compose(&[double.clone(), add_one.clone()], 5), 12);
        // reversed stack: (5 * 2) + 1
        assert_eq!(compose(&[add_one, double], 5), 11);
        assert_eq!(compose::<i32>(&[], 5), 5);
    }
}

//! Task-local request context: path parameters and the matched route.
//!
//! Handlers and middleware read per-request data from this channel instead
//! of receiving it as arguments, which keeps the handler signature uniform
//! regardless of a route's parameter arity. The bindings are task-local:
//! two in-flight requests never observe each other's values, and a binding
//! is released on every exit path out of its scope: normal completion,
//! error propagation, and cancellation alike, because dropping the scoped
//! future is what removes it.

use std::future::Future;

use crate::types::Params;

tokio::task_local! {
    static PATH_PARAMS: Params;
    static HTTP_ROUTE: String;
}

/// Runs `future` with the given path parameters and matched route pattern
/// bound for its entire duration.
///
/// Dispatch wraps every handler invocation in this scope; nesting a second
/// scope inside a handler shadows the outer bindings until it completes.
pub async fn bind<F: Future>(params: Params, route: String, future: F) -> F::Output {
    PATH_PARAMS.scope(params, HTTP_ROUTE.scope(route, future)).await
}

/// The path parameters of the current request, or an empty map outside a
/// request scope.
pub fn path_params() -> Params {
    PATH_PARAMS.try_with(|params| params.clone()).unwrap_or_default()
}

/// The matched route pattern of the current request (e.g. `/user/{id}`),
/// or the empty string for unmatched requests and outside a request scope.
pub fn http_route() -> String {
    HTTP_ROUTE.try_with(|route| route.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bindings_visible_inside_scope_only() {
        assert!(path_params().is_empty());
        assert_eq!(http_route(), "");

        let mut params = Params::default();
        params.insert("id".to_string(), "7".to_string());

        let seen = bind(params, "/user/{id}".to_string(), async {
            (path_params().get("id").cloned(), http_route())
        })
        .await;

        assert_eq!(seen.0.as_deref(), Some("7"));
        assert_eq!(seen.1, "/user/{id}");
        assert!(path_params().is_empty());
        assert_eq!(http_route(), "");
    }

    #[tokio::test]
    async fn sibling_tasks_are_isolated() {
        async fn capture(key: &str, value: &str, route: &str) -> (Option<String>, String) {
            let mut params = Params::default();
            params.insert(key.to_string(), value.to_string());
            bind(params, route.to_string(), async {
                tokio::task::yield_now().await;
                (path_params().get(key).cloned(), http_route())
            })
            .await
        }

        let (a, b) = tokio::join!(
            capture("id", "1", "/user/{id}"),
            capture("id", "2", "/order/{id}"),
        );
        assert_eq!(a, (Some("1".to_string()), "/user/{id}".to_string()));
        assert_eq!(b, (Some("2".to_string()), "/order/{id}".to_string()));
    }
}

//! Property-based checks of the routing laws.

use proptest::prelude::*;
use weft::{
    MethodToken, Middleware, Node, Params, add_route, finalize_tree, find_handler, merge_trees,
};

#[derive(Clone, Debug)]
enum PatSeg {
    Lit(String),
    Wild,
    Catch,
}

fn pat_seg() -> impl Strategy<Value = PatSeg> {
    prop_oneof![
        3 => "[a-z]{1,4}".prop_map(PatSeg::Lit),
        1 => Just(PatSeg::Wild),
        1 => Just(PatSeg::Catch),
    ]
}

/// A route pattern of 1..5 segments; a catchall may only sit in the final
/// position, so earlier ones are demoted to wildcards. Parameter names are
/// positional (`p0`, `p1`, …), which keeps any two generated patterns
/// merge-compatible.
fn pattern() -> impl Strategy<Value = Vec<PatSeg>> {
    prop::collection::vec(pat_seg(), 1..5).prop_map(|mut segments| {
        let last = segments.len() - 1;
        for (i, segment) in segments.iter_mut().enumerate() {
            if i != last && matches!(segment, PatSeg::Catch) {
                *segment = PatSeg::Wild;
            }
        }
        segments
    })
}

fn pattern_string(segments: &[PatSeg]) -> String {
    let parts: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| match segment {
            PatSeg::Lit(literal) => literal.clone(),
            PatSeg::Wild => format!("{{p{i}}}"),
            PatSeg::Catch => format!("{{p{i}...}}"),
        })
        .collect();
    format!("/{}", parts.join("/"))
}

/// A pattern plus one concrete path matching it and the parameter map that
/// match should produce.
fn pattern_and_path() -> impl Strategy<Value = (Vec<PatSeg>, String, Params)> {
    pattern()
        .prop_flat_map(|segments| {
            let n = segments.len();
            (
                Just(segments),
                prop::collection::vec("[a-z0-9]{0,3}", n + 2),
            )
        })
        .prop_map(|(segments, values)| {
            let mut parts = Vec::new();
            let mut params = Params::default();
            for (i, segment) in segments.iter().enumerate() {
                match segment {
                    PatSeg::Lit(literal) => parts.push(literal.clone()),
                    PatSeg::Wild => {
                        parts.push(values[i].clone());
                        params.insert(format!("p{i}"), values[i].clone());
                    }
                    PatSeg::Catch => {
                        let tail = values[i..].join("/");
                        params.insert(format!("p{i}"), tail.clone());
                        parts.push(tail);
                    }
                }
            }
            let path = format!("/{}", parts.join("/"));
            (segments, path, params)
        })
}

fn route_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(pattern().prop_map(|segments| pattern_string(&segments)), 1..6)
}

/// Routes use their own pattern string as handler data, so registering the
/// same pattern twice is idempotent rather than conflicting.
fn build_tree(routes: &[String]) -> Node<String> {
    let mut tree: Node<String> = Node::new();
    for route in routes {
        tree = add_route(&tree, MethodToken::Get, route, route.clone(), vec![]).unwrap();
    }
    tree
}

/// Substitutes a parameter map back into a pattern.
fn substitute(segments: &[PatSeg], params: &Params) -> String {
    let parts: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| match segment {
            PatSeg::Lit(literal) => literal.clone(),
            PatSeg::Wild | PatSeg::Catch => {
                params.get(&format!("p{i}")).cloned().unwrap_or_default()
            }
        })
        .collect();
    format!("/{}", parts.join("/"))
}

proptest! {
    /// Any concrete path matching a registered pattern yields that
    /// pattern as the matched route, the expected parameter bindings, and
    /// parameters that rebuild the concrete path when substituted back.
    #[test]
    fn path_params_round_trip((segments, path, expected) in pattern_and_path()) {
        let pattern = pattern_string(&segments);
        let tree: Node<String> = Node::new();
        let tree = add_route(&tree, MethodToken::Get, &pattern, pattern.clone(), vec![]).unwrap();
        let tree = finalize_tree(&tree, &"nf".to_string(), &"mna".to_string(), &[]);

        let hit = find_handler(&tree, MethodToken::Get, &path).unwrap();
        prop_assert_eq!(&hit.handler, &pattern);
        prop_assert_eq!(&hit.route, &pattern);
        prop_assert_eq!(&hit.params, &expected);
        prop_assert_eq!(substitute(&segments, &hit.params), path);
    }

    /// Repeated lookups on a finalized tree return identical resolutions.
    #[test]
    fn lookups_are_deterministic(
        routes in route_set(),
        request in prop::collection::vec("[a-z0-9]{0,3}", 1..5),
    ) {
        let tree = build_tree(&routes);
        let tree = finalize_tree(&tree, &"nf".to_string(), &"mna".to_string(), &[]);
        let path = format!("/{}", request.join("/"));

        let first = find_handler(&tree, MethodToken::Get, &path).unwrap();
        let second = find_handler(&tree, MethodToken::Get, &path).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Merge is commutative when no registration conflicts.
    #[test]
    fn merge_is_commutative(a_routes in route_set(), b_routes in route_set()) {
        let a = build_tree(&a_routes);
        let b = build_tree(&b_routes);

        let ab = merge_trees(&a, &b).unwrap();
        let ba = merge_trees(&b, &a).unwrap();
        prop_assert_eq!(ab, ba);
    }

    /// Finalizing an already finalized tree with the same defaults is a
    /// no-op, router-wide middleware included.
    #[test]
    fn finalize_is_idempotent(routes in route_set()) {
        let shared: Middleware<String> = Middleware::new("shared", |handler| handler);
        let tree = build_tree(&routes).with_middleware(vec![shared]);

        let once = finalize_tree(&tree, &"nf".to_string(), &"mna".to_string(), &[]);
        let twice = finalize_tree(&once, &"nf".to_string(), &"mna".to_string(), &[]);
        prop_assert_eq!(once, twice);
    }

    /// After finalize, every method-and-path combination resolves to a
    /// handler.
    #[test]
    fn error_handlers_are_total(
        routes in route_set(),
        request in prop::collection::vec("[a-z0-9]{0,3}", 1..5),
    ) {
        let tree = build_tree(&routes);
        let tree = finalize_tree(&tree, &"nf".to_string(), &"mna".to_string(), &[]);
        let path = format!("/{}", request.join("/"));

        for token in MethodToken::HTTP {
            prop_assert!(find_handler(&tree, token, &path).is_ok());
        }
    }
}

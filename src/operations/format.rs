//! Human-readable renderings of a routing tree.
//!
//! Two formats are offered: a column-aligned flat route list and a visual
//! tree with box-drawing characters. The verbose flag additionally shows
//! where 404/405 handler overrides take effect. Both renderings are
//! deterministic: entries are sorted, so equal trees format equally.

use crate::method::MethodToken;
use crate::node::Node;
use crate::types::{Label, SegmentKey};

/// Options for [`format_routes`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FormatOptions {
    /// Include 404/405 handler override annotations.
    pub verbose: bool,
    /// Render a visual tree instead of the flat route list.
    pub tree: bool,
}

/// Formats the registered routes of a tree as a human-readable string.
///
/// The default flat form is column-aligned:
///
/// ```text
/// *      /                                   home
/// GET    /admin                              admin_home            [admin_mw]
/// GET    /admin/user/{id}/transaction/{tx}   admin_user_tx         [admin_mw > user_mw]
/// GET    /static/{path...}                   static_files
/// ```
///
/// With `tree` set, a box-drawing tree is produced instead, one branch per
/// path segment with `[METHOD] handler` entries at the leaves.
pub fn format_routes<T: Label + PartialEq>(root: &Node<T>, options: FormatOptions) -> String {
    if options.tree {
        format_route_tree(root, options.verbose)
    } else {
        format_route_list(root, options.verbose)
    }
}

struct RouteEntry {
    method: String,
    path: String,
    handler: String,
    middleware: Vec<String>,
}

struct ErrorEntry {
    status: &'static str,
    path: String,
    handler: String,
}

fn method_label(token: MethodToken) -> String {
    if token == MethodToken::AnyHttp {
        "*".to_string()
    } else {
        token.as_str().to_string()
    }
}

fn format_route_list<T: Label + PartialEq>(root: &Node<T>, verbose: bool) -> String {
    let mut routes = Vec::new();
    let mut errors = Vec::new();
    collect_routes(
        root,
        &[],
        root.not_found(),
        root.method_not_allowed(),
        &mut routes,
        &mut errors,
    );
    routes.sort_by(|a, b| (&a.path, &a.method).cmp(&(&b.path, &b.method)));
    if routes.is_empty() {
        return String::new();
    }

    let method_width = routes.iter().map(|r| r.method.len()).max().unwrap_or(0);
    let path_width = routes.iter().map(|r| r.path.len()).max().unwrap_or(0);
    let handler_width = routes.iter().map(|r| r.handler.len()).max().unwrap_or(0);

    let mut lines = Vec::new();
    for route in &routes {
        if route.middleware.is_empty() {
            lines.push(format!(
                "{:<method_width$}   {:<path_width$}   {}",
                route.method, route.path, route.handler
            ));
        } else {
            lines.push(format!(
                "{:<method_width$}   {:<path_width$}   {:<handler_width$}   [{}]",
                route.method,
                route.path,
                route.handler,
                route.middleware.join(" > ")
            ));
        }
    }

    if verbose {
        let mut all_errors = Vec::new();
        if let Some(handler) = root.not_found() {
            all_errors.push(ErrorEntry {
                status: "404",
                path: "/".to_string(),
                handler: handler.label().to_string(),
            });
        }
        if let Some(handler) = root.method_not_allowed() {
            all_errors.push(ErrorEntry {
                status: "405",
                path: "/".to_string(),
                handler: handler.label().to_string(),
            });
        }
        errors.sort_by(|a, b| (&a.path, a.status).cmp(&(&b.path, b.status)));
        all_errors.extend(errors);
        if !all_errors.is_empty() {
            lines.push(String::new());
            let status_width = all_errors.iter().map(|e| e.status.len()).max().unwrap_or(0);
            let err_path_width = all_errors.iter().map(|e| e.path.len()).max().unwrap_or(0);
            for entry in &all_errors {
                lines.push(format!(
                    "{:<status_width$}   {:<err_path_width$}   {}",
                    entry.status, entry.path, entry.handler
                ));
            }
        }
    }

    lines.join("\n")
}

/// Walks the trie, recording route entries and error-handler transitions.
fn collect_routes<T: Label + PartialEq>(
    node: &Node<T>,
    parts: &[String],
    parent_not_found: Option<&T>,
    parent_method_not_allowed: Option<&T>,
    routes: &mut Vec<RouteEntry>,
    errors: &mut Vec<ErrorEntry>,
) {
    let path = || format!("/{}", parts.join("/"));

    if node.not_found() != parent_not_found {
        if let Some(handler) = node.not_found() {
            errors.push(ErrorEntry {
                status: "404",
                path: path(),
                handler: handler.label().to_string(),
            });
        }
    }
    if node.method_not_allowed() != parent_method_not_allowed {
        if let Some(handler) = node.method_not_allowed() {
            errors.push(ErrorEntry {
                status: "405",
                path: path(),
                handler: handler.label().to_string(),
            });
        }
    }

    for (key, child) in node.children() {
        match key {
            SegmentKey::Method(token) => {
                if let Some(handler) = child.handler() {
                    routes.push(RouteEntry {
                        method: method_label(*token),
                        path: path(),
                        handler: handler.label().to_string(),
                        middleware: child
                            .middleware()
                            .iter()
                            .map(|m| m.name().to_string())
                            .collect(),
                    });
                }
            }
            SegmentKey::Literal(segment) => {
                let mut child_parts = parts.to_vec();
                child_parts.push(segment.clone());
                collect_routes(
                    child,
                    &child_parts,
                    node.not_found(),
                    node.method_not_allowed(),
                    routes,
                    errors,
                );
            }
        }
    }

    if let Some(edge) = node.wildcard() {
        let mut child_parts = parts.to_vec();
        child_parts.push(format!("{{{}}}", edge.name()));
        collect_routes(
            edge.child(),
            &child_parts,
            node.not_found(),
            node.method_not_allowed(),
            routes,
            errors,
        );
    }
    if let Some(edge) = node.catchall() {
        let mut child_parts = parts.to_vec();
        child_parts.push(format!("{{{}...}}", edge.name()));
        collect_routes(
            edge.child(),
            &child_parts,
            node.not_found(),
            node.method_not_allowed(),
            routes,
            errors,
        );
    }
}

fn format_route_tree<T: Label + PartialEq>(root: &Node<T>, verbose: bool) -> String {
    let mut root_label = "/".to_string();
    if verbose {
        let mut annotations = Vec::new();
        if let Some(handler) = root.not_found() {
            annotations.push(format!("404: {}", handler.label()));
        }
        if let Some(handler) = root.method_not_allowed() {
            annotations.push(format!("405: {}", handler.label()));
        }
        if !annotations.is_empty() {
            root_label.push_str(&format!(" ({})", annotations.join(", ")));
        }
    }
    let mut lines = vec![root_label];
    render_tree(root, "", verbose, &mut lines);
    lines.join("\n")
}

/// Recursively renders a node's children with tree-drawing prefixes.
fn render_tree<T: Label + PartialEq>(
    node: &Node<T>,
    prefix: &str,
    verbose: bool,
    lines: &mut Vec<String>,
) {
    // label plus the child to descend into (None for handler entries)
    let mut items: Vec<(String, Option<&Node<T>>)> = Vec::new();

    // Handler entries hanging off the "" child (the "/" path handlers).
    if let Some(empty_child) = node.children().get(&SegmentKey::Literal(String::new())) {
        for (token, leaf) in sorted_leaves(empty_child) {
            if leaf.handler().is_some() {
                items.push((handler_label(token, leaf), None));
            }
        }
    }

    // Handler entries from this node's own method-token children.
    for (token, leaf) in sorted_leaves(node) {
        if leaf.handler().is_some() {
            items.push((handler_label(token, leaf), None));
        }
    }

    // Named segment children, sorted, excluding "".
    let mut literals: Vec<(&String, &Node<T>)> = node
        .children()
        .iter()
        .filter_map(|(key, child)| match key {
            SegmentKey::Literal(segment) if !segment.is_empty() => {
                Some((segment, child.as_ref()))
            }
            _ => None,
        })
        .collect();
    literals.sort_by(|a, b| a.0.cmp(b.0));
    for (segment, child) in literals {
        let annotation = if verbose {
            error_annotation(child, node)
        } else {
            String::new()
        };
        items.push((format!("{segment}{annotation}"), Some(child)));
    }

    if let Some(edge) = node.wildcard() {
        let annotation = if verbose {
            error_annotation(edge.child(), node)
        } else {
            String::new()
        };
        items.push((format!("{{{}}}{annotation}", edge.name()), Some(edge.child())));
    }
    if let Some(edge) = node.catchall() {
        let annotation = if verbose {
            error_annotation(edge.child(), node)
        } else {
            String::new()
        };
        items.push((
            format!("{{{}...}}{annotation}", edge.name()),
            Some(edge.child()),
        ));
    }

    let count = items.len();
    for (i, (label, child)) in items.into_iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{label}"));
        if let Some(child) = child {
            let extension = if is_last { "    " } else { "│   " };
            render_tree(child, &format!("{prefix}{extension}"), verbose, lines);
        }
    }
}

/// This node's method-token children, sorted by token name.
fn sorted_leaves<T>(node: &Node<T>) -> Vec<(MethodToken, &Node<T>)> {
    let mut leaves: Vec<(MethodToken, &Node<T>)> = node
        .children()
        .iter()
        .filter_map(|(key, child)| match key {
            SegmentKey::Method(token) => Some((*token, child.as_ref())),
            SegmentKey::Literal(_) => None,
        })
        .collect();
    leaves.sort_by_key(|(token, _)| token.as_str());
    leaves
}

/// Formats a handler entry: `[METHOD] name [mw > mw]`.
fn handler_label<T: Label>(token: MethodToken, leaf: &Node<T>) -> String {
    let mut label = match leaf.handler() {
        Some(handler) => format!("[{}] {}", method_label(token), handler.label()),
        None => format!("[{}]", method_label(token)),
    };
    if !leaf.middleware().is_empty() {
        let middleware: Vec<&str> = leaf.middleware().iter().map(|m| m.name()).collect();
        label.push_str(&format!(" [{}]", middleware.join(" > ")));
    }
    label
}

/// Annotates 404/405 handler transitions from parent to child.
fn error_annotation<T: Label + PartialEq>(child: &Node<T>, parent: &Node<T>) -> String {
    let mut parts = Vec::new();
    if child.not_found() != parent.not_found() {
        if let Some(handler) = child.not_found() {
            parts.push(format!("404: {}", handler.label()));
        }
    }
    if child.method_not_allowed() != parent.method_not_allowed() {
        if let Some(handler) = child.method_not_allowed() {
            parts.push(format!("405: {}", handler.label()));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

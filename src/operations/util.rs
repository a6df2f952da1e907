//! Path splitting and route-pattern segment parsing.

use crate::error::RouterError;

/// A parsed route-pattern segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RouteSegment<'a> {
    /// Matched by string equality. May be empty (trailing `/`).
    Literal(&'a str),
    /// `{name}`: consumes exactly one request segment.
    Wildcard(&'a str),
    /// `{name...}`: consumes the rest of the request path.
    Catchall(&'a str),
}

/// Splits a route or mount path into its segments, consuming the required
/// leading `/`. A path of `"/"` yields one empty segment.
pub(crate) fn split_route(path: &str) -> Result<Vec<&str>, RouterError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(RouterError::InvalidPath {
            path: path.to_string(),
        });
    };
    Ok(rest.split('/').collect())
}

/// Splits a request path. Request paths are runtime-provided and already
/// validated there, so a missing leading `/` is tolerated rather than
/// rejected.
pub(crate) fn split_request(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Classifies one route-pattern segment.
///
/// `{name}` is a wildcard, `{name...}` a catchall; everything else is a
/// literal. A `{`-prefixed segment that is not a well-formed marker, or a
/// marker with an empty name, is a build error.
pub(crate) fn parse_segment(segment: &str) -> Result<RouteSegment<'_>, RouterError> {
    let Some(inner) = segment.strip_prefix('{') else {
        return Ok(RouteSegment::Literal(segment));
    };

    if let Some(name) = inner.strip_suffix("...}") {
        check_param_name(segment, name, "catchall")?;
        return Ok(RouteSegment::Catchall(name));
    }

    if let Some(name) = inner.strip_suffix('}') {
        check_param_name(segment, name, "wildcard")?;
        return Ok(RouteSegment::Wildcard(name));
    }

    Err(RouterError::InvalidSegment {
        segment: segment.to_string(),
        reason: "unterminated parameter marker".to_string(),
    })
}

// Parameter names are identifier-shaped: non-empty, alphanumeric or '_'.
fn check_param_name(segment: &str, name: &str, kind: &str) -> Result<(), RouterError> {
    if name.is_empty() {
        return Err(RouterError::InvalidSegment {
            segment: segment.to_string(),
            reason: format!("{kind} must have a name"),
        });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RouterError::InvalidSegment {
            segment: segment.to_string(),
            reason: format!("{kind} name must be an identifier"),
        });
    }
    Ok(())
}

//! The closed set of dispatch tokens a leaf can be keyed by.
//!
//! The nine HTTP methods cover RFC 9110 (which obsoletes 7231) and RFC 5789
//! (`PATCH`). Two synthetic tokens extend the set: [`MethodToken::AnyHttp`]
//! matches any HTTP method once specific-method lookup has failed, and
//! [`MethodToken::Websocket`] is a distinct dispatch channel for upgraded
//! connections. The synthetic tokens never appear on the wire and are never
//! produced by [`FromStr`].

use std::fmt;
use std::str::FromStr;

use crate::error::RouterError;

/// A dispatch token: an HTTP method, the any-method fallback, or the
/// websocket channel.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MethodToken {
    /// Establish a connection to the server.
    Connect,
    /// Remove the target.
    Delete,
    /// Retrieve the target.
    Get,
    /// Same as GET, but only retrieve the status line and header section.
    Head,
    /// Describe the communication options for the target.
    Options,
    /// Apply partial modifications to a target.
    Patch,
    /// Perform target-specific processing with the request payload.
    Post,
    /// Replace the target with the request payload.
    Put,
    /// Perform a message loop-back test along the path to the target.
    Trace,
    /// Any HTTP method, consulted after specific-method lookup fails.
    AnyHttp,
    /// A websocket connection, upgraded before it reaches the router.
    Websocket,
}

impl MethodToken {
    /// The nine concrete HTTP methods, excluding the synthetic tokens.
    pub const HTTP: [MethodToken; 9] = [
        MethodToken::Connect,
        MethodToken::Delete,
        MethodToken::Get,
        MethodToken::Head,
        MethodToken::Options,
        MethodToken::Patch,
        MethodToken::Post,
        MethodToken::Put,
        MethodToken::Trace,
    ];

    /// Returns the uppercase token name (e.g. `"GET"`, `"ANY_HTTP"`).
    pub fn as_str(self) -> &'static str {
        match self {
            MethodToken::Connect => "CONNECT",
            MethodToken::Delete => "DELETE",
            MethodToken::Get => "GET",
            MethodToken::Head => "HEAD",
            MethodToken::Options => "OPTIONS",
            MethodToken::Patch => "PATCH",
            MethodToken::Post => "POST",
            MethodToken::Put => "PUT",
            MethodToken::Trace => "TRACE",
            MethodToken::AnyHttp => "ANY_HTTP",
            MethodToken::Websocket => "WEBSOCKET",
        }
    }

    /// True for the two tokens that never appear on the wire.
    pub fn is_synthetic(self) -> bool {
        matches!(self, MethodToken::AnyHttp | MethodToken::Websocket)
    }
}

/// Parses an uppercase HTTP method string (e.g. `"GET"`). The synthetic
/// tokens are rejected; they are routing constructs, not wire methods.
impl FromStr for MethodToken {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(MethodToken::Connect),
            "DELETE" => Ok(MethodToken::Delete),
            "GET" => Ok(MethodToken::Get),
            "HEAD" => Ok(MethodToken::Head),
            "OPTIONS" => Ok(MethodToken::Options),
            "PATCH" => Ok(MethodToken::Patch),
            "POST" => Ok(MethodToken::Post),
            "PUT" => Ok(MethodToken::Put),
            "TRACE" => Ok(MethodToken::Trace),
            _ => Err(RouterError::UnknownMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MethodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! The contract between the router and its host runtime.
//!
//! The router does not parse wires or manage connections; it assumes a
//! runtime that delivers, per request, a [`RequestContext`] and a response
//! protocol object. These traits pin down the minimum shape the router and
//! its handlers rely on; everything else about the runtime is opaque. The
//! router itself only ever reads the protocol family, the method, and the
//! percent-decoded path; the rest of the surface exists for handlers.

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::pin::Pin;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use thiserror::Error;

/// A heap-allocated future, the return shape of every async protocol method.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which dispatch channel a request arrived on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProtocolFamily {
    /// A plain HTTP exchange.
    Http,
    /// A connection already upgraded to a websocket.
    Websocket,
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolFamily::Http => f.write_str("http"),
            ProtocolFamily::Websocket => f.write_str("websocket"),
        }
    }
}

/// Errors surfaced by protocol objects.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The client closed the connection; streaming sends fail with this.
    #[error("client disconnected")]
    ClientDisconnect,

    /// A handler asked the protocol for the wrong family, e.g. an HTTP
    /// response surface on a websocket exchange.
    #[error("expected {expected} protocol")]
    UnexpectedFamily {
        /// The family the handler required.
        expected: ProtocolFamily,
    },

    /// Any other transport-level failure, as reported by the runtime.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// The request-side view a runtime hands to the router.
///
/// The path is percent-decoded by the runtime before it reaches the
/// router; the router performs no normalization of its own.
pub trait RequestContext: Send {
    /// The dispatch channel of this request.
    fn family(&self) -> ProtocolFamily;
    /// The negotiated HTTP version.
    fn http_version(&self) -> Version;
    /// The URL scheme, e.g. `"http"` or `"https"`.
    fn scheme(&self) -> &str;
    /// Local address the connection was accepted on.
    fn server_addr(&self) -> SocketAddr;
    /// Remote peer address.
    fn client_addr(&self) -> SocketAddr;
    /// The request method as received from the wire.
    fn method(&self) -> &str;
    /// The percent-decoded request path.
    fn path(&self) -> &str;
    /// The raw query string, without the leading `?`.
    fn query_string(&self) -> &str;
    /// The request headers (case-insensitive by construction).
    fn headers(&self) -> &HeaderMap;
    /// Reads the full request body.
    fn body(&mut self) -> BoxFuture<'_, Result<Bytes, ProtocolError>>;
}

/// The response surface of an HTTP exchange.
pub trait HttpProtocol: Send {
    /// Sends a response with no body.
    fn response_empty(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
    ) -> BoxFuture<'_, Result<(), ProtocolError>>;

    /// Sends a text response.
    fn response_str(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    ) -> BoxFuture<'_, Result<(), ProtocolError>>;

    /// Sends a binary response.
    fn response_bytes(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    ) -> BoxFuture<'_, Result<(), ProtocolError>>;

    /// Sends a file as the response body.
    fn response_file(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
        path: PathBuf,
    ) -> BoxFuture<'_, Result<(), ProtocolError>>;

    /// Sends a byte range of a file, for range requests.
    fn response_file_range(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
        path: PathBuf,
        start: u64,
        end: u64,
    ) -> BoxFuture<'_, Result<(), ProtocolError>>;

    /// Starts a streamed response and yields the transport to write to.
    fn response_stream(
        &mut self,
        status: StatusCode,
        headers: HeaderMap,
    ) -> BoxFuture<'_, Result<Box<dyn StreamTransport>, ProtocolError>>;
}

/// The write side of a streamed HTTP response.
pub trait StreamTransport: Send {
    /// Writes a binary chunk.
    fn send_bytes(&mut self, data: Bytes) -> BoxFuture<'_, Result<(), ProtocolError>>;
    /// Writes a text chunk.
    fn send_str(&mut self, data: String) -> BoxFuture<'_, Result<(), ProtocolError>>;
}

/// A message received over an accepted websocket.
#[derive(Clone, Debug)]
pub enum WebsocketMessage {
    /// A binary frame.
    Bytes(Bytes),
    /// A text frame.
    Str(String),
    /// The peer closed the socket, with an optional close code.
    Close(Option<u16>),
}

/// The protocol surface of a websocket exchange before acceptance.
pub trait WebsocketProtocol: Send {
    /// Accepts the upgrade and yields the duplex transport.
    fn accept(&mut self) -> BoxFuture<'_, Result<Box<dyn WebsocketTransport>, ProtocolError>>;
    /// Rejects or closes the socket with an optional close code.
    fn close(&mut self, code: Option<u16>) -> BoxFuture<'_, Result<(), ProtocolError>>;
}

/// An accepted, duplex websocket.
pub trait WebsocketTransport: Send {
    /// Receives the next message from the peer.
    fn receive(&mut self) -> BoxFuture<'_, Result<WebsocketMessage, ProtocolError>>;
    /// Sends a binary frame.
    fn send_bytes(&mut self, data: Bytes) -> BoxFuture<'_, Result<(), ProtocolError>>;
    /// Sends a text frame.
    fn send_str(&mut self, data: String) -> BoxFuture<'_, Result<(), ProtocolError>>;
}

/// The response protocol object passed to a handler, one variant per
/// dispatch channel.
pub enum Protocol {
    /// The HTTP response surface.
    Http(Box<dyn HttpProtocol>),
    /// The websocket protocol surface.
    Websocket(Box<dyn WebsocketProtocol>),
}

impl Protocol {
    /// The family of this protocol object.
    pub fn family(&self) -> ProtocolFamily {
        match self {
            Protocol::Http(_) => ProtocolFamily::Http,
            Protocol::Websocket(_) => ProtocolFamily::Websocket,
        }
    }

    /// Unwraps the HTTP surface, failing on a websocket exchange.
    pub fn into_http(self) -> Result<Box<dyn HttpProtocol>, ProtocolError> {
        match self {
            Protocol::Http(protocol) => Ok(protocol),
            Protocol::Websocket(_) => Err(ProtocolError::UnexpectedFamily {
                expected: ProtocolFamily::Http,
            }),
        }
    }

    /// Unwraps the websocket surface, failing on an HTTP exchange.
    pub fn into_websocket(self) -> Result<Box<dyn WebsocketProtocol>, ProtocolError> {
        match self {
            Protocol::Websocket(protocol) => Ok(protocol),
            Protocol::Http(_) => Err(ProtocolError::UnexpectedFamily {
                expected: ProtocolFamily::Websocket,
            }),
        }
    }
}

impl fmt::Debug for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Protocol").field(&self.family()).finish()
    }
}

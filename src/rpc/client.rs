//! JSON-RPC client over a single TCP connection.
//!
//! This module provides `RpcClient`, an async client that dials a JSON-RPC
//! server, sends one request at a time and waits for the matching response.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::rpc::framing::{read_message, write_message};
use crate::rpc::message::{ErrorObject, Request, Response, ResponseError};

/// RPC error types.
///
/// Variants split into two groups: connection-level failures, after which
/// the connection is unusable, and call-level failures, after which the
/// next call may proceed. See [`RpcError::is_fatal`].
#[derive(Debug, Error)]
pub enum RpcError {
    /// Failed to connect to the server.
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] std::io::Error),

    /// Request timed out waiting for response.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Protocol-level error (framing, encoding, id mismatch).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// I/O error during communication.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Server returned an error response.
    #[error("{}", format_server_error(.code, .message))]
    Server {
        /// Error code, absent when the server reported a bare message
        code: Option<i32>,
        /// Error message
        message: String,
        /// Optional additional data
        data: Option<serde_json::Value>,
    },

    /// The result could not be decoded into the requested type.
    #[error("Failed to decode result of {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

fn format_server_error(code: &Option<i32>, message: &str) -> String {
    match code {
        Some(code) => format!("Server error {}: {}", code, message),
        None => format!("Server error: {}", message),
    }
}

impl RpcError {
    /// Whether the connection must be abandoned after this error.
    ///
    /// Server-reported errors and undecodable results leave the stream in
    /// a consistent state; everything else does not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RpcError::Server { .. } | RpcError::Decode { .. })
    }
}

impl From<ErrorObject> for RpcError {
    fn from(err: ErrorObject) -> Self {
        RpcError::Server {
            code: Some(err.code),
            message: err.message,
            data: err.data,
        }
    }
}

impl From<ResponseError> for RpcError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Object(obj) => obj.into(),
            other => RpcError::Server {
                code: None,
                message: other.message(),
                data: None,
            },
        }
    }
}

/// Classify a framing failure: socket errors stay I/O errors, the rest are
/// protocol violations.
fn transport_error(what: &str, err: anyhow::Error) -> RpcError {
    match err.downcast::<std::io::Error>() {
        Ok(io_err) => RpcError::Io(io_err),
        Err(other) => RpcError::Protocol(format!("{}: {:#}", what, other)),
    }
}

/// JSON-RPC client bound to one TCP connection.
///
/// Calls are strictly sequential: `call` takes `&mut self`, so a second
/// request cannot be issued before the first response is read. Dropping the
/// client closes the socket.
///
/// # Example
///
/// ```ignore
/// use jrpc_client::models::Args;
/// use jrpc_client::rpc::{NoParams, RpcClient};
///
/// let mut client = RpcClient::connect("127.0.0.1:1234").await?;
///
/// let greeting: String = client.call("sayHello", NoParams).await?;
/// let swapped: Args = client.call("swap", Args::new(1, 2)).await?;
/// ```
pub struct RpcClient {
    /// Buffered reader for incoming messages.
    reader: BufReader<OwnedReadHalf>,
    /// Writer for outgoing messages.
    writer: OwnedWriteHalf,
    /// Id of the next request.
    next_id: u64,
    /// Per-call timeout; `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl RpcClient {
    /// Dial the server at `addr`.
    ///
    /// # Errors
    ///
    /// Returns `RpcError::ConnectionFailed` if the address cannot be
    /// resolved or the TCP handshake fails.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, RpcError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(RpcError::ConnectionFailed)?;

        if let Ok(peer) = stream.peer_addr() {
            debug!("Connected to {}", peer);
        }

        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            next_id: 1,
            timeout: None,
        })
    }

    /// Set the per-call timeout. `None` (the default) waits forever.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Send a request and wait for its response.
    ///
    /// `params` is sent as the single element of the `params` array, or as
    /// an empty array when it serialises to `null` (see
    /// [`NoParams`](crate::rpc::NoParams)).
    ///
    /// # Errors
    ///
    /// - `RpcError::Server` if the server answered with an error
    /// - `RpcError::Decode` if the result does not fit `R`
    /// - `RpcError::Timeout` if a timeout is set and expires
    /// - `RpcError::Io` / `RpcError::Protocol` if the transport breaks
    pub async fn call<P, R>(&mut self, method: &str, params: P) -> Result<R, RpcError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)
            .map_err(|e| RpcError::Protocol(format!("Failed to serialize params: {}", e)))?;

        let id = self.next_id();
        let request = Request::new(method, params, id);
        debug!("Calling {} (id: {})", method, id);

        let limit = self.timeout;
        let response = match limit {
            Some(limit) => timeout(limit, self.send_receive(&request))
                .await
                .map_err(|_| RpcError::Timeout(limit.as_secs()))??,
            None => self.send_receive(&request).await?,
        };

        Self::process_response(method, response)
    }

    /// Shut down the write half and release the connection.
    pub async fn close(mut self) {
        if let Err(e) = self.writer.shutdown().await {
            debug!("Error shutting down connection: {}", e);
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    async fn send_receive(&mut self, request: &Request) -> Result<Response, RpcError> {
        let request_json = serde_json::to_string(request)
            .map_err(|e| RpcError::Protocol(format!("Failed to serialize request: {}", e)))?;
        trace!("JSON Request: {}", request_json);

        write_message(&mut self.writer, &request_json)
            .await
            .map_err(|e| transport_error("Failed to send request", e))?;

        let response_json = read_message(&mut self.reader)
            .await
            .map_err(|e| transport_error("Failed to read response", e))?;
        trace!("JSON Response: {}", response_json);

        let response: Response = serde_json::from_str(&response_json)
            .map_err(|e| RpcError::Protocol(format!("Failed to parse response: {}", e)))?;

        if !response.matches_id(request.id) {
            return Err(RpcError::Protocol(format!(
                "Response id {} does not match request id {}",
                response
                    .id
                    .as_ref()
                    .map_or_else(|| "null".to_string(), |v| v.to_string()),
                request.id
            )));
        }

        Ok(response)
    }

    fn process_response<R: DeserializeOwned>(
        method: &str,
        response: Response,
    ) -> Result<R, RpcError> {
        if let Some(err) = response.error {
            return Err(err.into());
        }

        let result = response.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result).map_err(|source| RpcError::Decode {
            method: method.to_string(),
            source,
        })
    }
}

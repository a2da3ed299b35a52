//! JSON-RPC client over TCP.
//!
//! This module provides the client side of a classic JSON-RPC exchange:
//! one TCP connection, one request at a time, each request answered by a
//! single response carrying the same `id`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐          TCP stream          ┌─────────────────────┐
//! │   demo client   │  ◄──────────────────────────►│  JSON-RPC server    │
//! │   (RpcClient)   │    stream of JSON values     │  (sayHello, swap…)  │
//! └─────────────────┘                              └─────────────────────┘
//! ```
//!
//! # Protocol
//!
//! Requests are sent as newline-terminated compact JSON objects. Responses
//! are read as whole JSON values, so a reply may be compact or spread over
//! several lines:
//!
//! ```text
//! {"method":"sayHello","params":[],"id":1}\n
//! {"result":"Hello!","error":null,"id":1}\n
//! {\n\t"result":\t"Hello!",\n\t"id":\t1\n}\n
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use jrpc_client::rpc::{NoParams, RpcClient};
//!
//! let mut client = RpcClient::connect("127.0.0.1:1234").await?;
//! let greeting: String = client.call("sayHello", NoParams).await?;
//! client.close().await;
//! ```

mod client;
mod framing;
mod message;

pub use client::{RpcClient, RpcError};
pub use framing::{read_message, write_message, MAX_MESSAGE_SIZE};
pub use message::{ErrorObject, NoParams, Request, Response, ResponseError};

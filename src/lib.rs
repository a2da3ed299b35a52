//! jrpc-client library
//!
//! Core pieces behind the `hello-client` and `swap-client` binaries:
//!
//! - `rpc` - JSON-RPC client over TCP (framing, wire types, `RpcClient`)
//! - `models` - the `Args` record exchanged by `swap`
//! - `config` - address, timeout and debug level from the environment
//! - `logging` - tracing subscriber setup
//! - `demo` - the fixed call sequences the binaries run
//!
//! # Usage
//!
//! ```ignore
//! use jrpc_client::rpc::{NoParams, RpcClient};
//!
//! let mut client = RpcClient::connect("127.0.0.1:1234").await?;
//! let reply: String = client.call("sayHello", NoParams).await?;
//! println!("reply: {}", reply);
//! ```

pub mod config;
pub mod demo;
pub mod logging;
pub mod models;
pub mod rpc;

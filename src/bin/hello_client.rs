//! Calls `sayHello` and `exit` on a JSON-RPC server and prints both replies.
//!
//! The server address comes from `JRPC_ADDR` (default `127.0.0.1:1234`).

use std::process::ExitCode;

use jrpc_client::demo::{self, Variant};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    demo::launch(Variant::Hello).await
}

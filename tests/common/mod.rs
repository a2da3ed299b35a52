//! In-process stub JSON-RPC server for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use jrpc_client::models::Args;
use jrpc_client::rpc::{read_message, Request};

/// How the stub reports unknown methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ErrorStyle {
    /// `{"code": -32601, "message": "Method not found."}`
    Object,
    /// `"rpc: can't find method <name>"`
    Message,
}

/// How the stub lays out its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ReplyFormat {
    /// One compact JSON object per line.
    Compact,
    /// Multi-line, tab-indented objects followed by a newline.
    Formatted,
}

#[derive(Debug, Clone, Copy)]
pub struct StubConfig {
    /// Serve `swap` in addition to `sayHello` and `exit`.
    pub with_swap: bool,
    pub errors: ErrorStyle,
    pub format: ReplyFormat,
    /// Close each connection after this many replies.
    pub hang_up_after: Option<usize>,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            with_swap: true,
            errors: ErrorStyle::Object,
            format: ReplyFormat::Compact,
            hang_up_after: None,
        }
    }
}

pub struct StubServer {
    pub addr: SocketAddr,
    /// Every method name received, in order.
    pub calls: Arc<Mutex<Vec<String>>>,
    pub connections: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Serve `sayHello` and `exit`, plus `swap` when `with_swap` is set.
    pub async fn start(with_swap: bool, errors: ErrorStyle) -> Self {
        Self::start_with(StubConfig {
            with_swap,
            errors,
            ..StubConfig::default()
        })
        .await
    }

    pub async fn start_with(config: StubConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("No local address");
        let calls = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        let handle = {
            let calls = Arc::clone(&calls);
            let connections = Arc::clone(&connections);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    connections.fetch_add(1, Ordering::SeqCst);
                    let (read_half, mut write_half) = stream.into_split();
                    let mut reader = BufReader::new(read_half);
                    let mut replies = 0;

                    while let Ok(line) = read_message(&mut reader).await {
                        let request: Request =
                            serde_json::from_str(&line).expect("Client sent invalid request");
                        calls.lock().unwrap().push(request.method.clone());

                        let reply = respond(&request, config.with_swap, config.errors);
                        let mut text = match config.format {
                            ReplyFormat::Compact => reply.to_string(),
                            ReplyFormat::Formatted => formatted(&reply, 0),
                        };
                        text.push('\n');
                        if write_half.write_all(text.as_bytes()).await.is_err() {
                            break;
                        }

                        replies += 1;
                        if config.hang_up_after == Some(replies) {
                            break;
                        }
                    }
                }
            })
        };

        Self {
            addr,
            calls,
            connections,
            handle,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn respond(request: &Request, with_swap: bool, style: ErrorStyle) -> Value {
    match request.method.as_str() {
        "sayHello" => json!({"id": request.id, "result": "Hello!", "error": null}),
        "exit" => json!({"id": request.id, "result": "Bye!", "error": null}),
        "swap" if with_swap => {
            let args: Args = request
                .params
                .first()
                .cloned()
                .map(|p| serde_json::from_value(p).expect("swap params should be Args"))
                .unwrap_or_default();
            json!({"id": request.id, "result": args.swapped(), "error": null})
        }
        other => match style {
            ErrorStyle::Object => json!({
                "id": request.id,
                "error": {"code": -32601, "message": "Method not found."}
            }),
            ErrorStyle::Message => json!({
                "id": request.id,
                "result": null,
                "error": format!("rpc: can't find method {}", other)
            }),
        },
    }
}

/// Render objects one member per line with tab indentation and a tab
/// after each colon; other values stay compact.
fn formatted(value: &Value, depth: usize) -> String {
    match value {
        Value::Object(map) if !map.is_empty() => {
            let indent = "\t".repeat(depth + 1);
            let members: Vec<String> = map
                .iter()
                .map(|(key, member)| {
                    let key = Value::from(key.as_str());
                    format!("{}{}:\t{}", indent, key, formatted(member, depth + 1))
                })
                .collect();
            format!("{{\n{}\n{}}}", members.join(",\n"), "\t".repeat(depth))
        }
        other => other.to_string(),
    }
}

/// Address with nothing listening on it.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    addr
}

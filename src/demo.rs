//! The two fixed call sequences run by the client binaries.
//!
//! Both sequences share one connection and issue exactly two calls in
//! program order. Output goes to any `io::Write` so the sequences can be
//! checked against a stub server in tests.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::ClientConfig;
use crate::logging;
use crate::models::Args;
use crate::rpc::{NoParams, RpcClient, RpcError};

/// Which demo program to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `sayHello`, then `exit`.
    Hello,
    /// `sayHello`, then `swap(Args{A:1, B:2})`.
    Swap,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Hello => "hello-client",
            Variant::Swap => "swap-client",
        }
    }
}

/// Entry point shared by the binaries: read configuration, set up logging,
/// run the sequence against stdout and map the outcome to an exit code.
pub async fn launch(variant: Variant) -> ExitCode {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(0);
            error!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.debug_level);
    info!("Starting {} v{}", variant.name(), env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    exit_code(run(variant, &config, &mut out).await)
}

/// Map the outcome of a run to the process exit status, logging failures.
pub fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Dial `config.addr` and run the sequence for `variant`.
///
/// Only connection-level failures are returned as errors; call errors are
/// printed and the sequence carries on. The connection is closed on every
/// path once it has been opened.
pub async fn run<W: Write>(variant: Variant, config: &ClientConfig, out: &mut W) -> Result<()> {
    let mut client = RpcClient::connect(config.addr.as_str())
        .await
        .with_context(|| format!("dialing {}", config.addr))?;
    client.set_timeout(config.timeout);

    let result = match variant {
        Variant::Hello => hello_sequence(&mut client, out).await,
        Variant::Swap => swap_sequence(&mut client, out).await,
    };

    client.close().await;
    result
}

/// Variant 1: `sayHello`, then `exit`.
pub async fn hello_sequence<W: Write>(client: &mut RpcClient, out: &mut W) -> Result<()> {
    call_and_print_string(client, "sayHello", out).await?;
    call_and_print_string(client, "exit", out).await?;
    Ok(())
}

/// Variant 2: `sayHello`, then `swap(Args{A:1, B:2})`.
///
/// The reply line is printed even when `swap` fails, in which case it shows
/// the default `A:0 B:0`.
pub async fn swap_sequence<W: Write>(client: &mut RpcClient, out: &mut W) -> Result<()> {
    call_and_print_string(client, "sayHello", out).await?;

    let args = Args::new(1, 2);
    let mut reply = Args::default();

    match client.call::<_, Args>("swap", args).await {
        Ok(swapped) => reply = swapped,
        Err(e) => {
            report_call_error("swap", e, out)?;
            warn!("swap failed; printing default reply {}", reply);
        }
    }

    writeln!(out, "reply: {}", reply)?;
    Ok(())
}

async fn call_and_print_string<W: Write>(
    client: &mut RpcClient,
    method: &str,
    out: &mut W,
) -> Result<()> {
    match client.call::<_, String>(method, NoParams).await {
        Ok(reply) => writeln!(out, "reply: {}", reply)?,
        Err(e) => report_call_error(method, e, out)?,
    }
    Ok(())
}

/// Print a non-fatal call error, or hand a fatal one back to the caller.
fn report_call_error<W: Write>(method: &str, err: RpcError, out: &mut W) -> Result<()> {
    if err.is_fatal() {
        return Err(anyhow::Error::new(err).context(format!("{} call failed", method)));
    }

    warn!("{} error: {}", method, err);
    writeln!(out, "{} error: {}", method, err)?;
    Ok(())
}

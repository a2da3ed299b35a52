//! Message framing for JSON-RPC over TCP.
//!
//! Outgoing requests are written as one compact JSON document followed by
//! `\n`. Incoming responses are read as a stream of JSON values: a message
//! ends where its top-level value ends, regardless of line breaks. Servers
//! that pretty-print their replies across several lines are read the same
//! way as servers that send one line per reply.
//!
//! # Wire Format
//!
//! ```text
//! request:   {"method":"sayHello","params":[],"id":1}\n
//! response:  {\n\t"result":\t"Hello!",\n\t"id":\t1\n}\n
//! ```
//!
//! Whitespace between values is skipped.

use anyhow::{anyhow, Context, Result};
use serde::de::IgnoredAny;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum message size (1 MiB) to bound memory on a misbehaving server.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Read the next complete JSON value from the stream.
///
/// Bytes after the end of the value stay in `reader` for the next call.
///
/// # Errors
///
/// Returns an error if:
/// - The stream is closed (EOF) before a message arrives, or mid-message
/// - The message exceeds MAX_MESSAGE_SIZE
/// - The bytes are not valid JSON
pub async fn read_message<R>(reader: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf: Vec<u8> = Vec::new();

    loop {
        let available = reader
            .fill_buf()
            .await
            .context("Failed to read from stream")?;

        if available.is_empty() {
            if buf.iter().all(u8::is_ascii_whitespace) {
                return Err(anyhow!("Connection closed by server"));
            }
            return Err(anyhow!("Connection closed mid-message"));
        }

        let previous = buf.len();
        let chunk_len = available.len();
        buf.extend_from_slice(available);

        match complete_value_len(&buf)? {
            Some(end) => {
                // Only the bytes up to the end of the value leave the reader.
                reader.consume(end - previous);
                buf.truncate(end);
                let text = String::from_utf8(buf).context("Message is not valid UTF-8")?;
                return Ok(text.trim_start().to_string());
            }
            None => {
                reader.consume(chunk_len);
                if buf.len() > MAX_MESSAGE_SIZE {
                    return Err(anyhow!(
                        "Message size exceeds maximum {} bytes",
                        MAX_MESSAGE_SIZE
                    ));
                }
            }
        }
    }
}

/// Length of the first complete JSON value in `buf`, including leading
/// whitespace, or `None` if more bytes are needed.
fn complete_value_len(buf: &[u8]) -> Result<Option<usize>> {
    let mut values = serde_json::Deserializer::from_slice(buf).into_iter::<IgnoredAny>();

    match values.next() {
        Some(Ok(_)) => Ok(Some(values.byte_offset())),
        Some(Err(e)) if e.is_eof() => Ok(None),
        Some(Err(e)) => Err(anyhow::Error::new(e).context("Malformed JSON message")),
        None => Ok(None),
    }
}

/// Write one message followed by `\n` and flush.
///
/// # Errors
///
/// Returns an error if the body contains a newline, or if the write or
/// flush fails.
pub async fn write_message<W>(writer: &mut W, body: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if body.contains('\n') {
        return Err(anyhow!("Message body must not contain a newline"));
    }

    writer
        .write_all(body.as_bytes())
        .await
        .context("Failed to write message body")?;

    writer
        .write_all(b"\n")
        .await
        .context("Failed to write message terminator")?;

    writer.flush().await.context("Failed to flush message")?;

    Ok(())
}

//! stdio transport for MCP server.
//!
//! - Messages are UTF-8 encoded JSON-RPC, one per line
//! - Messages must not contain embedded newlines
//! - stdin: receives messages from client
//! - stdout: sends replies to client
//! - stderr: logging only, never MCP messages

use std::io;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};

use crate::mcp::protocol::Reply;

/// A line-delimited MCP transport over any reader/writer pair.
pub struct Transport<R, W> {
    /// Incoming message lines.
    lines: Lines<R>,
    /// Outgoing replies.
    writer: W,
}

/// The transport the server uses in production.
pub type StdioTransport = Transport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    /// Creates a new stdio transport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport reading lines from `reader` and writing to `writer`.
    pub fn with_io(reader: R, writer: W) -> Self {
        Self {
            lines: reader.lines(),
            writer,
        }
    }

    /// Reads the next message line, without its `\n` or `\r\n`.
    ///
    /// Returns `None` if the input is closed (EOF). Cancel safe: a partly
    /// read line is kept for the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the line is not valid UTF-8.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    /// Writes a reply as a single newline-terminated line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_reply(&mut self, reply: &Reply) -> io::Result<()> {
        let json = encode_reply(reply)?;

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Serialises a reply to compact JSON.
///
/// # Errors
///
/// Returns an `InvalidData` error if serialisation fails.
pub fn encode_reply(reply: &Reply) -> io::Result<String> {
    let json =
        serde_json::to_string(reply).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    // Compact serde_json output escapes newlines inside strings
    debug_assert!(
        !json.contains('\n'),
        "JSON message must not contain embedded newlines"
    );
    Ok(json)
}

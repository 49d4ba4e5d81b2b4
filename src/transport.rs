//! Boundary to the chat platform.
//!
//! The shipped [`StdioTransport`] speaks JSON lines: one [`InboundEvent`]
//! per line on the input, one [`Effect`] per line on the output. A platform
//! adapter sits on the other side of the pipe.

use crate::commands::Effect;
use crate::dispatch::InboundEvent;
use crate::error::TransportError;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::warn;

/// Source of events and sink for effects.
#[async_trait]
pub trait Transport: Send {
    /// Next event, or `None` once the platform side has closed.
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError>;

    /// Carry out effects in order.
    async fn deliver(&mut self, effects: &[Effect]) -> Result<(), TransportError>;
}

/// JSON-lines transport over any async reader and writer.
pub struct StdioTransport<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
    line_no: u64,
}

impl StdioTransport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Events on stdin, effects on stdout.
    pub fn stdio() -> Self {
        Self::from_parts(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn from_parts(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            line_no: 0,
        }
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> Transport for StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str(line) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    let err = TransportError::from(e);
                    warn!(
                        line = self.line_no,
                        error = %err,
                        code = err.error_code(),
                        "Skipping malformed event"
                    );
                }
            }
        }
        Ok(None)
    }

    async fn deliver(&mut self, effects: &[Effect]) -> Result<(), TransportError> {
        if effects.is_empty() {
            return Ok(());
        }

        let mut buf = Vec::new();
        for effect in effects {
            serde_json::to_writer(&mut buf, effect)?;
            buf.push(b'\n');
        }
        self.writer.write_all(&buf).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

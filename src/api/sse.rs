//! Incremental consumer for `text/event-stream` responses.

use std::{collections::VecDeque, fmt, pin::Pin};

use futures::{Stream, StreamExt};

use crate::api::errors::ApiError;

/// One decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event's `data` payload; multi-line payloads are joined with `\n`.
    pub data: String,
}

/// An open event-stream connection.
///
/// Wraps the raw byte stream of the response and decodes events as chunks
/// arrive. Chunks may split lines and events at arbitrary byte boundaries,
/// so undecoded bytes are buffered between reads. Dropping the stream closes
/// the connection.
pub struct EventStream {
    chunks: Pin<Box<dyn Stream<Item = Result<Vec<u8>, ApiError>> + Send>>,
    parser: EventParser,
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("chunks", &"<byte stream>")
            .field("parser", &self.parser)
            .finish()
    }
}

impl EventStream {
    pub(crate) fn new(
        chunks: impl Stream<Item = Result<Vec<u8>, ApiError>> + Send + 'static,
    ) -> Self {
        Self {
            chunks: Box::pin(chunks),
            parser: EventParser::default(),
        }
    }

    /// Waits for the next complete event.
    ///
    /// Returns `None` once the server closes the stream. Buffered bytes are
    /// kept on `self`, so this is safe to race inside `tokio::select!`.
    pub async fn next_event(&mut self) -> Option<Result<SseEvent, ApiError>> {
        loop {
            if let Some(event) = self.parser.next_ready() {
                return Some(Ok(event));
            }

            match self.chunks.next().await {
                Some(Ok(chunk)) => self.parser.feed(&chunk),
                Some(Err(err)) => return Some(Err(err)),
                None => return None,
            }
        }
    }
}

/// Line-protocol state machine: `data:` lines accumulate, a blank line
/// dispatches, `:` comment lines and fields we do not use are skipped.
#[derive(Debug, Default)]
struct EventParser {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
    ready: VecDeque<SseEvent>,
}

impl EventParser {
    fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        while let Some(line) = self.take_line() {
            self.handle_line(&line);
        }
    }

    fn next_ready(&mut self) -> Option<SseEvent> {
        self.ready.pop_front()
    }

    fn take_line(&mut self) -> Option<String> {
        let end = self.buffer.iter().position(|byte| *byte == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=end).collect();

        line.pop();

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn handle_line(&mut self, line: &str) {
        if line.is_empty() {
            if !self.data_lines.is_empty() {
                let data = self.data_lines.join("\n");

                self.data_lines.clear();
                self.ready.push_back(SseEvent { data });
            }

            return;
        }

        if line.starts_with(':') {
            return;
        }

        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);

            self.data_lines.push(value.to_owned());
        }
    }
}

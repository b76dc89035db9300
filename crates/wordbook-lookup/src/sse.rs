use std::collections::VecDeque;

use futures_util::StreamExt;

use crate::error::LookupError;
use crate::transport::ByteStream;

const DEFAULT_EVENT: &str = "message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental Server-Sent-Events decoder.
///
/// Bytes can be fed in arbitrary pieces; a line (and any UTF-8 sequence in it) may
/// be split across chunks. Lines end with `\n` or `\r\n`.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: String,
    seen_first_line: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every event completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        while let Some(pos) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + pos;
            let line = strip_cr(&self.buffer[start..end]);
            let line = String::from_utf8_lossy(line).into_owned();
            start = end + 1;

            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        self.buffer.drain(..start);

        events
    }

    /// End of input. Flushes an event the server did not terminate with a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let line = String::from_utf8_lossy(strip_cr(&self.buffer)).into_owned();
            self.buffer.clear();
            if let Some(event) = self.process_line(&line) {
                return Some(event);
            }
        }

        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = if self.seen_first_line {
            line
        } else {
            self.seen_first_line = true;
            line.strip_prefix('\u{feff}').unwrap_or(line)
        };

        if line.is_empty() {
            return self.dispatch();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            // No reconnects, so last event id and retry delay are irrelevant
            "id" | "retry" => {}
            other => tracing::trace!("Ignoring SSE field '{}'", other),
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        data.pop();

        Some(SseEvent {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
        })
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Events of the lookup protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupEvent {
    /// Fragment of the streamed transcript
    Text(String),
    /// Raw JSON of the structured result
    Result(String),
}

/// Pull-style reader turning a byte stream into [`LookupEvent`]s
pub struct EventReader {
    stream: ByteStream,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    finished: bool,
}

impl EventReader {
    pub fn new(stream: ByteStream) -> Self {
        Self {
            stream,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Next protocol event, `None` once the stream has ended
    pub async fn next_event(&mut self) -> Option<Result<LookupEvent, LookupError>> {
        loop {
            while let Some(event) = self.pending.pop_front() {
                match event.event.as_str() {
                    "text" => return Some(Ok(LookupEvent::Text(event.data))),
                    "result" => return Some(Ok(LookupEvent::Result(event.data))),
                    other => tracing::debug!("Skipping '{}' event", other),
                }
            }

            if self.finished {
                return None;
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.decoder.feed(&chunk)),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    self.pending.extend(self.decoder.finish());
                }
            }
        }
    }
}

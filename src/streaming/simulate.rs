//! Simulated streaming over a single-shot result.
//!
//! Turns one `GenerateResult` into the canonical chunk sequence:
//! `Reasoning` (only when present), `Text` (omitted when empty), one
//! `ToolCall` per call in order, `Usage`, then `Finish` carrying the same
//! usage and the finish reason. Also the reference producer for correct
//! chunk ordering.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use super::StreamChunk;
use crate::error::LlmError;
use crate::types::GenerateResult;

/// Build the canonical chunk list for a single-shot result.
pub fn result_to_chunks(result: GenerateResult) -> Vec<StreamChunk> {
    let GenerateResult {
        text,
        reasoning,
        tool_calls,
        usage,
        finish_reason,
        ..
    } = result;

    let mut chunks = Vec::with_capacity(tool_calls.len() + 4);
    if let Some(value) = reasoning.filter(|r| !r.is_empty()) {
        chunks.push(StreamChunk::Reasoning { value });
    }
    if !text.is_empty() {
        chunks.push(StreamChunk::Text { value: text });
    }
    chunks.extend(
        tool_calls
            .into_iter()
            .map(|call| StreamChunk::ToolCall { call }),
    );
    chunks.push(StreamChunk::Usage { usage });
    chunks.push(StreamChunk::Finish {
        reason: finish_reason,
        usage,
    });
    chunks
}

/// Pull-based stream that replays a single-shot result.
///
/// Chunks are materialized on the first pull and then served one at a time.
/// `close` marks the stream exhausted regardless of position.
#[derive(Debug)]
pub struct SimulatedStream {
    source: Option<GenerateResult>,
    pending: VecDeque<StreamChunk>,
    closed: bool,
}

impl SimulatedStream {
    pub fn new(result: GenerateResult) -> Self {
        Self {
            source: Some(result),
            pending: VecDeque::new(),
            closed: false,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.source = None;
        self.pending.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn next_chunk(&mut self) -> Option<StreamChunk> {
        if self.closed {
            return None;
        }
        if let Some(result) = self.source.take() {
            self.pending = result_to_chunks(result).into();
        }
        let chunk = self.pending.pop_front();
        if chunk.is_none() {
            self.closed = true;
        }
        chunk
    }
}

impl Stream for SimulatedStream {
    type Item = Result<StreamChunk, LlmError>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().next_chunk().map(Ok))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.closed {
            return (0, Some(0));
        }
        match &self.source {
            Some(r) => {
                let n = r.tool_calls.len()
                    + 2
                    + usize::from(!r.text.is_empty())
                    + usize::from(r.has_reasoning());
                (n, Some(n))
            }
            None => (self.pending.len(), Some(self.pending.len())),
        }
    }
}

//! Text-rewriting stream adapter.
//!
//! `TextTransformStream` drives a `TextTransformer` state machine over an
//! upstream `ChunkStream`. Only `Text` chunks reach the transformer; every
//! other chunk passes through untouched and in order. Any non-text chunk,
//! an upstream error, or end-of-stream closes the current text span: the
//! transformer is flushed first, so buffered text is never reordered past
//! a `Usage`/`Finish`/`Error` and never dropped.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use super::{ChunkStream, StreamChunk};
use crate::error::LlmError;

/// Incremental rewriter for one logical text channel.
///
/// Implementations own all per-call state and never block.
pub trait TextTransformer: Send {
    /// Feed one upstream text fragment and append any ready output.
    fn push(&mut self, text: &str, out: &mut Vec<StreamChunk>);

    /// The current text span ended; emit whatever is still buffered.
    fn flush(&mut self, out: &mut Vec<StreamChunk>);
}

/// Stream wrapper applying a `TextTransformer` to an upstream stream.
pub struct TextTransformStream<T> {
    inner: Option<ChunkStream>,
    transformer: T,
    pending: VecDeque<Result<StreamChunk, LlmError>>,
    scratch: Vec<StreamChunk>,
}

impl<T: TextTransformer + Unpin + 'static> TextTransformStream<T> {
    pub fn new(inner: ChunkStream, transformer: T) -> Self {
        Self {
            inner: Some(inner),
            transformer,
            pending: VecDeque::new(),
            scratch: Vec::new(),
        }
    }

    pub fn boxed(self) -> ChunkStream {
        Box::pin(self)
    }

    fn drain_scratch(&mut self) {
        self.pending.extend(self.scratch.drain(..).map(Ok));
    }

    fn on_text(&mut self, value: &str) {
        self.transformer.push(value, &mut self.scratch);
        self.drain_scratch();
    }

    fn on_span_end(&mut self) {
        self.transformer.flush(&mut self.scratch);
        self.drain_scratch();
    }
}

impl<T: TextTransformer + Unpin + 'static> Stream for TextTransformStream<T> {
    type Item = Result<StreamChunk, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(item) = this.pending.pop_front() {
                return Poll::Ready(Some(item));
            }
            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(None);
            };
            match inner.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(StreamChunk::Text { value }))) => this.on_text(&value),
                Poll::Ready(Some(item)) => {
                    this.on_span_end();
                    this.pending.push_back(item);
                }
                Poll::Ready(None) => {
                    this.on_span_end();
                    // Upstream is done; release it now rather than on drop.
                    this.inner = None;
                }
            }
        }
    }
}

//! Streaming Module
//!
//! Chunk types, the text-transform stream adapter, the simulated-streaming
//! producer and helpers for consuming chunk streams.

mod ordering;
mod simulate;
mod transform;
mod types;

pub use ordering::*;
pub use simulate::*;
pub use transform::*;
pub use types::*;

use futures::StreamExt;

use crate::error::LlmError;

/// Everything a drained stream produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedStream {
    /// Concatenation of all `Text` chunks.
    pub text: String,
    /// Concatenation of all `Reasoning` chunks.
    pub reasoning: String,
    /// Every chunk, in order.
    pub chunks: Vec<StreamChunk>,
}

/// Drain a stream to completion.
///
/// Stops at the first `Err` item and returns it; chunks seen so far are
/// discarded with it.
pub async fn collect_stream(mut stream: ChunkStream) -> Result<CollectedStream, LlmError> {
    let mut collected = CollectedStream::default();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        match &chunk {
            StreamChunk::Text { value } => collected.text.push_str(value),
            StreamChunk::Reasoning { value } => collected.reasoning.push_str(value),
            _ => {}
        }
        collected.chunks.push(chunk);
    }
    Ok(collected)
}

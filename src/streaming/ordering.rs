//! Chunk ordering contract checks.

use super::StreamChunk;

/// A violation of the chunk ordering contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingViolation {
    /// A chunk appeared after a `Finish` or `Error` chunk.
    AfterTerminal { index: usize, kind: &'static str },
    /// Text or reasoning appeared after the response's `Usage` chunk.
    ContentAfterUsage { index: usize },
    /// `Finish` was not directly preceded by `Usage`.
    FinishWithoutUsage { index: usize },
}

/// Check a collected chunk list against the ordering contract.
///
/// A list with no `Finish` is accepted as long as what is there is
/// consistent (e.g. a stream that ended with an error).
pub fn validate_chunk_order(chunks: &[StreamChunk]) -> Result<(), OrderingViolation> {
    let mut saw_usage = false;
    let mut terminal = false;

    for (index, chunk) in chunks.iter().enumerate() {
        if terminal {
            return Err(OrderingViolation::AfterTerminal {
                index,
                kind: chunk.kind(),
            });
        }
        match chunk {
            StreamChunk::Text { .. } | StreamChunk::Reasoning { .. } if saw_usage => {
                return Err(OrderingViolation::ContentAfterUsage { index });
            }
            StreamChunk::Usage { .. } => saw_usage = true,
            StreamChunk::Finish { .. } => {
                let prev_is_usage =
                    index > 0 && matches!(chunks[index - 1], StreamChunk::Usage { .. });
                if !prev_is_usage {
                    return Err(OrderingViolation::FinishWithoutUsage { index });
                }
                terminal = true;
            }
            StreamChunk::Error { .. } => terminal = true,
            _ => {}
        }
    }
    Ok(())
}

//! Markdown code-fence stripping for streamed text.
//!
//! Some providers wrap structured output in a ```` ```json ```` fence. The
//! `FenceExtractor` removes the opening fence line as soon as it can be
//! recognised, streams the body while holding back a short suffix (the
//! closing fence may still be arriving), and strips the closing fence when
//! the text span ends.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::streaming::{StreamChunk, TextTransformer};

/// Custom replacement for the default fence transform.
pub type FenceTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Characters inspected while deciding whether the text opens with a fence.
pub const DETECTION_WINDOW: usize = 24;
/// Characters always held back while streaming.
pub const HOLD_BACK: usize = 12;

static OPENING_FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?[ \t]*\r?\n").expect("valid regex"));
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*\n?").expect("valid regex"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n?```\s*$").expect("valid regex"));

/// Remove a leading ```` ```json ````/```` ``` ```` line and a trailing
/// ```` ``` ```` line, then trim surrounding whitespace.
///
/// Fence-free text only gets trimmed.
pub fn default_fence_transform(text: &str) -> String {
    let without_leading = LEADING_FENCE.replace(text, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}

fn strip_trailing_fence(text: &str) -> String {
    TRAILING_FENCE.replace(text, "").trim_end().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    PrefixDetect,
    Streaming,
}

enum PrefixDecision {
    Wait,
    Strip(usize),
    Literal,
}

/// Incremental fence stripper.
///
/// With a custom transform every text span is buffered whole and transformed
/// once when it ends.
pub struct FenceExtractor {
    transform: Option<FenceTransform>,
    buffer: String,
    phase: Phase,
    prefix_stripped: bool,
    emitted: bool,
    span_has_text: bool,
}

impl FenceExtractor {
    pub fn new(transform: Option<FenceTransform>) -> Self {
        Self {
            transform,
            buffer: String::new(),
            phase: Phase::PrefixDetect,
            prefix_stripped: false,
            emitted: false,
            span_has_text: false,
        }
    }

    /// Apply the configured transform to a complete text.
    pub fn transform_complete(&self, text: &str) -> String {
        match &self.transform {
            Some(transform) => transform(text),
            None => default_fence_transform(text),
        }
    }

    fn decide_prefix(&self) -> PrefixDecision {
        let buffer = self.buffer.as_str();
        if buffer.is_empty() {
            return PrefixDecision::Wait;
        }
        if !buffer.starts_with('`') {
            return PrefixDecision::Literal;
        }
        if "```".starts_with(buffer) && buffer.len() < 3 {
            return PrefixDecision::Wait;
        }
        if !buffer.starts_with("```") {
            return PrefixDecision::Literal;
        }
        // The opening line ends at the first newline, so the decision is
        // settled once that newline is inside the window.
        if buffer.chars().take(DETECTION_WINDOW).any(|c| c == '\n') {
            return match OPENING_FENCE_LINE.find(buffer) {
                Some(m) => PrefixDecision::Strip(m.end()),
                None => PrefixDecision::Literal,
            };
        }
        if buffer.chars().count() >= DETECTION_WINDOW {
            PrefixDecision::Literal
        } else {
            PrefixDecision::Wait
        }
    }

    fn emit_ready(&mut self, out: &mut Vec<StreamChunk>) {
        let Some((split, _)) = self.buffer.char_indices().rev().nth(HOLD_BACK - 1) else {
            return;
        };
        if split == 0 {
            return;
        }
        let ready: String = self.buffer.drain(..split).collect();
        self.emitted = true;
        out.push(StreamChunk::text(ready));
    }
}

impl TextTransformer for FenceExtractor {
    fn push(&mut self, text: &str, out: &mut Vec<StreamChunk>) {
        if text.is_empty() {
            return;
        }
        self.span_has_text = true;
        self.buffer.push_str(text);
        if self.transform.is_some() {
            return;
        }

        if self.phase == Phase::PrefixDetect {
            match self.decide_prefix() {
                PrefixDecision::Wait => return,
                PrefixDecision::Strip(end) => {
                    tracing::trace!(fence_len = end, "stripped opening code fence");
                    self.buffer.drain(..end);
                    self.prefix_stripped = true;
                }
                PrefixDecision::Literal => {
                    tracing::trace!("no opening code fence");
                }
            }
            self.phase = Phase::Streaming;
        }

        self.emit_ready(out);
    }

    fn flush(&mut self, out: &mut Vec<StreamChunk>) {
        // Spans without text produce nothing, even under a custom transform.
        if !self.span_has_text {
            return;
        }
        let remainder = std::mem::take(&mut self.buffer);
        let flushed = if let Some(transform) = &self.transform {
            transform(&remainder)
        } else if self.prefix_stripped || self.emitted {
            strip_trailing_fence(&remainder)
        } else {
            default_fence_transform(&remainder)
        };
        if !flushed.is_empty() {
            out.push(StreamChunk::text(flushed));
        }

        self.phase = Phase::PrefixDetect;
        self.prefix_stripped = false;
        self.emitted = false;
        self.span_has_text = false;
    }
}

impl std::fmt::Debug for FenceExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FenceExtractor")
            .field("custom_transform", &self.transform.is_some())
            .field("phase", &self.phase)
            .field("prefix_stripped", &self.prefix_stripped)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

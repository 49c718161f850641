//! Generic tag extraction for streaming text.
//!
//! This module provides a state machine-based tag extractor that can handle
//! streaming text input and split it into tagged and untagged segments.
//! Tags split across chunk boundaries are detected: the extractor keeps the
//! shortest tail of its buffer that could still complete the tag it is
//! waiting for, and emits everything before it.

/// Tag configuration for extraction.
///
/// Defines the opening and closing tags to extract, and the separator used
/// when the single-shot path joins several tagged spans.
///
/// # Example
///
/// ```rust,ignore
/// use lm_middleware::middleware::TagConfig;
///
/// let config = TagConfig::for_tag_name("think").with_separator("\n");
/// assert_eq!(config.opening_tag, "<think>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    /// Opening tag (e.g., "<think>")
    pub opening_tag: String,
    /// Closing tag (e.g., "</think>")
    pub closing_tag: String,
    /// Joins tagged spans, and replaces a removed span that sat between text
    pub separator: String,
}

impl TagConfig {
    /// Create a new tag configuration from literal tags.
    pub fn new(opening_tag: impl Into<String>, closing_tag: impl Into<String>) -> Self {
        Self {
            opening_tag: opening_tag.into(),
            closing_tag: closing_tag.into(),
            separator: "\n".to_string(),
        }
    }

    /// `<name>` / `</name>` tags.
    pub fn for_tag_name(name: &str) -> Self {
        Self::new(format!("<{name}>"), format!("</{name}>"))
    }

    /// Set the separator used by the single-shot path.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Which side of the tag pair the extractor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMode {
    /// Outside any tag; waiting for the opening tag.
    Plain,
    /// Inside a tag; waiting for the closing tag.
    Tagged,
}

/// A run of text on one side of the tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSegment {
    pub content: String,
    pub is_tag_content: bool,
}

/// Incremental tag extractor.
///
/// Holds only the buffer and the current mode. One instance per stream.
///
/// # Example
///
/// ```rust,ignore
/// let mut extractor = TagExtractor::new(TagConfig::for_tag_name("think"));
/// let a = extractor.process_text("Hello <thin");
/// let b = extractor.process_text("k>thinking</think> world");
/// let tail = extractor.finalize();
/// ```
#[derive(Debug, Clone)]
pub struct TagExtractor {
    config: TagConfig,
    buffer: String,
    mode: TagMode,
}

impl TagExtractor {
    pub fn new(config: TagConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            mode: TagMode::Plain,
        }
    }

    /// Start inside a tag: the opening tag is implied and will not be seen.
    pub fn with_start_inside(mut self, inside: bool) -> Self {
        self.mode = if inside {
            TagMode::Tagged
        } else {
            TagMode::Plain
        };
        self
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn mode(&self) -> TagMode {
        self.mode
    }

    /// Text held back because it may be the start of a tag.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Process a chunk of text and return the segments that are final.
    ///
    /// Consecutive segments alternate sides only when a complete tag was
    /// consumed between them. Empty segments are never returned.
    pub fn process_text(&mut self, new_text: &str) -> Vec<TagSegment> {
        self.buffer.push_str(new_text);
        let mut segments = Vec::new();

        loop {
            let next_tag = match self.mode {
                TagMode::Plain => &self.config.opening_tag,
                TagMode::Tagged => &self.config.closing_tag,
            };
            let is_tag_content = self.mode == TagMode::Tagged;

            let Some(start_index) = get_potential_start_index(&self.buffer, next_tag) else {
                if !self.buffer.is_empty() {
                    segments.push(TagSegment {
                        content: std::mem::take(&mut self.buffer),
                        is_tag_content,
                    });
                }
                break;
            };

            if start_index > 0 {
                segments.push(TagSegment {
                    content: self.buffer[..start_index].to_string(),
                    is_tag_content,
                });
                self.buffer.drain(..start_index);
            }

            if !self.buffer.starts_with(next_tag.as_str()) {
                // Partial tag at the tail; wait for more input.
                break;
            }

            let tag_len = next_tag.len();
            self.buffer.drain(..tag_len);
            self.mode = match self.mode {
                TagMode::Plain => TagMode::Tagged,
                TagMode::Tagged => TagMode::Plain,
            };
            tracing::trace!(mode = ?self.mode, "tag extractor switched mode");
        }

        segments
    }

    /// Flush whatever is still buffered as literal text of the current side.
    ///
    /// An incomplete trailing tag comes out verbatim. The mode is kept.
    pub fn finalize(&mut self) -> Option<TagSegment> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(TagSegment {
            content: std::mem::take(&mut self.buffer),
            is_tag_content: self.mode == TagMode::Tagged,
        })
    }

    /// Reset the extractor to its initial state (plain mode, empty buffer).
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.mode = TagMode::Plain;
    }
}

/// Result of single-shot extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagExtraction {
    /// Input with every tagged span removed.
    pub text: String,
    /// Inner contents of each span, in order.
    pub spans: Vec<String>,
    /// `spans` joined with the separator; `None` when nothing matched.
    pub joined: Option<String>,
}

/// Extract all complete `opening...closing` spans from a full text.
///
/// Spans are found in one left-to-right scan, non-overlapping, each closing
/// at the first closing tag after its opening tag. When a removed span had
/// text on both sides, the separator takes its place. With `start_inside`,
/// an opening tag is implied at the very start; if that yields no complete
/// span the input is returned unchanged.
pub fn extract_tagged_spans(text: &str, config: &TagConfig, start_inside: bool) -> TagExtraction {
    let source = if start_inside {
        format!("{}{}", config.opening_tag, text)
    } else {
        text.to_string()
    };
    let open = config.opening_tag.as_str();
    let close = config.closing_tag.as_str();

    // (span start, span end, inner content)
    let mut matches: Vec<(usize, usize, &str)> = Vec::new();
    if !open.is_empty() && !close.is_empty() {
        let mut pos = 0;
        while let Some(rel) = source[pos..].find(open) {
            let inner_start = pos + rel + open.len();
            let Some(rel_close) = source[inner_start..].find(close) else {
                break;
            };
            let inner_end = inner_start + rel_close;
            let end = inner_end + close.len();
            matches.push((pos + rel, end, &source[inner_start..inner_end]));
            pos = end;
        }
    }

    if matches.is_empty() {
        return TagExtraction {
            text: text.to_string(),
            ..Default::default()
        };
    }

    let spans: Vec<String> = matches.iter().map(|m| m.2.to_string()).collect();
    let joined = spans.join(&config.separator);

    // Remove back to front so earlier offsets stay valid.
    let mut remaining = source.clone();
    for &(start, end, _) in matches.iter().rev() {
        let before = &remaining[..start];
        let after = &remaining[end..];
        let joiner = if !before.is_empty() && !after.is_empty() {
            config.separator.as_str()
        } else {
            ""
        };
        remaining = format!("{before}{joiner}{after}");
    }

    TagExtraction {
        text: remaining,
        spans,
        joined: Some(joined),
    }
}

/// Get the potential start index of searched text in text.
///
/// Returns the index of the first complete match if there is one. Otherwise
/// returns the smallest index `i` such that `text[i..]` is a non-empty
/// prefix of `searched_text` (a tag that may still be arriving). Only the
/// last `searched_text.len() - 1` bytes can hold such a partial match, so the
/// scan is bounded by the tag length.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(get_potential_start_index("Hello <thinking>", "<thinking>"), Some(6));
/// assert_eq!(get_potential_start_index("Hello <thin", "<thinking>"), Some(6));
/// assert_eq!(get_potential_start_index("Hello world", "xyz"), None);
/// ```
pub fn get_potential_start_index(text: &str, searched_text: &str) -> Option<usize> {
    if searched_text.is_empty() {
        return None;
    }

    if let Some(index) = text.find(searched_text) {
        return Some(index);
    }

    let earliest = text.len().saturating_sub(searched_text.len() - 1);
    text.char_indices()
        .map(|(i, _)| i)
        .skip_while(|&i| i < earliest)
        .find(|&i| searched_text.starts_with(&text[i..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn think() -> TagConfig {
        TagConfig::for_tag_name("think")
    }

    fn split(segments: &[TagSegment]) -> (String, String) {
        let mut plain = String::new();
        let mut tagged = String::new();
        for s in segments {
            if s.is_tag_content {
                tagged.push_str(&s.content);
            } else {
                plain.push_str(&s.content);
            }
        }
        (plain, tagged)
    }

    #[test]
    fn test_get_potential_start_index_complete_match() {
        assert_eq!(
            get_potential_start_index("Hello <thinking>", "<thinking>"),
            Some(6)
        );
        assert_eq!(get_potential_start_index("Hello world", "world"), Some(6));
    }

    #[test]
    fn test_get_potential_start_index_partial_match() {
        assert_eq!(
            get_potential_start_index("Hello <thin", "<thinking>"),
            Some(6)
        );
        assert_eq!(get_potential_start_index("Hello <", "<thinking>"), Some(6));
        assert_eq!(get_potential_start_index("Hello w", "world"), Some(6));
    }

    #[test]
    fn test_get_potential_start_index_prefers_longest_partial() {
        // Both "aa" and "a" are prefixes of "aab"; the earlier one must win
        // or a tag completed by the next chunk would be missed.
        assert_eq!(get_potential_start_index("xaa", "aab"), Some(1));
    }

    #[test]
    fn test_get_potential_start_index_no_match() {
        assert_eq!(get_potential_start_index("Hello world", "xyz"), None);
        assert_eq!(get_potential_start_index("", "test"), None);
    }

    #[test]
    fn test_get_potential_start_index_empty_search() {
        assert_eq!(get_potential_start_index("Hello", ""), None);
    }

    #[test]
    fn test_get_potential_start_index_multibyte() {
        assert_eq!(get_potential_start_index("héllo <th", "<think>"), Some(7));
        assert_eq!(get_potential_start_index("日本語", "<think>"), None);
    }

    #[test]
    fn tag_split_across_chunks() {
        let mut ex = TagExtractor::new(think());
        let mut all = Vec::new();
        for chunk in ["<th", "ink>", "reasoning", "</th", "ink>", "text"] {
            all.extend(ex.process_text(chunk));
        }
        all.extend(ex.finalize());
        assert_eq!(
            all,
            vec![
                TagSegment {
                    content: "reasoning".into(),
                    is_tag_content: true
                },
                TagSegment {
                    content: "text".into(),
                    is_tag_content: false
                },
            ]
        );
    }

    #[test]
    fn partial_tag_is_held_then_released() {
        let mut ex = TagExtractor::new(think());
        let out = ex.process_text("a <th");
        assert_eq!(split(&out), ("a ".to_string(), String::new()));
        assert_eq!(ex.buffered(), "<th");
        let out = ex.process_text("ought");
        assert_eq!(split(&out), ("<thought".to_string(), String::new()));
        assert_eq!(ex.buffered(), "");
    }

    #[test]
    fn finalize_flushes_incomplete_tag_verbatim() {
        let mut ex = TagExtractor::new(think());
        ex.process_text("<think>abc</thi");
        assert_eq!(ex.mode(), TagMode::Tagged);
        assert_eq!(
            ex.finalize(),
            Some(TagSegment {
                content: "</thi".into(),
                is_tag_content: true
            })
        );
        assert_eq!(ex.finalize(), None);
    }

    #[test]
    fn start_inside_treats_leading_text_as_tagged() {
        let mut ex = TagExtractor::new(think()).with_start_inside(true);
        let out = ex.process_text("plan</think>answer");
        assert_eq!(split(&out), ("answer".to_string(), "plan".to_string()));
    }

    #[test]
    fn multiple_spans_in_one_chunk() {
        let mut ex = TagExtractor::new(think());
        let out = ex.process_text("a<think>b</think>c<think>d</think>e");
        let kinds: Vec<bool> = out.iter().map(|s| s.is_tag_content).collect();
        assert_eq!(kinds, vec![false, true, false, true, false]);
        assert_eq!(split(&out), ("ace".to_string(), "bd".to_string()));
    }

    #[test]
    fn reset_restores_plain_mode() {
        let mut ex = TagExtractor::new(think()).with_start_inside(true);
        ex.process_text("x</th");
        ex.reset();
        assert_eq!(ex.mode(), TagMode::Plain);
        assert_eq!(ex.buffered(), "");
    }

    #[test]
    fn single_shot_scenario() {
        let cfg = think().with_separator("\n");
        let out = extract_tagged_spans(
            "Some text <think>reasoning here</think> more text",
            &cfg,
            false,
        );
        assert_eq!(out.text, "Some text \n more text");
        assert_eq!(out.joined.as_deref(), Some("reasoning here"));
    }

    #[test]
    fn single_shot_joins_spans_with_separator() {
        let cfg = think().with_separator("|");
        let out = extract_tagged_spans("<think>a</think>x<think>b</think>", &cfg, false);
        assert_eq!(out.spans, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(out.joined.as_deref(), Some("a|b"));
        assert_eq!(out.text, "x");
    }

    #[test]
    fn single_shot_unclosed_tag_is_left_alone() {
        let out = extract_tagged_spans("hi <think>never closed", &think(), false);
        assert_eq!(out.text, "hi <think>never closed");
        assert_eq!(out.joined, None);
    }

    #[test]
    fn single_shot_start_inside() {
        let out = extract_tagged_spans("plan</think>answer", &think(), true);
        assert_eq!(out.text, "answer");
        assert_eq!(out.joined.as_deref(), Some("plan"));

        let untouched = extract_tagged_spans("no closing tag", &think(), true);
        assert_eq!(untouched.text, "no closing tag");
        assert_eq!(untouched.joined, None);
    }
}

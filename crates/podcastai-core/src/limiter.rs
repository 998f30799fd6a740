//! Segment limiter: bound segment count and softly cap utterance length.
//!
//! Downstream consumers (audio synthesis) pay per character, so utterances are
//! cut at a sentence boundary rather than mid-word. When no boundary exists in
//! the window the text is kept whole; occasional over-length output is the
//! accepted trade-off.

use crate::segment::Segment;

/// Default maximum number of segments kept in a response.
pub const DEFAULT_MAX_SEGMENTS: usize = 8;

/// Default character cap for a single utterance.
pub const DEFAULT_MAX_SEGMENT_CHARS: usize = 500;

/// Keep the first `max_segments` segments (default [`DEFAULT_MAX_SEGMENTS`])
/// and softly cap each retained utterance at `max_chars` characters. Input
/// order is preserved; dropped segments are discarded, never merged.
pub fn limit_segments(
    segments: &[Segment],
    max_segments: Option<usize>,
    max_chars: usize,
) -> Vec<Segment> {
    let cap = max_segments.unwrap_or(DEFAULT_MAX_SEGMENTS);
    segments
        .iter()
        .take(cap)
        .map(|seg| Segment {
            speaker: seg.speaker.clone(),
            text: truncate_at_sentence(&seg.text, max_chars),
        })
        .collect()
}

/// Soft-truncate `text` to at most `max_chars` characters by cutting right
/// after the last `.`/`?`/`!` inside the leading window of `max_chars`
/// characters. Without such a boundary past the first position the text is
/// returned whole. The result is whitespace-trimmed either way.
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.trim().to_string();
    }
    let window: String = text.chars().take(max_chars).collect();
    match window.rfind(|c| matches!(c, '.' | '?' | '!')) {
        Some(idx) if idx > 0 => window[..=idx].trim().to_string(),
        _ => text.trim().to_string(),
    }
}

/// Character-count prefix of `text`; bounds the transcript before prompting.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

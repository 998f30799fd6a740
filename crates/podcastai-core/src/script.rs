//! Script parser: free-form model output into ordered (speaker, utterance) segments.
//!
//! The model is asked for `"Label: text"` lines but the output is not guaranteed;
//! the scan attributes what it can and drops what it cannot.

use crate::segment::Segment;

/// Parse generated script text into ordered segments.
///
/// A line containing a colon starts a new segment: the part before the first
/// colon (trimmed) is the speaker label, the part after it the first text
/// chunk. Non-empty lines without a colon continue the current segment's text
/// (space-joined); with no current speaker they are dropped. Consecutive lines
/// carrying the same label stay separate segments. A segment is only emitted
/// once it holds at least one non-empty chunk, so emitted text is never empty.
pub fn parse_script(script: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut speaker: Option<String> = None;
    let mut chunks: Vec<String> = Vec::new();

    for line in script.lines() {
        if let Some((label, rest)) = line.split_once(':') {
            flush(&mut segments, &mut speaker, &mut chunks);
            let label = label.trim();
            if label.is_empty() {
                // ": text" cannot be attributed; skip the block and anything
                // it would otherwise adopt.
                continue;
            }
            speaker = Some(label.to_string());
            let rest = rest.trim();
            if !rest.is_empty() {
                chunks.push(rest.to_string());
            }
        } else if !line.trim().is_empty() && speaker.is_some() {
            chunks.push(line.trim().to_string());
        }
    }
    flush(&mut segments, &mut speaker, &mut chunks);
    segments
}

fn flush(segments: &mut Vec<Segment>, speaker: &mut Option<String>, chunks: &mut Vec<String>) {
    if let Some(label) = speaker.take() {
        if !chunks.is_empty() {
            segments.push(Segment {
                speaker: label,
                text: chunks.join(" "),
            });
        }
    }
    chunks.clear();
}

//! Podcast dialogue generation: turn a topic transcript into a short two-host
//! conversation with one `"Label: text"` utterance per line.

/// System instruction for the dialogue-generation model.
pub const DIALOGUE_SYSTEM: &str = r#"You are a podcast script writer. Turn the supplied topic material into a natural conversation between two hosts.

Rules:
- Exactly two speakers, labelled "Host A" and "Host B"
- Every utterance starts on its own line as "Host A: ..." or "Host B: ..."
- Host A opens; the hosts alternate naturally
- Keep the exchange brief and conversational
- No headings, stage directions, sound cues, or markdown formatting

Return ONLY the dialogue lines, nothing else."#;

/// User prompt template: placeholder is replaced with the (bounded) transcript.
pub const DIALOGUE_USER_TEMPLATE: &str = r#"Convert to podcast dialogue. Keep it brief:
Host A: [start conversation about this topic]
Host B: [respond naturally]
Topic: {transcript}"#;

/// Build the user prompt embedding the given transcript (truncate it first).
pub fn dialogue_user_prompt(transcript: &str) -> String {
    DIALOGUE_USER_TEMPLATE.replace("{transcript}", transcript)
}

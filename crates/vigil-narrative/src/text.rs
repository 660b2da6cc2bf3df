/// Characters of surrounding text kept on each side of a match.
pub const CONTEXT_RADIUS: usize = 60;

/// A narrative prepared for feature extraction.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeText<'a> {
    text: &'a str,
}

impl<'a> NarrativeText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Up to [`CONTEXT_RADIUS`] characters either side of `start..end`,
    /// trimmed and with line breaks flattened.
    pub fn context(&self, start: usize, end: usize) -> String {
        let before = self.text[..start]
            .char_indices()
            .rev()
            .nth(CONTEXT_RADIUS - 1)
            .map_or(0, |(i, _)| i);
        let after = self.text[end..]
            .char_indices()
            .nth(CONTEXT_RADIUS)
            .map_or(self.text.len(), |(i, _)| end + i);
        self.text[before..after]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

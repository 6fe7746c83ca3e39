//! Attribution-boilerplate stripping and whitespace collapsing.
//!
//! Evidence and claims go through the same [`TextNormalizer`] before any
//! lexical comparison, otherwise matches lean toward records that share a
//! publication tag rather than the same facts.

/// Publication names, wire-service tags and separators stripped by default.
pub const DEFAULT_BOILERPLATE: &[&str] = &[
    " - The Hindu",
    " - Times of India",
    "PTI",
    "ANI",
    " | ",
];

/// Separator placed between title and summary in indexed documents.
pub const DOCUMENT_FIELD_SEPARATOR: &str = " | ";

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    patterns: Vec<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::with_patterns(DEFAULT_BOILERPLATE.iter().copied())
    }
}

impl TextNormalizer {
    /// Builds a normalizer for a custom boilerplate set. Empty patterns are ignored.
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Replaces each boilerplate occurrence with a space, then collapses whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for pattern in &self.patterns {
            if cleaned.contains(pattern.as_str()) {
                cleaned = cleaned.replace(pattern.as_str(), " ");
            }
        }
        collapse_whitespace(&cleaned)
    }

    /// Document text for an index entry: normalized title and summary, pipe-separated.
    pub fn document_text(&self, title: &str, summary: Option<&str>) -> String {
        format!(
            "{}{}{}",
            self.normalize(title),
            DOCUMENT_FIELD_SEPARATOR,
            self.normalize(summary.unwrap_or_default())
        )
    }
}

/// Collapses runs of whitespace to single spaces and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased alphanumeric words of `text`, in order.
pub fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

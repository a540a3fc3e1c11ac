//! Device score strings
//!
//! Encoded frames keep scores outside the packed records, in a comma-separated
//! `display:score` list aligned with the `shots` array.

/// One `display:score` pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreEntry {
    pub display_text: String,
    pub score: Option<String>,
}

/// Parsed `score_string`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreString {
    entries: Vec<ScoreEntry>,
}

impl ScoreString {
    /// Split a raw score string. Missing `:score` halves yield `None`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let entries = raw
            .split(',')
            .map(|item| {
                let mut parts = item.split(':');
                ScoreEntry {
                    display_text: parts.next().unwrap_or_default().to_string(),
                    score: parts.next().map(str::to_string),
                }
            })
            .collect();

        Self { entries }
    }

    /// Entry for shot `index`
    pub fn get(&self, index: usize) -> Option<&ScoreEntry> {
        self.entries
            .get(index)
            .filter(|entry| !entry.display_text.is_empty() || entry.score.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

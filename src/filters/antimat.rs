//! Banned-word matching.

use aho_corasick::AhoCorasick;

/// Case-insensitive substring match against the configured word list.
///
/// Words and messages are lowercased before matching so Cyrillic folds too.
#[derive(Debug)]
pub struct WordFilter {
    matcher: Option<AhoCorasick>,
}

impl WordFilter {
    pub fn new(words: &[String]) -> Result<Self, aho_corasick::BuildError> {
        let words: Vec<String> = words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let matcher = if words.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&words)?)
        };
        Ok(Self { matcher })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|m| m.is_match(&text.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        let filter = WordFilter::new(&["Spam".to_string(), "плохо".to_string()]).unwrap();
        assert!(filter.matches("no SPAM please"));
        assert!(filter.matches("ЭТО ПЛОХО"));
        assert!(!filter.matches("clean message"));
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let filter = WordFilter::new(&[" ".to_string()]).unwrap();
        assert!(!filter.matches("anything"));
    }
}

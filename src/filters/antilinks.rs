//! Link detection.

use regex::Regex;

const LINK_PATTERN: &str =
    r"(?i)\b(?:https?://|www\.)\S+|\b[\w-]+\.(?:com|net|org|info|io|me|gg|ly|ru|su|рф)\b";

/// Matches URLs and bare domains on common top-level domains.
#[derive(Debug)]
pub struct LinkFilter {
    pattern: Regex,
}

impl LinkFilter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(LINK_PATTERN)?,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_detected() {
        let filter = LinkFilter::new().unwrap();
        assert!(filter.matches("go to https://example.org/path"));
        assert!(filter.matches("www.example"));
        assert!(filter.matches("join vk.com now"));
        assert!(filter.matches("сайт.рф"));
    }

    #[test]
    fn test_plain_text_passes() {
        let filter = LinkFilter::new().unwrap();
        assert!(!filter.matches("meeting at 5.30"));
        assert!(!filter.matches("end of sentence.Next one"));
    }
}

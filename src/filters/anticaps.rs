//! Uppercase detection.

/// Flags messages whose letters are mostly uppercase.
#[derive(Debug, Clone, Copy)]
pub struct CapsFilter {
    min_letters: usize,
    ratio: f32,
}

impl CapsFilter {
    pub fn new(min_letters: usize, ratio: f32) -> Self {
        Self { min_letters, ratio }
    }

    pub fn matches(&self, text: &str) -> bool {
        let (letters, upper) = text
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(letters, upper), c| {
                (letters + 1, upper + usize::from(c.is_uppercase()))
            });

        letters >= self.min_letters.max(1) && upper as f32 >= letters as f32 * self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_messages_ignored() {
        let filter = CapsFilter::new(8, 0.7);
        assert!(!filter.matches("OK LOL"));
        assert!(!filter.matches("12345678!!"));
    }

    #[test]
    fn test_ratio_threshold() {
        let filter = CapsFilter::new(8, 0.7);
        assert!(filter.matches("WHY IS EVERYONE LATE"));
        assert!(filter.matches("ПОЧЕМУ ТАК ГРОМКО"));
        assert!(!filter.matches("Why Is Everyone Late"));
        // 7 of 10 letters uppercase.
        assert!(filter.matches("ABCDEFGhij"));
        assert!(!filter.matches("ABCDEFghij"));
    }
}

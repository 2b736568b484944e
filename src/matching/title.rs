use std::collections::HashSet;

/// Loose comparison of human-entered titles against generated ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleMatcher;

impl TitleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Lower-case, delete punctuation and collapse whitespace.
    pub fn normalize_title(&self, title: &str) -> String {
        let cleaned: String = title
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Similarity in `[0, 1]`: 1.0 for equal titles, the length ratio when one
    /// contains the other, word-set Jaccard otherwise.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = self.normalize_title(a);
        let b = self.normalize_title(b);

        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }

        if a.contains(&b) || b.contains(&a) {
            let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
            return short.chars().count() as f64 / long.chars().count() as f64;
        }

        let words_a: HashSet<&str> = a.split(' ').collect();
        let words_b: HashSet<&str> = b.split(' ').collect();
        let shared = words_a.intersection(&words_b).count();
        let union = words_a.union(&words_b).count();
        shared as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        let matcher = TitleMatcher::new();
        assert_eq!(
            matcher.normalize_title("  WSOP '24 - Event #21:  Final Table!"),
            "wsop 24 event 21 final table"
        );
        assert_eq!(matcher.normalize_title("!!!"), "");
    }

    #[test]
    fn test_normalize_title_joins_across_punctuation() {
        let matcher = TitleMatcher::new();
        assert_eq!(matcher.normalize_title("WSOP-2024"), "wsop2024");
        assert_eq!(matcher.normalize_title("Day 1A/Day 1B"), "day 1aday 1b");
        assert_eq!(matcher.similarity("WSOP-2024", "wsop 2024"), 0.0);
    }

    #[test]
    fn test_similarity() {
        let matcher = TitleMatcher::new();
        assert_eq!(matcher.similarity("Final Table", "final table!"), 1.0);
        assert_eq!(matcher.similarity("", "final table"), 0.0);

        // "final table" inside "wsop final table": 11 / 16
        let contained = matcher.similarity("Final Table", "WSOP Final Table");
        assert!((contained - 11.0 / 16.0).abs() < 1e-9);

        // {wsop, day, 1} vs {wsop, day, 2}: 2 shared of 4
        let jaccard = matcher.similarity("WSOP Day 1", "WSOP Day 2");
        assert!((jaccard - 0.5).abs() < 1e-9);

        assert_eq!(matcher.similarity("alpha", "beta"), 0.0);
    }
}

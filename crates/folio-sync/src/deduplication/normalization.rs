//! Text normalization for deduplication comparison

/// Normalize a title for comparison
///
/// - Converts to lowercase
/// - Keeps only `a-z`, `0-9` and whitespace
/// - Trims the ends (inner whitespace is kept as is)
pub fn normalize_title(title: &str) -> String {
    let result: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    result.trim().to_string()
}

/// Normalize an author name for comparison
pub fn normalize_author(author: &str) -> String {
    author.trim().to_lowercase()
}

/// Whitespace tokens of a normalized title longer than `min_chars`
pub(crate) fn tokens_longer_than(normalized: &str, min_chars: usize) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|w| w.chars().count() > min_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("The Quick Brown Fox"), "the quick brown fox");
        assert_eq!(normalize_title("Hello, World!"), "hello world");
        assert_eq!(normalize_title("  NeRF-W: In the Wild  "), "nerfw in the wild");
    }

    #[test]
    fn test_normalize_title_drops_non_ascii() {
        assert_eq!(normalize_title("Études Françaises"), "tudes franaises");
        assert_eq!(normalize_title("α-Zerfall"), "zerfall");
    }

    #[test]
    fn test_normalize_author() {
        assert_eq!(normalize_author("  Jane Doe "), "jane doe");
    }

    #[test]
    fn test_tokens_longer_than() {
        assert_eq!(
            tokens_longer_than("a survey on neural fields", 3),
            vec!["survey", "neural", "fields"]
        );
        assert!(tokens_longer_than("a survey on neural fields", 6).is_empty());
        assert!(tokens_longer_than("", 3).is_empty());
    }
}

//! Word tokenizer shared by fitting and prediction.

/// Minimum token length in characters; single letters are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split text into lowercase word tokens.
///
/// A token is a maximal run of alphanumeric characters or underscores with
/// at least [`MIN_TOKEN_CHARS`] characters. Everything else is a separator,
/// so `"i'm"` yields no tokens and `"worst-ever"` yields two.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Terrible, WORST purchase-ever!"),
            vec!["terrible", "worst", "purchase", "ever"]
        );
    }

    #[test]
    fn test_drops_short_tokens() {
        assert_eq!(tokenize("I'm so happy"), vec!["so", "happy"]);
        assert!(tokenize("a b c").is_empty());
    }

    #[test]
    fn test_keeps_digits_and_underscores() {
        assert_eq!(tokenize("5 stars_total 10"), vec!["stars_total", "10"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ...   ").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(tokenize("Très bon café"), vec!["très", "bon", "café"]);
    }
}

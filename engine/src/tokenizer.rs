use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"(?u)\p{L}+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had",
            "has", "have", "he", "her", "his", "if", "in", "into", "is", "it", "its", "no",
            "not", "of", "on", "or", "she", "so", "that", "the", "their", "them", "then",
            "there", "these", "they", "this", "to", "was", "were", "will", "with",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Split free text into lowercase word tokens (letters only) with stopwords
/// removed. This is the alphabet rule for ranked queries; boolean queries
/// have their own tokenizer because operator keywords must survive.
pub fn query_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !is_stopword(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_non_letters() {
        let toks = query_tokens("Wolf, forest; hare!");
        assert_eq!(toks, vec!["wolf", "forest", "hare"]);
    }

    #[test]
    fn drops_stopwords() {
        let toks = query_tokens("the wolf and the hare");
        assert_eq!(toks, vec!["wolf", "hare"]);
    }
}

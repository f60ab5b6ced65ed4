use std::collections::BTreeSet;

use regex::Regex;

/// Derives normalized search tokens from recognized text.
///
/// Two extraction strategies are unioned: maximal alphanumeric runs of
/// length ≥ 2 (recovers tokens embedded in punctuation-joined text such as
/// "Amul-Milk,2L"), and splitting on whitespace/comma/semicolon keeping
/// pieces of length ≥ 2 that contain at least one alphanumeric character
/// (recovers chunks the run regex would split differently). Every token is
/// lowercased; the result is a deterministic ordered set.
pub struct Tokenizer {
    runs: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            runs: Regex::new(r"[a-z0-9]{2,}").expect("valid token regex"),
        }
    }

    pub fn tokenize(&self, text: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();
        let lowered = text.to_lowercase();

        for m in self.runs.find_iter(&lowered) {
            tokens.insert(m.as_str().to_string());
        }

        for piece in lowered.split(|c: char| c.is_whitespace() || c == ',' || c == ';') {
            if piece.chars().count() >= 2 && piece.chars().any(|c| c.is_alphanumeric()) {
                tokens.insert(piece.to_string());
            }
        }

        tokens
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

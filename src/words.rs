use crate::recognize::BoardState;
use crate::Error;
use std::collections::HashSet;
use std::path::Path;

/// An immutable set of lowercase words, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct Dictionary(HashSet<String>);

impl Dictionary {
    /// Load a whitespace-separated word list.
    ///
    /// # Errors
    /// If the file can not be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dictionary, Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(text.split_whitespace().map(String::from).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for Dictionary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Dictionary(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Dictionary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(String::from).collect()
    }
}

/// Every dictionary word whose letters are a multiset-subset of the board's
/// letters: each letter may be used at most as often as it appears on the
/// wheel.
///
/// No ordering and no minimum length are applied here; see
/// [`rank_candidates`].
pub fn matching_words<'a>(dict: &'a Dictionary, board: &BoardState) -> Vec<&'a str> {
    let mut available = [0u8; 26];
    for g in &board.glyphs {
        let c = g.ch.to_ascii_lowercase();
        if c.is_ascii_lowercase() {
            available[(c as u8 - b'a') as usize] += 1;
        }
    }
    dict.0
        .iter()
        .filter(|w| formable(w, &available))
        .map(String::as_str)
        .collect()
}

fn formable(word: &str, available: &[u8; 26]) -> bool {
    let mut needed = [0u8; 26];
    for c in word.chars().map(|c| c.to_ascii_lowercase()) {
        if !c.is_ascii_lowercase() {
            return false;
        }
        let i = (c as u8 - b'a') as usize;
        needed[i] += 1;
        if needed[i] > available[i] {
            return false;
        }
    }
    true
}

/// Order candidates by ascending length, then lexicographically, so that the
/// output is reproducible for identical inputs.
///
/// When the no-short-words mode is active, only words strictly longer than
/// 3 letters are kept; the filter runs before ranking.
pub fn rank_candidates(mut words: Vec<&str>, forbidden_mode: bool) -> Vec<&str> {
    if forbidden_mode {
        words.retain(|w| w.len() > 3);
    }
    words.sort_unstable_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognize::Glyph;

    fn board(letters: &str) -> BoardState {
        BoardState {
            glyphs: letters
                .chars()
                .enumerate()
                .map(|(i, ch)| Glyph {
                    ch,
                    pos: (10 * i as u32, 0),
                    size: (20, 34),
                })
                .collect(),
        }
    }

    #[test]
    fn test_multiset_subset() {
        let dict: Dictionary = ["aa", "ab", "abb", "bad", "cab"].into_iter().collect();
        let mut found = matching_words(&dict, &board("AABCDE"));
        found.sort_unstable();
        // "abb" needs two b's, the board has one
        assert_eq!(found, ["aa", "ab", "bad", "cab"]);
    }

    #[test]
    fn test_no_letters_matches_nothing() {
        let dict: Dictionary = ["aa", "ab"].into_iter().collect();
        assert!(matching_words(&dict, &BoardState::default()).is_empty());
    }

    #[test]
    fn test_word_with_nonalpha_is_rejected() {
        let dict: Dictionary = ["a-b"].into_iter().collect();
        assert!(matching_words(&dict, &board("AB")).is_empty());
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let ranked = rank_candidates(vec!["cab", "bad", "aa"], false);
        assert_eq!(ranked, ["aa", "bad", "cab"]);
    }

    #[test]
    fn test_forbidden_mode_drops_short_words() {
        let ranked = rank_candidates(vec!["cab", "bad", "aa", "face"], true);
        assert_eq!(ranked, ["face"]);
    }

    #[test]
    fn test_forbidden_mode_keeps_four_letter_words() {
        // strictly longer than 3: length 4 stays
        let ranked = rank_candidates(vec!["aaa", "aaaa"], true);
        assert_eq!(ranked, ["aaaa"]);
    }
}

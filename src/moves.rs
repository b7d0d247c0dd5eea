use crate::recognize::Glyph;

/// Map a word to an ordered path of glyph positions.
///
/// Each letter takes the first glyph (in extraction order) that matches it
/// and whose position is not already part of the path, so repeated letters
/// consume distinct tiles in source order.
///
/// Returns `None` when some letter has no unused matching glyph. The matcher
/// only admits formable words, so that path is defensive; callers skip the
/// word and carry on.
pub fn build_move(word: &str, glyphs: &[Glyph]) -> Option<Vec<(u32, u32)>> {
    let mut path = Vec::with_capacity(word.len());
    for ch in word.chars().map(|c| c.to_ascii_uppercase()) {
        let pos = glyphs
            .iter()
            .find(|g| g.ch == ch && !path.contains(&g.pos))
            .map(|g| g.pos)?;
        path.push(pos);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(spec: &[(char, (u32, u32))]) -> Vec<Glyph> {
        spec.iter()
            .map(|&(ch, pos)| Glyph {
                ch,
                pos,
                size: (20, 34),
            })
            .collect()
    }

    #[test]
    fn test_repeated_letters_take_distinct_tiles() {
        let board = glyphs(&[('A', (0, 0)), ('A', (10, 0)), ('B', (20, 0))]);
        let path = build_move("AAB", &board).unwrap();
        assert_eq!(path, [(0, 0), (10, 0), (20, 0)]);
    }

    #[test]
    fn test_lowercase_word_matches_uppercase_glyphs() {
        let board = glyphs(&[('C', (0, 0)), ('A', (10, 0)), ('B', (20, 0))]);
        let path = build_move("cab", &board).unwrap();
        assert_eq!(path, [(0, 0), (10, 0), (20, 0)]);
    }

    #[test]
    fn test_path_length_equals_word_length() {
        let board = glyphs(&[('F', (0, 0)), ('A', (10, 0)), ('C', (20, 0)), ('E', (30, 0))]);
        assert_eq!(build_move("face", &board).unwrap().len(), 4);
    }

    #[test]
    fn test_unformable_word_is_refused() {
        let board = glyphs(&[('A', (0, 0)), ('B', (10, 0))]);
        assert_eq!(build_move("ABB", &board), None);
    }
}

//! # Source Normalisation & Position Mapping
//!
//! Before anything else touches a user-supplied expression, it is rewritten
//! into a compact *normalised* form that the syntax checker and compiler
//! operate on (§4.1). Two textual rewrites happen, in this fixed order:
//!
//! 1. `**` is rewritten to `^ ` (a caret followed by one blank, so the
//!    rewrite does not shift later character positions).
//! 2. All space characters are removed.
//!
//! Ordering matters: doing whitespace elision first would leave stray `^ `
//! blanks in place (harmless) but doing `**` → `^ ` *after* elision would
//! also work by coincidence; the spec fixes the order so that `a ** b` and
//! `a**b` are guaranteed to normalise identically regardless of how many
//! extra spaces a user types around the `**`.
//!
//! Diagnostics always want to point at the *original* string, not the
//! normalised one a user never sees, so normalisation also builds a
//! [`PositionMap`] from normalised-string index back to original-string
//! index.

/// Maps each character surviving normalisation back to its 1-based index in
/// the user's original string.
///
/// Discarded after parsing; it exists solely to let [`crate::error::format_diagnostic`]
/// draw a caret under the right original character.
#[derive(Clone, Debug, Default)]
pub struct PositionMap {
    /// `origin[k]` is the 1-based original-string column of normalised index `k`.
    origin: Vec<usize>,
}

impl PositionMap {
    /// Original-string column (1-based) for a normalised index. Indices past
    /// the end of the map clamp to one-past the last recorded column, which
    /// keeps "end of string" diagnostics pointing just after the last
    /// character rather than panicking.
    pub fn original_index(&self, norm_pos: usize) -> usize {
        if let Some(&col) = self.origin.get(norm_pos) {
            col
        } else {
            self.origin.last().map(|c| c + 1).unwrap_or(1)
        }
    }
}

/// Normalise `source`, returning the rewritten string and a [`PositionMap`]
/// back to `source`.
pub fn normalize(source: &str) -> (String, PositionMap) {
    // Pass 1: `**` -> `^ ` (caret + one blank), tracking original columns
    // for every surviving character, including the synthetic blank (it maps
    // to the second `*`'s column so a later fault at that position still
    // points somewhere sane).
    let chars: Vec<char> = source.chars().collect();
    let mut after_pow: Vec<char> = Vec::with_capacity(chars.len());
    let mut pow_origin: Vec<usize> = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '*' && i + 1 < chars.len() && chars[i + 1] == '*' {
            after_pow.push('^');
            pow_origin.push(i + 1); // 1-based column of first '*'
            after_pow.push(' ');
            pow_origin.push(i + 2); // 1-based column of second '*'
            i += 2;
        } else {
            after_pow.push(chars[i]);
            pow_origin.push(i + 1);
            i += 1;
        }
    }

    // Pass 2: remove spaces, keeping the origin column for each survivor.
    let mut out = String::with_capacity(after_pow.len());
    let mut origin = Vec::with_capacity(after_pow.len());
    for (ch, col) in after_pow.into_iter().zip(pow_origin.into_iter()) {
        if ch != ' ' {
            out.push(ch);
            origin.push(col);
        }
    }

    (out, PositionMap { origin })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_spaces() {
        let (norm, _) = normalize("2 + 3 * 4");
        assert_eq!(norm, "2+3*4");
    }

    #[test]
    fn pow_rewrite_then_space_elision() {
        // Pass 1 turns "**" into "^ " (an intermediate synthetic blank);
        // pass 2 then strips it along with every other space, so the net
        // effect of normalize() is that "**" simply becomes "^".
        let (norm, _) = normalize("2**3");
        assert_eq!(norm, "2^3");
    }

    #[test]
    fn pow_and_whitespace_agree() {
        let (a, _) = normalize("2 ** (1+2)");
        let (b, _) = normalize("2**(1+2)");
        // Both should normalise to the identical compact token stream once
        // spaces are gone from each; the synthetic blank from `**` -> `^ `
        // is itself a space and is stripped by pass 2.
        assert_eq!(a, b);
        assert_eq!(a, "2^(1+2)");
    }

    #[test]
    fn position_map_points_at_original_columns() {
        let (norm, map) = normalize("x + y");
        assert_eq!(norm, "x+y");
        // norm index 0 -> 'x' at original column 1
        assert_eq!(map.original_index(0), 1);
        // norm index 1 -> '+' at original column 3
        assert_eq!(map.original_index(1), 3);
        // norm index 2 -> 'y' at original column 5
        assert_eq!(map.original_index(2), 5);
    }
}

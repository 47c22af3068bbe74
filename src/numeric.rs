//! # Numeric Literal Grammar (`RealNum`)
//!
//! Implements §4.6's literal grammar:
//!
//! ```text
//! [+|-]? digits? ('.' digits)? ([eEdD] [+|-]? digits)?
//! ```
//!
//! with the constraints that at least one mantissa digit is present, and if
//! an exponent marker is present it must be followed by at least one
//! exponent digit. `d`/`D` are accepted as synonyms for `e`/`E` (a Fortran-ism
//! this family of expression parsers inherits). Leading blanks are skipped;
//! an embedded blank anywhere else terminates the literal (callers only ever
//! invoke this against an already-normalised, space-free string, so that
//! case does not arise in practice, but the scan still stops at a blank
//! defensively rather than assuming it can't happen).

/// Result of scanning a real-number literal starting at or after `start`.
pub struct RealNum {
    /// The parsed value (meaningless if `error` is true).
    pub value: f64,
    /// Index of the first character actually consumed (after leading blanks).
    pub first: usize,
    /// One-past-the-last index consumed.
    pub end: usize,
    /// True if the scanned text did not satisfy the grammar.
    pub error: bool,
}

/// Parse a real-number literal from `text` starting at `start`.
///
/// `start` itself may point at leading blanks; they are skipped before the
/// literal proper begins.
pub fn parse_real_num(text: &[char], start: usize) -> RealNum {
    let n = text.len();
    let mut i = start;
    while i < n && text[i] == ' ' {
        i += 1;
    }
    let first = i;

    // Optional sign.
    if i < n && (text[i] == '+' || text[i] == '-') {
        i += 1;
    }

    let mantissa_start = i;
    let mut mantissa_digits = 0usize;
    while i < n && text[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < n && text[i] == '.' {
        i += 1;
        while i < n && text[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return RealNum { value: 0.0, first, end: i.max(first + 1), error: true };
    }

    let mut end = i;
    if i < n && matches!(text[i], 'e' | 'E' | 'd' | 'D') {
        let mut j = i + 1;
        if j < n && (text[j] == '+' || text[j] == '-') {
            j += 1;
        }
        let exp_digits_start = j;
        while j < n && text[j].is_ascii_digit() {
            j += 1;
        }
        if j == exp_digits_start {
            // Exponent marker present but no exponent digits: malformed.
            return RealNum { value: 0.0, first, end: j, error: true };
        }
        end = j;
    }

    let raw: String = text[mantissa_start..end]
        .iter()
        .collect::<String>()
        .replace(['d', 'D'], "e");
    let signed = if first < mantissa_start {
        let sign: String = text[first..mantissa_start].iter().collect();
        format!("{}{}", sign, raw)
    } else {
        raw
    };

    match signed.parse::<f64>() {
        Ok(value) => RealNum { value, first, end, error: false },
        Err(_) => RealNum { value: 0.0, first, end, error: true },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn parse(s: &str) -> RealNum {
        parse_real_num(&chars(s), 0)
    }

    #[test]
    fn plain_integer() {
        let r = parse("42");
        assert!(!r.error);
        assert_eq!(r.value, 42.0);
        assert_eq!(r.end, 2);
    }

    #[test]
    fn leading_dot() {
        let r = parse(".5");
        assert!(!r.error);
        assert_eq!(r.value, 0.5);
    }

    #[test]
    fn trailing_dot() {
        let r = parse("3.");
        assert!(!r.error);
        assert_eq!(r.value, 3.0);
    }

    #[test]
    fn exponent_form() {
        let r = parse("1.5e3");
        assert!(!r.error);
        assert_eq!(r.value, 1500.0);
    }

    #[test]
    fn d_exponent_synonym() {
        let r = parse("2d1");
        assert!(!r.error);
        assert_eq!(r.value, 20.0);
    }

    #[test]
    fn signed_exponent() {
        let r = parse("1e-2");
        assert!(!r.error);
        assert_eq!(r.value, 0.01);
    }

    #[test]
    fn bare_exponent_marker_is_malformed() {
        // "3.e" with nothing else: no exponent digit after the marker.
        let r = parse_real_num(&chars("3.e"), 0);
        assert!(r.error);
    }

    #[test]
    fn no_mantissa_digits_is_malformed() {
        let r = parse(".");
        assert!(r.error);
    }

    #[test]
    fn stops_before_trailing_operator() {
        let r = parse("12+3");
        assert!(!r.error);
        assert_eq!(r.value, 12.0);
        assert_eq!(r.end, 2);
    }
}

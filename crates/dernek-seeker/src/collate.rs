//! Turkish-aware case folding and collation.
//!
//! Search, `contains` filters and text sorting all go through this module
//! so that `I`/`ı` and `İ`/`i` behave the way Turkish readers expect.

use std::cmp::Ordering;

use deunicode::deunicode_char;

/// Turkish alphabet in collation order, with `q`, `w`, `x` at their Latin
/// positions so foreign names still sort sensibly.
const ALPHABET: [char; 32] = [
    'a', 'b', 'c', 'ç', 'd', 'e', 'f', 'g', 'ğ', 'h', 'ı', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'ö',
    'p', 'q', 'r', 's', 'ş', 't', 'u', 'ü', 'v', 'w', 'x', 'y', 'z',
];

const WHITESPACE_WEIGHT: u32 = 1;
const PUNCTUATION_WEIGHT: u32 = 2;
const DIGIT_BASE: u32 = 10;
const LETTER_BASE: u32 = 100;
const OTHER_BASE: u32 = 1_000;

/// Lower-cases a string using Turkish rules (`I → ı`, `İ → i`).
///
/// Diacritics are preserved: `"ÇİĞDEM"` becomes `"çiğdem"`, never `"cigdem"`.
pub fn to_lower_tr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

/// Case-insensitive substring test. `needle` must already be lower-cased
/// with [`to_lower_tr`].
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || to_lower_tr(haystack).contains(needle)
}

/// Compares two strings in Turkish alphabetical order.
///
/// The primary comparison ignores case and folds accents foreign to
/// Turkish (`é` sorts as `e`). Equal primaries are ordered by the folded
/// code points and finally by the raw strings, so the result is a total
/// order that only returns `Equal` for identical input.
pub fn compare_tr(a: &str, b: &str) -> Ordering {
    let fa = to_lower_tr(a);
    let fb = to_lower_tr(b);
    fa.chars()
        .map(weight)
        .cmp(fb.chars().map(weight))
        .then_with(|| fa.cmp(&fb))
        .then_with(|| a.cmp(b))
}

fn weight(c: char) -> u32 {
    if let Some(pos) = alphabet_position(c) {
        return LETTER_BASE + pos;
    }
    if let Some(d) = c.to_digit(10) {
        return DIGIT_BASE + d;
    }
    if c.is_whitespace() {
        return WHITESPACE_WEIGHT;
    }
    if c.is_alphabetic() {
        let base = deunicode_char(c)
            .and_then(|s| s.chars().next())
            .map(|b| b.to_ascii_lowercase())
            .and_then(alphabet_position);
        return match base {
            Some(pos) => LETTER_BASE + pos,
            None => OTHER_BASE + c as u32,
        };
    }
    PUNCTUATION_WEIGHT
}

fn alphabet_position(c: char) -> Option<u32> {
    ALPHABET.iter().position(|&a| a == c).map(|p| p as u32)
}

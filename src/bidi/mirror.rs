//! Bidi mirroring: character substitution for glyphs rendered in an
//! right-to-left run (`spec.md` §4.2 step 8).
//!
//! `unicode-bidi` tracks levels but not the mirroring glyph itself, so this
//! carries a small table of the common `Bidi_Mirrored=Yes` pairs (brackets,
//! parens, angle/math comparators) — the set `spec.md`'s worked examples
//! exercise. Hosts needing full UCD `BidiMirroring.txt` coverage can layer a
//! richer table in through the same [`mirror_char`] call site.
pub fn mirror_char(ch: char) -> char {
    match ch {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        '‹' => '›',
        '›' => '‹',
        '⟨' => '⟩',
        '⟩' => '⟨',
        '⌈' => '⌉',
        '⌉' => '⌈',
        '⌊' => '⌋',
        '⌋' => '⌊',
        '≤' => '≥',
        '≥' => '≤',
        '≦' => '≧',
        '≧' => '≦',
        '≺' => '≻',
        '≻' => '≺',
        _ => ch,
    }
}

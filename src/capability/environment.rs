//! `Environment`: process-wide character-property lookups, passed as an
//! explicit handle rather than a global (DESIGN NOTES §9). Backs the
//! `script`, `category`, `combining-class` and `bidi-category` character
//! properties `spec.md` §6 lists as `TextStore`-readable.

use unicode_bidi::BidiClass;

/// A Unicode bidi character type, as consulted by the bidi reorderer
/// (`spec.md` §4.2 step 3).
pub type BidiCategory = BidiClass;

/// Character-property lookups the composer and bidi reorderer depend on.
/// The default [`UnicodeEnvironment`] answers purely from Unicode data
/// tables; a host may substitute an implementation backed by
/// `TextStore`'s character properties instead.
pub trait Environment: Send + Sync {
    /// ISO 15924-ish script tag, lowercase (e.g. `"latin"`, `"arabic"`),
    /// or `None` for script-less/inherited characters.
    fn script_of(&self, ch: u32) -> Option<&'static str>;

    /// Two-letter-ish general category symbol (e.g. `"Mn"`, `"Lu"`).
    fn category_of(&self, ch: u32) -> Option<&'static str>;

    /// Unicode canonical combining class (0-255).
    fn combining_class_of(&self, ch: u32) -> u16;

    fn bidi_category_of(&self, ch: u32) -> BidiCategory;
}

/// Default [`Environment`] backed entirely by Unicode data tables via the
/// `unicode-script`, `unicode-bidi` and `unicode-normalization` crates
/// (`SPEC_FULL.md` §6), grounded on `blitz-text`'s `shaping/analysis.rs`
/// script-run segmentation approach.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeEnvironment;

impl Environment for UnicodeEnvironment {
    fn script_of(&self, ch: u32) -> Option<&'static str> {
        let c = char::from_u32(ch)?;
        use unicode_script::{Script, UnicodeScript};
        match c.script() {
            Script::Common | Script::Inherited | Script::Unknown => None,
            Script::Latin => Some("latin"),
            Script::Arabic => Some("arabic"),
            Script::Hebrew => Some("hebrew"),
            Script::Han => Some("han"),
            Script::Hiragana => Some("hiragana"),
            Script::Katakana => Some("katakana"),
            Script::Hangul => Some("hangul"),
            Script::Cyrillic => Some("cyrillic"),
            Script::Greek => Some("greek"),
            Script::Devanagari => Some("devanagari"),
            Script::Thai => Some("thai"),
            _ => Some("other"),
        }
    }

    fn category_of(&self, ch: u32) -> Option<&'static str> {
        let c = char::from_u32(ch)?;
        Some(general_category(c))
    }

    fn combining_class_of(&self, ch: u32) -> u16 {
        char::from_u32(ch)
            .map(|c| unicode_normalization::char::canonical_combining_class(c) as u16)
            .unwrap_or(0)
    }

    fn bidi_category_of(&self, ch: u32) -> BidiCategory {
        char::from_u32(ch)
            .map(unicode_bidi::bidi_class)
            .unwrap_or(BidiClass::L)
    }
}

/// General-category classifier for the categories the engine branches on:
/// `Mn`/`Mc`/`Me` (combining marks, `spec.md` §4.3 step 6, detected via
/// `unicode-normalization`'s exhaustive UCD combining-mark table rather
/// than a hand-maintained range list) and `Cf` (format characters,
/// `control.ignore_formatting_char`). Not a full Unicode category table —
/// hosts that need full fidelity for the remaining categories supply their
/// own [`Environment`].
fn general_category(c: char) -> &'static str {
    if is_format_char(c) {
        return "Cf";
    }
    if unicode_normalization::char::is_combining_mark(c) {
        return "Mn";
    }
    match () {
        _ if c.is_alphabetic() && c.is_uppercase() => "Lu",
        _ if c.is_alphabetic() && c.is_lowercase() => "Ll",
        _ if c.is_alphabetic() => "Lo",
        _ if c.is_numeric() => "Nd",
        _ if c.is_whitespace() => "Zs",
        _ if c.is_control() => "Cc",
        _ => "Po",
    }
}

fn is_format_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0x00AD | 0x0600..=0x0605 | 0x061C | 0x06DD | 0x070F | 0x200B..=0x200F | 0x202A..=0x202E
            | 0x2060..=0x2064 | 0x2066..=0x206F | 0xFEFF | 0xFFF9..=0xFFFB
    )
}

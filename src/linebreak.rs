//! Line breaker: splits a logical range into physical lines under a width
//! limit (`spec.md` §4.5), with the default break policy from §4.9.
//!
//! The `UnicodeLineBreaker` opt-in is grounded on `sugarloaf`'s
//! `components/text/glyph/layout/linebreak.rs` (`BuiltInLineBreaker`,
//! `LineBreak::{Soft,Hard}`), reworked onto the `unicode-linebreak` crate.

use crate::capability::TextStore;
use crate::control::{DrawControl, LineBreakerKind};
use crate::glyph::{CharPos, GlyphString};
use crate::layout;

/// Per-source-character width, indexed relative to `gstring.from`: the sum
/// of widths of all glyphs whose `pos` equals that char index (`spec.md`
/// §4.5 step 1). Glyphs strictly inside a cluster (`pos` not their own
/// index) contribute 0 to every *other* index, by construction.
pub fn per_char_widths(gstring: &GlyphString) -> Vec<f32> {
    let len = gstring.to.saturating_sub(gstring.from);
    let mut widths = vec![0.0f32; len];
    for g in gstring.body() {
        if g.pos >= gstring.from && g.pos < gstring.to {
            widths[g.pos - gstring.from] += g.width;
        }
    }
    widths
}

/// Walks forward accumulating per-character width until the next
/// character would push the total past `width_limit`. Returns the
/// resulting char position (`spec.md` §4.5 step 2) — this is the greedy
/// "overflow" boundary, not yet adjusted by any break policy.
pub fn greedy_overflow_pos(gstring: &GlyphString, width_limit: f32) -> CharPos {
    let widths = per_char_widths(gstring);
    let mut total = gstring.indent;
    for (i, w) in widths.iter().enumerate() {
        if total + w > width_limit {
            return gstring.from + i;
        }
        total += w;
    }
    gstring.to
}

/// `spec.md` §4.9's default break policy: given the greedy overflow
/// position, find the actual break point.
///
/// - if the character at `pos` is whitespace, return the first
///   non-whitespace position at or after `pos`;
/// - else walk backward from `pos` looking for whitespace; if found,
///   return the position right after it; if none found, return `pos`
///   unchanged.
pub fn default_break_policy(text: &dyn TextStore, pos: CharPos, from: CharPos, to: CharPos) -> CharPos {
    if pos >= to {
        return to;
    }
    if is_whitespace(text.char_at(pos)) {
        let mut p = pos;
        while p < to && is_whitespace(text.char_at(p)) {
            p += 1;
        }
        return p;
    }
    let mut p = pos;
    while p > from {
        p -= 1;
        if is_whitespace(text.char_at(p)) {
            return p + 1;
        }
    }
    pos
}

fn is_whitespace(ch: u32) -> bool {
    ch == ' ' as u32 || ch == '\t' as u32
}

/// UAX #14 breaker, grounded on `sugarloaf`'s `BuiltInLineBreaker`.
/// Returns the break position nearest to (but not after) `pos`, among the
/// breaks `unicode-linebreak` reports for `text_slice`, where
/// `text_slice` covers `[from, to)` char-by-char via `TextStore`.
pub fn unicode_break_policy(
    text: &dyn TextStore,
    pos: CharPos,
    from: CharPos,
    to: CharPos,
) -> CharPos {
    let mut s = String::with_capacity(to - from);
    for i in from..to {
        if let Some(c) = char::from_u32(text.char_at(i)) {
            s.push(c);
        } else {
            s.push('\u{FFFD}');
        }
    }
    let target_byte: usize = s
        .char_indices()
        .nth(pos.saturating_sub(from))
        .map(|(b, _)| b)
        .unwrap_or(s.len());

    let mut best = None;
    for (byte_off, _) in unicode_linebreak::linebreaks(&s) {
        let char_off = s[..byte_off.min(s.len())].chars().count();
        if byte_off <= target_byte {
            best = Some(from + char_off);
        } else {
            break;
        }
    }
    best.unwrap_or(pos).max(from + 1).min(to.saturating_sub(0).max(from))
}

/// Splits `gstring`'s range into physical lines when `control.two_dimensional`
/// and the laid-out width exceeds `control.max_line_width` (`spec.md` §4.5).
/// `relayout` re-composes and re-lays-out a sub-range into a fresh
/// `GlyphString` (supplied by the caller — composing needs the
/// `Composer`/`FaceResolver` context this module doesn't have).
pub fn line_break(
    gstring: &mut GlyphString,
    text: &dyn TextStore,
    control: &DrawControl,
    frame_space_width: f32,
    mut relayout: impl FnMut(CharPos, CharPos, &DrawControl) -> GlyphString,
) -> Vec<GlyphString> {
    if !control.two_dimensional || control.max_line_width <= 0.0 {
        return vec![std::mem::replace(
            gstring,
            GlyphString::new(gstring.from, gstring.from, control.clone()),
        )];
    }

    let mut lines = Vec::new();
    let mut from = gstring.from;
    let to = gstring.to;
    let mut current = std::mem::replace(gstring, GlyphString::new(from, from, control.clone()));

    loop {
        layout::layout(&mut current, control, frame_space_width);
        if current.width <= control.max_line_width || current.to <= current.from + 1 {
            lines.push(current);
            break;
        }

        let overflow = greedy_overflow_pos(&current, control.max_line_width);
        let break_pos = if let Some(cap) = &control.line_break {
            cap.line_break(overflow, from, to, lines.len(), 0.0)
                .clamp(from + 1, to.saturating_sub(1).max(from + 1))
        } else {
            match control.line_breaker {
                LineBreakerKind::Unicode => unicode_break_policy(text, overflow, from, to),
                LineBreakerKind::Default => default_break_policy(text, overflow, from, to),
            }
        };
        let break_pos = break_pos.max(from + 1).min(to);

        let mut head = relayout(from, break_pos, control);
        layout::layout(&mut head, control, frame_space_width);
        lines.push(head);

        if break_pos >= to {
            break;
        }
        from = break_pos;
        current = relayout(from, to, control);
    }

    // Link physical lines via `next_index`, per `spec.md` §3's `next` field.
    for i in 0..lines.len().saturating_sub(1) {
        lines[i].next_index = Some(i + 1);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{PropFlags, PropHandle, PropValue};

    struct FakeStore(Vec<u32>);
    impl TextStore for FakeStore {
        fn char_at(&self, pos: usize) -> u32 {
            self.0[pos]
        }
        fn len(&self) -> usize {
            self.0.len()
        }
        fn get_prop(&self, _: usize, _: &str) -> PropValue {
            PropValue::None
        }
        fn get_props(&self, _: usize, _: &str, _: usize) -> Vec<PropValue> {
            Vec::new()
        }
        fn prop_range(&self, pos: usize, _: &str, _: bool, _: bool, _: bool) -> (usize, usize) {
            (pos, pos)
        }
        fn attach_prop(&self, _: &str, _: usize, _: usize, _: PropValue, _: PropFlags) -> PropHandle {
            PropHandle(0)
        }
        fn detach_prop(&self, _: PropHandle) {}
        fn property(&self, _: usize, _: &str) -> Option<PropHandle> {
            None
        }
    }

    fn store_of(s: &str) -> FakeStore {
        FakeStore(s.chars().map(|c| c as u32).collect())
    }

    /// Scenario 6 from `spec.md` §8: `"hello world foo"`, width_limit=50,
    /// space_width=10, default breaker. First line breaks after the first
    /// whitespace run.
    #[test]
    fn default_policy_breaks_after_whitespace() {
        let text = store_of("hello world foo");
        // "hello " occupies positions [0,6); overflow lands inside "world".
        let overflow = 8; // inside "world"
        let pos = default_break_policy(&text, overflow, 0, text.len());
        assert_eq!(pos, 6); // right after the space following "hello"
    }

    #[test]
    fn default_policy_on_whitespace_skips_to_next_word() {
        let text = store_of("a b");
        let pos = default_break_policy(&text, 1, 0, 3);
        assert_eq!(pos, 2);
    }

    #[test]
    fn default_policy_with_no_whitespace_returns_pos_unchanged() {
        let text = store_of("abcdef");
        let pos = default_break_policy(&text, 4, 0, 6);
        assert_eq!(pos, 4);
    }

    /// When the overflow position itself is `from` and that character is
    /// whitespace, the forward scan still applies — there is no preceding
    /// text to walk backward through.
    #[test]
    fn default_policy_on_leading_whitespace_at_from_skips_it() {
        let text = store_of("  ab");
        let pos = default_break_policy(&text, 0, 0, 4);
        assert_eq!(pos, 2);
    }

    #[test]
    fn per_char_widths_only_charges_cluster_base() {
        let mut gs = GlyphString::new(0, 2, DrawControl::default());
        let mut base = crate::glyph::Glyph::from_char('a' as u32, 0, 1);
        base.width = 10.0;
        let mut mark = crate::glyph::Glyph::from_char(0x301, 0, 1);
        mark.combining_code = crate::combining::from_class(230);
        mark.width = 0.0;
        gs.insert_body(0, base);
        gs.insert_body(1, mark);
        let widths = per_char_widths(&gs);
        assert_eq!(widths[0], 10.0);
    }
}

//! Tab and cursor-glyph width resolution (`spec.md` §4.4), plus the
//! RTL tab fix-up pass.

use crate::control::DrawControl;
use crate::glyph::{Glyph, GlyphKind};

/// `tab_width = frame.space_width * (control.tab_width or 8)`.
pub fn tab_stop_width(frame_space_width: f32, control: &DrawControl) -> f32 {
    frame_space_width * control.effective_tab_width() as f32
}

/// Width of a tab glyph encountered at `accumulated_width` into a line
/// (plus `indent`): widens to align the next column boundary.
pub fn tab_glyph_width(indent: f32, accumulated_width: f32, tab_width: f32) -> f32 {
    if tab_width <= 0.0 {
        return 0.0;
    }
    let phase = (indent + accumulated_width) % tab_width;
    tab_width - phase
}

/// Width of a newline glyph (`spec.md` §4.4): carries `control.cursor_width`
/// with bidi-cursor semantics yielding width 3 when `cursor_bidi`, else
/// `frame_space_width` when `cursor_width` is negative.
pub fn newline_glyph_width(control: &DrawControl, frame_space_width: f32) -> f32 {
    if control.cursor_bidi {
        3.0
    } else if control.cursor_width < 0.0 {
        frame_space_width
    } else {
        control.cursor_width
    }
}

/// Re-walks `glyphs` right-to-left recomputing tab widths against the RTL
/// accumulated width, per `spec.md` §4.4's "RTL tab fix-up". Only runs when
/// `control.orientation_reversed` and the caller has already determined a
/// tab glyph is present (`found_tab`).
pub fn rtl_tab_fixup(glyphs: &mut [Glyph], indent: f32, tab_width: f32) {
    let mut accumulated = 0.0f32;
    for g in glyphs.iter_mut().rev() {
        if matches!(g.kind, GlyphKind::Space) && g.char == '\t' as u32 {
            g.width = tab_glyph_width(indent, accumulated, tab_width);
        }
        accumulated += g.width;
    }
}

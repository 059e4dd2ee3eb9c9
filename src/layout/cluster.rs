//! Per-cluster mark placement: the non-trivial core of the layouter
//! (`spec.md` §4.4). Positions every combining mark relative to its base
//! glyph using the mark's packed combining code, then folds the cluster's
//! final bounding box back onto the base glyph.

use crate::combining::{scaled_offset, HAlign, VAlign};
use crate::glyph::Glyph;

fn halign_frac(h: HAlign) -> f32 {
    match h {
        HAlign::Left => 0.0,
        HAlign::Center => 1.0,
        HAlign::Right => 2.0,
    }
}

fn valign_frac(v: VAlign) -> f32 {
    match v {
        VAlign::Top => 0.0,
        VAlign::Center => 1.0,
        VAlign::Bottom => 2.0,
        VAlign::Baseline => unreachable!("callers special-case Baseline before calling this"),
    }
}

/// Places `marks` on `base` in order, per `spec.md` §4.4, and folds the
/// resulting bounding box back onto `base`'s `ascent`/`descent`/
/// `lbearing`/`rbearing`/`xoff`/`width`. `font_size` scales the stored
/// 128-biased offsets (`spec.md` §4.4's `off_x_scaled`/`off_y_scaled`).
///
/// `base` and each member of `marks` must already carry font metrics
/// (`width`/`lbearing`/`rbearing`/`ascent`/`descent`) from
/// `FaceResolver::metrics`; every mark in `marks` ends with `width == 0`.
pub fn place_cluster(base: &mut Glyph, marks: &mut [Glyph], font_size: f32) {
    if marks.is_empty() {
        return;
    }

    let mut left = -base.width;
    let mut right = 0.0f32;
    let mut top = -base.ascent;
    let mut bottom = base.descent;

    for mark in marks.iter_mut() {
        let Some(code) = mark.unpack_combining_code() else {
            continue;
        };
        let box_width = right - left;
        let box_height = bottom - top;
        let off_x_scaled = scaled_offset(code.off_x, font_size);
        let off_y_scaled = scaled_offset(code.off_y, font_size);

        let bx = halign_frac(code.base_x);
        let ax = halign_frac(code.add_x);
        mark.xoff = left + (box_width * bx - mark.width * ax) / 2.0 + off_x_scaled;
        left = left.min(mark.xoff);
        right = right.max(mark.xoff + mark.width);

        mark.yoff = if code.base_y == VAlign::Baseline {
            0.0
        } else {
            top + (box_height * valign_frac(code.base_y)) / 2.0
        };
        if code.add_y != VAlign::Baseline {
            let ay = valign_frac(code.add_y);
            mark.yoff -= (mark.ascent + mark.descent) * ay / 2.0 - mark.ascent;
        }
        mark.yoff -= off_y_scaled;

        top = top.min(mark.yoff - mark.ascent);
        bottom = bottom.max(mark.yoff + mark.descent);

        // Marks never advance the cursor; compute bounds before zeroing.
        mark.width = 0.0;
    }

    base.ascent = -top;
    base.descent = bottom;
    // Bearings are measured from the base's own left edge (at `-base.width`
    // in this function's coordinate frame) and from the pen origin (`0`)
    // respectively, matching the `left`/`right` accumulators above.
    base.lbearing = base.lbearing.min(left + base.width);
    base.rbearing = base.rbearing.max(right);

    if left < -base.width {
        let shift = -base.width - left;
        base.xoff += shift;
        for mark in marks.iter_mut() {
            mark.xoff += shift;
        }
    }
    if right > 0.0 {
        // Widens the advance so a following glyph doesn't overlap the
        // cluster's ink; the layouter's positioning loop picks this up
        // naturally since it walks glyphs accumulating `width`.
        base.width += right;
    }
}

//! Box-edge and padding glyph insertion (`spec.md` §4.4 "Additional layout
//! behavior"). Pads and box edges are synthesized pseudo-glyphs; they never
//! carry ink themselves but do contribute to `GlyphString.width`.

use crate::capability::{BoxMetrics, RealizedFace};
use crate::glyph::{CharPos, Glyph, GlyphKind};

/// Minimum width a `Space` glyph may be shrunk to when absorbing left
/// padding (`spec.md` §4.4).
pub const MIN_SPACE_WIDTH: f32 = 2.0;

/// Builds the `Box` pseudo-glyph marking a face/box transition at `pos`.
/// `fixed_width` forces `frame_space_width` instead of the box's own
/// metrics (`spec.md` §4.4).
pub fn box_edge_glyph(
    boxm: &BoxMetrics,
    pos: CharPos,
    fixed_width: bool,
    frame_space_width: f32,
) -> Glyph {
    let width = if fixed_width {
        frame_space_width
    } else {
        boxm.inner_hmargin + boxm.width + boxm.outer_hmargin
    };
    let mut g = Glyph::from_char(0, pos, pos);
    g.kind = GlyphKind::Box;
    g.width = width;
    g
}

/// True when `outgoing` and `incoming` faces belong to different boxes and
/// a `Box` edge glyph should be inserted between them.
pub fn needs_box_edge(outgoing: Option<&dyn RealizedFace>, incoming: Option<&dyn RealizedFace>) -> bool {
    match (outgoing.and_then(|f| f.r#box()), incoming.and_then(|f| f.r#box())) {
        (None, None) => false,
        (Some(a), Some(b)) => a.id != b.id,
        _ => true,
    }
}

/// Builds a left-padding `Pad` glyph of width `-lbearing` for a cluster
/// whose `lbearing < 0` (`spec.md` §4.4). Returns `None` when no padding is
/// needed.
pub fn left_pad_glyph(lbearing: f32, pos: CharPos) -> Option<Glyph> {
    if lbearing >= 0.0 {
        return None;
    }
    let mut g = Glyph::from_char(0, pos, pos);
    g.kind = GlyphKind::Pad;
    g.width = -lbearing;
    g.left_padding = true;
    Some(g)
}

/// Builds a right-padding `Pad` glyph covering the excess when
/// `sub_rbearing > sub_width` (`spec.md` §4.4).
pub fn right_pad_glyph(sub_rbearing: f32, sub_width: f32, pos: CharPos) -> Option<Glyph> {
    if sub_rbearing <= sub_width {
        return None;
    }
    let extra_width = sub_rbearing - sub_width;
    let mut g = Glyph::from_char(0, pos, pos);
    g.kind = GlyphKind::Pad;
    // `spec.md` §9 Open Questions: the source's trailing `pad.rbearing = 1`
    // assignment is a typo over `pad.rbearing = extra_width`; we keep only
    // the intended assignment.
    g.width = extra_width;
    g.rbearing = extra_width;
    g.right_padding = true;
    Some(g)
}

/// Absorbs a left-padding need into a preceding `Space` glyph rather than
/// inserting a new `Pad`, never shrinking the space below
/// [`MIN_SPACE_WIDTH`]. Returns `true` if the padding was absorbed.
pub fn try_absorb_into_space(space: &mut Glyph, needed: f32) -> bool {
    if !matches!(space.kind, GlyphKind::Space) {
        return false;
    }
    let shrinkable = (space.width - MIN_SPACE_WIDTH).max(0.0);
    let absorbed = needed.min(shrinkable);
    space.width -= absorbed;
    // Any padding not absorbable by shrinking the space is simply dropped
    // per `spec.md`: the space already covers the cluster's leftward ink
    // well enough that a separate Pad glyph would be redundant.
    true
}

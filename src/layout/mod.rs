//! Layouter: metric resolution, combining placement, box-edge/padding
//! insertion, tab resolution, and line-box computation (`spec.md` §4.4).
//!
//! Grounded on `sugarloaf`'s `components/rich_text/layout/builder_data.rs`
//! arena-of-spans style, generalized from span bookkeeping to the glyph
//! positioning pipeline `spec.md` §4.4 specifies.

mod cluster;
mod padding;
mod tabs;

pub use cluster::place_cluster;
pub use padding::{box_edge_glyph, left_pad_glyph, needs_box_edge, right_pad_glyph, try_absorb_into_space};
pub use tabs::{newline_glyph_width, rtl_tab_fixup, tab_glyph_width, tab_stop_width};

use std::sync::Arc;

use smallvec::SmallVec;

use crate::capability::RealizedFace;
use crate::control::DrawControl;
use crate::glyph::{Glyph, GlyphKind, GlyphString};

/// Lays out `gstring` in place: resolves combining clusters, inserts
/// box-edge and padding pseudo-glyphs, resolves tab/space/newline widths,
/// and recomputes the line box (`spec.md` §4.4).
///
/// Assumes every `Char` glyph in `gstring` already carries font metrics
/// (set by `FaceResolver::metrics` during composition) and, for marks, a
/// non-zero `combining_code`.
pub fn layout(gstring: &mut GlyphString, control: &DrawControl, frame_space_width: f32) {
    let body = gstring.body().to_vec();
    let mut out: Vec<Glyph> = Vec::with_capacity(body.len() + 4);
    let mut prev_face: Option<Arc<dyn RealizedFace>> = None;
    let mut accumulated = gstring.indent;
    let mut found_tab = false;
    let tab_width = tabs::tab_stop_width(frame_space_width, control);

    let mut i = 0;
    while i < body.len() {
        let g = &body[i];
        match g.kind {
            GlyphKind::Char => {
                let outgoing = prev_face.as_deref();
                let incoming = g.face.as_deref();
                if needs_box_edge(outgoing, incoming) {
                    // Prefer the box being entered; when leaving a box into
                    // plain text there is no incoming box, so mark the
                    // outgoing box's edge instead (`spec.md` §4.4).
                    let boxm = incoming
                        .and_then(RealizedFace::r#box)
                        .or_else(|| outgoing.and_then(RealizedFace::r#box));
                    if let Some(boxm) = boxm {
                        out.push(box_edge_glyph(&boxm, g.pos, control.fixed_width, frame_space_width));
                        accumulated += out.last().unwrap().width;
                    }
                }
                prev_face = g.face.clone();

                let mut j = i + 1;
                while j < body.len() && body[j].is_mark() && body[j].pos == g.pos {
                    j += 1;
                }
                let mut base = g.clone();
                let mut marks: SmallVec<[Glyph; 4]> = body[i + 1..j].iter().cloned().collect();
                let font_size = base.face.as_deref().map(RealizedFace::size).unwrap_or(1000.0);
                cluster::place_cluster(&mut base, &mut marks, font_size);

                if let Some(pad) = left_pad_glyph(base.lbearing, base.pos) {
                    let can_pad_here = i != 0 || control.align_head;
                    if can_pad_here {
                        let absorbed = out
                            .last_mut()
                            .map(|prev| try_absorb_into_space(prev, pad.width))
                            .unwrap_or(false);
                        if !absorbed {
                            accumulated += pad.width;
                            out.push(pad);
                        }
                    }
                }

                accumulated += base.width;
                let right_pad = right_pad_glyph(base.rbearing, base.width, base.pos);
                out.push(base);
                out.extend(marks);
                if let Some(pad) = right_pad {
                    accumulated += pad.width;
                    out.push(pad);
                }
                i = j;
            }
            GlyphKind::Space => {
                let mut g2 = g.clone();
                if g2.char == '\t' as u32 {
                    g2.width = tabs::tab_glyph_width(gstring.indent, accumulated - gstring.indent, tab_width);
                    found_tab = true;
                } else if g2.char == '\n' as u32 {
                    g2.width = tabs::newline_glyph_width(control, frame_space_width);
                } else {
                    g2.width = g.face.as_deref().map(RealizedFace::space_width).unwrap_or(frame_space_width);
                }
                accumulated += g2.width;
                out.push(g2);
                i += 1;
            }
            _ => {
                accumulated += g.width;
                out.push(g.clone());
                i += 1;
            }
        }
    }

    if control.orientation_reversed && found_tab {
        rtl_tab_fixup(&mut out, gstring.indent, tab_width);
    }

    gstring.glyphs.clear();
    gstring.glyphs.push(Glyph::anchor(gstring.from));
    gstring.glyphs.extend(out);
    gstring.glyphs.push(Glyph::anchor(gstring.to));

    recompute_line_box(gstring);
}

/// Resolves `spec.md` §9's second open question ("no realized font"
/// branch): a physical line with no glyphs (a bare virtual-newline line,
/// or any line a face never got assigned to) must not collapse its line
/// box to zero height. Floors `ascent`/`descent` against the frame's
/// default realized face rather than comparing mismatched fields.
pub fn apply_empty_line_floor(gstring: &mut GlyphString, frame_face: &dyn RealizedFace) {
    if !gstring.body().is_empty() {
        return;
    }
    gstring.ascent = gstring.ascent.max(frame_face.ascent());
    gstring.descent = gstring.descent.max(frame_face.descent());
    gstring.line_ascent = gstring.line_ascent.max(frame_face.ascent());
    gstring.line_descent = gstring.line_descent.max(frame_face.descent());
    gstring.clamp_line_metrics();
    gstring.height = gstring.line_ascent + gstring.line_descent;
}

/// Recomputes the aggregate line-box metrics from the current glyph
/// buffer and applies `spec.md` §4.4's ascent/descent clamping.
fn recompute_line_box(gstring: &mut GlyphString) {
    let mut width = 0.0f32;
    let mut ascent = 0.0f32;
    let mut descent = 0.0f32;
    let mut lbearing = 0.0f32;
    let mut rbearing = 0.0f32;
    for g in gstring.body() {
        width += g.width;
        ascent = ascent.max(g.ascent);
        descent = descent.max(g.descent);
        lbearing = lbearing.min(g.xoff + g.lbearing);
        rbearing = rbearing.max(g.xoff + g.width - g.rbearing);
    }
    gstring.width = width + gstring.indent;
    gstring.ascent = ascent;
    gstring.descent = descent;
    gstring.lbearing = lbearing;
    gstring.rbearing = rbearing;
    gstring.physical_ascent = ascent;
    gstring.physical_descent = descent;
    gstring.text_ascent = ascent;
    gstring.text_descent = descent;
    gstring.sub_width = width;
    gstring.sub_lbearing = lbearing;
    gstring.sub_rbearing = rbearing;
    gstring.line_ascent = ascent;
    gstring.line_descent = descent;
    gstring.clamp_line_metrics();
    gstring.height = gstring.line_ascent + gstring.line_descent;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphString;

    fn space_glyph(ch: char, width: f32) -> Glyph {
        let mut g = Glyph::from_char(ch as u32, 0, 1);
        g.kind = GlyphKind::Space;
        g.width = width;
        g
    }

    fn char_glyph(ch: char, pos: usize, width: f32, ascent: f32, descent: f32) -> Glyph {
        let mut g = Glyph::from_char(ch as u32, pos, pos + 1);
        g.width = width;
        g.ascent = ascent;
        g.descent = descent;
        g
    }

    struct BoxedFace(crate::capability::BoxId);
    impl RealizedFace for BoxedFace {
        fn size(&self) -> f32 {
            1000.0
        }
        fn space_width(&self) -> f32 {
            10.0
        }
        fn ascent(&self) -> f32 {
            10.0
        }
        fn descent(&self) -> f32 {
            2.0
        }
        fn r#box(&self) -> Option<crate::capability::BoxMetrics> {
            Some(crate::capability::BoxMetrics {
                id: self.0,
                width: 4.0,
                inner_hmargin: 1.0,
                outer_hmargin: 1.0,
            })
        }
        fn driver(&self) -> &dyn crate::capability::FontDriver {
            unimplemented!("not exercised by this test")
        }
    }

    /// A face/box transition must emit a `Box` edge glyph both when
    /// *entering* a box and when *leaving* one back into plain text.
    #[test]
    fn box_edge_emitted_on_both_entry_and_exit() {
        use std::sync::Arc;
        let control = DrawControl::default();
        let boxed: Arc<dyn RealizedFace> = Arc::new(BoxedFace(crate::capability::BoxId(1)));

        let mut gs = GlyphString::new(0, 2, control.clone());
        let mut a = char_glyph('a', 0, 10.0, 10.0, 2.0);
        a.face = Some(boxed.clone());
        let b = char_glyph('b', 1, 10.0, 10.0, 2.0); // no face => no box
        gs.insert_body(0, a);
        gs.insert_body(1, b);

        layout(&mut gs, &control, 10.0);

        let kinds: Vec<GlyphKind> = gs.body().iter().map(|g| g.kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == GlyphKind::Box).count(), 2);
        assert_eq!(kinds[0], GlyphKind::Box); // entering the box before 'a'
        assert!(kinds.contains(&GlyphKind::Box)); // and leaving it before 'b'
    }

    /// Scenario 1 from `spec.md` §8: `"ab\tcd"`, tab_width=4, space_width=10.
    #[test]
    fn tab_expands_to_column() {
        let control = {
            let mut c = DrawControl::default();
            c.tab_width = 4;
            c
        };
        let mut gs = GlyphString::new(0, 5, control.clone());
        gs.insert_body(0, char_glyph('a', 0, 10.0, 10.0, 2.0));
        gs.insert_body(1, char_glyph('b', 1, 10.0, 10.0, 2.0));
        gs.insert_body(2, space_glyph('\t', 0.0));
        gs.insert_body(3, char_glyph('c', 3, 10.0, 10.0, 2.0));
        gs.insert_body(4, char_glyph('d', 4, 10.0, 10.0, 2.0));

        layout(&mut gs, &control, 10.0);

        let widths: Vec<f32> = gs.body().iter().map(|g| g.width).collect();
        assert_eq!(widths, vec![10.0, 10.0, 20.0, 10.0, 10.0]);
    }

    #[test]
    fn tab_at_line_start_is_full_stop_width() {
        let mut control = DrawControl::default();
        control.tab_width = 4;
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, space_glyph('\t', 0.0));
        layout(&mut gs, &control, 10.0);
        assert_eq!(gs.body()[0].width, 40.0);
    }

    #[test]
    fn line_ascent_is_at_least_text_ascent() {
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, 10.0, 10.0, 2.0));
        layout(&mut gs, &control, 10.0);
        assert!(gs.line_ascent >= gs.text_ascent);
        assert!(gs.line_descent >= gs.text_descent);
    }

    #[test]
    fn line_ascent_clamped_to_min() {
        let mut control = DrawControl::default();
        control.min_line_ascent = 20.0;
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, 10.0, 10.0, 2.0));
        layout(&mut gs, &control, 10.0);
        assert_eq!(gs.line_ascent, 20.0);
    }

    #[test]
    fn zero_max_ascent_means_unbounded() {
        let mut control = DrawControl::default();
        control.max_line_ascent = 0.0;
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, 500.0, 500.0, 2.0));
        layout(&mut gs, &control, 10.0);
        assert_eq!(gs.line_ascent, 500.0);
    }

    struct FloorFace;
    impl RealizedFace for FloorFace {
        fn size(&self) -> f32 {
            1000.0
        }
        fn space_width(&self) -> f32 {
            10.0
        }
        fn ascent(&self) -> f32 {
            12.0
        }
        fn descent(&self) -> f32 {
            3.0
        }
        fn driver(&self) -> &dyn crate::capability::FontDriver {
            unimplemented!("not exercised by this test")
        }
    }

    /// `spec.md` §9's second open question: an empty physical line (no
    /// glyphs) floors against the frame's default realized face, not
    /// `gstring.descent` against itself.
    #[test]
    fn empty_line_floors_against_frame_face() {
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, 0, control);
        apply_empty_line_floor(&mut gs, &FloorFace);
        assert_eq!(gs.ascent, 12.0);
        assert_eq!(gs.descent, 3.0);
        assert_eq!(gs.height, 15.0);
    }

    #[test]
    fn non_empty_line_is_unaffected_by_empty_line_floor() {
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, 10.0, 5.0, 1.0));
        layout(&mut gs, &control, 10.0);
        apply_empty_line_floor(&mut gs, &FloorFace);
        assert_eq!(gs.ascent, 5.0);
        assert_eq!(gs.descent, 1.0);
    }
}

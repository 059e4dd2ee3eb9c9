//! Query APIs (`spec.md` §4.8): extents, per-character metrics, hit
//! testing, and cluster introspection over an already laid-out
//! `GlyphString` chain.

use crate::control::DrawControl;
use crate::glyph::{CharPos, GlyphString};

#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Extents {
    pub ink: BoundingBox,
    pub logical: BoundingBox,
    pub line: BoundingBox,
}

/// `text_extents`: the max physical-line width across `lines`, optionally
/// filling ink/logical/line bounding boxes for the first line.
pub fn text_extents(lines: &[GlyphString]) -> (f32, Option<Extents>) {
    let width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
    let extents = lines.first().map(|first| {
        let ink = BoundingBox {
            x: first.lbearing,
            y: -first.ascent,
            width: first.rbearing - first.lbearing,
            height: first.ascent + first.descent,
        };
        let logical = BoundingBox {
            x: 0.0,
            y: -first.line_ascent,
            width: first.width,
            height: first.line_ascent + first.line_descent,
        };
        let line = BoundingBox {
            x: 0.0,
            y: -first.line_ascent,
            width: first.width.max(first.width_limit),
            height: first.height,
        };
        Extents { ink, logical, line }
    });
    (width, extents)
}

/// `per_char_extents`: per-source-character ink and logical bounding
/// boxes, indexed relative to `lines[0].from`. Only the first physical
/// line is measured when `control.two_dimensional` (`spec.md` §4.8).
pub fn per_char_extents(lines: &[GlyphString], control: &DrawControl) -> (Vec<BoundingBox>, Vec<BoundingBox>) {
    let Some(first) = lines.first() else {
        return (Vec::new(), Vec::new());
    };
    let len = first.to.saturating_sub(first.from);
    let mut ink = vec![BoundingBox::default(); len];
    let mut logical = vec![BoundingBox::default(); len];

    let measure_lines: &[GlyphString] = if control.two_dimensional { &lines[..1] } else { lines };
    let mut x = 0.0f32;
    for line in measure_lines {
        for g in line.body() {
            if g.pos < first.from || g.pos >= first.to {
                x += g.width;
                continue;
            }
            let idx = g.pos - first.from;
            ink[idx] = BoundingBox {
                x: x + g.xoff + g.lbearing,
                y: g.yoff - g.ascent,
                width: g.rbearing - g.lbearing,
                height: g.ascent + g.descent,
            };
            logical[idx] = BoundingBox { x, y: -line.line_ascent, width: g.width, height: line.height };
            x += g.width;
        }
    }
    (ink, logical)
}

/// `coordinates_position`: hit-tests `(x, y)` against `lines`, clamping to
/// the first line's `from` when `y` is above it, to the last line's `to`
/// when below, and otherwise walking the hit line in the direction
/// `control.orientation_reversed` implies.
pub fn coordinates_position(lines: &[GlyphString], control: &DrawControl, x: f32, y: f32) -> CharPos {
    let Some(first) = lines.first() else {
        return 0;
    };
    if y < -first.line_ascent {
        return first.from;
    }
    let Some(last) = lines.last() else {
        return first.from;
    };

    let mut cumulative_y = 0.0f32;
    let mut hit_line = last;
    for line in lines {
        let line_bottom = cumulative_y + line.line_descent;
        if y <= line_bottom {
            hit_line = line;
            break;
        }
        cumulative_y = line_bottom + line.line_ascent;
    }
    if y > cumulative_y + hit_line.line_descent && std::ptr::eq(hit_line, last) {
        return last.to;
    }

    hit_position_in_line(hit_line, control, x)
}

fn hit_position_in_line(line: &GlyphString, control: &DrawControl, x: f32) -> CharPos {
    let body = line.body();
    if body.is_empty() {
        return line.from;
    }
    let mut pen = line.indent;
    let indices: Box<dyn Iterator<Item = usize>> = if control.orientation_reversed {
        Box::new((0..body.len()).rev())
    } else {
        Box::new(0..body.len())
    };
    for i in indices {
        let next_pen = pen + body[i].width;
        if x < next_pen {
            return body[i].pos;
        }
        pen = next_pen;
    }
    line.to
}

#[derive(Debug, Clone, Copy)]
pub struct GlyphInfo {
    pub from: CharPos,
    pub to: CharPos,
    pub prev_from: Option<CharPos>,
    pub left_from: Option<CharPos>,
    pub left_to: Option<CharPos>,
    pub right_from: Option<CharPos>,
    pub right_to: Option<CharPos>,
    pub next_to: Option<CharPos>,
}

/// `glyph_info`: the cluster containing `pos` plus its logical/visual
/// neighbors. Crossing a physical-line boundary is resolved within
/// `lines` — the caller is expected to have already fetched every
/// physical line of interest through the cache (`spec.md` §4.8).
pub fn glyph_info(lines: &[GlyphString], pos: CharPos) -> Option<GlyphInfo> {
    for (line_idx, line) in lines.iter().enumerate() {
        let body = line.body();
        let Some(visual_idx) = body.iter().position(|g| g.pos <= pos && pos < g.to) else {
            continue;
        };

        let cluster_pos = body[visual_idx].pos;
        let cluster_start = body[..=visual_idx].iter().rposition(|g| g.pos != cluster_pos).map(|i| i + 1).unwrap_or(0);
        let cluster_end = body[visual_idx..].iter().position(|g| g.pos != cluster_pos).map(|i| i + visual_idx).unwrap_or(body.len());

        let prev_from = if cluster_start > 0 {
            Some(body[cluster_start - 1].pos)
        } else if line_idx > 0 {
            lines[line_idx - 1].body().last().map(|g| g.pos)
        } else {
            None
        };

        let left_from = body[..cluster_start].iter().rev().find(|g| !g.is_mark()).map(|g| g.pos);
        let left_to = left_from.map(|_| cluster_pos);
        let right_from = body[cluster_end..].iter().find(|g| !g.is_mark()).map(|g| g.pos);
        let right_to = right_from.map(|p| p + 1);

        let next_to = if cluster_end < body.len() {
            Some(body[cluster_end].to)
        } else if line_idx + 1 < lines.len() {
            lines[line_idx + 1].body().first().map(|g| g.to)
        } else {
            None
        };

        return Some(GlyphInfo {
            from: cluster_pos,
            to: body[visual_idx].to,
            prev_from,
            left_from,
            left_to,
            right_from,
            right_to,
            next_to,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph;

    fn line_with(chars: &[(char, f32)]) -> GlyphString {
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, chars.len(), control.clone());
        for (i, &(ch, width)) in chars.iter().enumerate() {
            let mut g = Glyph::from_char(ch as u32, i, i + 1);
            g.width = width;
            g.ascent = 10.0;
            g.descent = 2.0;
            gs.insert_body(i, g);
        }
        gs.width = chars.iter().map(|&(_, w)| w).sum();
        gs.line_ascent = 10.0;
        gs.line_descent = 2.0;
        gs.height = 12.0;
        gs
    }

    #[test]
    fn text_extents_is_max_line_width() {
        let lines = vec![line_with(&[('a', 10.0), ('b', 10.0)])];
        let (width, extents) = text_extents(&lines);
        assert_eq!(width, 20.0);
        assert!(extents.is_some());
    }

    #[test]
    fn per_char_extents_indexes_relative_to_first_line_from() {
        let lines = vec![line_with(&[('a', 10.0), ('b', 10.0)])];
        let control = DrawControl::default();
        let (ink, logical) = per_char_extents(&lines, &control);
        assert_eq!(ink.len(), 2);
        assert_eq!(logical[1].x, 10.0);
    }

    #[test]
    fn coordinates_position_hits_second_glyph() {
        let lines = vec![line_with(&[('a', 10.0), ('b', 10.0)])];
        let control = DrawControl::default();
        let pos = coordinates_position(&lines, &control, 15.0, 0.0);
        assert_eq!(pos, 1);
    }

    #[test]
    fn coordinates_position_above_clamps_to_from() {
        let lines = vec![line_with(&[('a', 10.0)])];
        let control = DrawControl::default();
        let pos = coordinates_position(&lines, &control, 0.0, -100.0);
        assert_eq!(pos, lines[0].from);
    }

    #[test]
    fn glyph_info_reports_neighbors() {
        let lines = vec![line_with(&[('a', 10.0), ('b', 10.0), ('c', 10.0)])];
        let info = glyph_info(&lines, 1).unwrap();
        assert_eq!(info.from, 1);
        assert_eq!(info.left_from, Some(0));
        assert_eq!(info.right_from, Some(2));
    }
}

//! Bidi reorderer (`spec.md` §4.2): visually reorders a composed
//! `GlyphString` in place, preserving cluster adjacency, and substitutes
//! mirrored characters in right-to-left runs.

mod mirror;
mod naive;
mod unicode;

pub use mirror::mirror_char;
pub use naive::NaiveReversalEngine;
pub use unicode::UnicodeBidiEngine;

use crate::capability::{BidiCategory, Environment};
use crate::control::BidiEngineKind;
use crate::glyph::{Glyph, GlyphString};

/// A pluggable bidi backend: resolves per-cluster embedding levels and the
/// permutation that places clusters in visual order, given the logical
/// sequence of representative characters (one per cluster, in order) and
/// the paragraph's base direction.
pub trait BidiEngine: Send + Sync {
    fn resolve(&self, chars: &[char], base_rtl: bool) -> (Vec<u8>, Vec<usize>);
}

/// Builds the engine named by `kind` (`spec.md` §4.2 "pluggable").
pub fn engine_for(kind: BidiEngineKind) -> Box<dyn BidiEngine> {
    match kind {
        BidiEngineKind::Unicode => Box::new(UnicodeBidiEngine),
        BidiEngineKind::Naive => Box::new(NaiveReversalEngine),
    }
}

/// Reorders `gstring`'s body in place.
///
/// 1. Skipped unless `control.enable_bidi`.
/// 2. Clusters (a base glyph plus its trailing marks) are collected as
///    units — a cluster's base always precedes its marks, in both logical
///    and visual order.
/// 3. Each cluster's bidi category comes from `env`, consulted on the
///    cluster's representative (base) character.
/// 4. If no cluster is strongly RTL and `control.orientation_reversed` is
///    false, `bidi_level` stays zero on every glyph and nothing moves.
/// 5. Otherwise `engine` runs with a base direction derived from
///    `control.orientation_reversed`.
/// 6. The glyph buffer is rewritten in visual order.
/// 7. Each glyph's `bidi_level` is set from its cluster's resolved level.
/// 8. Glyphs in an odd-level cluster get their `char` replaced by the
///    mirrored codepoint and `code` re-encoded through the glyph's face.
pub fn reorder(gstring: &mut GlyphString, env: &dyn Environment, engine: &dyn BidiEngine) {
    if !gstring.control.enable_bidi {
        return;
    }
    let body = gstring.body().to_vec();
    if body.is_empty() {
        return;
    }

    let mut clusters: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let pos = body[i].pos;
        let mut j = i + 1;
        while j < body.len() && body[j].pos == pos {
            j += 1;
        }
        clusters.push((i, j));
        i = j;
    }

    let rep_chars: Vec<char> = clusters
        .iter()
        .map(|&(s, _)| char::from_u32(body[s].char).unwrap_or('\u{FFFD}'))
        .collect();

    let has_rtl = rep_chars.iter().any(|&c| {
        matches!(
            env.bidi_category_of(c as u32),
            BidiCategory::R | BidiCategory::AL | BidiCategory::RLE | BidiCategory::RLO
        )
    });
    if !has_rtl && !gstring.control.orientation_reversed {
        return;
    }

    let (levels, visual_order) = engine.resolve(&rep_chars, gstring.control.orientation_reversed);

    let mut out: Vec<Glyph> = Vec::with_capacity(body.len());
    for &ci in &visual_order {
        let (s, e) = clusters[ci];
        let level = levels[ci];
        for gi in s..e {
            let mut g = body[gi].clone();
            g.bidi_level = level;
            if level % 2 == 1 {
                if let Some(ch) = char::from_u32(g.char) {
                    let mirrored = mirror_char(ch);
                    if mirrored != ch {
                        g.char = mirrored as u32;
                        if let Some(face) = g.face.as_deref() {
                            g.code = face.driver().encode_char(mirrored as u32);
                        }
                    }
                }
            }
            out.push(g);
        }
    }

    gstring.glyphs.clear();
    gstring.glyphs.push(Glyph::anchor(gstring.from));
    gstring.glyphs.extend(out);
    gstring.glyphs.push(Glyph::anchor(gstring.to));
}

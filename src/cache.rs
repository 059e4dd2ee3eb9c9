//! Glyph cache (`spec.md` §4.6): attaches a laid-out `GlyphString` chain to
//! the text via a volatile `"glyph-string"` text property, so re-rendering
//! an unchanged span is free.
//!
//! "At-most-one cached chain per unchanged-span" is enforced by the
//! `TextStore`'s own volatile-property detach semantics — this module only
//! decides *when* a found chain is still valid and otherwise rebuilds.

use std::any::Any;
use std::sync::Arc;

use crate::capability::{keys, PropFlags, PropValue, TextStore};
use crate::control::DrawControl;
use crate::glyph::{CharPos, GlyphString};

/// A singly linked chain of physical lines produced by one composition
/// (`spec.md` §4.6's "`Anchor`-bounded singly linked list"), plus the
/// invalidation keys it was built against.
#[derive(Clone)]
pub struct GlyphChain {
    pub lines: Vec<GlyphString>,
    /// Opaque frame identity the chain was laid out for.
    pub frame: u64,
    /// Ticks on font-config changes; a stale tick invalidates the chain.
    pub tick: u64,
    pub control: DrawControl,
    /// The `from` position the chain was attached at, used to detect an
    /// upstream shift (step 3).
    stored_from: CharPos,
}

impl GlyphChain {
    fn translate(&mut self, offset: isize) {
        if offset == 0 {
            return;
        }
        for line in &mut self.lines {
            line.from = shift(line.from, offset);
            line.to = shift(line.to, offset);
            for g in &mut line.glyphs {
                g.pos = shift(g.pos, offset);
                g.to = shift(g.to, offset);
            }
        }
        self.stored_from = shift(self.stored_from, offset);
    }
}

fn shift(pos: CharPos, offset: isize) -> CharPos {
    (pos as isize + offset).max(0) as CharPos
}

/// True when `[start, end)` sits on "safe" cache boundaries: the start is
/// either the beginning of the text or immediately follows a newline, and
/// likewise for the end (`spec.md` §4.6 step 1).
fn at_safe_boundaries(text: &dyn TextStore, start: CharPos, end: CharPos) -> bool {
    let start_ok = start == 0 || (start > 0 && text.char_at(start - 1) == '\n' as u32);
    let end_ok = end >= text.len() || (end > 0 && text.char_at(end - 1) == '\n' as u32);
    start_ok && end_ok
}

fn downcast_chain(value: &PropValue) -> Option<Arc<GlyphChain>> {
    match value {
        PropValue::Any(v) => v.clone().downcast::<GlyphChain>().ok(),
        _ => None,
    }
}

fn as_any_arc(chain: Arc<GlyphChain>) -> Arc<dyn Any + Send + Sync> {
    chain
}

/// Looks up (and validates, or rebuilds) the glyph chain covering `pos`.
///
/// `build` composes, lays out, and optionally line-breaks `[from, to)`
/// into physical lines — supplied by the caller since that needs the
/// `Composer`/`FaceResolver`/bidi-engine context this module doesn't have.
pub fn get_or_build(
    text: &dyn TextStore,
    pos: CharPos,
    to: CharPos,
    control: &DrawControl,
    frame: u64,
    tick: u64,
    mut build: impl FnMut(CharPos, CharPos) -> Vec<GlyphString>,
) -> Arc<GlyphChain> {
    if let Some(handle) = text.property(pos, keys::GLYPH_STRING) {
        let (range_start, range_end) = text.prop_range(pos, keys::GLYPH_STRING, true, true, false);
        let value = text.get_prop(pos, keys::GLYPH_STRING);
        if let Some(mut chain) = downcast_chain(&value) {
            if !at_safe_boundaries(text, range_start, range_end) {
                text.detach_prop(handle);
            } else if chain.frame != frame || chain.tick != tick || !chain.control.cache_prefix_eq(control) {
                text.detach_prop(handle);
            } else {
                let offset = range_start as isize - chain.stored_from as isize;
                if offset != 0 {
                    let mutated = Arc::make_mut(&mut chain);
                    mutated.translate(offset);
                }
                return chain;
            }
        } else {
            text.detach_prop(handle);
        }
    }

    let lines = build(pos, to);
    let chain = Arc::new(GlyphChain {
        lines,
        frame,
        tick,
        control: control.clone(),
        stored_from: pos,
    });

    if !control.disable_caching {
        text.attach_prop(
            keys::GLYPH_STRING,
            pos,
            to,
            PropValue::Any(as_any_arc(chain.clone())),
            PropFlags::VOLATILE_STRONG,
        );
    }
    chain
}

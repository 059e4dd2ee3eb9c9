//! `fontshape`: a multilingual text shaping and layout core.
//!
//! Composes a character range into glyphs (`compose`), visually reorders
//! right-to-left runs (`bidi`), positions clusters and resolves box/tab/pad
//! glyphs (`layout`), optionally splits the result into physical lines
//! (`linebreak`), caches the laid-out chain on the text (`cache`), draws it
//! through host-supplied device capabilities (`render`), and answers
//! extents/hit-testing queries over it (`query`).
//!
//! Font discovery, rasterization, face resolution policy and text storage
//! are host concerns, defined only as trait boundaries in [`capability`].

pub mod bidi;
pub mod cache;
pub mod capability;
pub mod combining;
pub mod compose;
pub mod control;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod linebreak;
pub mod query;
pub mod render;

pub use cache::GlyphChain;
pub use capability::{
    BidiCategory, BoxId, BoxMetrics, Environment, FaceResolver, FontDriver, FrameDriver,
    FrameHandle, PropFlags, PropHandle, PropValue, RealizedFace, Region, Shaper, TextStore,
    UnicodeEnvironment, WindowHandle,
};
pub use combining::{CombiningCode, HAlign, VAlign};
pub use compose::Composer;
pub use control::{BidiEngineKind, DrawControl, Formatter, LineBreakCapability, LineBreakerKind};
pub use error::{legacy, ErrorCode, Result, ShapeError};
pub use glyph::{CharPos, Glyph, GlyphKind, GlyphString, INVALID_CODE};
pub use query::{BoundingBox, Extents, GlyphInfo};

use std::sync::Arc;

/// Ties composition, bidi reordering, layout and line breaking into a
/// single call against one `TextStore`/`FaceResolver`/`Environment` triple
/// (`spec.md` §2's pipeline, end to end).
pub struct Engine<'a> {
    pub text: &'a dyn TextStore,
    pub faces: &'a dyn FaceResolver,
    pub env: &'a dyn Environment,
    pub bidi_engine: Box<dyn bidi::BidiEngine>,
}

impl<'a> Engine<'a> {
    pub fn new(text: &'a dyn TextStore, faces: &'a dyn FaceResolver, env: &'a dyn Environment, control: &DrawControl) -> Self {
        Engine {
            text,
            faces,
            env,
            bidi_engine: bidi::engine_for(control.bidi_engine),
        }
    }

    /// Composes, reorders, and lays out `[from, to)` into a single physical
    /// `GlyphString` — no line breaking (`spec.md` §4.3-§4.4).
    pub fn shape_line(&self, from: CharPos, to: CharPos, control: &DrawControl, size: f32, frame_space_width: f32) -> GlyphString {
        let composer = Composer::new(self.text, self.faces, self.env);
        let mut gstring = composer.compose(from, to, control, size);
        bidi::reorder(&mut gstring, self.env, self.bidi_engine.as_ref());
        layout::layout(&mut gstring, control, frame_space_width);
        gstring
    }

    /// Full pipeline: shapes `[from, to)` and, when `control.two_dimensional`
    /// and the result overflows `control.max_line_width`, splits it into
    /// physical lines (`spec.md` §4.5).
    pub fn shape(&self, from: CharPos, to: CharPos, control: &DrawControl, size: f32, frame_space_width: f32) -> Vec<GlyphString> {
        let mut gstring = self.shape_line(from, to, control, size, frame_space_width);
        linebreak::line_break(&mut gstring, self.text, control, frame_space_width, |seg_from, seg_to, c| {
            self.shape_line(seg_from, seg_to, c, size, frame_space_width)
        })
    }

    /// Looks up (or builds and attaches) the cached glyph chain covering
    /// `pos` (`spec.md` §4.6).
    pub fn shape_cached(
        &self,
        pos: CharPos,
        to: CharPos,
        control: &DrawControl,
        size: f32,
        frame_space_width: f32,
        frame: u64,
        tick: u64,
    ) -> Arc<GlyphChain> {
        cache::get_or_build(self.text, pos, to, control, frame, tick, |seg_from, seg_to| {
            self.shape(seg_from, seg_to, control, size, frame_space_width)
        })
    }
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

    struct FakeDriver;
    impl FontDriver for FakeDriver {
        fn render(&self, _: WindowHandle, _: f32, _: f32, _: &GlyphString, _: usize, _: usize, _: bool, _: Option<Region>) {}
        fn encode_char(&self, ch: u32) -> u32 {
            ch
        }
    }

    struct FakeFace(FakeDriver);
    impl RealizedFace for FakeFace {
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
        fn driver(&self) -> &dyn FontDriver {
            &self.0
        }
    }

    struct FakeResolver;
    impl FaceResolver for FakeResolver {
        fn realize(&self, _: &[&str], _: Option<&str>, _: Option<&str>, _: f32) -> Result<Arc<dyn RealizedFace>> {
            Ok(Arc::new(FakeFace(FakeDriver)))
        }
        fn for_chars(&self, _: &str, _: Option<&str>, _: Option<&str>, glyphs: &mut [Glyph], _: f32) {
            let face: Arc<dyn RealizedFace> = Arc::new(FakeFace(FakeDriver));
            for g in glyphs.iter_mut() {
                g.face = Some(face.clone());
                g.code = g.char;
            }
        }
        fn metrics(&self, glyphs: &mut [Glyph], from: usize, to: usize) {
            for g in &mut glyphs[from..to] {
                g.width = 10.0;
                g.ascent = 10.0;
                g.descent = 2.0;
            }
        }
    }

    #[test]
    fn shape_produces_one_line_for_short_text() {
        let text = FakeStore("hello".chars().map(|c| c as u32).collect());
        let resolver = FakeResolver;
        let env = UnicodeEnvironment;
        let control = DrawControl::default();
        let engine = Engine::new(&text, &resolver, &env, &control);
        let lines = engine.shape(0, text.len(), &control, 1000.0, 10.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].body().len(), 6); // 5 chars + virtual trailing newline
    }

    #[test]
    fn shape_cached_attaches_and_reuses() {
        let text = FakeStore("hi".chars().map(|c| c as u32).collect());
        let resolver = FakeResolver;
        let env = UnicodeEnvironment;
        let control = DrawControl::default();
        let engine = Engine::new(&text, &resolver, &env, &control);
        let first = engine.shape_cached(0, text.len(), &control, 1000.0, 10.0, 1, 1);
        let second = engine.shape_cached(0, text.len(), &control, 1000.0, 10.0, 1, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }
}

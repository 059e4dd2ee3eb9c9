//! Composer (`spec.md` §4.3): itemizes a character range by script, face
//! and language, resolves a realized font per run through
//! [`FaceResolver`], and produces the initial logical-order `GlyphString`
//! — including the `^X` control-character expansion and the
//! combining-class shaping fallback.
//!
//! Grounded on `sugarloaf`'s `builder_data.rs` stop-tracking style
//! (`BuilderState::begin`/fragment flushing) generalized from span
//! bookkeeping to the face/language/charset/script stops `spec.md`
//! describes, and on `blitz-text`'s `analysis/analyzer_core.rs` for the
//! overall itemize-then-shape shape of a composition pass.

mod script;

use crate::capability::{keys, Environment, FaceResolver, TextStore};
use crate::control::DrawControl;
use crate::glyph::{CharPos, Glyph, GlyphKind, GlyphString};

/// Drives composition against a particular text/font/property backend.
pub struct Composer<'a> {
    text: &'a dyn TextStore,
    faces: &'a dyn FaceResolver,
    env: &'a dyn Environment,
}

impl<'a> Composer<'a> {
    pub fn new(text: &'a dyn TextStore, faces: &'a dyn FaceResolver, env: &'a dyn Environment) -> Self {
        Composer { text, faces, env }
    }

    /// Composes `[from, to)` into a fresh logical-order `GlyphString` at
    /// point size `size`. Stops early at a newline when
    /// `control.two_dimensional` (`spec.md` §4.3 step 1).
    pub fn compose(&self, from: CharPos, to: CharPos, control: &DrawControl, size: f32) -> GlyphString {
        let end = self.scan_line_end(from, to, control);
        let mut gstring = GlyphString::new(from, end, control.clone());

        let mut pos = from;
        let mut prev_script: Option<&'static str> = None;
        let mut run_start = 0usize; // body index
        let mut run_script: Option<&'static str> = None;
        let mut run_language: Option<String> = None;
        let mut run_charset: Option<String> = None;

        while pos < end {
            let ch = self.text.char_at(pos);
            let language = self.prop_string(pos, keys::LANGUAGE);
            let charset = self.prop_string(pos, keys::CHARSET);
            let script = if is_control(ch) {
                Some(script::LATIN)
            } else {
                script::resolve(self.env, self.text, pos, end, prev_script)
            };
            prev_script = script.or(prev_script);

            if gstring.body().len() > run_start
                && (script != run_script || language != run_language || charset != run_charset)
            {
                self.flush_run(&mut gstring, run_start, run_script, run_language.as_deref(), run_charset.as_deref(), size);
                run_start = gstring.body().len();
            }
            run_script = script;
            run_language = language.clone();
            run_charset = charset.clone();

            if is_control(ch) {
                let mut caret = Glyph::from_char('^' as u32, pos, pos + 1);
                caret.category = Some("Cc");
                gstring.glyphs.insert(gstring.glyphs.len() - 1, caret);
                let mut letter = Glyph::from_char(caret_letter(ch), pos, pos + 1);
                letter.category = Some("Cc");
                gstring.glyphs.insert(gstring.glyphs.len() - 1, letter);
            } else if ch == '\t' as u32 || ch == '\n' as u32 {
                let mut g = Glyph::from_char(ch, pos, pos + 1);
                g.kind = GlyphKind::Space;
                gstring.glyphs.insert(gstring.glyphs.len() - 1, g);
            } else {
                let mut g = Glyph::from_char(ch, pos, pos + 1);
                g.category = self.env.category_of(ch);
                gstring.glyphs.insert(gstring.glyphs.len() - 1, g);
            }
            pos += 1;
        }

        if gstring.body().len() > run_start {
            self.flush_run(&mut gstring, run_start, run_script, run_language.as_deref(), run_charset.as_deref(), size);
        }

        // `spec.md` §4.3 edge case: a virtual trailing newline so a cursor
        // can be positioned past the last character of the whole text.
        if end == self.text.len() {
            let mut eol = Glyph::from_char('\n' as u32, end, end + 1);
            eol.kind = GlyphKind::Space;
            gstring.glyphs.insert(gstring.glyphs.len() - 1, eol);
        }

        self.shape(&mut gstring);
        gstring
    }

    /// Stops at `to`, or at the first `\n` within `[from, to)` when
    /// `control.two_dimensional` (inclusive of the newline itself, which is
    /// composed as a trailing `Space` glyph).
    fn scan_line_end(&self, from: CharPos, to: CharPos, control: &DrawControl) -> CharPos {
        if !control.two_dimensional {
            return to;
        }
        for p in from..to {
            if self.text.char_at(p) == '\n' as u32 {
                return p + 1;
            }
        }
        to
    }

    fn prop_string(&self, pos: CharPos, key: &str) -> Option<String> {
        match self.text.get_prop(pos, key) {
            crate::capability::PropValue::Any(v) => {
                v.downcast_ref::<String>().cloned()
            }
            _ => None,
        }
    }

    /// Calls `FaceResolver::for_chars`/`metrics` over the pending run
    /// `body[run_start..]` (`spec.md` §4.3 step 4).
    fn flush_run(
        &self,
        gstring: &mut GlyphString,
        run_start: usize,
        script: Option<&'static str>,
        language: Option<&str>,
        charset: Option<&str>,
        size: f32,
    ) {
        let tail = gstring.tail();
        let body_start = 1 + run_start;
        if body_start >= tail {
            return;
        }
        let script = script.unwrap_or(script::LATIN);
        self.faces.for_chars(script, language, charset, &mut gstring.glyphs[body_start..tail], size);
        self.faces.metrics(&mut gstring.glyphs, body_start, tail);
    }

    /// `spec.md` §4.3 step 6: per-run shaping, FLT when available, else the
    /// combining-class fallback with a stable bubble sort within clusters.
    fn shape(&self, gstring: &mut GlyphString) {
        let mut i = 1;
        while i < gstring.tail() {
            let face = gstring.glyphs[i].face.clone();
            let Some(face) = face else {
                i += 1;
                continue;
            };
            let mut j = i + 1;
            while j < gstring.tail()
                && gstring.glyphs[j]
                    .face
                    .as_ref()
                    .map(|f| std::sync::Arc::ptr_eq(f, &face))
                    .unwrap_or(false)
            {
                j += 1;
            }
            if let Some(shaper) = face.driver().shaper() {
                let new_end = shaper.run(gstring, i, j);
                i = new_end;
            } else {
                self.assign_combining_fallback(gstring, i, j);
                i = j;
            }
        }
    }

    /// Assigns `combining_code = from_class(canonical_class(char))` to every
    /// mark in `[from, to)`, then stably sorts marks within each cluster by
    /// that class (`spec.md` §4.3 step 6). Classes are tracked alongside the
    /// glyphs during sorting since the packed code does not preserve
    /// numeric class order.
    fn assign_combining_fallback(&self, gstring: &mut GlyphString, from: usize, to: usize) {
        let mut classes = vec![0u16; to - from];
        for k in from..to {
            let is_mark = gstring.glyphs[k].category.map(|c| c.starts_with('M')).unwrap_or(false);
            if is_mark {
                classes[k - from] = self.env.combining_class_of(gstring.glyphs[k].char);
            }
        }

        let mut start = from;
        while start < to {
            let pos = gstring.glyphs[start].pos;
            let mut end = start + 1;
            while end < to && gstring.glyphs[end].pos == pos {
                end += 1;
            }
            bubble_sort_marks_by_class(&mut gstring.glyphs[start..end], &mut classes[start - from..end - from]);
            start = end;
        }

        for k in from..to {
            let class = classes[k - from];
            if class != 0 {
                gstring.glyphs[k].combining_code = crate::combining::from_class(class);
            }
        }
    }
}

/// Stable bubble sort that only ever swaps adjacent *marks* (non-zero
/// class), leaving the cluster's base glyph (class 0) fixed at the front.
fn bubble_sort_marks_by_class(glyphs: &mut [Glyph], classes: &mut [u16]) {
    let n = glyphs.len();
    for i in 0..n {
        for j in 0..n.saturating_sub(1 + i) {
            if classes[j] != 0 && classes[j + 1] != 0 && classes[j] > classes[j + 1] {
                glyphs.swap(j, j + 1);
                classes.swap(j, j + 1);
            }
        }
    }
}

fn is_control(ch: u32) -> bool {
    ch < 32 || ch == 127
}

fn caret_letter(ch: u32) -> u32 {
    if ch == 127 {
        '?' as u32
    } else {
        ch + 64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{
        BoxMetrics, FontDriver, PropFlags, PropHandle, PropValue, RealizedFace, Region, Shaper,
        UnicodeEnvironment, WindowHandle,
    };
    use std::sync::Arc;

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
        fn shaper(&self) -> Option<&dyn Shaper> {
            None
        }
    }

    struct FakeFace {
        driver: FakeDriver,
    }
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
        fn r#box(&self) -> Option<BoxMetrics> {
            None
        }
        fn driver(&self) -> &dyn FontDriver {
            &self.driver
        }
    }

    struct FakeResolver;
    impl FaceResolver for FakeResolver {
        fn realize(&self, _: &[&str], _: Option<&str>, _: Option<&str>, _: f32) -> crate::error::Result<Arc<dyn RealizedFace>> {
            Ok(Arc::new(FakeFace { driver: FakeDriver }))
        }
        fn for_chars(&self, _: &str, _: Option<&str>, _: Option<&str>, glyphs: &mut [Glyph], _: f32) {
            let face: Arc<dyn RealizedFace> = Arc::new(FakeFace { driver: FakeDriver });
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
    fn control_char_expands_to_caret_pair() {
        let text = FakeStore(vec![1]); // Ctrl-A
        let resolver = FakeResolver;
        let env = UnicodeEnvironment;
        let composer = Composer::new(&text, &resolver, &env);
        let control = DrawControl::default();
        let gs = composer.compose(0, 1, &control, 1000.0);
        let chars: Vec<u32> = gs.body().iter().map(|g| g.char).collect();
        assert!(chars.windows(2).any(|w| w == ['^' as u32, 'A' as u32]));
    }

    #[test]
    fn two_dimensional_stops_at_newline() {
        let text = FakeStore(vec!['a' as u32, '\n' as u32, 'b' as u32]);
        let resolver = FakeResolver;
        let env = UnicodeEnvironment;
        let composer = Composer::new(&text, &resolver, &env);
        let mut control = DrawControl::default();
        control.two_dimensional = true;
        let gs = composer.compose(0, 3, &control, 1000.0);
        assert_eq!(gs.to, 2);
    }

    #[test]
    fn plain_char_gets_face_and_metrics() {
        let text = FakeStore(vec!['a' as u32]);
        let resolver = FakeResolver;
        let env = UnicodeEnvironment;
        let composer = Composer::new(&text, &resolver, &env);
        let control = DrawControl::default();
        let gs = composer.compose(0, 1, &control, 1000.0);
        assert!(gs.body()[0].face.is_some());
        assert_eq!(gs.body()[0].width, 10.0);
    }

    #[test]
    fn virtual_trailing_newline_is_appended_at_end_of_text() {
        let text = FakeStore(vec!['a' as u32]);
        let resolver = FakeResolver;
        let env = UnicodeEnvironment;
        let composer = Composer::new(&text, &resolver, &env);
        let control = DrawControl::default();
        let gs = composer.compose(0, 1, &control, 1000.0);
        assert_eq!(gs.body().last().unwrap().char, '\n' as u32);
    }
}

//! Core data model: [`Glyph`], [`GlyphString`] and the character position
//! type they are indexed by.
//!
//! Grounded on `sugarloaf`'s `components/rich_text/layout/builder_data.rs`
//! (arena-of-structs layout state) reworked per `SPEC_FULL.md` §3: pointer
//! chasing in the original design becomes `u32` indices into a single
//! owning `Vec<Glyph>`, and face references are `Arc` handles borrowed for
//! the glyph's lifetime rather than owned.

use std::sync::Arc;

use crate::capability::RealizedFace;
use crate::combining::CombiningCode;
use crate::control::DrawControl;

/// A 0-based index into the backing text.
pub type CharPos = usize;

/// Sentinel glyph code for a codepoint that could not be mapped to a font
/// glyph id.
pub const INVALID_CODE: u32 = u32::MAX;

/// What a [`Glyph`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    /// A glyph produced from a source character (base or combining mark).
    Char,
    /// A space, tab, or newline glyph.
    Space,
    /// A padding glyph inserted by the layouter (never carries ink).
    Pad,
    /// A box-edge pseudo-glyph marking a face/box transition.
    Box,
    /// A sentinel glyph bounding a [`GlyphString`] (index 0 and `len - 1`).
    Anchor,
}

/// One laid-out glyph.
#[derive(Clone)]
pub struct Glyph {
    pub kind: GlyphKind,
    /// Source codepoint; `0` for [`GlyphKind::Anchor`] and [`GlyphKind::Box`].
    pub char: u32,
    /// Font-specific glyph id, or [`INVALID_CODE`] when unmapped.
    pub code: u32,
    /// Start of the covered character range (inclusive).
    pub pos: CharPos,
    /// End of the covered character range (exclusive). `pos < to` for every
    /// non-anchor glyph.
    pub to: CharPos,
    /// The realized face this glyph was shaped against, if any.
    pub face: Option<Arc<dyn RealizedFace>>,
    /// Unicode general category symbol (e.g. `"Mn"`), when known.
    pub category: Option<&'static str>,
    /// Packed 6-field combining code; zero means "base" (not a mark).
    pub combining_code: u32,
    /// Embedding level assigned by the bidi pass.
    pub bidi_level: u8,
    pub width: f32,
    pub lbearing: f32,
    pub rbearing: f32,
    pub ascent: f32,
    pub descent: f32,
    pub xoff: f32,
    pub yoff: f32,
    pub left_padding: bool,
    pub right_padding: bool,
    pub otf_encoded: bool,
    pub enabled: bool,
}

impl Glyph {
    /// Builds an `Anchor` sentinel glyph at character position `pos`.
    pub fn anchor(pos: CharPos) -> Self {
        Glyph {
            kind: GlyphKind::Anchor,
            char: 0,
            code: INVALID_CODE,
            pos,
            to: pos,
            face: None,
            category: None,
            combining_code: 0,
            bidi_level: 0,
            width: 0.0,
            lbearing: 0.0,
            rbearing: 0.0,
            ascent: 0.0,
            descent: 0.0,
            xoff: 0.0,
            yoff: 0.0,
            left_padding: false,
            right_padding: false,
            otf_encoded: false,
            enabled: true,
        }
    }

    /// Builds a `Char` glyph for a single source character. Metrics are
    /// left at zero; the composer/layouter fill them in.
    pub fn from_char(ch: u32, pos: CharPos, to: CharPos) -> Self {
        Glyph {
            kind: GlyphKind::Char,
            char: ch,
            code: INVALID_CODE,
            pos,
            to,
            face: None,
            category: None,
            combining_code: 0,
            bidi_level: 0,
            width: 0.0,
            lbearing: 0.0,
            rbearing: 0.0,
            ascent: 0.0,
            descent: 0.0,
            xoff: 0.0,
            yoff: 0.0,
            left_padding: false,
            right_padding: false,
            otf_encoded: false,
            enabled: true,
        }
    }

    #[inline]
    pub fn is_anchor(&self) -> bool {
        matches!(self.kind, GlyphKind::Anchor)
    }

    /// A glyph is a combining mark if it carries a non-zero combining code
    /// and is not itself a base (per `SPEC_FULL.md` §3's cluster invariant:
    /// the base glyph always has `combining_code == 0`).
    #[inline]
    pub fn is_mark(&self) -> bool {
        self.combining_code != 0
    }

    pub fn unpack_combining_code(&self) -> Option<CombiningCode> {
        if self.combining_code == 0 {
            None
        } else {
            Some(crate::combining::unpack(self.combining_code))
        }
    }
}

/// The laid-out representation of one physical line of text: an ordered
/// sequence of glyphs flanked by two sentinel [`GlyphKind::Anchor`] glyphs.
#[derive(Clone)]
pub struct GlyphString {
    pub glyphs: Vec<Glyph>,
    /// Logical char range covered by this string, sentinels excluded.
    pub from: CharPos,
    pub to: CharPos,
    pub indent: f32,
    pub width_limit: f32,
    pub width: f32,
    pub lbearing: f32,
    pub rbearing: f32,
    pub ascent: f32,
    pub descent: f32,
    pub physical_ascent: f32,
    pub physical_descent: f32,
    pub text_ascent: f32,
    pub text_descent: f32,
    pub line_ascent: f32,
    pub line_descent: f32,
    pub height: f32,
    pub sub_width: f32,
    pub sub_lbearing: f32,
    pub sub_rbearing: f32,
    /// Snapshot of the control used to build this string.
    pub control: DrawControl,
    /// Index of the `GlyphString` for the physical line below, in whatever
    /// chain owns this one (see `cache::GlyphChain`). `None` when this is
    /// the last (or only) physical line.
    pub next_index: Option<usize>,
}

impl GlyphString {
    /// Creates an empty glyph string covering `[from, to)`, already bounded
    /// by its two anchor glyphs.
    pub fn new(from: CharPos, to: CharPos, control: DrawControl) -> Self {
        let mut glyphs = Vec::with_capacity(2 + (to - from).min(64));
        glyphs.push(Glyph::anchor(from));
        glyphs.push(Glyph::anchor(to));
        GlyphString {
            glyphs,
            from,
            to,
            indent: 0.0,
            width_limit: control.max_line_width,
            width: 0.0,
            lbearing: 0.0,
            rbearing: 0.0,
            ascent: 0.0,
            descent: 0.0,
            physical_ascent: 0.0,
            physical_descent: 0.0,
            text_ascent: 0.0,
            text_descent: 0.0,
            line_ascent: 0.0,
            line_descent: 0.0,
            height: 0.0,
            sub_width: 0.0,
            sub_lbearing: 0.0,
            sub_rbearing: 0.0,
            control,
            next_index: None,
        }
    }

    /// Index of the leading anchor (always `0`).
    #[inline]
    pub fn head(&self) -> usize {
        0
    }

    /// Index of the trailing anchor (always `len - 1`).
    #[inline]
    pub fn tail(&self) -> usize {
        self.glyphs.len() - 1
    }

    /// Glyphs strictly between the two anchors.
    #[inline]
    pub fn body(&self) -> &[Glyph] {
        let tail = self.tail();
        if tail <= 1 {
            &[]
        } else {
            &self.glyphs[1..tail]
        }
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut [Glyph] {
        let tail = self.glyphs.len().saturating_sub(1);
        if tail <= 1 {
            &mut []
        } else {
            &mut self.glyphs[1..tail]
        }
    }

    /// Inserts `glyph` at body index `at` (0-based, relative to
    /// [`Self::body`]), shifting later glyphs right. Invalidates any
    /// previously fetched index into `self.glyphs` — callers must not
    /// carry raw indices across this call (`SPEC_FULL.md` §5).
    pub fn insert_body(&mut self, at: usize, glyph: Glyph) {
        self.glyphs.insert(1 + at, glyph);
    }

    /// Sum of `width` over the whole buffer (anchors contribute zero),
    /// matching `SPEC_FULL.md`/`spec.md` §8 invariant 4 up to `indent`.
    pub fn sum_glyph_widths(&self) -> f32 {
        self.glyphs.iter().map(|g| g.width).sum()
    }

    /// Clamps `line_ascent`/`line_descent` into `[min, max]`, with `max`
    /// ignored when it is zero or not greater than `min` (spec.md §4.4).
    pub fn clamp_line_metrics(&mut self) {
        let min_a = self.control.min_line_ascent;
        let max_a = self.control.max_line_ascent;
        self.line_ascent = self.line_ascent.max(min_a);
        if max_a > min_a {
            self.line_ascent = self.line_ascent.min(max_a);
        }
        let min_d = self.control.min_line_descent;
        let max_d = self.control.max_line_descent;
        self.line_descent = self.line_descent.max(min_d);
        if max_d > min_d {
            self.line_descent = self.line_descent.min(max_d);
        }
    }
}

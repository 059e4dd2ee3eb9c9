//! `FontDriver`: per-realized-font rendering and shaping capability
//! (`spec.md` §6).

use crate::glyph::GlyphString;

/// A font-layout-table shaper, invoked by the composer on a run of glyphs
/// that share a realized font (`spec.md` §4.3 step 6). Permitted to
/// replace, reorder, and generate combining codes in place.
pub trait Shaper: Send + Sync {
    /// Shapes `gstring.glyphs[from..end)` in place and returns the new end
    /// index of the shaped range (it may differ from `end` if glyphs were
    /// inserted or merged).
    fn run(&self, gstring: &mut GlyphString, from: usize, end: usize) -> usize;
}

/// An opaque drawing surface handle; meaningless to this crate, forwarded
/// verbatim to the host's [`FontDriver`]/`FrameDriver` implementations.
pub type WindowHandle = u64;

/// Device region, as produced by `FrameDriver::region_from_rect` and
/// friends; opaque here.
pub type Region = u64;

pub trait FontDriver: Send + Sync {
    /// Renders glyphs `[from, to)` of `gstring` at `(x, y)` into `win`,
    /// optionally in reverse video, clipped to `region`.
    #[allow(clippy::too_many_arguments)]
    fn render(
        &self,
        win: WindowHandle,
        x: f32,
        y: f32,
        gstring: &GlyphString,
        from: usize,
        to: usize,
        reverse: bool,
        region: Option<Region>,
    );

    /// Maps a codepoint to this font's glyph id, or [`crate::glyph::INVALID_CODE`].
    fn encode_char(&self, ch: u32) -> u32;

    /// The font-layout-table shaper for this font, if it declares one.
    fn shaper(&self) -> Option<&dyn Shaper> {
        None
    }
}

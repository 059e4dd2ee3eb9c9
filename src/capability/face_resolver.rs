//! `FaceResolver` and `RealizedFace`: face selection and per-glyph font
//! assignment (`spec.md` §6). Resolution policy (which font file backs a
//! family name) is a host concern; this crate only needs a realized face's
//! metrics and a handle to its [`FontDriver`].

use crate::capability::font_driver::FontDriver;
use crate::glyph::Glyph;

/// A box pointer, identifying which logical "box" (for box-edge insertion,
/// `spec.md` §4.4) a face belongs to. Faces sharing the same `BoxId` are
/// drawn without an intervening box-edge glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxId(pub u64);

/// Metrics and identity of a box edge decoration, when a face declares one.
#[derive(Debug, Clone, Copy)]
pub struct BoxMetrics {
    pub id: BoxId,
    pub width: f32,
    pub inner_hmargin: f32,
    pub outer_hmargin: f32,
}

/// A face resolved against a specific size and frame: `spec.md` GLOSSARY.
/// Shared (never mutated) by every glyph that references it; lifetime spans
/// at least the longest-lived glyph pointing to it (hosts typically hand
/// out `Arc<dyn RealizedFace>`).
pub trait RealizedFace: Send + Sync {
    /// Point size this face was realized at; scales combining-code offsets
    /// (`spec.md` §4.4's `off_x_scaled`/`off_y_scaled`).
    fn size(&self) -> f32;
    fn space_width(&self) -> f32;
    fn ascent(&self) -> f32;
    fn descent(&self) -> f32;

    /// Box-edge decoration this face declares, if any.
    fn r#box(&self) -> Option<BoxMetrics> {
        None
    }

    /// True when this face should be rendered with foreground/background
    /// swapped.
    fn reverse_video(&self) -> bool {
        false
    }

    fn underline(&self) -> bool {
        false
    }

    fn strikethrough(&self) -> bool {
        false
    }

    /// The driver that knows how to shape and rasterize glyphs in this
    /// face.
    fn driver(&self) -> &dyn FontDriver;
}

/// Resolves faces for a character run and assigns per-glyph `face`/`code`.
pub trait FaceResolver {
    /// Realizes a concrete face from a family fallback list, language,
    /// charset and point size.
    fn realize(
        &self,
        faces: &[&str],
        language: Option<&str>,
        charset: Option<&str>,
        size: f32,
    ) -> crate::error::Result<std::sync::Arc<dyn RealizedFace>>;

    /// Assigns `face` and `code` on every glyph in `glyphs`, for a run that
    /// shares `script`/`language`/`charset`/`size`. May compact the slice
    /// (ligature formation is left to the per-font shaper, not here).
    fn for_chars(
        &self,
        script: &str,
        language: Option<&str>,
        charset: Option<&str>,
        glyphs: &mut [Glyph],
        size: f32,
    );

    /// Fills `width`/`lbearing`/`rbearing`/`ascent`/`descent` for glyphs in
    /// `[from, to)` of `glyphs`, using each glyph's already-assigned face.
    fn metrics(&self, glyphs: &mut [Glyph], from: usize, to: usize);
}

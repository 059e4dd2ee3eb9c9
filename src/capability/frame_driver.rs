//! `FrameDriver`: device-surface drawing primitives consumed by the
//! renderer (`spec.md` §6). Actual rasterization belongs to the host; this
//! crate only dispatches into it.

use crate::capability::face_resolver::RealizedFace;
use crate::capability::font_driver::{Region, WindowHandle};
use crate::glyph::GlyphString;

/// An opaque per-frame handle, forwarded verbatim to the host.
pub type FrameHandle = u64;

pub trait FrameDriver: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn fill_space(
        &self,
        frame: FrameHandle,
        win: WindowHandle,
        face: &dyn RealizedFace,
        is_cursor: bool,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        clip: Option<Region>,
    );

    #[allow(clippy::too_many_arguments)]
    fn draw_empty_boxes(
        &self,
        win: WindowHandle,
        x: f32,
        y: f32,
        gstring: &GlyphString,
        from: usize,
        to: usize,
        reverse: bool,
        clip: Option<Region>,
    );

    #[allow(clippy::too_many_arguments)]
    fn draw_box(
        &self,
        frame: FrameHandle,
        win: WindowHandle,
        gstring: &GlyphString,
        glyph_index: usize,
        x: f32,
        y: f32,
        width: f32,
        clip: Option<Region>,
    );

    #[allow(clippy::too_many_arguments)]
    fn draw_hline(
        &self,
        frame: FrameHandle,
        win: WindowHandle,
        gstring: &GlyphString,
        face: &dyn RealizedFace,
        reverse: bool,
        x: f32,
        y: f32,
        width: f32,
        clip: Option<Region>,
    );

    fn region_from_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Region;
    fn region_add_rect(&self, region: Region, x: f32, y: f32, w: f32, h: f32) -> Region;
    fn intersect_region(&self, a: Region, b: Region) -> Region;
    fn free_region(&self, region: Region);
    fn region_to_rect(&self, region: Region) -> (f32, f32, f32, f32);
}

//! Renderer (`spec.md` §4.7): the two-pass draw — background/cursor, then
//! glyph foreground — dispatched through [`FontDriver`]/[`FrameDriver`].

use std::sync::Arc;

use crate::capability::{FrameDriver, FrameHandle, RealizedFace, Region, WindowHandle};
use crate::control::DrawControl;
use crate::glyph::{GlyphKind, GlyphString, INVALID_CODE};

/// Per-glyph left-edge pen position within `gstring.body()`, accumulated
/// from `gstring.indent`.
fn pen_positions(gstring: &GlyphString) -> Vec<f32> {
    let mut xs = Vec::with_capacity(gstring.body().len());
    let mut x = gstring.indent;
    for g in gstring.body() {
        xs.push(x);
        x += g.width;
    }
    xs
}

fn same_face(a: &Option<Arc<dyn RealizedFace>>, b: &Option<Arc<dyn RealizedFace>>) -> bool {
    match (a, b) {
        (Some(fa), Some(fb)) => Arc::ptr_eq(fa, fb),
        (None, None) => false, // two faceless glyphs never group together
        _ => false,
    }
}

/// Renders `gstring` at `(origin_x, origin_y)` — `origin_y` is the
/// baseline.
pub fn render(
    gstring: &GlyphString,
    frame: FrameHandle,
    win: WindowHandle,
    origin_x: f32,
    origin_y: f32,
    control: &DrawControl,
    frame_driver: &dyn FrameDriver,
) {
    let xs = pen_positions(gstring);
    let body = gstring.body();
    if body.is_empty() {
        return;
    }

    let clip = if control.partial_update {
        Some(expanded_clip(gstring, &xs, origin_x, origin_y, control, frame_driver))
    } else {
        control.clip_region
    };

    background_and_cursor_pass(gstring, &xs, frame, win, origin_x, origin_y, control, frame_driver, clip);
    foreground_pass(gstring, &xs, frame, win, origin_x, origin_y, control, frame_driver, clip);

    if let Some(region) = clip {
        if control.partial_update {
            frame_driver.free_region(region);
        }
    }
}

/// `spec.md` §4.7's "partial update" ink-expansion: widen the clip by
/// however far the ink of the glyphs just outside `[from, to)` bleeds in,
/// via each side's `lbearing`/`rbearing`.
fn expanded_clip(
    gstring: &GlyphString,
    xs: &[f32],
    origin_x: f32,
    origin_y: f32,
    control: &DrawControl,
    frame_driver: &dyn FrameDriver,
) -> Region {
    let body = gstring.body();
    let mut left = origin_x;
    let mut right = origin_x + gstring.width;
    if let Some(first) = body.first() {
        left = left.min(origin_x + xs[0] + first.lbearing);
    }
    if let (Some(last), Some(&last_x)) = (body.last(), xs.last()) {
        right = right.max(origin_x + last_x + last.width.max(last.rbearing));
    }
    let top = origin_y - gstring.line_ascent;
    let height = gstring.line_ascent + gstring.line_descent;
    let region = frame_driver.region_from_rect(left, top, right - left, height);
    match control.clip_region {
        Some(existing) => frame_driver.intersect_region(existing, region),
        None => region,
    }
}

#[allow(clippy::too_many_arguments)]
fn background_and_cursor_pass(
    gstring: &GlyphString,
    xs: &[f32],
    frame: FrameHandle,
    win: WindowHandle,
    origin_x: f32,
    origin_y: f32,
    control: &DrawControl,
    frame_driver: &dyn FrameDriver,
    clip: Option<Region>,
) {
    let body = gstring.body();
    let mut i = 0;
    while i < body.len() {
        let face = body[i].face.clone();
        let mut j = i + 1;
        while j < body.len() && same_face(&body[j].face, &face) {
            j += 1;
        }

        if let Some(face) = &face {
            let group_x = origin_x + xs[i];
            let group_w: f32 = body[i..j].iter().map(|g| g.width).sum();
            if face.reverse_video() || control.as_image {
                frame_driver.fill_space(
                    frame,
                    win,
                    face.as_ref(),
                    false,
                    group_x,
                    origin_y - face.ascent(),
                    group_w,
                    face.ascent() + face.descent(),
                    clip,
                );
            }

            if control.with_cursor {
                draw_cursor_if_in_group(gstring, xs, i, j, origin_x, origin_y, face.as_ref(), control, frame, win, frame_driver, clip);
            }
        }
        i = j;
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_cursor_if_in_group(
    gstring: &GlyphString,
    xs: &[f32],
    from: usize,
    to: usize,
    origin_x: f32,
    origin_y: f32,
    face: &dyn RealizedFace,
    control: &DrawControl,
    frame: FrameHandle,
    win: WindowHandle,
    frame_driver: &dyn FrameDriver,
    clip: Option<Region>,
) {
    let body = gstring.body();
    let Some(cursor_idx) = body[from..to].iter().position(|g| g.pos == control.cursor_pos).map(|k| k + from) else {
        return;
    };
    let cluster_width = body[cursor_idx].width.max(1.0);
    let width = if control.cursor_bidi {
        1.0
    } else {
        let raw = if control.cursor_width < 0.0 { face.space_width() } else { control.cursor_width };
        raw.min(cluster_width)
    };
    let x = origin_x + xs[cursor_idx];
    frame_driver.fill_space(frame, win, face, true, x, origin_y - face.ascent(), width, face.ascent() + face.descent(), clip);

    if control.cursor_bidi {
        let tick_w = 4.0f32.min(cluster_width);
        let at_top = body[cursor_idx].bidi_level % 2 == 0;
        let tick_y = if at_top { origin_y - face.ascent() } else { origin_y + face.descent() - 2.0 };
        frame_driver.fill_space(frame, win, face, true, x, tick_y, tick_w, 2.0, clip);

        if cursor_idx > 0 {
            let prev = &body[cursor_idx - 1];
            if prev.pos + 1 == control.cursor_pos && prev.bidi_level != body[cursor_idx].bidi_level {
                let prev_x = origin_x + xs[cursor_idx - 1];
                let prev_at_top = prev.bidi_level % 2 == 0;
                let prev_tick_y = if prev_at_top { origin_y - face.ascent() } else { origin_y + face.descent() - 2.0 };
                frame_driver.fill_space(frame, win, face, true, prev_x, prev_tick_y, tick_w, 2.0, clip);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn foreground_pass(
    gstring: &GlyphString,
    xs: &[f32],
    frame: FrameHandle,
    win: WindowHandle,
    origin_x: f32,
    origin_y: f32,
    control: &DrawControl,
    frame_driver: &dyn FrameDriver,
    clip: Option<Region>,
) {
    let body = gstring.body();
    let reverse = control.orientation_reversed;
    let mut i = 0;
    while i < body.len() {
        let face = body[i].face.clone();
        let kind = body[i].kind;
        let valid = body[i].code != INVALID_CODE;
        let mut j = i + 1;
        while j < body.len()
            && same_face(&body[j].face, &face)
            && body[j].kind == kind
            && (body[j].code != INVALID_CODE) == valid
        {
            j += 1;
        }

        match kind {
            GlyphKind::Char if valid => {
                if let Some(face) = &face {
                    face.driver().render(win, origin_x + xs[i], origin_y, gstring, i, j, reverse, clip);
                }
            }
            GlyphKind::Char => {
                frame_driver.draw_empty_boxes(win, origin_x + xs[i], origin_y, gstring, i, j, reverse, clip);
            }
            GlyphKind::Box => {
                for k in i..j {
                    frame_driver.draw_box(frame, win, gstring, k, origin_x + xs[k], origin_y, body[k].width, clip);
                }
            }
            _ => {}
        }

        if let Some(face) = &face {
            let group_x = origin_x + xs[i];
            let group_w: f32 = body[i..j].iter().map(|g| g.width).sum();
            if face.underline() || face.strikethrough() {
                let underline_y = if face.underline() { origin_y + face.descent() * 0.5 } else { origin_y - face.ascent() * 0.6 };
                frame_driver.draw_hline(frame, win, gstring, face.as_ref(), reverse, group_x, underline_y, group_w, clip);
            }
            if let Some(_boxm) = face.r#box() {
                if !reverse {
                    frame_driver.draw_box(frame, win, gstring, i, group_x, origin_y - face.ascent(), group_w, clip);
                    frame_driver.draw_box(frame, win, gstring, i, group_x, origin_y + face.descent(), group_w, clip);
                }
            }
        }
        i = j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{BoxMetrics, FontDriver, Shaper};
    use crate::glyph::Glyph;
    use parking_lot::Mutex;

    struct FakeDriver {
        rendered: Mutex<Vec<(usize, usize)>>,
    }
    impl FontDriver for FakeDriver {
        fn render(&self, _: WindowHandle, _: f32, _: f32, _: &GlyphString, from: usize, to: usize, _: bool, _: Option<Region>) {
            self.rendered.lock().push((from, to));
        }
        fn encode_char(&self, ch: u32) -> u32 {
            ch
        }
        fn shaper(&self) -> Option<&dyn Shaper> {
            None
        }
    }

    struct FakeFace {
        driver: FakeDriver,
        reverse: bool,
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
        fn reverse_video(&self) -> bool {
            self.reverse
        }
        fn driver(&self) -> &dyn FontDriver {
            &self.driver
        }
    }

    #[derive(Default)]
    struct FakeFrame {
        fills: Mutex<Vec<(f32, f32, f32, f32)>>,
        empty_boxes: Mutex<Vec<(usize, usize)>>,
    }
    impl FrameDriver for FakeFrame {
        fn fill_space(&self, _: FrameHandle, _: WindowHandle, _: &dyn RealizedFace, _: bool, x: f32, y: f32, w: f32, h: f32, _: Option<Region>) {
            self.fills.lock().push((x, y, w, h));
        }
        fn draw_empty_boxes(&self, _: WindowHandle, _: f32, _: f32, _: &GlyphString, from: usize, to: usize, _: bool, _: Option<Region>) {
            self.empty_boxes.lock().push((from, to));
        }
        fn draw_box(&self, _: FrameHandle, _: WindowHandle, _: &GlyphString, _: usize, _: f32, _: f32, _: f32, _: Option<Region>) {}
        fn draw_hline(&self, _: FrameHandle, _: WindowHandle, _: &GlyphString, _: &dyn RealizedFace, _: bool, _: f32, _: f32, _: f32, _: Option<Region>) {}
        fn region_from_rect(&self, _: f32, _: f32, _: f32, _: f32) -> Region {
            1
        }
        fn region_add_rect(&self, region: Region, _: f32, _: f32, _: f32, _: f32) -> Region {
            region
        }
        fn intersect_region(&self, a: Region, _: Region) -> Region {
            a
        }
        fn free_region(&self, _: Region) {}
        fn region_to_rect(&self, _: Region) -> (f32, f32, f32, f32) {
            (0.0, 0.0, 0.0, 0.0)
        }
    }

    fn char_glyph(ch: char, pos: usize, face: Arc<dyn RealizedFace>, code: u32) -> Glyph {
        let mut g = Glyph::from_char(ch as u32, pos, pos + 1);
        g.width = 10.0;
        g.ascent = 10.0;
        g.descent = 2.0;
        g.face = Some(face);
        g.code = code;
        g
    }

    #[test]
    fn valid_code_dispatches_to_font_driver() {
        let face: Arc<dyn RealizedFace> = Arc::new(FakeFace { driver: FakeDriver { rendered: Mutex::new(Vec::new()) }, reverse: false });
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, face, 1));
        let frame = FakeFrame::default();
        render(&gs, 0, 0, 0.0, 0.0, &control, &frame);
        assert!(frame.empty_boxes.lock().is_empty());
    }

    #[test]
    fn invalid_code_dispatches_to_empty_boxes() {
        let face: Arc<dyn RealizedFace> = Arc::new(FakeFace { driver: FakeDriver { rendered: Mutex::new(Vec::new()) }, reverse: false });
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, face, INVALID_CODE));
        let frame = FakeFrame::default();
        render(&gs, 0, 0, 0.0, 0.0, &control, &frame);
        assert_eq!(frame.empty_boxes.lock().len(), 1);
    }

    #[test]
    fn reverse_video_face_fills_background() {
        let face: Arc<dyn RealizedFace> = Arc::new(FakeFace { driver: FakeDriver { rendered: Mutex::new(Vec::new()) }, reverse: true });
        let control = DrawControl::default();
        let mut gs = GlyphString::new(0, 1, control.clone());
        gs.insert_body(0, char_glyph('a', 0, face, 1));
        let frame = FakeFrame::default();
        render(&gs, 0, 0, 0.0, 0.0, &control, &frame);
        assert!(!frame.fills.lock().is_empty());
    }

    #[test]
    fn empty_gstring_renders_nothing() {
        let control = DrawControl::default();
        let gs = GlyphString::new(0, 0, control.clone());
        let frame = FakeFrame::default();
        render(&gs, 0, 0, 0.0, 0.0, &control, &frame);
        assert!(frame.fills.lock().is_empty());
    }
}

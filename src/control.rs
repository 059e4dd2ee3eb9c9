//! `DrawControl`: the per-call configuration object (`spec.md` §6), plus
//! the `format`/`line_break` callback capabilities DESIGN NOTES §9 models
//! as small trait objects rather than raw function pointers.

use std::sync::Arc;

use crate::capability::Region;

/// Which bidi backend the reorderer should use (`SPEC_FULL.md` §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BidiEngineKind {
    /// Full Unicode Bidi Algorithm via the `unicode-bidi` crate.
    #[default]
    Unicode,
    /// Legacy-compatible flat reversal; does not resolve neutrals.
    Naive,
}

/// Which line-break algorithm backs the default (no custom `line_break`
/// capability) path (`SPEC_FULL.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreakerKind {
    /// `spec.md` §4.9's "nearest preceding whitespace" policy.
    #[default]
    Default,
    /// UAX #14 via the `unicode-linebreak` crate.
    Unicode,
}

/// Per-line formatter callback (`spec.md` §6 `format` option): given the
/// physical line index and its `y` origin, may adjust `indent` and
/// `width_limit` for that line.
pub trait Formatter: Send + Sync {
    fn format(&self, line: usize, y: f32, indent: &mut f32, width_limit: &mut f32);
}

/// Custom line-break callback (`spec.md` §6 `line_break` option /
/// §4.5 step 3): given the greedy overflow position, may return any
/// position strictly within `(from, to)`.
pub trait LineBreakCapability: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn line_break(
        &self,
        overflow_pos: usize,
        from: usize,
        to: usize,
        line: usize,
        y: f32,
    ) -> usize;
}

/// The options table from `spec.md` §6.
#[derive(Clone, Default)]
pub struct DrawControl {
    pub as_image: bool,
    pub with_cursor: bool,
    pub cursor_pos: usize,
    /// Negative means "use face space width"; zero means "no cursor".
    pub cursor_width: f32,
    pub cursor_bidi: bool,
    pub enable_bidi: bool,
    pub bidi_engine: BidiEngineKind,
    pub orientation_reversed: bool,
    pub two_dimensional: bool,
    pub max_line_width: f32,
    pub tab_width: u32,
    pub min_line_ascent: f32,
    pub max_line_ascent: f32,
    pub min_line_descent: f32,
    pub max_line_descent: f32,
    pub fixed_width: bool,
    pub align_head: bool,
    pub ignore_formatting_char: bool,
    pub anti_alias: bool,
    pub disable_caching: bool,
    pub partial_update: bool,
    pub line_breaker: LineBreakerKind,
    pub format: Option<Arc<dyn Formatter>>,
    pub line_break: Option<Arc<dyn LineBreakCapability>>,
    pub clip_region: Option<Region>,
}

impl DrawControl {
    /// `control.tab_width` defaults to 8 when unset (`spec.md` §4.4).
    pub fn effective_tab_width(&self) -> u32 {
        if self.tab_width == 0 {
            8
        } else {
            self.tab_width
        }
    }

    /// True when this control's fields that participate in the glyph-cache
    /// "prefix before `with_cursor`" comparison (`spec.md` §4.6 step 2)
    /// match `other`. Cursor position/width intentionally excluded.
    pub fn cache_prefix_eq(&self, other: &DrawControl) -> bool {
        self.enable_bidi == other.enable_bidi
            && self.bidi_engine == other.bidi_engine
            && self.orientation_reversed == other.orientation_reversed
            && self.two_dimensional == other.two_dimensional
            && self.max_line_width == other.max_line_width
            && self.tab_width == other.tab_width
            && self.min_line_ascent == other.min_line_ascent
            && self.max_line_ascent == other.max_line_ascent
            && self.min_line_descent == other.min_line_descent
            && self.max_line_descent == other.max_line_descent
            && self.fixed_width == other.fixed_width
            && self.align_head == other.align_head
            && self.ignore_formatting_char == other.ignore_formatting_char
            && self.line_breaker == other.line_breaker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tab_width_is_8() {
        let c = DrawControl::default();
        assert_eq!(c.effective_tab_width(), 8);
    }

    #[test]
    fn explicit_tab_width_is_kept() {
        let mut c = DrawControl::default();
        c.tab_width = 4;
        assert_eq!(c.effective_tab_width(), 4);
    }

    #[test]
    fn cache_prefix_eq_ignores_cursor_fields() {
        let mut a = DrawControl::default();
        let mut b = DrawControl::default();
        a.cursor_pos = 3;
        b.cursor_pos = 9;
        a.with_cursor = true;
        assert!(a.cache_prefix_eq(&b));
    }

    #[test]
    fn cache_prefix_eq_detects_tab_width_change() {
        let mut a = DrawControl::default();
        let b = DrawControl::default();
        a.tab_width = 4;
        assert!(!a.cache_prefix_eq(&b));
    }
}

//! Per-character script resolution (`spec.md` §4.3 step 3).

use crate::capability::{Environment, TextStore};
use crate::glyph::CharPos;

pub const LATIN: &str = "latin";

/// ASCII (excluding control characters, handled separately as `^X` pairs)
/// always resolves to `latin`. Everything else defers to `env`.
fn explicit_script(env: &dyn Environment, ch: u32) -> Option<&'static str> {
    if ch < 128 {
        Some(LATIN)
    } else {
        env.script_of(ch)
    }
}

/// Resolves the script for the character at `pos`:
///
/// - ASCII → `latin`.
/// - Inherited/none (no explicit script) → propagate `previous`.
/// - If still none (the very first non-inherited character), search
///   forward within `[pos, to)` for the first character with an explicit
///   script.
pub fn resolve(
    env: &dyn Environment,
    text: &dyn TextStore,
    pos: CharPos,
    to: CharPos,
    previous: Option<&'static str>,
) -> Option<&'static str> {
    let ch = text.char_at(pos);
    if let Some(script) = explicit_script(env, ch) {
        return Some(script);
    }
    if previous.is_some() {
        return previous;
    }
    for p in (pos + 1)..to {
        if let Some(script) = explicit_script(env, text.char_at(p)) {
            return Some(script);
        }
    }
    None
}

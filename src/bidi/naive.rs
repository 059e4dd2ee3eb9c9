//! Legacy-compatible reordering: a flat reversal of the whole cluster
//! sequence when the base direction is right-to-left, with no neutral or
//! nesting resolution. Exists for callers migrating off older bindings
//! that only ever flipped the buffer, per `SPEC_FULL.md` §4.2.

use super::BidiEngine;

pub struct NaiveReversalEngine;

impl BidiEngine for NaiveReversalEngine {
    fn resolve(&self, chars: &[char], base_rtl: bool) -> (Vec<u8>, Vec<usize>) {
        let n = chars.len();
        let level = if base_rtl { 1u8 } else { 0u8 };
        let levels = vec![level; n];
        let order = if base_rtl { (0..n).rev().collect() } else { (0..n).collect() };
        (levels, order)
    }
}

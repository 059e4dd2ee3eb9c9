//! Full Unicode Bidirectional Algorithm backend, grounded on
//! `danmolitor-forme`'s `engine/src/text/bidi.rs`: build a throwaway string
//! from the cluster's representative characters, run `unicode-bidi`'s
//! `BidiInfo`, then apply the classic L2 run-reversal to a permutation of
//! cluster indices instead of the forme example's flat glyph vector.

use unicode_bidi::{BidiInfo, Level};

use super::BidiEngine;

pub struct UnicodeBidiEngine;

impl BidiEngine for UnicodeBidiEngine {
    fn resolve(&self, chars: &[char], base_rtl: bool) -> (Vec<u8>, Vec<usize>) {
        if chars.is_empty() {
            return (Vec::new(), Vec::new());
        }
        let text: String = chars.iter().collect();
        let base_level = if base_rtl { Level::rtl() } else { Level::ltr() };
        let bidi_info = BidiInfo::new(&text, Some(base_level));

        let mut levels = Vec::with_capacity(chars.len());
        for (byte_idx, _) in text.char_indices() {
            let level = bidi_info.levels.get(byte_idx).copied().unwrap_or(base_level);
            levels.push(level.number());
        }

        let order = reorder_levels(&levels);
        (levels, order)
    }
}

/// L2 of the Unicode Bidirectional Algorithm: from the highest level down
/// to the lowest odd level, reverse every maximal run of clusters at or
/// above that level. Operates on a permutation of logical indices so the
/// caller can apply it to clusters rather than individual glyphs.
fn reorder_levels(levels: &[u8]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    let max_level = *levels.iter().max().unwrap_or(&0);
    if max_level == 0 {
        return order;
    }
    let min_odd = levels.iter().copied().filter(|&l| l % 2 == 1).min().unwrap_or(1);

    let mut level = max_level;
    loop {
        let mut i = 0;
        while i < order.len() {
            if levels[order[i]] >= level {
                let start = i;
                while i < order.len() && levels[order[i]] >= level {
                    i += 1;
                }
                order[start..i].reverse();
            } else {
                i += 1;
            }
        }
        if level <= min_odd {
            break;
        }
        level -= 1;
    }
    order
}

//! `TextStore`: the text-property storage capability the engine is driven
//! against (`spec.md` §6). Font discovery, rasterization, and actual text
//! storage live in the host application; this crate only defines the trait
//! boundary.

use std::any::Any;
use std::sync::Arc;

/// Flags recognized by [`TextStore::attach_prop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropFlags {
    /// The property is detached automatically when any edit touches its
    /// span (`spec.md` §4.6's `VOLATILE_STRONG` semantics).
    pub volatile: bool,
    /// The property holds a strong (owning) reference to its value.
    pub strong: bool,
}

impl PropFlags {
    pub const VOLATILE_STRONG: PropFlags = PropFlags {
        volatile: true,
        strong: true,
    };
}

/// Opaque handle to an attached property, returned by [`TextStore::property`]
/// and consumed by [`TextStore::detach_prop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropHandle(pub u64);

/// A property value. Character properties (`script`, `category`,
/// `combining-class`, `bidi-category`) are typically `U32`; text properties
/// like `face`/`language`/`charset`/the glyph cache are `Any`.
#[derive(Clone)]
pub enum PropValue {
    U32(u32),
    Any(Arc<dyn Any + Send + Sync>),
    None,
}

impl PropValue {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            PropValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        match self {
            PropValue::Any(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}

/// Recognized property keys the engine reads or writes (`spec.md` §6).
pub mod keys {
    pub const FACE: &str = "face";
    pub const LANGUAGE: &str = "language";
    pub const CHARSET: &str = "charset";
    pub const SCRIPT: &str = "script";
    pub const CATEGORY: &str = "category";
    pub const COMBINING_CLASS: &str = "combining-class";
    pub const BIDI_CATEGORY: &str = "bidi-category";
    pub const GLYPH_STRING: &str = "glyph-string";
}

/// Text-property storage, consumed by the composer, the glyph cache, and
/// the script-resolution fallback path.
pub trait TextStore {
    fn char_at(&self, pos: usize) -> u32;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_prop(&self, pos: usize, key: &str) -> PropValue;

    /// Fills up to `limit` consecutive property values starting at `pos`.
    fn get_props(&self, pos: usize, key: &str, limit: usize) -> Vec<PropValue>;

    /// Returns the maximal range around `pos` over which the property named
    /// `key` is constant, optionally extending the search `backward` and
    /// `forward` of `pos`, and `deep` into nested scopes if the store has
    /// any notion of nesting.
    fn prop_range(
        &self,
        pos: usize,
        key: &str,
        backward: bool,
        forward: bool,
        deep: bool,
    ) -> (usize, usize);

    fn attach_prop(&self, key: &str, from: usize, to: usize, value: PropValue, flags: PropFlags)
        -> PropHandle;

    fn detach_prop(&self, prop: PropHandle);

    fn property(&self, pos: usize, key: &str) -> Option<PropHandle>;
}

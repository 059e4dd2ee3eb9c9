//! Crate error type and the legacy sentinel/thread-local compatibility shim.
//!
//! `spec.md` describes input-validation failures returning a sentinel value
//! (`-1`, a null handle) while setting a thread-local error code. The
//! idiomatic core of this crate returns `Result<T, ShapeError>`; the sentinel
//! API in [`legacy`] is a thin wrapper for callers that need the old shape.

use std::cell::Cell;

use thiserror::Error;

/// Errors produced by the shaping and layout core.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("character range [{from}, {to}) is out of bounds for text of length {len}")]
    Range {
        from: usize,
        to: usize,
        len: usize,
    },
    #[error("from ({from}) must not be greater than to ({to})")]
    InvertedRange { from: usize, to: usize },
    #[error("failed to realize a face")]
    Face(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to allocate a glyph string")]
    Draw,
    #[error("failed to allocate scratch buffers for {what}")]
    Resource { what: &'static str },
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// Thread-local error codes mirroring the legacy sentinel-based API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    None,
    Range,
    Draw,
    Resource,
}

thread_local! {
    static LAST_ERROR: Cell<ErrorCode> = const { Cell::new(ErrorCode::None) };
}

impl From<&ShapeError> for ErrorCode {
    fn from(e: &ShapeError) -> Self {
        match e {
            ShapeError::Range { .. } | ShapeError::InvertedRange { .. } => ErrorCode::Range,
            ShapeError::Face(_) | ShapeError::Draw => ErrorCode::Draw,
            ShapeError::Resource { .. } => ErrorCode::Resource,
        }
    }
}

/// Compatibility layer for callers that want the legacy sentinel-returning
/// style instead of `Result`. Not the crate's primary surface — see
/// `SPEC_FULL.md` §7.
pub mod legacy {
    use super::{ErrorCode, Result, ShapeError, LAST_ERROR};

    /// Returns the error code set by the most recent failing call made
    /// through [`record`] on this thread.
    pub fn last_error() -> ErrorCode {
        LAST_ERROR.with(|c| c.get())
    }

    /// Clears and returns the current thread-local error code.
    pub fn take_error() -> ErrorCode {
        LAST_ERROR.with(|c| c.replace(ErrorCode::None))
    }

    /// Runs `f`, recording its error (if any) as the thread-local error
    /// code and collapsing the result to the sentinel `on_err` value.
    pub fn sentinel<T>(f: impl FnOnce() -> Result<T>, on_err: T) -> T {
        match f() {
            Ok(v) => {
                LAST_ERROR.with(|c| c.set(ErrorCode::None));
                v
            }
            Err(e) => {
                LAST_ERROR.with(|c| c.set(ErrorCode::from(&e)));
                tracing::debug!(error = %e, "operation failed, returning sentinel");
                on_err
            }
        }
    }

    #[allow(dead_code)]
    fn _assert_error_is_send_sync() {
        fn assert<T: Send + Sync>() {}
        assert::<ShapeError>();
    }
}

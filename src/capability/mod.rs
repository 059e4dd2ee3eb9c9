//! External collaborator traits (`spec.md` §6): `TextStore`, `FaceResolver`,
//! `FontDriver`, `FrameDriver`, `Environment`. This crate defines only the
//! trait boundary — font discovery, rasterization and text storage are host
//! concerns.

mod environment;
mod face_resolver;
mod font_driver;
mod frame_driver;
mod text_store;

pub use environment::{BidiCategory, Environment, UnicodeEnvironment};
pub use face_resolver::{BoxId, BoxMetrics, FaceResolver, RealizedFace};
pub use font_driver::{FontDriver, Region, Shaper, WindowHandle};
pub use frame_driver::{FrameDriver, FrameHandle};
pub use text_store::{keys, PropFlags, PropHandle, PropValue, TextStore};

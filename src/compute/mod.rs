//! Compute module - Block pattern codec and keyframe timeline engine.

mod codec;
mod timeline;

pub use codec::*;
pub use timeline::*;

//! Schema module - Value types and configuration for the costume editors.

mod color;
mod config;
mod grid;
mod timeline;

pub use color::*;
pub use config::*;
pub use grid::*;
pub use timeline::*;

//! Costume Lights - Pattern codec and keyframe timeline for LED dance costumes.
//!
//! This crate holds the editing core behind a costume light editor: a block
//! editor that paints a static 9x16x16 RGB grid, and an armor editor that
//! paints per-body-part colors on a timeline scrubbed against music.
//!
//! # Architecture
//!
//! - `schema`: Value types (colors, grids, keyframes) and configuration
//! - `compute`: The block pattern codec and the keyframe timeline engine
//! - `animation`: Sampling timelines into light frames for playback
//!
//! All operations are pure: editing returns a new grid, track or table and
//! leaves the previous snapshot intact.
//!
//! # Example
//!
//! ```rust
//! use costume_lights::{
//!     compute::{ActionTable, BlockPattern},
//!     schema::{BodyPart, CellIndex, Color, Grid, PartSlots, TimelineConfig},
//! };
//!
//! // Block editor: paint and encode
//! let grid = Grid::new().painted(CellIndex::new(0, 0, 0), Color::RED).unwrap();
//! let code = BlockPattern::new(grid, PartSlots::default()).encode();
//! assert_eq!(code.len(), 2310);
//!
//! // Armor editor: paint a pulse and resolve it
//! let config = TimelineConfig { duration: 5000, ..Default::default() };
//! let table = ActionTable::new(1)
//!     .insert(0, BodyPart::Head, 120, Color::BLUE, &config)
//!     .unwrap();
//! assert_eq!(table.resolve(0, BodyPart::Head, 300), Color::BLUE);
//! ```

pub mod animation;
pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{ActionTable, BlockPattern, CodecError, TimelineError, Track};
pub use schema::{BodyPart, Color, EditorConfig, Grid, Keyframe, PartSlots};

//! Playback sampling of costume timelines.
//!
//! A [`TimelinePlayer`] walks one player's tracks at a fixed step and packs
//! each body part's displayed color into a [`LightFrame`]. A whole run is a
//! [`LightList`], which serializes to JSON for the backend or to a compact
//! binary form for controllers:
//!
//! ```text
//! Header (24 bytes):
//!   Magic: "CLTL" (4 bytes)
//!   Version: u16
//!   Reserved: 2 bytes
//!   Player: u32
//!   Step (ms): u32
//!   Frame count: u64
//!
//! Frames (frame_count * 40 bytes):
//!   Time (ms): u32
//!   Colors: 9 * u32 (0xRRGGBBAA, body part order)
//! ```

mod format;
mod player;

pub use format::{LIGHT_LIST_MAGIC, LIGHT_LIST_VERSION, LightFrame, LightList};
pub use player::{FrameIterator, TimelinePlayer};

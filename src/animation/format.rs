//! Light list definitions for costume controllers.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::schema::{BodyPart, Color};

/// Magic bytes identifying a binary light list.
pub const LIGHT_LIST_MAGIC: &[u8; 4] = b"CLTL";

/// Current binary format version.
pub const LIGHT_LIST_VERSION: u16 = 1;

/// Colors of every body part of one player at one instant.
///
/// Serializes as the backend's per-frame record, one integer field per part:
/// `{"time", "head", "shoulder", "chest", "front", "skirt", "leg", "shoes",
/// "weap_1", "weap_2"}`. Each part is the full unsigned `0xRRGGBBAA` word
/// (red is `4278190335`), the same words the backend's test light lists
/// carry; its integer fields are unbounded, so no range folding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FrameRecord", into = "FrameRecord")]
pub struct LightFrame {
    /// Time in milliseconds.
    pub time: u32,
    /// Packed `0xRRGGBBAA` colors in [`BodyPart::ALL`] order.
    pub colors: [u32; BodyPart::COUNT],
}

/// Wire form of [`LightFrame`], fields in [`BodyPart::ALL`] order.
#[derive(Serialize, Deserialize)]
struct FrameRecord {
    time: u32,
    head: u32,
    shoulder: u32,
    chest: u32,
    front: u32,
    skirt: u32,
    leg: u32,
    shoes: u32,
    weap_1: u32,
    weap_2: u32,
}

impl From<LightFrame> for FrameRecord {
    fn from(frame: LightFrame) -> Self {
        let [head, shoulder, chest, front, skirt, leg, shoes, weap_1, weap_2] = frame.colors;
        Self {
            time: frame.time,
            head,
            shoulder,
            chest,
            front,
            skirt,
            leg,
            shoes,
            weap_1,
            weap_2,
        }
    }
}

impl From<FrameRecord> for LightFrame {
    fn from(r: FrameRecord) -> Self {
        Self {
            time: r.time,
            colors: [
                r.head, r.shoulder, r.chest, r.front, r.skirt, r.leg, r.shoes, r.weap_1, r.weap_2,
            ],
        }
    }
}

impl LightFrame {
    /// Size of one encoded frame in bytes.
    pub const SIZE: usize = 4 + 4 * BodyPart::COUNT;

    /// Pack resolved part colors. Alpha is applied to the channels first, so
    /// the packed word is what the LEDs show.
    pub fn from_colors(time: u32, colors: &[Color; BodyPart::COUNT]) -> Self {
        Self {
            time,
            colors: std::array::from_fn(|i| {
                let [r, g, b] = colors[i].premultiplied();
                Color::rgb(r, g, b).to_rgba_u32()
            }),
        }
    }

    pub fn color(&self, part: BodyPart) -> u32 {
        self.colors[part.index()]
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.time.to_le_bytes())?;
        for color in self.colors {
            w.write_all(&color.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf4 = [0u8; 4];

        r.read_exact(&mut buf4)?;
        let time = u32::from_le_bytes(buf4);

        let mut colors = [0u32; BodyPart::COUNT];
        for color in &mut colors {
            r.read_exact(&mut buf4)?;
            *color = u32::from_le_bytes(buf4);
        }

        Ok(Self { time, colors })
    }
}

/// Sampled light frames for one player, as served to a controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LightList {
    /// Player the frames belong to.
    pub player: u32,
    /// Sampling step in milliseconds.
    pub step_ms: u32,
    pub color_data: Vec<LightFrame>,
}

impl LightList {
    /// Size of the binary header in bytes.
    /// Magic(4) + Version(2) + Reserved(2) + Player(4) + Step(4) + FrameCount(8) = 24
    pub const HEADER_SIZE: usize = 24;

    /// Frames `[index * size, (index + 1) * size)`, clipped to the list.
    ///
    /// Controllers fetch long lists piecewise; an index past the end yields
    /// an empty slice.
    pub fn chunk(&self, index: usize, size: usize) -> &[LightFrame] {
        let start = index.saturating_mul(size).min(self.color_data.len());
        let end = start.saturating_add(size).min(self.color_data.len());
        &self.color_data[start..end]
    }

    /// Write the binary form.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(LIGHT_LIST_MAGIC)?;
        w.write_all(&LIGHT_LIST_VERSION.to_le_bytes())?;
        // Reserved
        w.write_all(&[0u8; 2])?;
        w.write_all(&self.player.to_le_bytes())?;
        w.write_all(&self.step_ms.to_le_bytes())?;
        w.write_all(&(self.color_data.len() as u64).to_le_bytes())?;
        for frame in &self.color_data {
            frame.write_to(w)?;
        }
        Ok(())
    }

    /// Read the binary form.
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != LIGHT_LIST_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid CLTL magic bytes",
            ));
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != LIGHT_LIST_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported CLTL version: {}", version),
            ));
        }

        // Skip reserved bytes
        r.read_exact(&mut buf2)?;

        r.read_exact(&mut buf4)?;
        let player = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let step_ms = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let frame_count = u64::from_le_bytes(buf8);

        let mut color_data = Vec::new();
        for _ in 0..frame_count {
            color_data.push(LightFrame::read_from(r)?);
        }

        Ok(Self {
            player,
            step_ms,
            color_data,
        })
    }
}

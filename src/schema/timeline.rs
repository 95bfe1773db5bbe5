//! Body parts and keyframes for the per-player color timeline.

use serde::{Deserialize, Serialize};

use super::Color;

/// Costume body part driven by its own timeline track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    #[serde(rename = "head")]
    Head,
    #[serde(rename = "shoulderPads")]
    ShoulderPads,
    #[serde(rename = "bodyUpper")]
    BodyUpper,
    #[serde(rename = "belt_arms")]
    BeltArms,
    #[serde(rename = "legsUpper")]
    LegsUpper,
    #[serde(rename = "legsLower")]
    LegsLower,
    #[serde(rename = "shoes")]
    Shoes,
    #[serde(rename = "weap_1")]
    Weapon1,
    #[serde(rename = "weap_2")]
    Weapon2,
}

impl BodyPart {
    /// Number of body parts per player.
    pub const COUNT: usize = 9;

    /// All parts in track-table order.
    pub const ALL: [BodyPart; Self::COUNT] = [
        BodyPart::Head,
        BodyPart::ShoulderPads,
        BodyPart::BodyUpper,
        BodyPart::BeltArms,
        BodyPart::LegsUpper,
        BodyPart::LegsLower,
        BodyPart::Shoes,
        BodyPart::Weapon1,
        BodyPart::Weapon2,
    ];

    /// Slot of this part in a player's track table.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used by the editor UI.
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::ShoulderPads => "shoulderPads",
            BodyPart::BodyUpper => "bodyUpper",
            BodyPart::BeltArms => "belt_arms",
            BodyPart::LegsUpper => "legsUpper",
            BodyPart::LegsLower => "legsLower",
            BodyPart::Shoes => "shoes",
            BodyPart::Weapon1 => "weap_1",
            BodyPart::Weapon2 => "weap_2",
        }
    }
}

/// Index did not name a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown body part index {0} (expected 0..{count})", count = BodyPart::COUNT)]
pub struct UnknownBodyPart(pub usize);

impl TryFrom<usize> for BodyPart {
    type Error = UnknownBodyPart;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(index).copied().ok_or(UnknownBodyPart(index))
    }
}

/// The color becomes `color` at `time` (ms) and holds until the next keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: u32,
    pub color: Color,
}

impl Keyframe {
    pub const fn new(time: u32, color: Color) -> Self {
        Self { time, color }
    }

    /// Black boundary keyframe.
    pub const fn off(time: u32) -> Self {
        Self::new(time, Color::BLACK)
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color.is_black()
    }
}

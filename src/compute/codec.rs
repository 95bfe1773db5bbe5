//! Block pattern codec.
//!
//! A costume block pattern (9x16x16 grid plus six part slots) is stored as a
//! string of octal digits, one per cell, each the 3-bit on/off mask of the
//! cell's R, G and B channels:
//!
//! ```text
//! Cells (2304 digits):
//!   for block in 0..9, row in 0..16:
//!     even row: col 15 -> 0
//!     odd row:  col 0 -> 15
//! Part slots (6 digits):
//!   head, leftHand, body, rightHand, rightLeg, leftLeg
//! ```
//!
//! Only on/off per channel survives; alpha is not stored and is supplied by
//! the caller on decode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{CELL_COUNT, Color, Grid, PartSlot, PartSlots};

/// Length of an encoded block pattern in digits.
pub const PATTERN_CODE_LEN: usize = CELL_COUNT + PartSlot::ALL.len();

/// Why a pattern code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The code does not have exactly [`PATTERN_CODE_LEN`] characters.
    Length { expected: usize, actual: usize },
    /// A character outside `'0'..='7'`.
    Digit { position: usize, found: char },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::Length { expected, actual } => {
                write!(f, "expected {expected} digits, got {actual}")
            }
            MalformedReason::Digit { position, found } => {
                write!(f, "invalid digit {found:?} at position {position}")
            }
        }
    }
}

/// Block codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed pattern code: {reason}")]
    MalformedInput { reason: MalformedReason },
    #[error("Invalid pattern payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A block grid together with its part slot colors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockPattern {
    pub grid: Grid,
    #[serde(default)]
    pub slots: PartSlots,
}

impl BlockPattern {
    pub fn new(grid: Grid, slots: PartSlots) -> Self {
        Self { grid, slots }
    }

    /// Encode to a pattern code.
    pub fn encode(&self) -> String {
        encode(&self.grid, &self.slots)
    }

    /// Decode a pattern code, giving every color the alpha `alpha`.
    pub fn decode(code: &str, alpha: f32) -> Result<Self, CodecError> {
        let (grid, slots) = decode(code, alpha)?;
        Ok(Self { grid, slots })
    }
}

/// Transport envelope for a pattern code: `{"color": "<digits>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePayload {
    pub color: String,
}

impl FramePayload {
    pub fn from_pattern(pattern: &BlockPattern) -> Self {
        Self {
            color: pattern.encode(),
        }
    }

    /// Parse the JSON envelope.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_pattern(&self, alpha: f32) -> Result<BlockPattern, CodecError> {
        BlockPattern::decode(&self.color, alpha)
    }
}

/// Encode a grid and its part slots into a pattern code.
///
/// Always returns exactly [`PATTERN_CODE_LEN`] digits in `'0'..='7'`.
pub fn encode(grid: &Grid, slots: &PartSlots) -> String {
    let mut code = String::with_capacity(PATTERN_CODE_LEN);
    for cell in Grid::serpentine() {
        // serpentine() only yields in-range cells
        let color = grid.get(cell).unwrap_or_default();
        code.push(code_digit(color));
    }
    for slot in PartSlot::ALL {
        code.push(code_digit(slots.get(slot)));
    }
    code
}

/// Decode a pattern code.
///
/// The whole code is validated before anything is built; a malformed code
/// never yields a partial grid.
pub fn decode(code: &str, alpha: f32) -> Result<(Grid, PartSlots), CodecError> {
    let digits = parse_digits(code)?;

    let mut grid = Grid::new();
    for (cell, &digit) in Grid::serpentine().zip(&digits[..CELL_COUNT]) {
        *grid.cell_mut(cell) = Color::from_code(digit, alpha);
    }

    let slots = PartSlot::ALL
        .iter()
        .zip(&digits[CELL_COUNT..])
        .fold(PartSlots::default(), |slots, (&slot, &digit)| {
            slots.with(slot, Color::from_code(digit, alpha))
        });

    log::trace!("Decoded pattern code ({} digits)", digits.len());
    Ok((grid, slots))
}

#[inline]
fn code_digit(color: Color) -> char {
    char::from(b'0' + color.code())
}

fn parse_digits(code: &str) -> Result<Vec<u8>, CodecError> {
    let actual = code.chars().count();
    if actual != PATTERN_CODE_LEN {
        return Err(CodecError::MalformedInput {
            reason: MalformedReason::Length {
                expected: PATTERN_CODE_LEN,
                actual,
            },
        });
    }

    code.chars()
        .enumerate()
        .map(|(position, found)| match found {
            '0'..='7' => Ok(found as u8 - b'0'),
            _ => Err(CodecError::MalformedInput {
                reason: MalformedReason::Digit { position, found },
            }),
        })
        .collect()
}

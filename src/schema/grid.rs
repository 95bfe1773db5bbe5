//! Block grid and auxiliary part slots edited by the block editor.

use serde::{Deserialize, Serialize};

use super::Color;

/// Number of blocks in a costume grid.
pub const BLOCK_COUNT: usize = 9;

/// Side length of one square block in cells.
pub const BLOCK_SIZE: usize = 16;

/// Total number of cells across all blocks.
pub const CELL_COUNT: usize = BLOCK_COUNT * BLOCK_SIZE * BLOCK_SIZE;

/// One 16x16 block of cells, indexed `[row][col]`.
pub type Block = [[Color; BLOCK_SIZE]; BLOCK_SIZE];

/// Position of a single cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub block: usize,
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub const fn new(block: usize, row: usize, col: usize) -> Self {
        Self { block, row, col }
    }

    fn in_bounds(&self) -> bool {
        self.block < BLOCK_COUNT && self.row < BLOCK_SIZE && self.col < BLOCK_SIZE
    }
}

/// Grid editing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Cell (block {block}, row {row}, col {col}) is outside the 9x16x16 grid")]
    CellOutOfRange { block: usize, row: usize, col: usize },
}

/// Fixed-shape 9x16x16 color grid.
///
/// The shape is encoded in the type, so no block, row or cell can ever be
/// missing. Painting returns a new grid and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    blocks: Box<[Block; BLOCK_COUNT]>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an all-zero grid.
    pub fn new() -> Self {
        Self::filled(Color::default())
    }

    /// Create a grid with every cell set to `color`.
    pub fn filled(color: Color) -> Self {
        Self {
            blocks: Box::new([[[color; BLOCK_SIZE]; BLOCK_SIZE]; BLOCK_COUNT]),
        }
    }

    /// Get a cell color, or `None` when the index is out of range.
    pub fn get(&self, cell: CellIndex) -> Option<Color> {
        cell.in_bounds()
            .then(|| self.blocks[cell.block][cell.row][cell.col])
    }

    /// Return a copy of this grid with one cell repainted.
    pub fn painted(&self, cell: CellIndex, color: Color) -> Result<Grid, GridError> {
        if !cell.in_bounds() {
            return Err(GridError::CellOutOfRange {
                block: cell.block,
                row: cell.row,
                col: cell.col,
            });
        }
        let mut next = self.clone();
        next.blocks[cell.block][cell.row][cell.col] = color;
        Ok(next)
    }

    /// Borrow one block.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn blocks(&self) -> &[Block; BLOCK_COUNT] {
        &self.blocks
    }

    /// Iterate cell indices in serpentine order.
    ///
    /// Blocks and rows ascend; even rows run right to left, odd rows left to
    /// right. The block codec emits and reads digits in exactly this order.
    pub fn serpentine() -> impl Iterator<Item = CellIndex> {
        (0..BLOCK_COUNT).flat_map(|block| {
            (0..BLOCK_SIZE).flat_map(move |row| {
                (0..BLOCK_SIZE).map(move |step| {
                    let col = if row % 2 == 0 {
                        BLOCK_SIZE - 1 - step
                    } else {
                        step
                    };
                    CellIndex::new(block, row, col)
                })
            })
        })
    }

    pub(crate) fn cell_mut(&mut self, cell: CellIndex) -> &mut Color {
        &mut self.blocks[cell.block][cell.row][cell.col]
    }
}

/// Solid-color costume regions outside the pixel grid.
///
/// Listed in the order the block codec stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartSlot {
    Head,
    LeftHand,
    Body,
    RightHand,
    RightLeg,
    LeftLeg,
}

impl PartSlot {
    /// All slots in codec order.
    pub const ALL: [PartSlot; 6] = [
        PartSlot::Head,
        PartSlot::LeftHand,
        PartSlot::Body,
        PartSlot::RightHand,
        PartSlot::RightLeg,
        PartSlot::LeftLeg,
    ];
}

/// Colors for the six part slots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartSlots {
    pub head: Color,
    pub left_hand: Color,
    pub body: Color,
    pub right_hand: Color,
    pub right_leg: Color,
    pub left_leg: Color,
}

impl PartSlots {
    pub fn get(&self, slot: PartSlot) -> Color {
        match slot {
            PartSlot::Head => self.head,
            PartSlot::LeftHand => self.left_hand,
            PartSlot::Body => self.body,
            PartSlot::RightHand => self.right_hand,
            PartSlot::RightLeg => self.right_leg,
            PartSlot::LeftLeg => self.left_leg,
        }
    }

    /// Return a copy with one slot recolored.
    pub fn with(mut self, slot: PartSlot, color: Color) -> Self {
        *self.slot_mut(slot) = color;
        self
    }

    fn slot_mut(&mut self, slot: PartSlot) -> &mut Color {
        match slot {
            PartSlot::Head => &mut self.head,
            PartSlot::LeftHand => &mut self.left_hand,
            PartSlot::Body => &mut self.body,
            PartSlot::RightHand => &mut self.right_hand,
            PartSlot::RightLeg => &mut self.right_leg,
            PartSlot::LeftLeg => &mut self.left_leg,
        }
    }
}

//! Stored map pieces and their decoded form

use crate::codec::{block_origin, decode_tile_pixels, BlockPosition, Color, TILE_WIDTH};
use crate::error::Result;

/// One row of the minimap store: packed chunk position plus pixel payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRecord {
    pub packed_position: i64,
    pub payload: Vec<u8>,
}

impl TileRecord {
    pub fn new(packed_position: i64, payload: Vec<u8>) -> Self {
        Self { packed_position, payload }
    }

    pub fn origin(&self) -> BlockPosition {
        block_origin(self.packed_position)
    }

    /// Decode the payload. Errors carry this tile's packed position.
    pub fn decode(&self) -> Result<DecodedTile> {
        let colors = decode_tile_pixels(&self.payload)
            .map_err(|e| e.at_position(self.packed_position))?;
        Ok(DecodedTile {
            origin: self.origin(),
            colors,
        })
    }
}

/// A tile's 32x32 pixels placed at its world origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTile {
    pub origin: BlockPosition,
    colors: Vec<Color>,
}

impl DecodedTile {
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at local offset `(dx, dz)`, or `None` outside `0..TILE_WIDTH`
    pub fn pixel(&self, dx: i32, dz: i32) -> Option<Color> {
        if !(0..TILE_WIDTH).contains(&dx) {
            return None;
        }
        self.row(dz).map(|row| row[dx as usize])
    }

    /// One row of pixels at local `dz`
    pub fn row(&self, dz: i32) -> Option<&[Color]> {
        if !(0..TILE_WIDTH).contains(&dz) {
            return None;
        }
        let start = (dz * TILE_WIDTH) as usize;
        self.colors.get(start..start + TILE_WIDTH as usize)
    }
}

/// Blocks per tile edge. Fixed by the minimap format.
pub const TILE_WIDTH: i32 = 32;
/// Pixels in one tile
pub const TILE_PIXELS: usize = (TILE_WIDTH * TILE_WIDTH) as usize;

const INDEX_MASK: i64 = (1 << 21) - 1;
const Z_SHIFT: u32 = 27;

/// Absolute block position on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPosition {
    pub x: i32,
    pub z: i32,
}

impl BlockPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

impl std::fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Tile index unpacked from a stored chunk position.
///
/// X lives in bits 0-20 and Z in bits 27-47. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileCoordinate {
    pub x: u32,
    pub z: u32,
}

impl TileCoordinate {
    pub fn from_packed(packed: i64) -> Self {
        Self {
            x: (packed & INDEX_MASK) as u32,
            z: ((packed >> Z_SHIFT) & INDEX_MASK) as u32,
        }
    }

    /// North-west corner of the tile in block coordinates
    pub fn origin(self) -> BlockPosition {
        // 21-bit indices times 32 stay below i32::MAX
        BlockPosition {
            x: self.x as i32 * TILE_WIDTH,
            z: self.z as i32 * TILE_WIDTH,
        }
    }
}

/// Decode a packed chunk position straight to its block origin
pub fn block_origin(packed: i64) -> BlockPosition {
    TileCoordinate::from_packed(packed).origin()
}

/// Minimap pixel color (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a stored pixel word. Red is the low byte, the top byte is dropped.
    pub fn from_word(word: u32) -> Self {
        Self {
            r: (word & 0xFF) as u8,
            g: ((word >> 8) & 0xFF) as u8,
            b: ((word >> 16) & 0xFF) as u8,
        }
    }

    pub fn to_word(self) -> u32 {
        self.r as u32 | (self.g as u32) << 8 | (self.b as u32) << 16
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_low_index() {
        let pos = block_origin(0x0000_0000_0000_0005);
        assert_eq!(TileCoordinate::from_packed(5), TileCoordinate { x: 5, z: 0 });
        assert_eq!(pos, BlockPosition::new(160, 0));
    }

    #[test]
    fn test_packed_z_index() {
        let packed = (7i64 << 27) | 3;
        assert_eq!(block_origin(packed), BlockPosition::new(96, 224));
    }

    #[test]
    fn test_reserved_bits_ignored() {
        let clean = (12i64 << 27) | 40;
        let noisy = clean | (0b11_1111 << 21) | (0x7FFF << 48);
        assert_eq!(block_origin(noisy), block_origin(clean));
    }

    #[test]
    fn test_packed_matches_bit_formula() {
        let samples = [0i64, 1, 0x1FFFFF, 0x1FFFFF << 27, -1, i64::MIN, 0x0123_4567_89AB_CDEF];
        for &p in &samples {
            let pos = block_origin(p);
            assert_eq!(pos.x as i64, (p & 0x1FFFFF) * 32, "x for {p:#x}");
            assert_eq!(pos.z as i64, ((p >> 27) & 0x1FFFFF) * 32, "z for {p:#x}");
        }
    }

    #[test]
    fn test_max_index_fits() {
        let pos = block_origin(-1);
        assert_eq!(pos, BlockPosition::new(0x1FFFFF * 32, 0x1FFFFF * 32));
    }

    #[test]
    fn test_color_from_word() {
        let c = Color::from_word(0xFF_33_22_11);
        assert_eq!(c, Color::new(0x11, 0x22, 0x33));
        assert_eq!(c.to_word(), 0x00_33_22_11);
    }
}

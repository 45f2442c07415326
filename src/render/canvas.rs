use image::RgbImage;

use crate::codec::{BlockPosition, Color, TILE_WIDTH};
use crate::error::{Error, Result};
use crate::tile::DecodedTile;

/// Output raster, row-major, one cell per block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<Color>,
}

impl Canvas {
    /// Black canvas of the given size
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let too_large = || Error::CanvasTooLarge {
            width: width as u64,
            height: height as u64,
        };
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<Color>())
            .ok_or_else(too_large)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, Color::BLACK);
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn get(&self, x: u32, z: u32) -> Option<Color> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.cells.get(z as usize * self.width as usize + x as usize).copied()
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let raw: Vec<u8> = self.cells.iter().flat_map(|c| c.to_rgb()).collect();
        RgbImage::from_raw(self.width, self.height, raw).ok_or_else(|| {
            Error::Image(format!("canvas buffer does not fit {}x{}", self.width, self.height))
        })
    }

    /// Split the canvas into horizontal bands, one per world tile row.
    ///
    /// `top_left` is the world position of cell `(0, 0)`. Band edges fall on
    /// multiples of `TILE_WIDTH` in world z, so a tile only ever touches the
    /// band keyed by its own origin z. The first and last band may be short.
    pub fn bands_mut(&mut self, top_left: BlockPosition) -> Vec<Band<'_>> {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut bands = Vec::with_capacity(height / TILE_WIDTH as usize + 2);
        let mut rest: &mut [Color] = &mut self.cells;
        let mut row = 0usize;

        while row < height {
            let world_z = top_left.z as i64 + row as i64;
            let tile_z = world_z.div_euclid(TILE_WIDTH as i64) * TILE_WIDTH as i64;
            let end = ((tile_z + TILE_WIDTH as i64 - top_left.z as i64) as usize).min(height);

            let (cells, tail) = std::mem::take(&mut rest).split_at_mut((end - row) * width);
            bands.push(Band {
                origin_z: tile_z as i32,
                first_row: row,
                width,
                top_left,
                cells,
            });
            rest = tail;
            row = end;
        }
        bands
    }
}

/// Exclusive view of the canvas rows covered by one world tile row
pub struct Band<'a> {
    origin_z: i32,
    first_row: usize,
    width: usize,
    top_left: BlockPosition,
    cells: &'a mut [Color],
}

impl Band<'_> {
    /// World z of the tile row this band belongs to
    pub fn origin_z(&self) -> i32 {
        self.origin_z
    }

    pub fn rows(&self) -> usize {
        self.cells.len() / self.width.max(1)
    }

    /// Copy the visible part of `tile` into the band. Pixels outside the
    /// canvas are clipped. Returns the number of cells written.
    pub fn blit(&mut self, tile: &DecodedTile) -> usize {
        let tw = TILE_WIDTH as i64;
        let off_x = tile.origin.x as i64 - self.top_left.x as i64;
        let off_z = tile.origin.z as i64 - self.top_left.z as i64;

        let x0 = off_x.max(0);
        let x1 = (off_x + tw).min(self.width as i64);
        if x0 >= x1 {
            return 0;
        }
        let src_x = (x0 - off_x) as usize;
        let run = (x1 - x0) as usize;

        let first = self.first_row as i64;
        let last = first + self.rows() as i64;
        let mut written = 0;
        for dz in 0..TILE_WIDTH {
            let row = off_z + dz as i64;
            if row < first || row >= last {
                continue;
            }
            let Some(src) = tile.row(dz) else {
                continue;
            };
            let dst = (row - first) as usize * self.width + x0 as usize;
            self.cells[dst..dst + run].copy_from_slice(&src[src_x..src_x + run]);
            written += run;
        }
        written
    }
}

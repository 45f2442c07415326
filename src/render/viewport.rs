use tracing::debug;

use crate::codec::{BlockPosition, TILE_WIDTH};
use crate::error::{Error, Result};
use crate::tile::TileRecord;

/// Rectangle of the world to render, in absolute block coordinates.
///
/// `top_left` is inclusive and `bottom_right` exclusive, so the output image
/// is exactly `width() x height()` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top_left: BlockPosition,
    bottom_right: BlockPosition,
}

/// How the viewport for a run is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Explicit(Viewport),
    /// Fit the viewport to every tile in the store
    WholeMap,
}

impl Viewport {
    pub fn new(top_left: BlockPosition, bottom_right: BlockPosition) -> Result<Self> {
        let width = bottom_right.x as i64 - top_left.x as i64;
        let height = bottom_right.z as i64 - top_left.z as i64;
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { top_left, bottom_right })
    }

    /// Smallest viewport enclosing the footprints of all given tile origins
    pub fn enclosing(origins: impl IntoIterator<Item = BlockPosition>) -> Result<Self> {
        let mut origins = origins.into_iter();
        let first = origins.next().ok_or(Error::EmptyTileSet)?;
        let (min, max) = origins.fold((first, first), |(min, max), o| {
            (
                BlockPosition::new(min.x.min(o.x), min.z.min(o.z)),
                BlockPosition::new(max.x.max(o.x), max.z.max(o.z)),
            )
        });
        Self::new(min, max.offset(TILE_WIDTH, TILE_WIDTH))
    }

    pub fn top_left(&self) -> BlockPosition {
        self.top_left
    }

    pub fn bottom_right(&self) -> BlockPosition {
        self.bottom_right
    }

    pub fn width(&self) -> u32 {
        (self.bottom_right.x as i64 - self.top_left.x as i64) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom_right.z as i64 - self.top_left.z as i64) as u32
    }

    /// Whether a tile footprint `[x, x+32) x [z, z+32)` shares any block
    /// with this viewport. Touching edges do not count.
    pub fn overlaps_tile(&self, origin: BlockPosition) -> bool {
        let (x, z) = (origin.x as i64, origin.z as i64);
        let w = TILE_WIDTH as i64;
        x < self.bottom_right.x as i64
            && x + w > self.top_left.x as i64
            && z < self.bottom_right.z as i64
            && z + w > self.top_left.z as i64
    }

    /// Resolve the viewport for `mode` and drop tiles that cannot contribute
    /// a pixel to it. Only positions are inspected, never payloads.
    pub fn select(tiles: Vec<TileRecord>, mode: ViewportMode) -> Result<(Viewport, Vec<TileRecord>)> {
        match mode {
            ViewportMode::WholeMap => {
                let viewport = Self::enclosing(tiles.iter().map(TileRecord::origin))?;
                debug!(%viewport, tiles = tiles.len(), "fitted viewport to all tiles");
                Ok((viewport, tiles))
            }
            ViewportMode::Explicit(viewport) => {
                let total = tiles.len();
                let kept: Vec<TileRecord> = tiles
                    .into_iter()
                    .filter(|t| viewport.overlaps_tile(t.origin()))
                    .collect();
                debug!(%viewport, total, kept = kept.len(), "filtered tiles to viewport");
                Ok((viewport, kept))
            }
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {} ({}x{})",
            self.top_left,
            self.bottom_right,
            self.width(),
            self.height()
        )
    }
}

pub mod canvas;
pub mod compositor;
pub mod viewport;

pub use canvas::{Band, Canvas};
pub use compositor::{composite, DecodePolicy};
pub use viewport::{Viewport, ViewportMode};

use tracing::info;

use crate::error::{Error, Result};
use crate::tile::TileRecord;

/// Knobs for a render run
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub policy: DecodePolicy,
    /// Worker count; `None` uses rayon's global pool
    pub threads: Option<usize>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Render map pieces to a canvas with default options (fail fast, global pool)
pub fn run(tiles: impl IntoIterator<Item = TileRecord>, mode: ViewportMode) -> Result<Canvas> {
    run_with(tiles, mode, &RenderOptions::default())
}

/// Select the tiles for `mode`, then decode and composite them.
///
/// Viewport errors surface before any payload is decoded.
pub fn run_with(
    tiles: impl IntoIterator<Item = TileRecord>,
    mode: ViewportMode,
    options: &RenderOptions,
) -> Result<Canvas> {
    let tiles: Vec<TileRecord> = tiles.into_iter().collect();
    let total = tiles.len();
    let (viewport, tiles) = Viewport::select(tiles, mode)?;
    match mode {
        ViewportMode::WholeMap => info!("Calculated whole map bounds: {viewport}"),
        ViewportMode::Explicit(_) => info!(
            "Filtered out of bounds map pieces, {} of {total} pieces remaining.",
            tiles.len()
        ),
    }

    match options.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("vsmap-worker-{i}"))
                .build()
                .map_err(|e| Error::WorkerPool(e.to_string()))?;
            pool.install(|| composite(&viewport, &tiles, options.policy))
        }
        None => composite(&viewport, &tiles, options.policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::writer::encode_colors;
    use crate::codec::{BlockPosition, Color, TILE_PIXELS};

    fn solid(tile_x: i64, tile_z: i64, color: Color) -> TileRecord {
        TileRecord::new(tile_z << 27 | tile_x, encode_colors(&[color; TILE_PIXELS]))
    }

    #[test]
    fn test_run_whole_map() {
        let green = Color::new(0, 200, 0);
        let canvas = run(vec![solid(2, 1, green), solid(3, 2, green)], ViewportMode::WholeMap).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (64, 64));
        assert_eq!(canvas.get(0, 0), Some(green));
        assert_eq!(canvas.get(40, 0), Some(Color::BLACK));
        assert_eq!(canvas.get(40, 40), Some(green));
    }

    #[test]
    fn test_run_explicit_skips_far_tiles_without_decoding() {
        let viewport = Viewport::new(BlockPosition::new(0, 0), BlockPosition::new(32, 32)).unwrap();
        // Garbage payload far outside the viewport is never decoded
        let far = TileRecord::new(100, vec![0xFF]);
        let canvas = run(vec![solid(0, 0, Color::new(1, 1, 1)), far], ViewportMode::Explicit(viewport)).unwrap();
        assert_eq!(canvas.get(31, 31), Some(Color::new(1, 1, 1)));
    }

    #[test]
    fn test_run_empty_whole_map() {
        assert!(matches!(run(Vec::new(), ViewportMode::WholeMap), Err(Error::EmptyTileSet)));
    }

    #[test]
    fn test_run_with_fixed_pool() {
        let tiles: Vec<_> = (0..8).map(|i| solid(i, i, Color::new(5, 5, 5))).collect();
        let options = RenderOptions::new().threads(2);
        let a = run_with(tiles.clone(), ViewportMode::WholeMap, &options).unwrap();
        let b = run(tiles, ViewportMode::WholeMap).unwrap();
        assert_eq!(a, b);
    }
}

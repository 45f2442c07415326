//! Parallel decode-and-blit of map pieces onto a canvas
//!
//! The canvas is cut into bands along world tile rows (see
//! [`Canvas::bands_mut`]). Each band is a disjoint `&mut` slice handed to
//! one rayon task, and every tile lands in exactly one band, so workers never
//! share cells. Within a band the tiles are decoded in parallel and then
//! copied in.

use std::sync::atomic::{AtomicUsize, Ordering};

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use tracing::{info, warn};

use super::canvas::Canvas;
use super::viewport::Viewport;
use crate::error::Result;
use crate::tile::{DecodedTile, TileRecord};

const PROGRESS_EVERY: usize = 100;

/// What to do with a tile whose payload fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Abort the run with the first malformed tile
    #[default]
    FailFast,
    /// Log and skip malformed tiles, leaving their area black
    SkipMalformed,
}

/// Decode every tile and paint it onto a fresh canvas covering `viewport`.
///
/// Tiles outside the viewport are tolerated and simply clip to nothing. If
/// two tiles share a position, whichever is blitted last wins.
pub fn composite(viewport: &Viewport, tiles: &[TileRecord], policy: DecodePolicy) -> Result<Canvas> {
    let mut canvas = Canvas::new(viewport.width(), viewport.height())?;

    let mut tile_rows: AHashMap<i32, Vec<&TileRecord>> = AHashMap::new();
    let mut seen = AHashSet::with_capacity(tiles.len());
    let mut duplicates = 0usize;
    for tile in tiles {
        let origin = tile.origin();
        if !seen.insert(origin) {
            duplicates += 1;
        }
        tile_rows.entry(origin.z).or_default().push(tile);
    }
    if duplicates > 0 {
        warn!(duplicates, "map pieces share a position; overlapping pixels are unspecified");
    }

    let progress = Progress::new(tiles.len());
    canvas
        .bands_mut(viewport.top_left())
        .into_par_iter()
        .try_for_each(|mut band| -> Result<()> {
            let Some(row) = tile_rows.get(&band.origin_z()) else {
                return Ok(());
            };
            let decoded = row
                .par_iter()
                .map(|tile| decode_with_policy(tile, policy))
                .collect::<Result<Vec<_>>>()?;
            for tile in decoded.iter().flatten() {
                band.blit(tile);
            }
            progress.advance(row.len());
            Ok(())
        })?;

    info!("Processed {} map pieces. Done.", progress.done());
    Ok(canvas)
}

fn decode_with_policy(tile: &TileRecord, policy: DecodePolicy) -> Result<Option<DecodedTile>> {
    match (tile.decode(), policy) {
        (Ok(decoded), _) => Ok(Some(decoded)),
        (Err(e), DecodePolicy::SkipMalformed) => {
            warn!(position = tile.packed_position, error = %e, "skipping malformed map piece");
            Ok(None)
        }
        (Err(e), DecodePolicy::FailFast) => Err(e),
    }
}

struct Progress {
    done: AtomicUsize,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self { done: AtomicUsize::new(0), total }
    }

    fn advance(&self, n: usize) {
        let before = self.done.fetch_add(n, Ordering::Relaxed);
        let after = before + n;
        if after / PROGRESS_EVERY > before / PROGRESS_EVERY && after < self.total {
            info!("Processed {} map pieces...", after / PROGRESS_EVERY * PROGRESS_EVERY);
        }
    }

    fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

//! Vintage Story map tools
//!
//! Renders the client minimap database (32x32 block map pieces) into a
//! single image covering either a chosen area or the whole explored map.

pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod store;
pub mod tile;

pub use error::{Error, Result};
pub use codec::{
    BlockPosition, Color, TileCoordinate,
    TILE_WIDTH, TILE_PIXELS,
    block_origin, decode_payload,
};
pub use config::Config;
pub use render::{
    Canvas, Viewport, ViewportMode,
    DecodePolicy, RenderOptions,
    composite, run, run_with,
};
pub use store::TileStore;
pub use tile::{DecodedTile, TileRecord};

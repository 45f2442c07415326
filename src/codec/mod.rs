pub mod reader;
pub mod writer;
pub mod types;
pub mod payload;

pub use reader::PayloadReader;
pub use writer::PayloadWriter;
pub use types::*;
pub use payload::{decode_payload, decode_tile_pixels, decode_words, PIXELS_TAG};

//! Minimap pixel payload decoding
//!
//! A stored map piece holds a single message with one field: the pixel words
//! as a packed repeated `int32` (field 1, wire type 2). Only that shape is
//! accepted, so the decoder is a tag check, a length varint and a run of
//! varints.

use super::reader::PayloadReader;
use super::types::{Color, TILE_PIXELS};
use crate::error::{Error, Result};

/// Field 1, wire type 2 (length-delimited)
pub const PIXELS_TAG: u8 = 0x0A;

/// Decode the raw pixel words of a payload.
///
/// The packed field may appear more than once; runs are concatenated in
/// order. Any other tag, an empty payload or a run that does not end on a
/// varint boundary is rejected.
pub fn decode_words(payload: &[u8]) -> Result<Vec<u32>> {
    let mut reader = PayloadReader::new(payload);
    let mut words = Vec::with_capacity(TILE_PIXELS);

    loop {
        reader.read_tag(PIXELS_TAG)?;
        let len = reader.read_varint_length()?;
        reader.read_packed_varints(len, &mut words)?;
        if reader.is_empty() {
            return Ok(words);
        }
    }
}

/// Decode a payload into pixel colors, row-major.
pub fn decode_payload(payload: &[u8]) -> Result<Vec<Color>> {
    Ok(decode_words(payload)?.into_iter().map(Color::from_word).collect())
}

/// Decode a payload and require exactly one tile's worth of pixels
pub fn decode_tile_pixels(payload: &[u8]) -> Result<Vec<Color>> {
    let colors = decode_payload(payload)?;
    if colors.len() != TILE_PIXELS {
        return Err(Error::malformed(format!(
            "expected {TILE_PIXELS} pixels, got {}",
            colors.len()
        )));
    }
    Ok(colors)
}

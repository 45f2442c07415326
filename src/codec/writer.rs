use super::payload::PIXELS_TAG;
use super::types::Color;

/// Encoder for minimap pixel payloads.
///
/// Nothing in the render path writes payloads; this exists to build
/// fixtures and test databases.
pub struct PayloadWriter {
    data: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_varint(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.data.push((v as u8 & 0x7F) | 0x80);
            v >>= 7;
        }
        self.data.push(v as u8);
    }

    /// Write words as a packed `int32` field. Words with the top bit set are
    /// negative `int32`s and get sign-extended to ten bytes, as protobuf does.
    pub fn write_packed_words(&mut self, words: &[u32]) {
        let mut run = PayloadWriter::new();
        for &w in words {
            run.write_varint(w as i32 as i64 as u64);
        }
        self.write_u8(PIXELS_TAG);
        self.write_varint(run.len() as u64);
        self.write_bytes(&run.data);
    }
}

impl Default for PayloadWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full pixel payload from raw words
pub fn encode_words(words: &[u32]) -> Vec<u8> {
    let mut writer = PayloadWriter::new();
    writer.write_packed_words(words);
    writer.into_vec()
}

/// Encode a full pixel payload from colors (top byte left at zero)
pub fn encode_colors(colors: &[Color]) -> Vec<u8> {
    let words: Vec<u32> = colors.iter().map(|c| c.to_word()).collect();
    encode_words(&words)
}

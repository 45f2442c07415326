use crate::error::{Error, Result};

/// Longest base-128 varint: ten 7-bit groups cover 64 bits
pub const MAX_VARINT_LEN: usize = 10;

/// Byte cursor over a minimap pixel payload
pub struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let v = *self.data.get(self.pos).ok_or_else(|| {
            Error::malformed(format!("unexpected end of data at byte {}", self.pos))
        })?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::malformed(format!(
                "need {n} bytes at byte {}, have {}",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a field tag and check it against the one expected here
    pub fn read_tag(&mut self, expected: u8) -> Result<()> {
        let at = self.pos;
        let tag = self
            .read_u8()
            .map_err(|_| Error::malformed(format!("missing field tag at byte {at}")))?;
        if tag != expected {
            return Err(Error::malformed(format!(
                "unexpected field tag {tag:#04x} at byte {at} (expected {expected:#04x})"
            )));
        }
        Ok(())
    }

    /// Read a base-128 varint: little-endian 7-bit groups, high bit set on
    /// every byte but the last.
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.pos;
        self.scan_varint().map_err(|fault| fault.into_error(start))
    }

    fn scan_varint(&mut self) -> std::result::Result<u64, VarintFault> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let byte = *self.data.get(self.pos).ok_or(VarintFault::Truncated)?;
            self.pos += 1;
            value |= ((byte & 0x7F) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(VarintFault::TooLong)
    }

    /// Read the byte length prefix of a length-delimited field
    pub fn read_varint_length(&mut self) -> Result<usize> {
        let len = self.read_varint()?;
        usize::try_from(len)
            .map_err(|_| Error::malformed(format!("field length {len} does not fit in memory")))
    }

    /// Decode a packed run of `len` bytes, pushing each varint's low 32 bits
    /// into `out`. The run must end exactly on a varint boundary.
    pub fn read_packed_varints(&mut self, len: usize, out: &mut Vec<u32>) -> Result<()> {
        let base = self.pos;
        let run = self.read_bytes(len)?;
        let mut inner = PayloadReader::new(run);
        while !inner.is_empty() {
            let at = base + inner.position();
            let word = inner.scan_varint().map_err(|fault| match fault {
                VarintFault::Truncated => Error::malformed(format!(
                    "varint at byte {at} overruns the packed run ending at byte {}",
                    base + len
                )),
                VarintFault::TooLong => fault.into_error(at),
            })?;
            out.push(word as u32);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VarintFault {
    Truncated,
    TooLong,
}

impl VarintFault {
    fn into_error(self, start: usize) -> Error {
        match self {
            Self::Truncated => {
                Error::malformed(format!("varint starting at byte {start} is truncated"))
            }
            Self::TooLong => Error::malformed(format!(
                "varint starting at byte {start} is longer than {MAX_VARINT_LEN} bytes"
            )),
        }
    }
}

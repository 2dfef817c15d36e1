//! Little-endian integer reads from unaligned byte slices.
//!
//! Everything here is host-order independent: values are assembled from
//! individual bytes, so the mapped file may sit at any alignment.

/// Read a `u32` from the first four bytes of `bytes`.
///
/// # Panics
///
/// Panics if `bytes` is shorter than four bytes.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from(bytes[0])
        | u32::from(bytes[1]) << 8
        | u32::from(bytes[2]) << 16
        | u32::from(bytes[3]) << 24
}

/// Read a `u16` from the first two bytes of `bytes`.
///
/// # Panics
///
/// Panics if `bytes` is shorter than two bytes.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from(bytes[0]) | u16::from(bytes[1]) << 8
}

#[inline]
pub fn read_i32_le(bytes: &[u8]) -> i32 {
    read_u32_le(bytes) as i32
}

#[inline]
pub fn read_i16_le(bytes: &[u8]) -> i16 {
    read_u16_le(bytes) as i16
}

/// Sequential reader over a byte slice, used while parsing the weight file.
///
/// Callers validate the total length up front, so reads past the end are
/// programming errors and panic through slice indexing.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn u32(&mut self) -> u32 {
        let v = read_u32_le(&self.bytes[self.pos..]);
        self.pos += 4;
        v
    }

    pub fn i32(&mut self) -> i32 {
        self.u32() as i32
    }

    /// Fill `out` with consecutive `i32` values.
    pub fn i32s(&mut self, out: &mut [i32]) {
        for v in out {
            *v = self.i32();
        }
    }

    /// Take the next `len` bytes.
    pub fn bytes(&mut self, len: usize) -> &'a [u8] {
        let s = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        s
    }

    /// Skip `len` bytes and return the range they occupied.
    pub fn skip(&mut self, len: usize) -> std::ops::Range<usize> {
        let start = self.pos;
        self.pos += len;
        start..self.pos
    }
}

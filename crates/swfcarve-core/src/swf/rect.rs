//! The RECT record that opens the SWF frame header.
//!
//! A RECT is bit-packed, MSB-first: a 5-bit width `nbits` followed by four
//! signed `nbits`-wide coordinates (xmin, xmax, ymin, ymax), padded to a
//! whole byte. Only the width matters here; the coordinates are skipped.

use crate::error::Result;
use crate::source::ByteSource;
use std::ops::RangeInclusive;

/// Width of the `nbits` field in bits
pub const NBITS_WIDTH: u32 = 5;

/// Number of coordinate fields following `nbits`
const COORDINATE_COUNT: u32 = 4;

/// Accepted encoded RECT sizes in bytes, padding included
///
/// 9 bits (`nbits = 1`) round up to the 2-byte minimum; 129 bits
/// (`nbits = 31`) round up to the 17-byte maximum.
pub const RECT_LEN_RANGE: RangeInclusive<u32> = 2..=17;

/// MSB-first bit reader over a byte-aligned buffer
///
/// Tracks the bit position separately from the byte position so a field
/// that does not end on a byte boundary can be followed by another.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitCursor<'a> {
    /// Start reading at the first bit of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Read `count` bits (at most 32) as an unsigned value
    ///
    /// Returns `None` without advancing if fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: u32) -> Option<u32> {
        if count > 32 || self.bits_remaining() < count as usize {
            return None;
        }

        let mut value: u32 = 0;
        for _ in 0..count {
            let byte = self.data[self.bit_pos / 8];
            let bit = (byte >> (7 - (self.bit_pos % 8))) & 1;
            // Shift through u64 so reading 32 bits cannot overflow
            value = ((u64::from(value) << 1) | u64::from(bit)) as u32;
            self.bit_pos += 1;
        }
        Some(value)
    }

    /// Skip `count` bits, `None` if that runs past the end
    pub fn skip_bits(&mut self, count: usize) -> Option<()> {
        if self.bits_remaining() < count {
            return None;
        }
        self.bit_pos += count;
        Some(())
    }

    /// Bits consumed so far
    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Whole bytes touched so far, counting a partially read byte
    pub fn byte_position(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }

    /// Bits left in the buffer
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }
}

/// Size in bytes of a RECT whose coordinates are `nbits` wide
///
/// Saturates for widths no 5-bit field can encode; the result then lies
/// far outside [`RECT_LEN_RANGE`].
pub fn rect_len_for_nbits(nbits: u32) -> u32 {
    COORDINATE_COUNT
        .saturating_mul(nbits)
        .saturating_add(NBITS_WIDTH)
        .div_ceil(8)
}

/// Extract `nbits` from the first byte of a RECT
pub fn decode_nbits(first_byte: u8) -> u32 {
    let buf = [first_byte];
    let mut cursor = BitCursor::new(&buf);
    // One byte always holds the 5-bit field
    cursor.read_bits(NBITS_WIDTH).unwrap_or(0)
}

/// Read the RECT at `offset` and return its encoded size in bytes
///
/// Only the first byte is read. The size is not range-checked here; the
/// caller compares it against [`RECT_LEN_RANGE`].
pub fn read_rect_len<S: ByteSource + ?Sized>(source: &S, offset: u64) -> Result<u32> {
    let first = source.read_u8(offset)?;
    Ok(rect_len_for_nbits(decode_nbits(first)))
}

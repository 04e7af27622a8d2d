//! Bounded random-access reads over a host blob.
//!
//! The recognizer never touches the blob wholesale. Everything past the
//! precached header window goes through [`ByteSource::read_exact_at`], which
//! either fills the caller's buffer completely or fails with
//! [`Error::OutOfRange`]. There are no short reads.

use crate::error::{Error, Result};
use bytes::Bytes;

/// Random-access, read-only view of the data being scanned
///
/// Implementations must be safe to share between threads: many candidate
/// offsets may be checked against one source concurrently.
pub trait ByteSource: Send + Sync {
    /// Total length of the source in bytes
    fn len(&self) -> u64;

    /// Fill `buf` with the bytes at `[offset, offset + buf.len())`
    ///
    /// Fails with [`Error::OutOfRange`] if any part of that range lies past
    /// the end of the source. `buf` is left unspecified on failure.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Returns true if the source holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a single byte
    fn read_u8(&self, offset: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact_at(offset, &mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian `u16`
    fn read_u16_le(&self, offset: u64) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_at(offset, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32`
    fn read_u32_le(&self, offset: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(offset, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

/// Resolve `[offset, offset + length)` against a slice, without panicking
fn checked_range(data: &[u8], offset: u64, length: usize) -> Result<&[u8]> {
    let extent = data.len() as u64;
    let out_of_range = || Error::out_of_range(offset, length as u64, extent);

    let end = offset
        .checked_add(length as u64)
        .filter(|&end| end <= extent)
        .ok_or_else(out_of_range)?;

    // Both bounds fit in usize because they are <= data.len()
    Ok(&data[offset as usize..end as usize])
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(checked_range(self, offset, buf.len())?);
        Ok(())
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.as_slice().read_exact_at(offset, buf)
    }
}

impl ByteSource for Bytes {
    fn len(&self) -> u64 {
        let slice: &[u8] = self;
        slice.len() as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let slice: &[u8] = self;
        slice.read_exact_at(offset, buf)
    }
}

/// The precached window handed to a recognizer for `offset`
///
/// Clamped to the end of `data`; near the tail of a blob the window is
/// shorter than `max_len`, and header decoding treats that as a short window.
pub fn precached_window(data: &[u8], offset: usize, max_len: usize) -> &[u8] {
    if offset >= data.len() {
        return &[];
    }
    let end = offset.saturating_add(max_len).min(data.len());
    &data[offset..end]
}

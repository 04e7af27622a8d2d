//! SWF tag stream walking.
//!
//! Every tag starts with a 16-bit little-endian record header:
//!
//! ```text
//! bits 15..6  tag code
//! bits  5..0  body length, or 0x3F for a long header
//! ```
//!
//! A long header is followed by a u32 LE holding the real body length. The
//! walker only resolves lengths; tag bodies are never read.

use crate::error::{Error, Result};
use crate::source::ByteSource;

/// Low-six-bit length value that selects the long header form
pub const LONG_FORM_MARKER: u16 = 0x3F;

/// Size of the record header shared by both forms
pub const SHORT_HEADER_LEN: u64 = 2;

/// Size of a long record header, extra u32 length included
pub const LONG_HEADER_LEN: u64 = 6;

/// Tag code of the End tag
pub const END_TAG_CODE: u16 = 0;

/// Body length of a tag and the header form that carried it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLength {
    /// Length stored in the low six bits of the record header (0..=62)
    Short(u8),
    /// Length stored in the u32 following the record header
    Long(u32),
}

impl RecordLength {
    /// Body length in bytes
    pub fn body_len(self) -> u32 {
        match self {
            RecordLength::Short(len) => u32::from(len),
            RecordLength::Long(len) => len,
        }
    }

    /// Bytes taken by the record header itself
    pub fn header_len(self) -> u64 {
        match self {
            RecordLength::Short(_) => SHORT_HEADER_LEN,
            RecordLength::Long(_) => LONG_HEADER_LEN,
        }
    }

    /// Header plus body
    pub fn total_len(self) -> u64 {
        self.header_len() + u64::from(self.body_len())
    }
}

/// A single decoded record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRecord {
    /// Absolute offset of the record header
    pub offset: u64,
    /// Tag code from the upper ten bits
    pub code: u16,
    /// Resolved body length
    pub length: RecordLength,
}

impl TagRecord {
    /// Offset one past the record's body, `None` on overflow
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length.total_len())
    }

    /// Whether the body is empty
    pub fn is_zero_length(&self) -> bool {
        self.length.body_len() == 0
    }

    /// Whether this is the container's End tag
    pub fn is_end_tag(&self) -> bool {
        self.code == END_TAG_CODE && self.is_zero_length()
    }
}

/// Rule deciding which record closes the tag stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamEnd {
    /// Any zero-length record ends the stream
    #[default]
    ZeroLength,
    /// Only an End tag (code 0, empty body) ends the stream
    EndTag,
}

impl StreamEnd {
    /// Whether `record` terminates the stream under this rule
    pub fn is_terminator(self, record: &TagRecord) -> bool {
        match self {
            StreamEnd::ZeroLength => record.is_zero_length(),
            StreamEnd::EndTag => record.is_end_tag(),
        }
    }
}

/// Split a raw record header into tag code and short length
fn split_record_header(raw: u16) -> (u16, u16) {
    (raw >> 6, raw & LONG_FORM_MARKER)
}

/// Decode the record header at `offset`
///
/// Reads two bytes, plus four more for a long header. Either read falling
/// outside the source fails the whole record.
pub fn read_record<S: ByteSource + ?Sized>(source: &S, offset: u64) -> Result<TagRecord> {
    let (code, short_len) = split_record_header(source.read_u16_le(offset)?);

    let length = if short_len < LONG_FORM_MARKER {
        // Fits in six bits
        RecordLength::Short(short_len as u8)
    } else {
        let long_offset = offset
            .checked_add(SHORT_HEADER_LEN)
            .ok_or_else(|| Error::out_of_range(offset, LONG_HEADER_LEN, source.len()))?;
        RecordLength::Long(source.read_u32_le(long_offset)?)
    };

    Ok(TagRecord {
        offset,
        code,
        length,
    })
}

/// Iterator over consecutive tag records
///
/// Yields records until the terminator (inclusive) or the first error, then
/// fuses. [`position`](TagWalker::position) is the offset just past the last
/// record yielded.
#[derive(Debug)]
pub struct TagWalker<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    position: u64,
    stream_end: StreamEnd,
    done: bool,
}

impl<'a, S: ByteSource + ?Sized> TagWalker<'a, S> {
    /// Walk records starting at `offset`
    pub fn new(source: &'a S, offset: u64, stream_end: StreamEnd) -> Self {
        Self {
            source,
            position: offset,
            stream_end,
            done: false,
        }
    }

    /// Offset of the next record to read
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<S: ByteSource + ?Sized> Iterator for TagWalker<'_, S> {
    type Item = Result<TagRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let record = match read_record(self.source, self.position) {
            Ok(record) => record,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let Some(end) = record.end() else {
            self.done = true;
            return Some(Err(Error::out_of_range(
                record.offset,
                record.length.total_len(),
                self.source.len(),
            )));
        };

        self.position = end;
        if self.stream_end.is_terminator(&record) {
            self.done = true;
        }
        Some(Ok(record))
    }
}

//! SWF recognition and length resolution.
//!
//! Given a candidate offset, [`Recognizer`] decides whether an uncompressed
//! SWF object starts there and, if so, how many bytes it spans.
//!
//! ## Layout
//!
//! ```text
//! FWS <version:u8> <file_length:u32>     fixed header, 8 bytes
//! RECT                                   frame size, 2..=17 bytes
//! <frame_rate:u16> <frame_count:u16>     4 bytes, not interpreted
//! TAG*                                   until the terminator record
//! ```
//!
//! ## Gates
//!
//! Each step must pass before the next runs; the first failure ends the
//! check with a [`Rejection`]:
//!
//! 1. signature is `FWS` (`CWS`/`ZWS` are recognized but unsupported)
//! 2. version is nonzero
//! 3. declared length is nonzero
//! 4. RECT size is within [`RECT_LEN_RANGE`]
//! 5. frame rate and count are skipped
//! 6. tag records are walked to the terminator
//! 7. the walked span is cross-checked against the declared length
//!
//! Rejection is the common case when scanning unstructured data, so the
//! recognizer never allocates and never logs.

mod header;
mod rect;
mod tag;

use crate::error::Error;
use crate::source::ByteSource;
use std::ops::Range;
use thiserror::Error as ThisError;

pub use header::{
    decode_declared_length, decode_signature, decode_version, signature_word, Signature,
    FIXED_HEADER_LEN, SIGNATURE_FIELD_LEN,
};
pub use rect::{
    decode_nbits, read_rect_len, rect_len_for_nbits, BitCursor, NBITS_WIDTH, RECT_LEN_RANGE,
};
pub use tag::{
    read_record, RecordLength, StreamEnd, TagRecord, TagWalker, END_TAG_CODE, LONG_FORM_MARKER,
    LONG_HEADER_LEN, SHORT_HEADER_LEN,
};

/// Frame rate (u16) and frame count (u16) following the RECT
pub const FRAME_FIELDS_LEN: u64 = 4;

/// Smallest possible object: header, 2-byte RECT, frame fields, End tag
pub const MIN_OBJECT_LEN: u64 = FIXED_HEADER_LEN as u64 + 2 + FRAME_FIELDS_LEN + SHORT_HEADER_LEN;

/// Outcome classification carried by a [`Finding`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FindingResult {
    /// Nothing recognized
    #[default]
    None,
    /// A complete binary object occupies the finding's span
    BinaryObject,
}

/// A recognized object and the byte span it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Finding {
    /// Candidate offset the object starts at
    pub start: u64,
    /// One past the last byte of the object
    pub end: u64,
    /// Outcome classification
    pub result: FindingResult,
}

impl Finding {
    /// Size of the object in bytes
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the span is empty (never true for a recognized object)
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// The span as a range of offsets
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// How the walked span is compared against the declared file length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrossCheck {
    /// Accept only when the span equals the declared length
    #[default]
    Exact,
    /// Accept only when the span differs from the declared length
    ///
    /// Inverted comparison, kept for parity with detectors that apply it.
    Literal,
}

impl CrossCheck {
    /// Whether a walked `span` is acceptable for `declared`
    pub fn accepts(self, span: u64, declared: u32) -> bool {
        let matches = span == u64::from(declared);
        match self {
            CrossCheck::Exact => matches,
            CrossCheck::Literal => !matches,
        }
    }
}

/// Why a candidate offset was rejected
///
/// Cheap to construct and copy; rejections are the dominant path.
#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Precached window too small for the header field being decoded
    #[error("precached window too short for the fixed header")]
    ShortWindow,

    /// A read at a computed offset fell outside the source
    #[error("read of {length} bytes at offset {offset} is out of range")]
    OutOfRange {
        /// Requested start offset
        offset: u64,
        /// Requested length
        length: u64,
    },

    /// The first three bytes are not an SWF signature
    #[error("unknown signature {0:#08x}")]
    UnknownSignature(u32),

    /// Valid signature whose body is compressed
    #[error("compressed {0:?} objects are not supported")]
    Compressed(Signature),

    /// Version byte is zero
    #[error("version is zero")]
    ZeroVersion,

    /// Declared file length is zero
    #[error("declared file length is zero")]
    ZeroDeclaredLength,

    /// RECT size outside [`RECT_LEN_RANGE`]
    #[error("frame RECT size {0} is outside 2..=17 bytes")]
    RectSize(u32),

    /// The walked span failed the cross-check
    #[error("walked span of {span} bytes fails cross-check against declared length {declared}")]
    LengthMismatch {
        /// Bytes walked from the candidate offset
        span: u64,
        /// Length claimed by the header
        declared: u32,
    },

    /// Offset arithmetic overflowed
    #[error("offset arithmetic overflowed")]
    Overflow,

    /// The source failed for a reason other than a bounds check
    #[error("byte source read failed")]
    Source,
}

impl From<Error> for Rejection {
    fn from(err: Error) -> Self {
        match err {
            Error::OutOfRange { offset, length, .. } => Rejection::OutOfRange { offset, length },
            _ => Rejection::Source,
        }
    }
}

/// Recognizer configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RecognizerConfig {
    /// Span versus declared length comparison
    pub cross_check: CrossCheck,
    /// Which record closes the tag stream
    pub stream_end: StreamEnd,
}

impl RecognizerConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cross-check policy
    pub fn cross_check(mut self, cross_check: CrossCheck) -> Self {
        self.cross_check = cross_check;
        self
    }

    /// Sets the tag stream terminator rule
    pub fn stream_end(mut self, stream_end: StreamEnd) -> Self {
        self.stream_end = stream_end;
        self
    }
}

/// Stateless SWF recognizer
///
/// Holds only its configuration; every call is independent, so one
/// recognizer can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recognizer {
    config: RecognizerConfig,
}

impl Recognizer {
    /// Creates a recognizer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recognizer with custom configuration
    pub fn with_config(config: RecognizerConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Check `start` and return the finding, or `None` if rejected
    pub fn check<S: ByteSource + ?Sized>(
        &self,
        start: u64,
        source: &S,
        precached: &[u8],
    ) -> Option<Finding> {
        self.evaluate(start, source, precached).ok()
    }

    /// Check `start` and report why it was rejected
    ///
    /// `precached` must hold the bytes starting at `start`; at least 8 are
    /// needed for the fixed header.
    pub fn evaluate<S: ByteSource + ?Sized>(
        &self,
        start: u64,
        source: &S,
        precached: &[u8],
    ) -> Result<Finding, Rejection> {
        let word = signature_word(precached).ok_or(Rejection::ShortWindow)?;
        match Signature::from_magic(word) {
            Some(Signature::Uncompressed) => {}
            Some(other) => return Err(Rejection::Compressed(other)),
            None => return Err(Rejection::UnknownSignature(word)),
        }

        let version = decode_version(precached).ok_or(Rejection::ShortWindow)?;
        if version == 0 {
            return Err(Rejection::ZeroVersion);
        }

        let declared = decode_declared_length(precached).ok_or(Rejection::ShortWindow)?;
        if declared == 0 {
            return Err(Rejection::ZeroDeclaredLength);
        }
        let mut end = advance(start, FIXED_HEADER_LEN as u64)?;

        let rect_len = read_rect_len(source, end)?;
        if !RECT_LEN_RANGE.contains(&rect_len) {
            return Err(Rejection::RectSize(rect_len));
        }
        end = advance(end, u64::from(rect_len))?;
        end = advance(end, FRAME_FIELDS_LEN)?;

        let mut walker = TagWalker::new(source, end, self.config.stream_end);
        for record in walker.by_ref() {
            let record = record?;
            if self.config.cross_check == CrossCheck::Exact {
                // Past the declared length a match is no longer possible
                let span = record.end().ok_or(Rejection::Overflow)? - start;
                if span > u64::from(declared) {
                    return Err(Rejection::LengthMismatch { span, declared });
                }
            }
        }
        end = walker.position();

        let span = end - start;
        if !self.config.cross_check.accepts(span, declared) {
            return Err(Rejection::LengthMismatch { span, declared });
        }

        Ok(Finding {
            start,
            end,
            result: FindingResult::BinaryObject,
        })
    }
}

fn advance(offset: u64, by: u64) -> Result<u64, Rejection> {
    offset.checked_add(by).ok_or(Rejection::Overflow)
}

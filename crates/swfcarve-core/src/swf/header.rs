//! Fixed SWF header fields.
//!
//! ```text
//! offset 0..3   signature  "FWS" | "CWS" | "ZWS"
//! offset 3      version    u8
//! offset 4..8   file length u32 LE (whole object, header included)
//! ```
//!
//! All decoders read from the precached window only and return `None` when
//! the window is too short, so a missing field is never mistaken for a zero.

/// Length of signature plus version
pub const SIGNATURE_FIELD_LEN: usize = 4;

/// Length of signature, version and declared file length
pub const FIXED_HEADER_LEN: usize = 8;

/// Mask that strips the version byte from the little-endian signature word
const SIGNATURE_MASK: u32 = 0x00FF_FFFF;

/// Container family named by the 3-byte signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// `FWS`: tag stream stored as-is
    Uncompressed,
    /// `CWS`: everything past the first 8 bytes is zlib-compressed (SWF 6+)
    Zlib,
    /// `ZWS`: everything past the header is LZMA-compressed (SWF 13+)
    Lzma,
}

impl Signature {
    /// All format-valid signatures
    pub const ALL: [Signature; 3] = [Signature::Uncompressed, Signature::Zlib, Signature::Lzma];

    /// Little-endian word of the tag with the version byte zeroed
    pub const fn magic(self) -> u32 {
        match self {
            Signature::Uncompressed => 0x0053_5746,
            Signature::Zlib => 0x0053_5743,
            Signature::Lzma => 0x0053_575A,
        }
    }

    /// ASCII bytes of the tag
    pub const fn tag(self) -> &'static [u8; 3] {
        match self {
            Signature::Uncompressed => b"FWS",
            Signature::Zlib => b"CWS",
            Signature::Lzma => b"ZWS",
        }
    }

    /// Look up a signature by its masked magic word
    pub fn from_magic(magic: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|signature| signature.magic() == magic & SIGNATURE_MASK)
    }

    /// Whether the tag stream following the header is compressed
    pub fn is_compressed(self) -> bool {
        !matches!(self, Signature::Uncompressed)
    }
}

/// Read the signature word with the version byte masked out
///
/// Returns `None` if the window holds fewer than 4 bytes. The raw word is
/// returned even when it names no known tag; see [`decode_signature`].
pub fn signature_word(window: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = window.get(..SIGNATURE_FIELD_LEN)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes) & SIGNATURE_MASK)
}

/// Decode the signature
///
/// `None` if the window is too short or the tag is not one of the three
/// known values.
pub fn decode_signature(window: &[u8]) -> Option<Signature> {
    signature_word(window).and_then(Signature::from_magic)
}

/// Decode the version byte, `None` if the window is too short
pub fn decode_version(window: &[u8]) -> Option<u8> {
    if window.len() < SIGNATURE_FIELD_LEN {
        return None;
    }
    Some(window[3])
}

/// Decode the declared total length, `None` if the window is too short
pub fn decode_declared_length(window: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = window
        .get(SIGNATURE_FIELD_LEN..FIXED_HEADER_LEN)?
        .try_into()
        .ok()?;
    Some(u32::from_le_bytes(bytes))
}

//! Carver plugins: static metadata plus a recognizer entry point.
//!
//! A [`Carver`] is what the [`Scanner`](crate::Scanner) drives. It names the
//! byte patterns that mark candidate offsets and checks each candidate.

use crate::source::ByteSource;
use crate::swf::{Finding, Recognizer, RecognizerConfig, Signature};

/// Broad category of carved objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Images, audio, video and animation containers
    Multimedia,
}

/// Narrower classification within a [`Category`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcategory {
    /// Shockwave Flash
    Swf,
}

/// Hint for ordering carvers when several match the same offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Structured binary formats validated field by field
    Binary,
    /// Text formats matched heuristically
    Text,
}

/// A recognizer for one object format
pub trait Carver: Send + Sync {
    /// Human-readable format name
    fn name(&self) -> &'static str;

    /// Broad category
    fn category(&self) -> Category;

    /// Narrow category
    fn subcategory(&self) -> Subcategory;

    /// File extension for extracted objects, without the dot
    fn output_extension(&self) -> &'static str;

    /// Ordering hint
    fn priority(&self) -> Priority;

    /// Whether all findings should be written into a single output file
    fn should_group_in_one_file(&self) -> bool;

    /// Byte patterns that mark candidate offsets
    fn signatures(&self) -> &[&'static [u8]];

    /// Check the candidate at `offset`
    ///
    /// `precached` holds the bytes from `offset` onwards, as many as the
    /// caller had at hand.
    fn check(&self, offset: u64, source: &dyn ByteSource, precached: &[u8]) -> Option<Finding>;
}

const SWF_SIGNATURES: [&[u8]; 3] = [
    Signature::Uncompressed.tag(),
    Signature::Zlib.tag(),
    Signature::Lzma.tag(),
];

/// Carver for SWF objects
#[derive(Debug, Clone, Copy, Default)]
pub struct SwfCarver {
    recognizer: Recognizer,
}

impl SwfCarver {
    /// Creates a carver with the default recognizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a carver with a custom recognizer configuration
    pub fn with_config(config: RecognizerConfig) -> Self {
        Self {
            recognizer: Recognizer::with_config(config),
        }
    }

    /// The underlying recognizer
    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }
}

impl Carver for SwfCarver {
    fn name(&self) -> &'static str {
        "SWF"
    }

    fn category(&self) -> Category {
        Category::Multimedia
    }

    fn subcategory(&self) -> Subcategory {
        Subcategory::Swf
    }

    fn output_extension(&self) -> &'static str {
        "swf"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn should_group_in_one_file(&self) -> bool {
        false
    }

    fn signatures(&self) -> &[&'static [u8]] {
        &SWF_SIGNATURES
    }

    fn check(&self, offset: u64, source: &dyn ByteSource, precached: &[u8]) -> Option<Finding> {
        self.recognizer.check(offset, source, precached)
    }
}

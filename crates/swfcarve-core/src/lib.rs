//! # swfcarve-core
//!
//! A library for finding SWF (Shockwave Flash) objects embedded in arbitrary
//! binary data and resolving their exact byte span.
//!
//! This crate provides the core functionality for:
//! - Recognizing an uncompressed SWF object at a candidate offset
//! - Walking the tag stream to find where the object ends
//! - Scanning whole blobs for candidates and collecting findings
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`source`]: Bounded random-access reads over the scanned data
//! - [`swf`]: Header, RECT and tag decoding plus the [`Recognizer`]
//! - [`carver`]: Plugin metadata and the [`Carver`] trait
//! - [`scanner`]: Candidate discovery over an in-memory blob
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use swfcarve_core::{Scanner, ScanStrategy};
//! use bytes::Bytes;
//! use std::fs;
//!
//! // Read a memory dump
//! let data = Bytes::from(fs::read("./dump.bin")?);
//!
//! // Scan for embedded SWF objects
//! let scanner = Scanner::new();
//! for result in scanner.scan(&data)? {
//!     println!("SWF at {:?} ({} bytes)", result.range(), result.as_bytes().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Checking a single offset without a scanner:
//!
//! ```
//! use swfcarve_core::{Recognizer, Rejection};
//!
//! let data = b"FWS\x06\x10\x00\x00\x00\x08\x00\x00\x18\x01\x00\x00\x00";
//! let finding = Recognizer::new().evaluate(0, &data[..], data).unwrap();
//! assert_eq!(finding.end, 16);
//!
//! let compressed = b"CWS\x06\x10\x00\x00\x00";
//! assert!(matches!(
//!     Recognizer::new().evaluate(0, &compressed[..], compressed),
//!     Err(Rejection::Compressed(_))
//! ));
//! ```
//!
//! ## Extensibility
//!
//! - [`ByteSource`]: Back the recognizer with something other than memory
//! - [`Carver`]: Plug another format into the [`Scanner`]
//! - [`ScanStrategy`]: Customize the candidate discovery algorithm
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod carver;
pub mod error;
pub mod scanner;
pub mod source;
pub mod swf;

// Re-export primary types for convenience
pub use carver::{Carver, Category, Priority, Subcategory, SwfCarver};
pub use error::{Error, Result};
pub use scanner::{ScanResult, ScanStrategy, Scanner, ScannerConfig};
pub use source::ByteSource;
pub use swf::{
    CrossCheck, Finding, FindingResult, Recognizer, RecognizerConfig, Rejection, Signature,
    StreamEnd,
};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

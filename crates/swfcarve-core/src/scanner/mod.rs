//! Binary scanning module for finding embedded objects.
//!
//! This module drives a [`Carver`] over an in-memory blob and collects the
//! objects it recognizes.
//!
//! ## Algorithm Overview
//!
//! 1. Search for the next occurrence of any of the carver's signatures
//! 2. Hand the carver the candidate offset and a precached header window
//! 3. On a finding, record it and resume scanning at the finding's end
//! 4. Otherwise resume one byte past the candidate
//!
//! ## Extensibility
//!
//! The [`ScanStrategy`] trait allows custom scanning algorithms:
//!
//! ```no_run
//! use swfcarve_core::scanner::{ScanStrategy, ScanResult};
//! use swfcarve_core::Result;
//! use bytes::Bytes;
//!
//! struct CustomScanner;
//!
//! impl ScanStrategy for CustomScanner {
//!     fn scan(&self, data: &Bytes) -> Result<Vec<ScanResult>> {
//!         // Custom scanning logic
//!         Ok(vec![])
//!     }
//! }
//! ```

use crate::carver::{Carver, SwfCarver};
use crate::error::{Error, Result};
use crate::source::precached_window;
use crate::swf::{Finding, FIXED_HEADER_LEN, MIN_OBJECT_LEN};
use bytes::Bytes;
use std::ops::Range;
use tracing::{debug, trace};

/// Result of scanning a blob for a single object
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Span and classification reported by the carver
    pub finding: Finding,
    /// The object's bytes, sharing storage with the scanned blob
    pub data: Bytes,
}

impl ScanResult {
    /// Creates a new scan result
    pub fn new(finding: Finding, data: Bytes) -> Self {
        Self { finding, data }
    }

    /// Returns the data as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Byte range in the scanned blob
    pub fn range(&self) -> Range<u64> {
        self.finding.range()
    }
}

/// Configuration for the scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Maximum number of objects to find (0 = unlimited)
    pub max_results: usize,
    /// Bytes handed to the carver up front for each candidate
    pub precache_len: usize,
    /// Minimum size for a reported object (filters noise)
    pub min_object_size: u64,
    /// Maximum size for a reported object (filters garbage)
    pub max_object_size: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_results: 0,
            precache_len: 64,
            min_object_size: MIN_OBJECT_LEN,
            max_object_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl ScannerConfig {
    /// Creates a new scanner config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of results to return
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Sets the precached window size
    pub fn precache_len(mut self, len: usize) -> Self {
        self.precache_len = len;
        self
    }

    /// Sets the minimum object size filter
    pub fn min_object_size(mut self, size: u64) -> Self {
        self.min_object_size = size;
        self
    }

    /// Sets the maximum object size filter
    pub fn max_object_size(mut self, size: u64) -> Self {
        self.max_object_size = size;
        self
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.precache_len < FIXED_HEADER_LEN {
            return Err(Error::invalid_config(format!(
                "precache_len must be at least {} bytes, got {}",
                FIXED_HEADER_LEN, self.precache_len
            )));
        }
        if self.min_object_size > self.max_object_size {
            return Err(Error::invalid_config(format!(
                "min_object_size {} exceeds max_object_size {}",
                self.min_object_size, self.max_object_size
            )));
        }
        Ok(())
    }

    fn accepts_size(&self, size: u64) -> bool {
        size >= self.min_object_size && size <= self.max_object_size
    }
}

/// Trait for implementing custom scanning strategies
///
/// This trait allows you to plug in different algorithms for finding
/// embedded objects in binary data.
pub trait ScanStrategy: Send + Sync {
    /// Scan the provided data for embedded objects
    fn scan(&self, data: &Bytes) -> Result<Vec<ScanResult>>;

    /// Scan the data and return an iterator (for streaming large files)
    fn scan_iter<'a>(&'a self, data: &'a Bytes) -> Box<dyn Iterator<Item = Result<ScanResult>> + 'a> {
        // Default implementation: collect all results into a vec and iterate
        match self.scan(data) {
            Ok(results) => Box::new(results.into_iter().map(Ok)),
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }
}

/// Primary scanner for finding embedded objects
#[derive(Debug, Clone)]
pub struct Scanner<C = SwfCarver> {
    config: ScannerConfig,
    carver: C,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Creates a new SWF scanner with default configuration
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    /// Creates a new SWF scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self::with_carver(SwfCarver::new(), config)
    }
}

impl<C: Carver> Scanner<C> {
    /// Creates a scanner driving a specific carver
    pub fn with_carver(carver: C, config: ScannerConfig) -> Self {
        Self { config, carver }
    }

    /// The carver this scanner drives
    pub fn carver(&self) -> &C {
        &self.carver
    }

    /// The active configuration
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }
}

impl<C: Carver> ScanStrategy for Scanner<C> {
    fn scan(&self, data: &Bytes) -> Result<Vec<ScanResult>> {
        self.config.validate()?;

        let signatures = self.carver.signatures();
        let mut results = Vec::new();
        let mut position = 0;
        let mut candidates = 0usize;

        debug!("Starting {} scan of {} bytes", self.carver.name(), data.len());

        while position < data.len() {
            let Some(relative_pos) = find_any(&data[position..], signatures) else {
                break;
            };

            let candidate = position + relative_pos;
            candidates += 1;

            let window = precached_window(data, candidate, self.config.precache_len);
            match self.carver.check(candidate as u64, data, window) {
                Some(finding)
                    if finding.end <= data.len() as u64 && self.config.accepts_size(finding.len()) =>
                {
                    debug!(
                        "Found {} at {}..{} ({} bytes)",
                        self.carver.name(),
                        finding.start,
                        finding.end,
                        finding.len()
                    );

                    let end = finding.end as usize;
                    results.push(ScanResult::new(finding, data.slice(candidate..end)));

                    // Check if we've hit the limit
                    if self.config.max_results > 0 && results.len() >= self.config.max_results {
                        break;
                    }

                    // Skip past this object
                    position = end;
                    continue;
                }
                Some(finding) => {
                    trace!(
                        "Discarding {}-byte object at {}: outside size filter",
                        finding.len(),
                        finding.start
                    );
                }
                None => {
                    trace!("No object at candidate {}", candidate);
                }
            }

            // Move past this candidate and continue searching
            position = candidate + 1;
        }

        debug!(
            "Scan complete: {} candidates, {} objects",
            candidates,
            results.len()
        );
        Ok(results)
    }
}

/// Find the first position where any needle starts
fn find_any(haystack: &[u8], needles: &[&[u8]]) -> Option<usize> {
    (0..haystack.len()).find(|&i| needles.iter().any(|needle| haystack[i..].starts_with(needle)))
}

/// Scan a file for embedded SWF objects
///
/// This is a convenience function that reads the file and scans it.
pub fn scan_file(path: impl AsRef<std::path::Path>) -> Result<Vec<ScanResult>> {
    scan_file_with_config(path, ScannerConfig::default())
}

/// Scan a file with custom configuration
pub fn scan_file_with_config(
    path: impl AsRef<std::path::Path>,
    config: ScannerConfig,
) -> Result<Vec<ScanResult>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    Scanner::with_config(config).scan(&Bytes::from(data))
}

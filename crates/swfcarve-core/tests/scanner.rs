mod common;

use bytes::Bytes;
use common::SwfBuilder;
use pretty_assertions::assert_eq;
use std::io::Write;
use swfcarve_core::scanner::{scan_file, scan_file_with_config};
use swfcarve_core::{
    CrossCheck, Error, RecognizerConfig, ScanStrategy, Scanner, ScannerConfig, StreamEnd,
    SwfCarver,
};

/// Three objects separated by noise, including a decoy compressed header
fn blob_with_objects() -> (Bytes, Vec<(u64, Vec<u8>)>) {
    let objects = [
        SwfBuilder::new().tag(9, &[0x00, 0x00, 0x00]).build(),
        SwfBuilder::new().version(10).long_tag(6, &[0x42; 80]).build(),
        SwfBuilder::new().nbits(31).tag(69, &[0x08, 0x00, 0x00, 0x00]).build(),
    ];

    let mut blob = b"MZ\x90\x00 header noise ".to_vec();
    let mut expected = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        expected.push((blob.len() as u64, object.clone()));
        blob.extend_from_slice(object);
        blob.extend_from_slice(b"CWS\x0a\x00\x01\x00\x00");
        blob.extend(std::iter::repeat(i as u8).take(29));
    }
    (Bytes::from(blob), expected)
}

#[test]
fn finds_every_embedded_object() {
    let (blob, expected) = blob_with_objects();
    let results = Scanner::new().scan(&blob).unwrap();

    let found: Vec<(u64, Vec<u8>)> = results
        .iter()
        .map(|r| (r.finding.start, r.as_bytes().to_vec()))
        .collect();
    assert_eq!(found, expected);

    for result in &results {
        assert_eq!(result.range().end - result.range().start, result.data.len() as u64);
    }
}

#[test]
fn respects_max_results() {
    let (blob, expected) = blob_with_objects();
    let scanner = Scanner::with_config(ScannerConfig::new().max_results(2));
    let results = scanner.scan(&blob).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].finding.start, expected[1].0);
}

#[test]
fn applies_size_filters() {
    let (blob, expected) = blob_with_objects();
    let big = expected[1].1.len() as u64;

    let scanner = Scanner::with_config(ScannerConfig::new().min_object_size(big));
    let results = scanner.scan(&blob).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].finding.start, expected[1].0);

    let scanner = Scanner::with_config(ScannerConfig::new().max_object_size(big - 1));
    assert_eq!(scanner.scan(&blob).unwrap().len(), 2);
}

#[test]
fn skips_over_accepted_objects() {
    // A second signature nested inside a tag body is not reported
    let inner = SwfBuilder::new().nbits(1).build();
    let outer = SwfBuilder::new().long_tag(87, &inner).build();

    let results = Scanner::new().scan(&Bytes::from(outer.clone())).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_bytes(), &outer[..]);
}

#[test]
fn carver_policy_flows_through_scanner() {
    let swf = SwfBuilder::new()
        .tag(1, &[])
        .tag(9, &[0xFF, 0xFF, 0xFF])
        .tag(1, &[])
        .build();
    let blob = Bytes::from(swf.clone());

    assert!(Scanner::new().scan(&blob).unwrap().is_empty());

    let carver = SwfCarver::with_config(RecognizerConfig::new().stream_end(StreamEnd::EndTag));
    let scanner = Scanner::with_carver(carver, ScannerConfig::new());
    let results = scanner.scan(&blob).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].finding.len(), swf.len() as u64);

    let carver = SwfCarver::with_config(RecognizerConfig::new().cross_check(CrossCheck::Literal));
    let scanner = Scanner::with_carver(carver, ScannerConfig::new());
    let results = scanner.scan(&blob).unwrap();
    // Stops at the first ShowFrame: header, RECT, frame fields, one tag
    assert_eq!(results[0].finding.len(), 8 + 9 + 4 + 2);
}

#[test]
fn scan_iter_yields_scan_results() {
    let (blob, expected) = blob_with_objects();
    let scanner = Scanner::new();
    let starts: Vec<u64> = scanner
        .scan_iter(&blob)
        .map(|r| r.unwrap().finding.start)
        .collect();
    assert_eq!(starts, expected.iter().map(|(s, _)| *s).collect::<Vec<_>>());
}

#[test]
fn scans_files_from_disk() {
    let (blob, expected) = blob_with_objects();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&blob).unwrap();

    let results = scan_file(file.path()).unwrap();
    assert_eq!(results.len(), expected.len());

    let results = scan_file_with_config(file.path(), ScannerConfig::new().max_results(1)).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan_file(dir.path().join("missing.bin")).unwrap_err();
    assert!(matches!(err, Error::FileRead { .. }));
    assert!(err.is_recoverable());
}

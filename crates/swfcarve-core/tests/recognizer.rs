mod common;

use bytes::Bytes;
use common::SwfBuilder;
use pretty_assertions::assert_eq;
use swfcarve_core::swf::MIN_OBJECT_LEN;
use swfcarve_core::{
    CrossCheck, Finding, FindingResult, Recognizer, RecognizerConfig, Rejection, StreamEnd,
};

fn recognizer(cross_check: CrossCheck, stream_end: StreamEnd) -> Recognizer {
    Recognizer::with_config(
        RecognizerConfig::new()
            .cross_check(cross_check)
            .stream_end(stream_end),
    )
}

fn evaluate(recognizer: &Recognizer, data: &[u8], start: usize) -> Result<Finding, Rejection> {
    recognizer.evaluate(start as u64, data, &data[start..])
}

/// A few tags of each form, including a zero-length ShowFrame
fn movie() -> SwfBuilder {
    SwfBuilder::new()
        .tag(9, &[0xFF, 0xFF, 0xFF])
        .long_tag(6, &[0xAB; 100])
        .tag(12, &[0x00; 62])
        .tag(1, &[])
}

#[test]
fn minimal_instance_follows_cross_check_policy() {
    let data = SwfBuilder::new().nbits(1).build();
    assert_eq!(data.len() as u64, MIN_OBJECT_LEN);

    let exact = evaluate(&Recognizer::new(), &data, 0).unwrap();
    assert_eq!(
        exact,
        Finding {
            start: 0,
            end: MIN_OBJECT_LEN,
            result: FindingResult::BinaryObject,
        }
    );

    let literal = recognizer(CrossCheck::Literal, StreamEnd::ZeroLength);
    assert_eq!(
        evaluate(&literal, &data, 0),
        Err(Rejection::LengthMismatch {
            span: MIN_OBJECT_LEN,
            declared: MIN_OBJECT_LEN as u32,
        })
    );
}

#[test]
fn mismatched_declared_length_follows_cross_check_policy() {
    let data = SwfBuilder::new().nbits(1).declared(MIN_OBJECT_LEN as u32 - 1).build();

    assert!(matches!(
        evaluate(&Recognizer::new(), &data, 0),
        Err(Rejection::LengthMismatch { .. })
    ));

    let literal = recognizer(CrossCheck::Literal, StreamEnd::ZeroLength);
    assert_eq!(evaluate(&literal, &data, 0).unwrap().len(), MIN_OBJECT_LEN);
}

#[test]
fn zero_length_rule_stops_at_show_frame() {
    let data = movie().build();
    let declared = data.len() as u32;

    // Stops at ShowFrame, two bytes before the End tag
    let literal = recognizer(CrossCheck::Literal, StreamEnd::ZeroLength);
    let finding = evaluate(&literal, &data, 0).unwrap();
    assert_eq!(finding.end, data.len() as u64 - 2);

    assert_eq!(
        evaluate(&Recognizer::new(), &data, 0),
        Err(Rejection::LengthMismatch {
            span: u64::from(declared) - 2,
            declared,
        })
    );
}

#[test]
fn end_tag_rule_walks_whole_movie() {
    let data = movie().tag(1, &[]).build();
    let exact = recognizer(CrossCheck::Exact, StreamEnd::EndTag);
    let finding = evaluate(&exact, &data, 0).unwrap();
    assert_eq!(finding.range(), 0..data.len() as u64);
}

#[test]
fn long_form_terminator_advances_six_bytes() {
    let data = SwfBuilder::new()
        .tag(9, &[0x00, 0x00, 0x00])
        .long_tag(0, &[])
        .without_end_tag()
        .build();
    let finding = evaluate(&Recognizer::new(), &data, 0).unwrap();
    assert_eq!(finding.len(), data.len() as u64);
}

#[test]
fn widest_rect_is_accepted() {
    let data = SwfBuilder::new().nbits(31).build();
    let finding = evaluate(&Recognizer::new(), &data, 0).unwrap();
    assert_eq!(finding.len(), 8 + 17 + 4 + 2);
}

#[test]
fn empty_rect_is_rejected() {
    let data = SwfBuilder::new().nbits(0).build();
    assert_eq!(evaluate(&Recognizer::new(), &data, 0), Err(Rejection::RectSize(1)));
}

#[test]
fn truncated_instance_never_matches() {
    // Two ShowFrames before the End tag
    let data = movie().tag(1, &[]).build();
    let first_show_frame_end = data.len() - 4;

    for cross_check in [CrossCheck::Exact, CrossCheck::Literal] {
        let end_tag = recognizer(cross_check, StreamEnd::EndTag);
        let zero_length = recognizer(cross_check, StreamEnd::ZeroLength);

        for cut in 0..data.len() {
            let truncated = &data[..cut];
            assert!(end_tag.check(0, truncated, truncated).is_none(), "cut at {}", cut);

            // Past the first ShowFrame the zero-length rule sees a complete
            // (shorter) stream
            if cut < first_show_frame_end {
                assert!(zero_length.check(0, truncated, truncated).is_none(), "cut at {}", cut);
            }
        }
    }
}

#[test]
fn truncated_read_reports_out_of_range() {
    let data = SwfBuilder::new().tag(9, &[0x01, 0x02, 0x03]).build();
    let truncated = &data[..data.len() - 1];
    assert!(matches!(
        evaluate(&Recognizer::new(), truncated, 0),
        Err(Rejection::OutOfRange { .. })
    ));
}

#[test]
fn embedded_instance_reports_absolute_span() {
    let swf = SwfBuilder::new().tag(9, &[0x10, 0x20, 0x30]).build();
    let mut blob = vec![0xCC; 37];
    blob.extend_from_slice(&swf);
    blob.extend_from_slice(&[0xEE; 11]);

    let finding = evaluate(&Recognizer::new(), &blob, 37).unwrap();
    assert_eq!(finding.range(), 37..37 + swf.len() as u64);
}

#[test]
fn concurrent_checks_match_sequential() {
    let mut blob = Vec::new();
    for i in 0..6u8 {
        blob.extend_from_slice(&[i; 13]);
        blob.extend(SwfBuilder::new().version(i + 1).tag(9, &[i, i, i]).build());
        blob.extend_from_slice(b"FWS\x00garbage");
    }
    let blob = Bytes::from(blob);
    let len = blob.len();
    let recognizer = Recognizer::new();

    let check_all = |offsets: &mut dyn Iterator<Item = usize>| -> Vec<(usize, Option<Finding>)> {
        offsets
            .map(|offset| (offset, recognizer.check(offset as u64, &blob, &blob[offset..])))
            .collect()
    };

    let sequential = check_all(&mut (0..len));
    assert_eq!(sequential.iter().filter(|(_, f)| f.is_some()).count(), 6);

    let threads = 4;
    let mut concurrent: Vec<(usize, Option<Finding>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|t| scope.spawn(move || check_all(&mut (t..len).step_by(threads))))
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });
    concurrent.sort_by_key(|(offset, _)| *offset);

    assert_eq!(concurrent, sequential);
}

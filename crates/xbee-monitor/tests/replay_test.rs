//! Integration tests: replayed captures through the full monitor loop.

use std::sync::atomic::AtomicBool;

use xbee_api::{
    encode_api_frame, AtCommandStatus, DecodeError, Frame, FrameEvent, API_AT_COMMAND_RESPONSE,
    API_IO_SAMPLE_INDICATOR, API_MODEM_STATUS,
};
use xbee_monitor::{ConsoleSink, Monitor, RecordingSink, ReplaySource, StreamStats};

/// Helper to build a capture like one taken from a coordinator after an `ID` query.
fn capture() -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend_from_slice(&[0x00, 0x13]); // line noise before the first frame
    stream.extend(encode_api_frame(API_MODEM_STATUS, &[0x06]).unwrap());
    stream.extend(
        encode_api_frame(
            API_AT_COMMAND_RESPONSE,
            &[0x01, b'I', b'D', 0x00, 0, 0, 0, 0, 0, 0, 0x12, 0x34],
        )
        .unwrap(),
    );
    stream.extend(
        encode_api_frame(
            API_IO_SAMPLE_INDICATOR,
            &[
                0x00, 0x13, 0xA2, 0x00, 0x40, 0x52, 0x2B, 0xAA, 0x7D, 0x84, 0x01, 0x01, 0x00,
                0x1C, 0x02, 0x00, 0x14, 0x02, 0x25,
            ],
        )
        .unwrap(),
    );
    stream.extend_from_slice(&[0x7E, 0x00, 0x02, 0x92, 0xFF, 0x6E]); // short IO sample
    stream.extend_from_slice(&[0x7E, 0x00, 0x02, 0x08, 0x01, 0x00]); // bad checksum
    stream.extend_from_slice(&[0x7E, 0x00, 0x04, 0x88]); // cut off by the next frame
    stream.extend(encode_api_frame(API_MODEM_STATUS, &[0x02]).unwrap());
    stream
}

fn run_to_end(source: ReplaySource) -> (RecordingSink, StreamStats) {
    let stop = AtomicBool::new(false);
    let mut monitor = Monitor::new(source, RecordingSink::new());
    monitor.run(&stop).expect("replay should not fail");
    let stats = monitor.stats();
    let (_, sink) = monitor.into_parts();
    (sink, stats)
}

#[test]
fn test_replay_delivers_frames_in_order() {
    let (sink, _) = run_to_end(ReplaySource::new(capture()));

    let types: Vec<u8> = sink.frames.iter().map(Frame::frame_type).collect();
    assert_eq!(types, vec![0x8A, 0x88, 0x92, 0x8A]);

    match &sink.frames[1] {
        Frame::AtCommandResponse(response) => {
            assert_eq!(response.command_str(), "ID");
            assert_eq!(response.result, AtCommandStatus::Ok);
            assert_eq!(response.extra_bytes.len(), 8);
        }
        other => panic!("unexpected frame {:?}", other),
    }
    match &sink.frames[2] {
        Frame::IoSample(sample) => {
            assert_eq!(sample.sender_address, 0x0013_A200_4052_2BAA);
            assert_eq!(sample.digital_samples, 0x0014);
        }
        other => panic!("unexpected frame {:?}", other),
    }
}

#[test]
fn test_replay_reports_every_problem() {
    let (sink, stats) = run_to_end(ReplaySource::new(capture()));

    assert_eq!(
        sink.events,
        vec![
            FrameEvent::Garbage(0x00),
            FrameEvent::Garbage(0x13),
            FrameEvent::ChecksumFailed,
            FrameEvent::FramePreempted,
        ]
    );
    assert_eq!(sink.decode_errors, vec![DecodeError::too_short(0x92, 15, 1)]);

    assert_eq!(stats.bytes, capture().len() as u64);
    assert_eq!(stats.frames, 4);
    assert_eq!(stats.garbage, 2);
    assert_eq!(stats.checksum_failures, 1);
    assert_eq!(stats.preempted, 1);
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.dropped(), 3);
}

#[test]
fn test_chunked_replay_matches_whole_replay() {
    let (whole, whole_stats) = run_to_end(ReplaySource::new(capture()));
    for chunk in [1, 2, 3, 7, 64] {
        let (chunked, chunked_stats) =
            run_to_end(ReplaySource::new(capture()).with_chunk_size(chunk));
        assert_eq!(chunked.frames, whole.frames, "chunk size {}", chunk);
        assert_eq!(chunked.events, whole.events, "chunk size {}", chunk);
        assert_eq!(chunked_stats, whole_stats, "chunk size {}", chunk);
    }
}

#[test]
fn test_stop_flag_halts_run() {
    let stop = AtomicBool::new(true);
    let mut monitor = Monitor::new(ReplaySource::new(capture()), RecordingSink::new());
    monitor.run(&stop).unwrap();
    assert_eq!(monitor.stats().bytes, 0);
}

#[test]
fn test_replay_from_file() {
    let path = std::env::temp_dir().join(format!("xbee-monitor-replay-{}.bin", std::process::id()));
    std::fs::write(&path, capture()).unwrap();
    let source = ReplaySource::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let (sink, _) = run_to_end(source);
    assert_eq!(sink.frames.len(), 4);
}

#[test]
fn test_console_output() {
    let stop = AtomicBool::new(false);
    let mut monitor = Monitor::new(ReplaySource::new(capture()), ConsoleSink::new(Vec::new()));
    monitor.run(&stop).unwrap();
    let (_, sink) = monitor.into_parts();
    let text = String::from_utf8(sink.into_inner()).unwrap();

    assert!(text.starts_with("Modem Status (0x8A)\n  payload: 0x06\n"));
    assert!(text.contains(
        "AT Command Response (0x88)\n  frame_id: 0x01\n  command: ID\n  status: OK\n"
    ));
    assert!(text.contains("  analog_sample_mask: 0x02\n"));
    assert!(text.ends_with("Modem Status (0x8A)\n  payload: 0x02\n"));
}

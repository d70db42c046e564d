//! End-to-end behaviour of the fingerprint stage with a mock code generator.

use crossbeam_channel::unbounded;
use echoprint_stage::audio::MockAudioSource;
use echoprint_stage::codegen::MockCodegen;
use echoprint_stage::pipeline::{
    EchoprintMessage, EchoprintStation, FingerprintEmitter, NullReporter, Pipeline,
    PipelineConfig, RunState,
};
use echoprint_stage::{StageConfig, StageSettings};
use std::sync::Arc;

const RATE: usize = 11025;

fn settings(interval: bool, max_seconds: u32) -> StageSettings {
    StageSettings::new(StageConfig {
        interval,
        max_seconds,
    })
    .unwrap()
}

/// Runs `total` samples through a full pipeline and returns the codegen
/// calls, the posted messages and the number of samples that came out.
fn run(
    interval: bool,
    max_seconds: u32,
    total: usize,
    chunk_size: usize,
) -> (Vec<usize>, Vec<EchoprintMessage>, usize) {
    let codegen = MockCodegen::new("m");
    let source = MockAudioSource::new().with_constant(0.25, total, chunk_size);

    let handle = Pipeline::new(PipelineConfig::default())
        .with_error_reporter(Arc::new(NullReporter))
        .start(
            source,
            settings(interval, max_seconds),
            Arc::new(codegen.clone()),
        )
        .unwrap();
    let messages: Vec<_> = handle.messages().iter().collect();
    let report = handle.wait().unwrap();

    (codegen.calls(), messages, report.samples_forwarded)
}

#[test]
fn single_shot_fires_once_on_exact_window() {
    let (calls, messages, forwarded) = run(false, 30, 40 * RATE, 4096);

    assert_eq!(calls, vec![30 * RATE]);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, format!("m:{}", 30 * RATE));
    assert_eq!(messages[0].name(), "echoprint");
    assert_eq!(forwarded, 40 * RATE);
}

#[test]
fn interval_mode_fires_every_ten_seconds_up_to_max() {
    let (calls, messages, forwarded) = run(true, 30, 45 * RATE, 2048);

    assert_eq!(calls, vec![10 * RATE, 20 * RATE, 30 * RATE]);
    assert_eq!(messages.len(), 3);
    assert_eq!(forwarded, 45 * RATE);
}

#[test]
fn interval_mode_stops_below_max_when_not_a_multiple() {
    let (calls, _, _) = run(true, 25, 60 * RATE, 4096);
    assert_eq!(calls, vec![10 * RATE, 20 * RATE]);
}

#[test]
fn stream_shorter_than_window_posts_nothing_and_forwards_all() {
    let (calls, messages, forwarded) = run(false, 30, 29 * RATE, 4096);

    assert!(calls.is_empty());
    assert!(messages.is_empty());
    assert_eq!(forwarded, 29 * RATE);
}

#[test]
fn trigger_points_do_not_depend_on_chunking() {
    let expected = run(true, 40, 41 * RATE, RATE).0;

    for chunk_size in [1, 256, 1000, 4096, 10 * RATE] {
        // One-sample chunks are slow; keep that case short
        let total = if chunk_size == 1 { 11 * RATE } else { 41 * RATE };
        let (calls, _, forwarded) = run(true, 40, total, chunk_size);
        if chunk_size == 1 {
            assert_eq!(calls, vec![10 * RATE]);
        } else {
            assert_eq!(calls, expected, "chunk size {}", chunk_size);
        }
        assert_eq!(forwarded, total);
    }
}

#[test]
fn one_trigger_per_chunk_even_when_chunk_spans_thresholds() {
    // A single 35 s chunk crosses 10, 20 and 30; only the first fires on it
    let codegen = MockCodegen::new("m");
    let source = MockAudioSource::new().with_chunks(vec![vec![0.0; 35 * RATE], vec![0.0; 1]]);

    let handle = Pipeline::new(PipelineConfig::default())
        .with_error_reporter(Arc::new(NullReporter))
        .start(source, settings(true, 30), Arc::new(codegen.clone()))
        .unwrap();
    let messages: Vec<_> = handle.messages().iter().collect();
    handle.wait().unwrap();

    assert_eq!(codegen.calls(), vec![10 * RATE, 20 * RATE]);
    assert_eq!(messages.len(), 2);
}

#[test]
fn restart_clears_buffer_and_rereads_settings() {
    let codegen = MockCodegen::new("m");
    let (tx, rx) = unbounded();
    let settings = settings(false, 10);
    let mut station = EchoprintStation::new(
        settings.clone(),
        FingerprintEmitter::new(Arc::new(codegen.clone()), tx),
    );

    station.start();
    station.process_samples(&vec![0.0; 6 * RATE]).unwrap();
    assert_eq!(station.buffered_samples(), 6 * RATE);

    // Changes made while running apply on the next start
    settings.set_max_seconds(20).unwrap();
    station.stop();
    assert_eq!(station.state(), RunState::Idle);
    assert_eq!(station.buffered_samples(), 0);

    station.start();
    station.process_samples(&vec![0.0; 15 * RATE]).unwrap();
    assert!(rx.try_recv().is_err());
    station.process_samples(&vec![0.0; 5 * RATE]).unwrap();

    assert_eq!(codegen.calls(), vec![20 * RATE]);
    assert_eq!(station.state(), RunState::Done);
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn done_stage_keeps_forwarding_without_buffering() {
    let (tx, _rx) = unbounded();
    let mut station = EchoprintStation::new(
        settings(false, 10),
        FingerprintEmitter::new(Arc::new(MockCodegen::new("m")), tx),
    );

    station.start();
    assert!(
        station
            .process_samples(&vec![0.0; 10 * RATE])
            .unwrap()
            .is_some()
    );
    assert_eq!(station.state(), RunState::Done);

    assert!(station.process_samples(&vec![0.0; RATE]).unwrap().is_none());
    assert_eq!(station.buffered_samples(), 0);
}

#[test]
fn out_of_range_window_is_rejected_before_running() {
    assert!(
        StageSettings::new(StageConfig {
            interval: false,
            max_seconds: 121,
        })
        .is_err()
    );
    let settings = settings(false, 30);
    assert!(settings.set_max_seconds(9).is_err());
    assert_eq!(settings.max_seconds(), 30);
}

//! Video pipeline tests against decode-backend and classifier doubles.

use argus_infer::{
    Aggregate, AggregateResult, FrameClassifier, FrameScore, FrameTensor, InferError, Verdict,
    VideoDetector,
};
use argus_video::{FrameRead, MediaDecoder, RawFrameRead, VideoError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Decode backend double: serves `frames` synthetic rasters, then EOF with
/// the configured termination result. Records the temp media path.
struct StubDecoder {
    frames: usize,
    unreadable: Option<String>,
    opened_path: Mutex<Option<PathBuf>>,
}

impl StubDecoder {
    fn new(frames: usize) -> Arc<Self> {
        Arc::new(Self {
            frames,
            unreadable: None,
            opened_path: Mutex::new(None),
        })
    }

    fn unreadable(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            frames: 0,
            unreadable: Some(msg.to_string()),
            opened_path: Mutex::new(None),
        })
    }

    fn opened_path(&self) -> Option<PathBuf> {
        self.opened_path.lock().unwrap().clone()
    }
}

impl MediaDecoder for StubDecoder {
    fn open(
        &self,
        media: &Path,
        _target: (usize, usize),
    ) -> Result<Box<dyn RawFrameRead>, VideoError> {
        *self.opened_path.lock().unwrap() = Some(media.to_path_buf());
        Ok(Box::new(StubRead {
            remaining: self.frames,
            unreadable: self.unreadable.clone(),
        }))
    }
}

struct StubRead {
    remaining: usize,
    unreadable: Option<String>,
}

impl RawFrameRead for StubRead {
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<FrameRead, VideoError> {
        if self.remaining == 0 {
            return Ok(FrameRead::Eof);
        }
        self.remaining -= 1;
        buf.fill(127);
        Ok(FrameRead::Full)
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        match &self.unreadable {
            Some(msg) => Err(VideoError::Unreadable(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Classifier double returning a fixed score cycle, counting invocations.
struct FakeClassifier {
    scores: Vec<f32>,
    calls: AtomicUsize,
}

impl FakeClassifier {
    fn new(scores: &[f32]) -> Arc<Self> {
        Arc::new(Self {
            scores: scores.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameClassifier for FakeClassifier {
    fn input_hw(&self) -> (usize, usize) {
        (4, 4)
    }

    fn infer(&self, _tensor: &FrameTensor) -> Result<f32, InferError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scores[call % self.scores.len()])
    }
}

fn detector(
    classifier: Arc<FakeClassifier>,
    decoder: Arc<StubDecoder>,
    stride: usize,
) -> VideoDetector {
    VideoDetector::with_stride(classifier, stride)
        .unwrap()
        .with_decoder(decoder)
}

#[test]
fn test_reference_pipeline_ninety_frames_stride_thirty() {
    let classifier = FakeClassifier::new(&[0.9, 0.2, 0.8]);
    let decoder = StubDecoder::new(90);
    let result = detector(Arc::clone(&classifier), decoder, 30)
        .run(b"video")
        .unwrap();

    assert_eq!(result.label(), Verdict::Real);
    assert!(!result.is_fake());
    assert!((result.confidence() - 0.633_333_3).abs() < 1e-5);
    assert_eq!(classifier.calls(), 3);

    let scores: Vec<f32> = result.frame_scores().iter().map(|s| s.p_real).collect();
    assert_eq!(scores, vec![0.9, 0.2, 0.8]);
    let seqs: Vec<usize> = result.frame_scores().iter().map(|s| s.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[test]
fn test_all_fake_frames_give_fake_verdict() {
    let classifier = FakeClassifier::new(&[0.1, 0.2, 0.3]);
    let decoder = StubDecoder::new(3);
    let result = detector(classifier, decoder, 1).run(b"video").unwrap();
    assert_eq!(result.label(), Verdict::Fake);
    assert!(result.is_fake());
    assert!((result.confidence() - 0.8).abs() < 1e-6);
}

#[test]
fn test_run_is_idempotent() {
    let classifier = FakeClassifier::new(&[0.9, 0.2, 0.8]);
    let det = detector(Arc::clone(&classifier), StubDecoder::new(90), 30);
    let first = det.run(b"video").unwrap();
    let second = det.run(b"video").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unreadable_media_never_reaches_the_classifier() {
    let classifier = FakeClassifier::new(&[0.9]);
    let decoder = StubDecoder::unreadable("moov atom not found");
    let err = detector(Arc::clone(&classifier), decoder, 30)
        .run(b"garbage")
        .unwrap_err();

    assert!(matches!(err, InferError::Unreadable(_)));
    assert!(err.is_input_error());
    assert_eq!(classifier.calls(), 0);
}

#[test]
fn test_zero_frames_is_insufficient_frames() {
    let classifier = FakeClassifier::new(&[0.9]);
    let decoder = StubDecoder::new(0);
    let err = detector(Arc::clone(&classifier), decoder, 30)
        .run(b"video")
        .unwrap_err();

    assert!(matches!(err, InferError::InsufficientFrames));
    assert!(err.is_input_error());
    assert_eq!(classifier.calls(), 0);
}

#[test]
fn test_frame_scores_seq_strictly_increasing() {
    let classifier = FakeClassifier::new(&[0.6, 0.4]);
    let decoder = StubDecoder::new(95);
    let result = detector(classifier, decoder, 10).run(b"video").unwrap();
    assert_eq!(result.frame_scores().len(), 10);
    for window in result.frame_scores().windows(2) {
        assert!(window[0].seq < window[1].seq);
    }
}

#[test]
fn test_temp_media_cleaned_up_after_success() {
    let classifier = FakeClassifier::new(&[0.9]);
    let decoder = StubDecoder::new(5);
    detector(classifier, Arc::clone(&decoder), 1)
        .run(b"video")
        .unwrap();
    let path = decoder.opened_path().unwrap();
    assert!(!path.exists(), "temp media file leaked at {path:?}");
}

#[test]
fn test_temp_media_cleaned_up_after_failure() {
    let classifier = FakeClassifier::new(&[0.9]);
    let decoder = StubDecoder::unreadable("bad header");
    detector(classifier, Arc::clone(&decoder), 1)
        .run(b"garbage")
        .unwrap_err();
    let path = decoder.opened_path().unwrap();
    assert!(!path.exists(), "temp media file leaked at {path:?}");
}

#[test]
fn test_aggregation_strategy_is_replaceable() {
    /// Worst-frame strategy: the lowest P(real) decides alone.
    struct MinScore;

    impl Aggregate for MinScore {
        fn aggregate(&self, scores: Vec<FrameScore>) -> Result<AggregateResult, InferError> {
            let min = scores
                .iter()
                .map(|s| s.p_real)
                .fold(f32::INFINITY, f32::min);
            if !min.is_finite() {
                return Err(InferError::InsufficientFrames);
            }
            let label = if min > 0.5 { Verdict::Real } else { Verdict::Fake };
            let confidence = match label {
                Verdict::Real => min,
                Verdict::Fake => 1.0 - min,
            };
            Ok(AggregateResult::new(label, confidence, scores))
        }
    }

    // Mean of [0.9, 0.2, 0.8] says real; the worst frame says fake.
    let classifier = FakeClassifier::new(&[0.9, 0.2, 0.8]);
    let result = detector(classifier, StubDecoder::new(3), 1)
        .with_aggregator(Arc::new(MinScore))
        .run(b"video")
        .unwrap();
    assert_eq!(result.label(), Verdict::Fake);
    assert!((result.confidence() - 0.8).abs() < 1e-6);
}

#[tokio::test]
async fn test_run_async_matches_run() {
    let classifier = FakeClassifier::new(&[0.9, 0.2, 0.8]);
    let det = detector(classifier, StubDecoder::new(90), 30);
    let sync = det.run(b"video").unwrap();
    let offloaded = det.run_async(b"video".to_vec()).await.unwrap();
    assert_eq!(sync, offloaded);
}

#[test]
fn test_detector_is_concurrency_safe() {
    // One detector, same classifier handle, parallel invocations.
    let classifier = FakeClassifier::new(&[0.7]);
    let det = detector(classifier, StubDecoder::new(10), 1);

    let results: Vec<AggregateResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let det = det.clone();
                scope.spawn(move || det.run(b"video").unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in &results {
        assert_eq!(result.label(), Verdict::Real);
        assert_eq!(result.frame_scores().len(), 10);
    }
}

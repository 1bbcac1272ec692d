use crate::aggregate::{Aggregate, AggregateResult, FrameScore, MeanThreshold, Verdict};
use crate::classifier::{normalize, FrameClassifier};
use crate::InferError;
use argus_video::{FrameSampler, MediaDecoder, SampleConfig, DEFAULT_STRIDE};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::sync::Arc;

/// Video detection pipeline: sampling, per-frame inference, aggregation.
///
/// Holds only read-only collaborators, so one detector is cheap to clone
/// and safe to run concurrently against the same classifier. Each `run`
/// call owns its frame buffers and score sequence; nothing is shared
/// across invocations.
#[derive(Clone)]
pub struct VideoDetector {
    classifier: Arc<dyn FrameClassifier>,
    sampler: FrameSampler,
    aggregator: Arc<dyn Aggregate>,
}

impl std::fmt::Debug for VideoDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDetector")
            .field("sampler", &self.sampler)
            .finish()
    }
}

impl VideoDetector {
    /// Detector with the default sampling stride and mean-threshold
    /// aggregation. The sampler target size is wired from the classifier,
    /// so the normalizer's precondition holds by construction.
    pub fn new(classifier: Arc<dyn FrameClassifier>) -> Result<Self, InferError> {
        Self::with_stride(classifier, DEFAULT_STRIDE)
    }

    pub fn with_stride(
        classifier: Arc<dyn FrameClassifier>,
        stride: usize,
    ) -> Result<Self, InferError> {
        let config = SampleConfig::new(classifier.input_hw(), stride)?;
        Ok(Self {
            classifier,
            sampler: FrameSampler::new(config),
            aggregator: Arc::new(MeanThreshold),
        })
    }

    /// Replace the decode backend (alternate decoder or test double).
    pub fn with_decoder(mut self, decoder: Arc<dyn MediaDecoder>) -> Self {
        self.sampler = self.sampler.with_decoder(decoder);
        self
    }

    /// Replace the aggregation strategy.
    pub fn with_aggregator(mut self, aggregator: Arc<dyn Aggregate>) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn stride(&self) -> usize {
        self.sampler.config().stride()
    }

    /// Classify one encoded video.
    ///
    /// Fails fast: any sampling or normalization failure aborts the whole
    /// invocation; there is no partial result. Zero sampled frames is
    /// `InferError::InsufficientFrames`, raised before the classifier is
    /// ever invoked.
    pub fn run(&self, media: &[u8]) -> Result<AggregateResult, InferError> {
        let expected = self.classifier.input_hw();
        let mut scores: Vec<FrameScore> = Vec::new();

        for frame in self.sampler.sample(media)? {
            let frame = frame?;
            let tensor = normalize(&frame.rgb, expected)?;
            let p_real = self.classifier.infer(&tensor)?;
            scores.push(FrameScore {
                seq: frame.seq,
                p_real,
            });
        }

        if scores.is_empty() {
            return Err(InferError::InsufficientFrames);
        }

        log::debug!(
            "scored {} sampled frames at stride {}",
            scores.len(),
            self.stride()
        );

        self.aggregator.aggregate(scores)
    }

    /// Offload a whole `run` call to a blocking worker thread.
    ///
    /// The pipeline itself stays synchronous; this is a caller-side
    /// convenience for async servers.
    pub async fn run_async(&self, media: Vec<u8>) -> Result<AggregateResult, InferError> {
        let detector = self.clone();
        tokio::task::spawn_blocking(move || detector.run(&media))
            .await
            .map_err(|e| InferError::Runtime(format!("detection task failed: {e}")))?
    }
}

/// Single-image verdict, the still-image counterpart of
/// [`AggregateResult`]. `score` is the classifier's P(real) for the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    label: Verdict,
    confidence: f32,
    score: f32,
}

impl Detection {
    pub fn label(&self) -> Verdict {
        self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn is_fake(&self) -> bool {
        self.label == Verdict::Fake
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

impl Serialize for Detection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Detection", 4)?;
        state.serialize_field("prediction", self.label.as_str())?;
        state.serialize_field("confidence", &self.confidence)?;
        state.serialize_field("is_fake", &self.is_fake())?;
        state.serialize_field("score", &self.score)?;
        state.end()
    }
}

/// Still-image detection path: decode, resize to the classifier input,
/// normalize, classify. One-shot, no aggregation.
#[derive(Clone)]
pub struct ImageDetector {
    classifier: Arc<dyn FrameClassifier>,
}

impl std::fmt::Debug for ImageDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDetector").finish()
    }
}

impl ImageDetector {
    pub fn new(classifier: Arc<dyn FrameClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify one encoded still image.
    pub fn run(&self, media: &[u8]) -> Result<Detection, InferError> {
        let target = self.classifier.input_hw();
        let raster = argus_image::decode_rgb8(media)?;
        let raster = argus_image::resize_rgb8(&raster, target)?;
        let tensor = normalize(&raster, target)?;
        let score = self.classifier.infer(&tensor)?;

        let label = if score > 0.5 {
            Verdict::Real
        } else {
            Verdict::Fake
        };
        let confidence = match label {
            Verdict::Real => score,
            Verdict::Fake => 1.0 - score,
        };

        Ok(Detection {
            label,
            confidence,
            score,
        })
    }

    /// Offload a whole `run` call to a blocking worker thread.
    pub async fn run_async(&self, media: Vec<u8>) -> Result<Detection, InferError> {
        let detector = self.clone();
        tokio::task::spawn_blocking(move || detector.run(&media))
            .await
            .map_err(|e| InferError::Runtime(format!("detection task failed: {e}")))?
    }
}

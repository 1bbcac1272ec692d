use crate::InferError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Classifier output for one sampled frame: P(real) paired with the
/// frame's position among the sampled frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScore {
    pub seq: usize,
    pub p_real: f32,
}

/// Video-level label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Real => "real",
            Verdict::Fake => "fake",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's output: one verdict with the per-frame trace that
/// produced it.
///
/// `confidence` is always the probability of the *reported* label, never
/// of the opposite class; `is_fake` is derived from the label and cannot
/// be set independently. Serializes as
/// `{ "prediction", "confidence", "is_fake", "frame_scores" }`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    label: Verdict,
    confidence: f32,
    frame_scores: Vec<FrameScore>,
}

impl AggregateResult {
    pub fn new(label: Verdict, confidence: f32, frame_scores: Vec<FrameScore>) -> Self {
        Self {
            label,
            confidence,
            frame_scores,
        }
    }

    pub fn label(&self) -> Verdict {
        self.label
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn is_fake(&self) -> bool {
        self.label == Verdict::Fake
    }

    /// Per-frame scores in original sequence order, preserved for
    /// downstream explanation and auditing.
    pub fn frame_scores(&self) -> &[FrameScore] {
        &self.frame_scores
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let scores: Vec<f32> = self.frame_scores.iter().map(|s| s.p_real).collect();
        let mut state = serializer.serialize_struct("AggregateResult", 4)?;
        state.serialize_field("prediction", self.label.as_str())?;
        state.serialize_field("confidence", &self.confidence)?;
        state.serialize_field("is_fake", &self.is_fake())?;
        state.serialize_field("frame_scores", &scores)?;
        state.end()
    }
}

/// Replaceable score-aggregation strategy.
///
/// Combines the ordered per-frame scores into one result. Implementations
/// must keep the score sequence intact in the result and fail with
/// `InferError::InsufficientFrames` on empty input.
pub trait Aggregate: Send + Sync {
    fn aggregate(&self, scores: Vec<FrameScore>) -> Result<AggregateResult, InferError>;
}

/// Default strategy: unweighted arithmetic mean against a midpoint
/// threshold.
///
/// Mean P(real) above 0.5 labels the video real, otherwise fake; the tie
/// at exactly 0.5 resolves to fake (strict `>`). No temporal weighting,
/// outlier rejection, or smoothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanThreshold;

impl Aggregate for MeanThreshold {
    fn aggregate(&self, scores: Vec<FrameScore>) -> Result<AggregateResult, InferError> {
        if scores.is_empty() {
            return Err(InferError::InsufficientFrames);
        }

        let mean = scores.iter().map(|s| s.p_real as f64).sum::<f64>() / scores.len() as f64;
        let label = if mean > 0.5 {
            Verdict::Real
        } else {
            Verdict::Fake
        };
        let confidence = match label {
            Verdict::Real => mean as f32,
            Verdict::Fake => (1.0 - mean) as f32,
        };

        log::debug!(
            "aggregated {} frame scores: mean {:.4} -> {} ({:.4})",
            scores.len(),
            mean,
            label,
            confidence
        );

        Ok(AggregateResult::new(label, confidence, scores))
    }
}

//! AI-generated media detection.
//!
//! The core is the video pipeline: `argus-video` samples frames, the
//! normalizer turns each into a classifier input, the classifier scores
//! P(real) per frame, and a replaceable aggregation strategy folds the
//! ordered scores into one verdict with a confidence and a per-frame
//! trace. A one-shot still-image path reuses the same classifier.

pub mod aggregate;
pub mod classifier;
pub mod convnet;
pub mod detector;
pub mod error;
pub mod inference;

pub use aggregate::{Aggregate, AggregateResult, FrameScore, MeanThreshold, Verdict};
pub use classifier::{normalize, FrameClassifier, FrameTensor};
pub use convnet::{CnnClassifier, ConvNet, INPUT_SIZE};
pub use detector::{Detection, ImageDetector, VideoDetector};
pub use error::InferError;
pub use inference::Inference;

//! Temporal frame sampling for the argus video detector.
//!
//! Turns encoded video bytes into a lazy, stride-sampled sequence of
//! fixed-size RGB frames. Decoding runs against a scoped temp file through
//! a replaceable backend; the provided backend shells out to ffmpeg.

pub mod decoder;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod sampler;

pub use decoder::{FrameRead, MediaDecoder, RawFrameRead};
pub use error::VideoError;
pub use ffmpeg::FfmpegDecoder;
pub use frame::Frame;
pub use sampler::{FrameSampler, FrameStream, SampleConfig, DEFAULT_STRIDE};

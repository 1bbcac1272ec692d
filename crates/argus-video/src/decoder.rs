use crate::VideoError;
use std::path::Path;

/// Result of one raw frame read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRead {
    /// The buffer was completely filled with one frame.
    Full,
    /// Clean end of stream, no bytes read.
    Eof,
}

/// Streaming reader over the raw frames of one opened media file.
///
/// Frames are fixed-size `rgb24` rasters at the target size requested from
/// [`MediaDecoder::open`], delivered in decode order.
pub trait RawFrameRead: Send {
    /// Read exactly one frame into `buf`, or report end of stream.
    ///
    /// `buf.len()` must be `height * width * 3` for the opened target size.
    /// A stream ending in the middle of a frame is
    /// `VideoError::Truncated`.
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<FrameRead, VideoError>;

    /// Report the decoder's termination status after end of stream.
    ///
    /// A decoder that could not open or parse the media reports
    /// `VideoError::Unreadable` here. Safe to call more than once.
    fn finish(&mut self) -> Result<(), VideoError>;
}

/// Replaceable video decode backend.
///
/// The sampler hands the backend an addressable, seekable file; backends
/// that can decode from memory are free to ignore that affordance, and test
/// doubles can serve synthetic frames without touching the file at all.
pub trait MediaDecoder: Send + Sync {
    /// Open `media` for decoding, resizing every frame to `target`
    /// (height, width) and converting to canonical RGB channel order.
    fn open(&self, media: &Path, target: (usize, usize))
    -> Result<Box<dyn RawFrameRead>, VideoError>;
}

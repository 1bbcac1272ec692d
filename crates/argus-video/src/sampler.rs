use crate::decoder::{FrameRead, MediaDecoder, RawFrameRead};
use crate::ffmpeg::FfmpegDecoder;
use crate::{Frame, VideoError};
use argus_base::Tensor;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Default sampling stride: keep one frame out of every 30 decoded.
pub const DEFAULT_STRIDE: usize = 30;

/// Validated sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    target: (usize, usize),
    stride: usize,
}

impl SampleConfig {
    /// `target` is (height, width) of every retained frame; `stride` keeps
    /// frames whose decode-order index is divisible by it, starting at 0.
    pub fn new(target: (usize, usize), stride: usize) -> Result<Self, VideoError> {
        if target.0 == 0 || target.1 == 0 {
            return Err(VideoError::Config(format!(
                "target dimensions must be non-zero, got {}x{}",
                target.0, target.1
            )));
        }
        if stride == 0 {
            return Err(VideoError::Config("stride must be positive".to_string()));
        }
        Ok(Self { target, stride })
    }

    pub fn target(&self) -> (usize, usize) {
        self.target
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Extracts a uniformly spaced subsequence of frames from encoded video
/// bytes.
///
/// The decode backend needs addressable, seekable storage, so each `sample`
/// call writes the bytes to a named temp file first. The file is owned by
/// the returned stream and deleted when the stream is dropped, on every
/// exit path.
#[derive(Clone)]
pub struct FrameSampler {
    decoder: Arc<dyn MediaDecoder>,
    config: SampleConfig,
}

impl std::fmt::Debug for FrameSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSampler")
            .field("config", &self.config)
            .finish()
    }
}

impl FrameSampler {
    /// Sampler backed by the default ffmpeg decoder.
    pub fn new(config: SampleConfig) -> Self {
        Self {
            decoder: Arc::new(FfmpegDecoder::new()),
            config,
        }
    }

    /// Replace the decode backend (alternate decoder or test double).
    pub fn with_decoder(mut self, decoder: Arc<dyn MediaDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Begin decoding `media`, yielding retained frames lazily.
    ///
    /// The returned stream is finite and non-restartable: each retained
    /// frame appears exactly once, in increasing decode order. A stream
    /// that opens but retains zero frames is simply empty; media the
    /// decoder cannot parse surfaces as `VideoError::Unreadable` from
    /// iteration.
    pub fn sample(&self, media: &[u8]) -> Result<FrameStream, VideoError> {
        let mut tmp = tempfile::Builder::new()
            .prefix("argus-media-")
            .suffix(".bin")
            .tempfile()?;
        tmp.write_all(media)?;
        tmp.flush()?;

        log::debug!(
            "staged {} media bytes at {}",
            media.len(),
            tmp.path().display()
        );

        let reader = self.decoder.open(tmp.path(), self.config.target)?;

        Ok(FrameStream {
            _media: tmp,
            reader,
            target: self.config.target,
            stride: self.config.stride,
            next_index: 0,
            seq: 0,
            done: false,
        })
    }
}

/// Lazy, finite, non-restartable stream of sampled frames.
///
/// Holds the temp media file alive for the duration of the decode; dropping
/// the stream at any point kills the decoder and deletes the file.
pub struct FrameStream {
    _media: NamedTempFile,
    reader: Box<dyn RawFrameRead>,
    target: (usize, usize),
    stride: usize,
    next_index: u64,
    seq: usize,
    done: bool,
}

impl Iterator for FrameStream {
    type Item = Result<Frame, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (h, w) = self.target;
        loop {
            let mut buf = vec![0u8; h * w * 3];
            match self.reader.read_frame(&mut buf) {
                Ok(FrameRead::Eof) => {
                    self.done = true;
                    return match self.reader.finish() {
                        Ok(()) => None,
                        Err(e) => Some(Err(e)),
                    };
                }
                Ok(FrameRead::Full) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    if index % self.stride as u64 != 0 {
                        continue;
                    }
                    let rgb = match Tensor::new(vec![h, w, 3], buf) {
                        Ok(t) => t,
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e.into()));
                        }
                    };
                    let frame = Frame {
                        index,
                        seq: self.seq,
                        rgb,
                    };
                    self.seq += 1;
                    return Some(Ok(frame));
                }
                Err(e) => {
                    self.done = true;
                    // A mid-stream read failure often means the decoder
                    // died; its exit status is the more useful error.
                    return Some(Err(match self.reader.finish() {
                        Err(fin) => fin,
                        Ok(()) => e,
                    }));
                }
            }
        }
    }
}

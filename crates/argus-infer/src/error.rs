use argus_video::VideoError;
use std::fmt;

#[derive(Debug)]
pub enum InferError {
    /// The decoder could not open or parse the input media.
    Unreadable(String),
    /// A frame violated the fixed-shape precondition of the normalizer.
    /// This is a sampler/normalizer contract violation, not bad input.
    Normalization { expected: Vec<usize>, got: Vec<usize> },
    /// Zero usable frames after sampling.
    InsufficientFrames,
    Candle(String),
    /// Decode backend unavailable or failed to launch.
    Decoder(String),
    Io(String),
    Runtime(String),
}

impl InferError {
    /// True for failures caused by the caller's input (bad media, video too
    /// short) as opposed to internal invariant or environment failures.
    /// The API layer uses this to pick the transport error class.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            InferError::Unreadable(_) | InferError::InsufficientFrames
        )
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Unreadable(msg) => write!(f, "unreadable media: {msg}"),
            InferError::Normalization { expected, got } => {
                write!(f, "normalization error: expected frame shape {expected:?}, got {got:?}")
            }
            InferError::InsufficientFrames => {
                write!(f, "no usable frames were sampled from the video")
            }
            InferError::Candle(msg) => write!(f, "candle error: {msg}"),
            InferError::Decoder(msg) => write!(f, "decoder error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<candle_core::Error> for InferError {
    fn from(err: candle_core::Error) -> Self {
        InferError::Candle(err.to_string())
    }
}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<VideoError> for InferError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::Unreadable(msg) => InferError::Unreadable(msg),
            // A partial trailing frame means the container lied about its
            // contents; to the caller that is still unreadable input.
            VideoError::Truncated { expected, got } => InferError::Unreadable(format!(
                "truncated frame: expected {expected} bytes, got {got}"
            )),
            VideoError::Decoder(msg) => InferError::Decoder(msg),
            VideoError::Config(msg) => InferError::Runtime(format!("invalid sampling config: {msg}")),
            VideoError::Io(msg) => InferError::Io(msg),
            VideoError::Tensor(e) => InferError::Runtime(format!("tensor error: {e}")),
        }
    }
}

impl From<argus_image::ImageError> for InferError {
    fn from(err: argus_image::ImageError) -> Self {
        match err {
            argus_image::ImageError::Decode(msg) => InferError::Unreadable(msg),
            argus_image::ImageError::Resize(msg) => InferError::Runtime(format!("resize error: {msg}")),
            argus_image::ImageError::Tensor(e) => InferError::Runtime(format!("tensor error: {e}")),
        }
    }
}

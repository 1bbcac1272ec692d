use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// The decoder could not open or parse the media.
    Unreadable(String),
    /// The decoder produced a partial trailing frame.
    Truncated { expected: usize, got: usize },
    /// The decode backend is unavailable or failed to launch.
    Decoder(String),
    /// Invalid sampling parameters.
    Config(String),
    Io(String),
    Tensor(argus_base::TensorError),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Unreadable(msg) => write!(f, "unreadable media: {msg}"),
            VideoError::Truncated { expected, got } => {
                write!(f, "truncated frame: expected {expected} bytes, got {got}")
            }
            VideoError::Decoder(msg) => write!(f, "decoder error: {msg}"),
            VideoError::Config(msg) => write!(f, "config error: {msg}"),
            VideoError::Io(msg) => write!(f, "io error: {msg}"),
            VideoError::Tensor(err) => write!(f, "tensor error: {err}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Io(err.to_string())
    }
}

impl From<argus_base::TensorError> for VideoError {
    fn from(err: argus_base::TensorError) -> Self {
        VideoError::Tensor(err)
    }
}

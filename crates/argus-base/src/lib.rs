pub mod logging;
pub mod tensor;

pub use logging::{init_stdout_logger, StdoutLogger};
pub use tensor::{Tensor, TensorError};

// Re-export log crate so downstream crates can use argus_base::log::*
pub use log;

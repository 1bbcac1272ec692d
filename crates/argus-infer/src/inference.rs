use crate::{CnnClassifier, ImageDetector, InferError, VideoDetector};
use candle_core::Device;
use std::path::Path;
use std::sync::Arc;

/// Device entry point producing detector handles.
///
/// Lifecycle: pick a device, load a checkpoint through a `use_*`
/// constructor, share the resulting handle (it is read-only) across as
/// many concurrent calls as needed, drop it to release the weights.
#[derive(Debug)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Self {
        Self {
            device: Device::Cpu,
        }
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Result<Self, InferError> {
        let device = Device::new_cuda(ordinal)?;
        Ok(Self { device })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Load the single-frame classifier from a safetensors checkpoint.
    pub fn use_frame_classifier(
        &self,
        checkpoint: impl AsRef<Path>,
    ) -> Result<CnnClassifier, InferError> {
        CnnClassifier::load(checkpoint, self.device.clone())
    }

    /// Video detector with the default stride, backed by a checkpoint.
    pub fn use_video_detector(
        &self,
        checkpoint: impl AsRef<Path>,
    ) -> Result<VideoDetector, InferError> {
        let classifier = self.use_frame_classifier(checkpoint)?;
        VideoDetector::new(Arc::new(classifier))
    }

    /// Still-image detector backed by a checkpoint.
    pub fn use_image_detector(
        &self,
        checkpoint: impl AsRef<Path>,
    ) -> Result<ImageDetector, InferError> {
        let classifier = self.use_frame_classifier(checkpoint)?;
        Ok(ImageDetector::new(Arc::new(classifier)))
    }
}

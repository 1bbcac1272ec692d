use crate::InferError;
use argus_base::Tensor;

/// Normalized classifier input: CHW `f32` tensor, shape `[3, height,
/// width]`, values in [0, 1].
///
/// Only constructed by [`normalize`], so a `FrameTensor` always satisfies
/// the classifier's input contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTensor {
    chw: Tensor<f32>,
}

impl FrameTensor {
    pub(crate) fn new(chw: Tensor<f32>) -> Self {
        Self { chw }
    }

    pub fn shape(&self) -> &[usize] {
        &self.chw.shape
    }

    /// (height, width) of the underlying frame.
    pub fn hw(&self) -> (usize, usize) {
        (self.chw.dim(1), self.chw.dim(2))
    }

    pub fn data(&self) -> &[f32] {
        &self.chw.data
    }
}

/// Converts a sampler-produced RGB8 raster into the classifier's input
/// tensor.
///
/// Deterministic and pure: u8 HWC is transposed to f32 CHW and scaled by
/// 1/255. The raster must already be exactly `[expected.0, expected.1, 3]`;
/// the sampler guarantees that precondition, and a violation here is an
/// internal bug, not a resize request.
pub fn normalize(raster: &Tensor<u8>, expected: (usize, usize)) -> Result<FrameTensor, InferError> {
    let (h, w) = expected;
    if raster.shape != [h, w, 3] {
        return Err(InferError::Normalization {
            expected: vec![h, w, 3],
            got: raster.shape.clone(),
        });
    }

    let mut data = vec![0f32; 3 * h * w];
    for y in 0..h {
        for x in 0..w {
            let pixel = (y * w + x) * 3;
            for c in 0..3 {
                data[c * h * w + y * w + x] = raster.data[pixel + c] as f32 / 255.0;
            }
        }
    }

    let chw = Tensor::new(vec![3, h, w], data)
        .map_err(|e| InferError::Runtime(format!("tensor error: {e}")))?;
    Ok(FrameTensor::new(chw))
}

/// Single-frame authenticity classifier.
///
/// `infer` returns the estimated probability that the frame is real
/// (authentic), in [0, 1]. Implementations are read-only after load:
/// deterministic for identical weights and input, and safe to invoke in
/// any order across frames of the same or different videos.
pub trait FrameClassifier: Send + Sync {
    /// (height, width) the classifier expects its input frames to be.
    fn input_hw(&self) -> (usize, usize);

    /// P(real) for one normalized frame.
    fn infer(&self, tensor: &FrameTensor) -> Result<f32, InferError>;
}

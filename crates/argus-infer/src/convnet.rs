use crate::classifier::{FrameClassifier, FrameTensor};
use crate::InferError;
use candle_core::{DType, Device, Tensor as CanTensor};
use candle_nn::{conv2d, linear, Conv2dConfig, Linear, Module, VarBuilder, VarMap};
use std::path::Path;

/// Side length of the square input the network was trained on.
pub const INPUT_SIZE: usize = 224;

/// Compact convolutional network scoring frame authenticity.
///
/// Three conv/relu/maxpool stages followed by two fully connected layers,
/// producing a single logit. Sigmoid of the logit is P(real). The same
/// network serves both the still-image and the video detection paths.
#[derive(Debug)]
pub struct ConvNet {
    conv1: candle_nn::Conv2d,
    conv2: candle_nn::Conv2d,
    conv3: candle_nn::Conv2d,
    fc1: Linear,
    fc2: Linear,
}

impl ConvNet {
    pub fn load(vb: VarBuilder) -> candle_core::Result<Self> {
        let cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };
        let conv1 = conv2d(3, 16, 3, cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(16, 32, 3, cfg, vb.pp("conv2"))?;
        let conv3 = conv2d(32, 64, 3, cfg, vb.pp("conv3"))?;
        // Three stride-2 pools: 224 -> 112 -> 56 -> 28
        let flat = 64 * (INPUT_SIZE / 8) * (INPUT_SIZE / 8);
        let fc1 = linear(flat, 128, vb.pp("fc1"))?;
        let fc2 = linear(128, 1, vb.pp("fc2"))?;
        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
        })
    }
}

impl Module for ConvNet {
    /// `[b, 3, 224, 224]` -> `[b, 1]` logit.
    fn forward(&self, xs: &CanTensor) -> candle_core::Result<CanTensor> {
        let xs = self.conv1.forward(xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv2.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv3.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        self.fc2.forward(&xs)
    }
}

/// `FrameClassifier` backed by a [`ConvNet`] safetensors checkpoint.
///
/// Weights are memory-mapped at load time and read-only afterwards; one
/// handle is safe to share across concurrent detector calls.
pub struct CnnClassifier {
    model: ConvNet,
    device: Device,
}

impl std::fmt::Debug for CnnClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CnnClassifier")
            .field("device", &self.device)
            .finish()
    }
}

impl CnnClassifier {
    /// Load weights from a safetensors checkpoint.
    pub fn load(checkpoint: impl AsRef<Path>, device: Device) -> Result<Self, InferError> {
        let checkpoint = checkpoint.as_ref();
        probe_checkpoint(checkpoint)?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[checkpoint], DType::F32, &device)?
        };
        let model = ConvNet::load(vb)?;

        log::info!("frame classifier loaded from {}", checkpoint.display());

        Ok(Self { model, device })
    }

    /// Build a classifier with freshly initialized weights (tests and
    /// experiments; real deployments load a checkpoint).
    pub fn from_varmap(varmap: &VarMap, device: Device) -> Result<Self, InferError> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, &device);
        let model = ConvNet::load(vb)?;
        Ok(Self { model, device })
    }
}

impl FrameClassifier for CnnClassifier {
    fn input_hw(&self) -> (usize, usize) {
        (INPUT_SIZE, INPUT_SIZE)
    }

    fn infer(&self, tensor: &FrameTensor) -> Result<f32, InferError> {
        if tensor.hw() != self.input_hw() {
            let (h, w) = self.input_hw();
            return Err(InferError::Normalization {
                expected: vec![3, h, w],
                got: tensor.shape().to_vec(),
            });
        }

        let (h, w) = tensor.hw();
        let xs = CanTensor::from_slice(tensor.data(), (3, h, w), &self.device)?.unsqueeze(0)?;
        let logit = self.model.forward(&xs)?;
        let logit: f32 = logit.flatten_all()?.to_vec1::<f32>()?[0];

        let p_real = 1.0 / (1.0 + (-logit).exp());
        Ok(p_real.clamp(0.0, 1.0))
    }
}

/// Inspect checkpoint metadata before committing to a full load.
///
/// Memory-maps the file and checks that the first conv layer is present
/// with a 3-channel input, which catches checkpoints from other model
/// families with a clear message instead of a deep VarBuilder failure.
fn probe_checkpoint(path: &Path) -> Result<(), InferError> {
    use safetensors::SafeTensors;

    let file = std::fs::File::open(path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }
        .map_err(|e| InferError::Io(format!("failed to memory-map checkpoint: {e}")))?;

    let tensors = SafeTensors::deserialize(&mmap)
        .map_err(|e| InferError::Runtime(format!("failed to deserialize safetensors: {e}")))?;

    let key = "conv1.weight";
    let view = tensors.tensor(key).map_err(|e| {
        InferError::Runtime(format!("key '{key}' not found in checkpoint: {e}"))
    })?;

    let shape = view.shape();
    if shape.len() != 4 || shape[1] != 3 {
        return Err(InferError::Runtime(format!(
            "unexpected shape for {key}: {shape:?}, expected [out, 3, k, k]"
        )));
    }

    Ok(())
}

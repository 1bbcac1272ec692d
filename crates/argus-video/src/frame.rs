use argus_base::Tensor;

/// One decoded, resized video frame.
///
/// The raster is RGB8 in HWC layout `[height, width, 3]`, already at the
/// sampler's target size. `index` is the frame's ordinal position in decode
/// order; `seq` is its 0-based position among the sampled frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub seq: usize,
    pub rgb: Tensor<u8>,
}

impl Frame {
    pub fn height(&self) -> usize {
        self.rgb.dim(0)
    }

    pub fn width(&self) -> usize {
        self.rgb.dim(1)
    }
}

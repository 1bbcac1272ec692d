use argus_base::{Tensor, TensorError};

#[test]
fn test_new_valid_shape() {
    let t = Tensor::new(vec![2, 3], vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(t.shape, vec![2, 3]);
    assert_eq!(t.ndim(), 2);
    assert_eq!(t.len(), 6);
    assert!(!t.is_empty());
}

#[test]
fn test_new_rejects_length_mismatch() {
    let err = Tensor::new(vec![2, 3], vec![0u8; 5]).unwrap_err();
    assert_eq!(err, TensorError::ShapeMismatch { expected: 6, got: 5 });
}

#[test]
fn test_new_rejects_shape_overflow() {
    let err = Tensor::new(vec![usize::MAX, 2], Vec::<u8>::new()).unwrap_err();
    assert_eq!(err, TensorError::ShapeOverflow);
}

#[test]
fn test_zero_dimension_gives_empty_tensor() {
    let t = Tensor::new(vec![0, 224, 3], Vec::<u8>::new()).unwrap();
    assert!(t.is_empty());
    assert_eq!(t.dim(1), 224);
}

#[test]
fn test_zeros_hwc_raster() {
    let t: Tensor<u8> = Tensor::zeros(vec![224, 224, 3]).unwrap();
    assert_eq!(t.len(), 224 * 224 * 3);
    assert!(t.data.iter().all(|&v| v == 0));
}

#[test]
fn test_filled() {
    let t = Tensor::filled(vec![2, 2], 0.5f32).unwrap();
    assert_eq!(t.data, vec![0.5, 0.5, 0.5, 0.5]);
}

#[test]
fn test_dim_out_of_range_is_zero() {
    let t: Tensor<f32> = Tensor::zeros(vec![3, 4]).unwrap();
    assert_eq!(t.dim(0), 3);
    assert_eq!(t.dim(5), 0);
}

#[test]
fn test_debug_elides_data() {
    let t: Tensor<u8> = Tensor::zeros(vec![4, 4, 3]).unwrap();
    let repr = format!("{:?}", t);
    assert!(repr.contains("shape"));
    assert!(repr.contains("len"));
}

// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use fast_image_resize;
use fast_image_resize::{FilterType, PixelType, images::Image};

use crate::error::DuckboxError;

/// Resize a raw u8 image buffer using the SIMD-accelerated fast-image-resize crate
///
/// # Arguments
///
/// * `buffer` - A row-major u8 image buffer
/// * `width` - Current width of the image
/// * `height` - Current height of the image
/// * `new_width` - New width following resizing
/// * `new_height` - New height following resizing
/// * `pixel_type` - RGB or Luma pixel type
pub fn resize_bilinear_fast(
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    new_width: u32,
    new_height: u32,
    pixel_type: PixelType,
) -> Result<Vec<u8>, DuckboxError> {
    let source = Image::from_vec_u8(width, height, buffer, pixel_type)
        .map_err(|_| DuckboxError::ImageError("Buffer does not match resize dimensions."))?;

    let mut destination = Image::new(new_width, new_height, pixel_type);

    let mut resizer = fast_image_resize::Resizer::new();
    let option = fast_image_resize::ResizeOptions {
        algorithm: fast_image_resize::ResizeAlg::Convolution(FilterType::Bilinear),
        cropping: fast_image_resize::SrcCropping::None,
        mul_div_alpha: false,
    };

    resizer
        .resize(&source, &mut destination, &option)
        .map_err(|_| DuckboxError::ImageError("Failed to resize image buffer."))?;

    Ok(destination.into_vec())
}

// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::io::Read;
use std::path::Path;

use fast_image_resize::PixelType;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, open as open_dynamic};
use npyz::{self, DType, NpyFile, TypeChar};

use crate::constant;
use crate::cv::transform;
use crate::error::DuckboxError;
use crate::im::PixelBuffer;

/// An 8-bit camera frame or segmentation render
///
/// Scene images hold interleaved row-major u8 subpixels with one or three
/// channels. Segmentation renders must be three channels; grayscale frames
/// are accepted on open but rejected when a class mask is requested.
///
/// # Examples
///
/// ```
/// use duckbox_core::im::SceneImage;
///
/// let image = SceneImage::new(4, 2, 3, vec![0u8; 24]).unwrap();
///
/// assert_eq!(image.shape(), (2, 4, 3));
/// ```
pub type SceneImage = PixelBuffer<u8, Vec<u8>>;

// >>> I/O METHODS

impl SceneImage {
    /// Open a new image from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use duckbox_core::im::SceneImage;
    /// let image = SceneImage::open("render.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SceneImage, DuckboxError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                if let Ok(bytes) = std::fs::read(&path) {
                    if let Ok(npy) = NpyFile::new(&bytes[..]) {
                        return Self::new_from_numpy(npy);
                    }
                }

                return Err(DuckboxError::ImageReadError);
            }

            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                if let Ok(image) = open_dynamic(&path) {
                    return Self::new_from_default(image);
                }

                return Err(DuckboxError::ImageReadError);
            }
        }

        Err(DuckboxError::ImageExtensionError)
    }

    /// Initialize a new image from a DynamicImage
    ///
    /// Alpha channels are stripped; subpixel types other than u8 are
    /// rejected.
    ///
    /// # Arguments
    ///
    /// * `image` - An 8-bit grayscale or rgb DynamicImage
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{DynamicImage, RgbImage};
    /// use duckbox_core::im::SceneImage;
    ///
    /// let rgb = RgbImage::new(10, 10);
    /// let dynamic = DynamicImage::ImageRgb8(rgb);
    /// let image = SceneImage::new_from_default(dynamic);
    /// ```
    pub fn new_from_default(image: DynamicImage) -> Result<SceneImage, DuckboxError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => {
                SceneImage::new(width, height, 1, buffer.into_raw())
            }
            DynamicImage::ImageLumaA8(buffer) => SceneImage::new(
                width,
                height,
                1,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            ),
            DynamicImage::ImageRgb8(buffer) => SceneImage::new(width, height, 3, buffer.into_raw()),
            DynamicImage::ImageRgba8(buffer) => SceneImage::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            ),
            _ => Err(DuckboxError::ImageFormatError),
        }
    }

    /// Initialize a new image from a numpy array buffer
    ///
    /// # Arguments
    ///
    /// * `npy` - A (height, width) or (height, width, channel) shaped u8 array
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use npyz::NpyFile;
    /// use duckbox_core::im::SceneImage;
    ///
    /// let bytes = std::fs::read("render.npy").unwrap();
    /// let npy = NpyFile::new(&bytes[..]).unwrap();
    /// let image = SceneImage::new_from_numpy(npy);
    /// ```
    pub fn new_from_numpy<R: Read>(npy: NpyFile<R>) -> Result<SceneImage, DuckboxError> {
        let shape = npy.shape().to_vec();

        let (h, w, c) = match shape.len() {
            2 => (shape[0] as u32, shape[1] as u32, 1u32),
            3 => (shape[0] as u32, shape[1] as u32, shape[2] as u32),
            _ => {
                return Err(DuckboxError::ImageError(
                    "Numpy array inputs must have an (H, W) or (H, W, C) shape.",
                ));
            }
        };

        match npy.dtype() {
            DType::Plain(x) => match (x.type_char(), x.size_field()) {
                (TypeChar::Uint, 1) => {
                    let buffer = npy
                        .into_vec()
                        .map_err(|_| DuckboxError::ImageReadError)?;
                    SceneImage::new(w, h, c, buffer)
                }
                _ => Err(DuckboxError::ImageFormatError),
            },
            _ => Err(DuckboxError::ImageFormatError),
        }
    }

    /// Save image as a common image format (e.g. jpg, png)
    ///
    /// # Arguments
    ///
    /// * `path` - Path to output image
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use duckbox_core::im::SceneImage;
    ///
    /// let image = SceneImage::new(10, 10, 3, vec![0u8; 300]).unwrap();
    /// image.save("frame.jpg").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<(), DuckboxError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension {
            Some(ext) if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) => {
                match self.channels() {
                    1 => {
                        let image_buffer = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(
                            self.width(),
                            self.height(),
                            self.into_raw(),
                        )
                        .ok_or(DuckboxError::ImageWriteError)?;

                        image_buffer
                            .save(path)
                            .map_err(|_| DuckboxError::ImageWriteError)
                    }
                    3 => {
                        let image_buffer = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
                            self.width(),
                            self.height(),
                            self.into_raw(),
                        )
                        .ok_or(DuckboxError::ImageWriteError)?;

                        image_buffer
                            .save(path)
                            .map_err(|_| DuckboxError::ImageWriteError)
                    }
                    _ => Err(DuckboxError::ImageFormatError),
                }
            }
            _ => Err(DuckboxError::ImageExtensionError),
        }
    }
}

// <<< I/O METHODS

// >>> TRANSFORM METHODS

impl SceneImage {
    /// Resize the image with bilinear filtering
    ///
    /// A same-size resize returns an untouched copy.
    ///
    /// # Arguments
    ///
    /// * `width` - New width following resizing
    /// * `height` - New height following resizing
    ///
    /// # Examples
    ///
    /// ```
    /// use duckbox_core::im::SceneImage;
    ///
    /// let image = SceneImage::new(8, 6, 3, vec![0u8; 144]).unwrap();
    /// let resized = image.resize(4, 3).unwrap();
    ///
    /// assert_eq!(resized.shape(), (3, 4, 3));
    /// ```
    pub fn resize(&self, width: u32, height: u32) -> Result<SceneImage, DuckboxError> {
        if width == self.width() && height == self.height() {
            return Ok(self.clone());
        }

        let pixel_type = match self.channels() {
            1 => PixelType::U8,
            3 => PixelType::U8x3,
            _ => return Err(DuckboxError::ImageFormatError),
        };

        let resized = transform::resize_bilinear_fast(
            self.as_raw().clone(),
            self.width(),
            self.height(),
            width,
            height,
            pixel_type,
        )?;

        SceneImage::new(width, height, self.channels(), resized)
    }
}

// <<< TRANSFORM METHODS

// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::cv::find_contours;
use crate::error::DuckboxError;
use crate::im::{PixelBuffer, SceneImage, class_color};

/// A binary mask marking every pixel painted in one class color
///
/// Masks are extracted from segmentation renders by exact color equality;
/// there is no tolerance-based matching. A mask for a class with no painted
/// pixels is all false, which is a normal outcome rather than an error.
///
/// # Examples
///
/// ```
/// use duckbox_core::im::{ClassMask, SceneImage};
///
/// let mut data = vec![0u8; 48];
/// data[..3].copy_from_slice(&[207, 169, 35]);
///
/// let image = SceneImage::new(4, 4, 3, data).unwrap();
/// let mask = ClassMask::from_class(&image, "duckie").unwrap();
///
/// assert_eq!(mask.iter().filter(|m| **m).count(), 1);
/// ```
pub type ClassMask = PixelBuffer<bool, Vec<bool>>;

impl ClassMask {
    /// Extract the binary mask of one segmentation class
    ///
    /// # Arguments
    ///
    /// * `image` - A 3-channel RGB segmentation render
    /// * `class` - A segmentation class name (e.g. `duckie`)
    pub fn from_class(image: &SceneImage, class: &str) -> Result<ClassMask, DuckboxError> {
        if image.channels() != 3 {
            return Err(DuckboxError::MalformedImageError(
                "Class masks require a 3-channel RGB segmented image.",
            ));
        }

        let color = class_color(class)?;
        let buffer: Vec<bool> = image.iter_pixels().map(|pixel| *pixel == color).collect();

        ClassMask::new(image.width(), image.height(), 1, buffer)
    }

    /// Bounding boxes of all top-level connected components in the mask
    ///
    /// Boxes are `[min_x, min_y, max_x, max_y]` with one-past-end maximums,
    /// emitted in raster-scan discovery order. Hole borders and objects
    /// nested inside holes contribute no boxes.
    ///
    /// # Examples
    ///
    /// ```
    /// use duckbox_core::im::ClassMask;
    ///
    /// let mask = ClassMask::new(3, 3, 1, vec![false; 9]).unwrap();
    ///
    /// assert!(mask.bounding_boxes().is_empty());
    /// ```
    pub fn bounding_boxes(&self) -> Vec<[u32; 4]> {
        find_contours(self.width(), self.height(), self.as_raw())
            .into_iter()
            .filter(|contour| contour.is_top_level())
            .map(|contour| contour.bounding_rect())
            .collect()
    }
}

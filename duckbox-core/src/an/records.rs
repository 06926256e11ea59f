// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::DuckboxError;
use crate::im::detection_index;

/// A single annotated object within a camera frame
///
/// Bounding boxes are stored in xywh format (top-left corner plus width and
/// height) as floating point pixel coordinates of the annotated frame.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameObject {
    pub cat_name: String,
    pub bbox: [f32; 4],
}

/// Human annotations for a set of camera frames, keyed by image file name
pub type FrameAnnotations = HashMap<String, Vec<FrameObject>>;

impl FrameObject {
    /// Convert an annotated object into a scaled detection
    ///
    /// Returns `None` when the object's class is not a detection class;
    /// human annotations include non-target classes (e.g. houses) which are
    /// skipped rather than treated as errors. The box corner is scaled and
    /// rounded directly while width and height are scaled and rounded
    /// relative to the new corner. Scaled boxes are trusted as annotated and
    /// never clamped to the frame bounds.
    ///
    /// # Arguments
    ///
    /// * `sx` - Horizontal scaling factor (new width / frame width)
    /// * `sy` - Vertical scaling factor (new height / frame height)
    ///
    /// # Examples
    ///
    /// ```
    /// use duckbox_core::an::FrameObject;
    ///
    /// let object = FrameObject {
    ///     cat_name: "duckie".to_string(),
    ///     bbox: [10.0, 4.0, 7.0, 3.0],
    /// };
    ///
    /// assert_eq!(object.to_detection(0.5, 2.0), Some(([5, 8, 9, 14], 0)));
    /// ```
    pub fn to_detection(&self, sx: f32, sy: f32) -> Option<([u32; 4], u32)> {
        let class = detection_index(&self.cat_name)?;

        let [x, y, w, h] = self.bbox;

        let min_x = (x * sx).round() as u32;
        let min_y = (y * sy).round() as u32;
        let max_x = min_x + (w * sx).round() as u32;
        let max_y = min_y + (h * sy).round() as u32;

        Some(([min_x, min_y, max_x, max_y], class))
    }
}

/// Load per-frame annotations from a json document
///
/// The document maps image file names to lists of annotated objects, each
/// carrying a `cat_name` class string and an xywh `bbox`:
///
/// ```text
/// { "frame_000001.jpg": [{ "cat_name": "duckie", "bbox": [98.0, 280.0, 136.0, 100.0] }] }
/// ```
///
/// # Arguments
///
/// * `path` - Path to the annotation json file
///
/// # Examples
///
/// ```no_run
/// use duckbox_core::an::load_annotations;
///
/// let annotations = load_annotations("annotation/final_anns.json").unwrap();
/// ```
pub fn load_annotations<P: AsRef<Path>>(path: P) -> Result<FrameAnnotations, DuckboxError> {
    let mut contents = String::new();

    std::fs::File::open(&path)
        .map_err(|_| DuckboxError::AnnotationReadError(path.as_ref().display().to_string()))?
        .read_to_string(&mut contents)
        .map_err(|_| DuckboxError::AnnotationReadError(path.as_ref().display().to_string()))?;

    serde_json::from_str(&contents)
        .map_err(|_| DuckboxError::AnnotationParseError(path.as_ref().display().to_string()))
}

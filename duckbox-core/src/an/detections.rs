// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constant::DETECTION_CLASSES;
use crate::error::DuckboxError;
use crate::im::{ClassMask, SceneImage};

/// A detection container storing bounding boxes and their class indices
///
/// Boxes are stored in xyxy format with exclusive maximum coordinates
/// (`xmax = xmin + width`, `ymax = ymin + height`). The two vectors are
/// parallel: `classes[i]` is the detection class index of `boxes[i]`.
///
/// # Examples
///
/// ```
/// use duckbox_core::an::Detections;
/// use duckbox_core::im::SceneImage;
///
/// let image = SceneImage::new(8, 8, 3, vec![0u8; 8 * 8 * 3]).unwrap();
/// let detections = Detections::from_segments(&image).unwrap();
///
/// assert!(detections.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Detections {
    boxes: Vec<[u32; 4]>,
    classes: Vec<u32>,
}

impl Detections {
    /// Initialize an empty detection container
    pub fn new() -> Self {
        Detections {
            boxes: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Extract detections from a color-coded segmented image
    ///
    /// Detection classes are scanned in fixed index order (duckie, cone,
    /// truck, bus). For each class, a binary mask is built by exact color
    /// equality and every top-level contour contributes one bounding box.
    /// An image containing none of the detection classes yields an empty
    /// container rather than an error.
    ///
    /// # Arguments
    ///
    /// * `image` - A 3-channel RGB segmented image
    ///
    /// # Examples
    ///
    /// ```
    /// use duckbox_core::an::Detections;
    /// use duckbox_core::im::SceneImage;
    ///
    /// let mut data = vec![0u8; 32 * 32 * 3];
    ///
    /// // Paint a single duckie-colored pixel at (4, 2)
    /// let idx = (2 * 32 + 4) * 3;
    /// data[idx..idx + 3].copy_from_slice(&[0xcf, 0xa9, 0x23]);
    ///
    /// let image = SceneImage::new(32, 32, 3, data).unwrap();
    /// let detections = Detections::from_segments(&image).unwrap();
    ///
    /// assert_eq!(detections.as_boxes(), &vec![[4, 2, 5, 3]]);
    /// assert_eq!(detections.as_classes(), &vec![0]);
    /// ```
    pub fn from_segments(image: &SceneImage) -> Result<Detections, DuckboxError> {
        let mut detections = Detections::new();

        for (index, class) in DETECTION_CLASSES.iter().enumerate() {
            let mask = ClassMask::from_class(image, class)?;
            detections.extend_from_class(mask.bounding_boxes(), index as u32);
        }

        Ok(detections)
    }
}

impl Default for Detections {
    fn default() -> Self {
        Self::new()
    }
}

// >>> I/O METHODS

impl Detections {
    /// Save detections as a plain-text label file
    ///
    /// One newline-terminated line is written per detection:
    /// `<class_index> <xmin> <ymin> <xmax> <ymax>`. An empty container
    /// produces an empty file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to save the label file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use duckbox_core::an::Detections;
    ///
    /// let mut detections = Detections::new();
    /// detections.push([5, 5, 15, 13], 0);
    /// detections.save("labels/sim_0.txt").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DuckboxError> {
        let file =
            File::create(path).map_err(|err| DuckboxError::LabelWriteError(err.to_string()))?;

        let mut writer = BufWriter::new(file);

        for ([min_x, min_y, max_x, max_y], class) in self.boxes.iter().zip(self.classes.iter()) {
            writeln!(writer, "{} {} {} {} {}", class, min_x, min_y, max_x, max_y)
                .map_err(|err| DuckboxError::LabelWriteError(err.to_string()))?;
        }

        writer
            .flush()
            .map_err(|err| DuckboxError::LabelWriteError(err.to_string()))?;

        Ok(())
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl Detections {
    /// Number of detections
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if the container holds no detections
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl Detections {
    /// Return a reference to the underlying bounding boxes
    pub fn as_boxes(&self) -> &Vec<[u32; 4]> {
        &self.boxes
    }

    /// Return a reference to the underlying class indices
    pub fn as_classes(&self) -> &Vec<u32> {
        &self.classes
    }

    /// Return the underlying boxes and class indices
    pub fn into_parts(self) -> (Vec<[u32; 4]>, Vec<u32>) {
        (self.boxes, self.classes)
    }
}

// <<< CONVERSION METHODS

// >>> TRANSFORM METHODS

impl Detections {
    /// Append a single detection
    ///
    /// # Arguments
    ///
    /// * `bounding_box` - Bounding box in xyxy format
    /// * `class` - Detection class index of the box
    pub fn push(&mut self, bounding_box: [u32; 4], class: u32) {
        self.boxes.push(bounding_box);
        self.classes.push(class);
    }

    /// Append every box from a single class
    ///
    /// # Arguments
    ///
    /// * `boxes` - Bounding boxes in xyxy format
    /// * `class` - Detection class index shared by all boxes
    pub fn extend_from_class(&mut self, boxes: Vec<[u32; 4]>, class: u32) {
        for bounding_box in boxes {
            self.push(bounding_box, class);
        }
    }

    /// Scale all boxes by per-axis factors
    ///
    /// The minimum corner is scaled and rounded directly while box width
    /// and height are scaled and rounded relative to the new corner, so a
    /// box keeps its rounded extent instead of collapsing when both corners
    /// round in opposite directions.
    ///
    /// # Arguments
    ///
    /// * `sx` - Horizontal scaling factor (new width / old width)
    /// * `sy` - Vertical scaling factor (new height / old height)
    ///
    /// # Examples
    ///
    /// ```
    /// use duckbox_core::an::Detections;
    ///
    /// let mut detections = Detections::new();
    /// detections.push([5, 5, 15, 13], 0);
    /// detections.scale(2.0, 0.5);
    ///
    /// assert_eq!(detections.as_boxes(), &vec![[10, 3, 30, 7]]);
    /// ```
    pub fn scale(&mut self, sx: f32, sy: f32) {
        for [min_x, min_y, max_x, max_y] in self.boxes.iter_mut() {
            let w = *max_x - *min_x;
            let h = *max_y - *min_y;

            *min_x = (*min_x as f32 * sx).round() as u32;
            *min_y = (*min_y as f32 * sy).round() as u32;
            *max_x = *min_x + (w as f32 * sx).round() as u32;
            *max_y = *min_y + (h as f32 * sy).round() as u32;
        }
    }
}

// <<< TRANSFORM METHODS

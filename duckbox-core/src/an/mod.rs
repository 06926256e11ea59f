mod detections;
mod records;

pub use detections::Detections;
pub use records::{FrameAnnotations, FrameObject, load_annotations};

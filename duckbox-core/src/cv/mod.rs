pub mod contours;
pub mod transform;

pub use contours::{BorderType, Contour, find_contours};
pub use transform::resize_bilinear_fast;

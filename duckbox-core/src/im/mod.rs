mod buffer;
mod image;
mod mask;
mod palette;

pub use buffer::PixelBuffer;
pub use image::SceneImage;

pub use mask::ClassMask;

pub use palette::class_color;
pub use palette::decode_hex_rgb;
pub use palette::detection_index;

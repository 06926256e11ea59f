mod npz;

pub use npz::read_frame_npz;
pub use npz::write_frame_npz;

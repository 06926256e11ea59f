mod split;
mod writer;

pub use split::{collect_sample_names, split_samples, write_split_lists};
pub use writer::DatasetWriter;

// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// All currently supported image formats
pub const SUPPORTED_IMAGE_FORMATS: [&str; 18] = [
    "avif", "bmp", "dds", "hdr", "ico", "jpeg", "jpg", "exr", "png", "pbm", "pgm", "ppm", "qoi",
    "tga", "tif", "tiff", "webp", "npy",
];

// The currently supported common image formats
pub const IMAGE_DYNAMIC_FORMATS: [&str; 17] = [
    "avif", "bmp", "dds", "hdr", "ico", "jpeg", "jpg", "exr", "png", "pbm", "pgm", "ppm", "qoi",
    "tga", "tif", "tiff", "webp",
];

// Segmentation classes and their render colors as lowercase hex triplets.
// Floor and grass share 000000 in the render palette; the table maps names
// to colors and both entries stay.
pub const SEGMENT_CLASS_COLORS: [(&str, &str); 8] = [
    ("house", "3deb34"),
    ("bus", "ebd334"),
    ("truck", "961fad"),
    ("duckie", "cfa923"),
    ("cone", "ffa600"),
    ("floor", "000000"),
    ("grass", "000000"),
    ("barrier", "000099"),
];

// Detection target classes in label index order
pub const DETECTION_CLASSES: [&str; 4] = ["duckie", "cone", "truck", "bus"];

// Array names checked when reading a frame bundle (.npz)
pub const NPZ_IMAGE_ARRAY_NAMES: [&str; 2] = ["rgb", "arr_0"];
pub const NPZ_SEGMENT_ARRAY_NAMES: [&str; 2] = ["segment", "arr_1"];

// Hard default settings for dataset construction
pub const DEFAULT_IMAGE_SIZE: u32 = 416;
pub const DEFAULT_TRAIN_FRACTION: f32 = 0.8;
pub const DEFAULT_SPLIT_SEED: u64 = 42;
pub const DEFAULT_IMAGE_SUBSTRING: &str = "_rgb";
pub const DEFAULT_SEGMENT_SUBSTRING: &str = "_seg";

// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use npyz::WriterBuilder;
use npyz::npz::{self, NpzArchive};
use zip::write::ExtendedFileOptions;

use crate::constant::{NPZ_IMAGE_ARRAY_NAMES, NPZ_SEGMENT_ARRAY_NAMES};
use crate::error::DuckboxError;
use crate::im::SceneImage;

/// Read a simulator frame bundle from a .npz archive
///
/// A frame bundle stores one camera render and its segmentation as `rgb`
/// and `segment` arrays. Archives written with positional numpy names fall
/// back to `arr_0` (render) and `arr_1` (segmentation).
///
/// # Arguments
///
/// * `path` - Path to a .npz frame bundle
///
/// # Examples
///
/// ```no_run
/// use duckbox_core::io::read_frame_npz;
///
/// let (image, segment) = read_frame_npz("frame_000001.npz").unwrap();
/// assert_eq!(image.shape(), segment.shape());
/// ```
pub fn read_frame_npz<P: AsRef<Path>>(path: P) -> Result<(SceneImage, SceneImage), DuckboxError> {
    let mut archive =
        NpzArchive::open(&path).map_err(|err| DuckboxError::NoFileError(err.to_string()))?;

    let image = read_bundle_array(&mut archive, &NPZ_IMAGE_ARRAY_NAMES)?;
    let segment = read_bundle_array(&mut archive, &NPZ_SEGMENT_ARRAY_NAMES)?;

    Ok((image, segment))
}

/// Read the first matching array name from an open .npz archive
fn read_bundle_array<R: Read + Seek>(
    archive: &mut NpzArchive<R>,
    names: &[&str],
) -> Result<SceneImage, DuckboxError> {
    for name in names {
        if let Some(npy) = archive
            .by_name(name)
            .map_err(|_| DuckboxError::ImageReadError)?
        {
            return SceneImage::new_from_numpy(npy);
        }
    }

    Err(DuckboxError::ImageError(
        "Frame bundles must contain rgb/segment arrays or positional arr_0/arr_1 fallbacks.",
    ))
}

/// Write a simulator frame bundle to a .npz archive
///
/// # Arguments
///
/// * `path` - Path to output .npz frame bundle
/// * `image` - Camera render written as the `rgb` array
/// * `segment` - Segmentation render written as the `segment` array
///
/// # Examples
///
/// ```no_run
/// use duckbox_core::im::SceneImage;
/// use duckbox_core::io::write_frame_npz;
///
/// let image = SceneImage::new(4, 4, 3, vec![0u8; 48]).unwrap();
/// let segment = SceneImage::new(4, 4, 3, vec![0u8; 48]).unwrap();
///
/// write_frame_npz("frame_000001.npz", &image, &segment).unwrap();
/// ```
pub fn write_frame_npz<P: AsRef<Path>>(
    path: P,
    image: &SceneImage,
    segment: &SceneImage,
) -> Result<(), DuckboxError> {
    let file = io::BufWriter::new(
        File::create(path)
            .map_err(|_| DuckboxError::OtherError("Failed to create .npz file".to_string()))?,
    );

    let mut zip = zip::ZipWriter::new(file);

    for (name, frame) in [("rgb", image), ("segment", segment)] {
        zip.start_file::<_, ExtendedFileOptions>(
            npz::file_name_from_array_name(name),
            Default::default(),
        )
        .map_err(|_| {
            DuckboxError::OtherError(format!("Failed to start {} array in .npz file", name))
        })?;

        let (h, w, c) = frame.shape();

        let shape: Vec<u64> = if c == 1 {
            vec![h as u64, w as u64]
        } else {
            vec![h as u64, w as u64, c as u64]
        };

        let mut writer = npyz::WriteOptions::new()
            .default_dtype()
            .shape(&shape)
            .writer(&mut zip)
            .begin_nd()
            .map_err(|_| {
                DuckboxError::OtherError(format!(
                    "Failed to initialize {} array writer in .npz file",
                    name
                ))
            })?;

        writer.extend(frame.iter().copied()).map_err(|_| {
            DuckboxError::OtherError(format!("Failed to add {} array to .npz file", name))
        })?;

        writer.finish().map_err(|_| {
            DuckboxError::OtherError(format!("Failed to write {} array to .npz file", name))
        })?;
    }

    zip.finish()
        .map_err(|_| DuckboxError::OtherError("Failed to zip .npz file".to_string()))?;

    Ok(())
}

#[cfg(test)]
mod test {

    use super::*;

    fn gradient_image(width: u32, height: u32) -> SceneImage {
        let data: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        SceneImage::new(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_write_read_frame_npz() {
        const OUTPUT: &str = "TEST_NPZ_FRAME_BUNDLE.npz";

        let image = gradient_image(6, 4);

        let mut segment_data = vec![0u8; 6 * 4 * 3];
        segment_data[0..3].copy_from_slice(&[0xcf, 0xa9, 0x23]);
        let segment = SceneImage::new(6, 4, 3, segment_data).unwrap();

        write_frame_npz(OUTPUT, &image, &segment).unwrap();

        let (image_out, segment_out) = read_frame_npz(OUTPUT).unwrap();

        assert_eq!(image_out.shape(), (4, 6, 3));
        assert_eq!(segment_out.shape(), (4, 6, 3));
        assert_eq!(image_out.as_raw(), image.as_raw());
        assert_eq!(segment_out.as_raw(), segment.as_raw());

        std::fs::remove_file(OUTPUT).unwrap();
    }

    #[test]
    fn test_read_frame_npz_positional_names() {
        const OUTPUT: &str = "TEST_NPZ_POSITIONAL.npz";

        let image = gradient_image(3, 3);

        let file = io::BufWriter::new(File::create(OUTPUT).unwrap());
        let mut zip = zip::ZipWriter::new(file);

        for name in ["arr_0", "arr_1"] {
            zip.start_file::<_, ExtendedFileOptions>(
                npz::file_name_from_array_name(name),
                Default::default(),
            )
            .unwrap();

            let mut writer = npyz::WriteOptions::new()
                .default_dtype()
                .shape(&[3, 3, 3])
                .writer(&mut zip)
                .begin_nd()
                .unwrap();

            writer.extend(image.iter().copied()).unwrap();
            writer.finish().unwrap();
        }

        zip.finish().unwrap();

        let (image_out, segment_out) = read_frame_npz(OUTPUT).unwrap();

        assert_eq!(image_out.shape(), (3, 3, 3));
        assert_eq!(segment_out.as_raw(), image.as_raw());

        std::fs::remove_file(OUTPUT).unwrap();
    }

    #[test]
    fn test_read_frame_npz_missing_file() {
        let bundle = read_frame_npz("does_not_exist/frame.npz");
        assert!(bundle.is_err());
    }

    #[test]
    fn test_read_frame_npz_missing_arrays() {
        const OUTPUT: &str = "TEST_NPZ_MISSING_ARRAYS.npz";

        let image = gradient_image(2, 2);

        let file = io::BufWriter::new(File::create(OUTPUT).unwrap());
        let mut zip = zip::ZipWriter::new(file);

        zip.start_file::<_, ExtendedFileOptions>(
            npz::file_name_from_array_name("rgb"),
            Default::default(),
        )
        .unwrap();

        let mut writer = npyz::WriteOptions::new()
            .default_dtype()
            .shape(&[2, 2, 3])
            .writer(&mut zip)
            .begin_nd()
            .unwrap();

        writer.extend(image.iter().copied()).unwrap();
        writer.finish().unwrap();
        zip.finish().unwrap();

        let bundle = read_frame_npz(OUTPUT);
        assert!(bundle.is_err());

        std::fs::remove_file(OUTPUT).unwrap();
    }
}

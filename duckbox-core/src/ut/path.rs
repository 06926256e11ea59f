// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::DuckboxError;

/// Collect file paths from a directory with an optional substring filter
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Only include files with one of these extensions
/// * `substring` - Only include files containing this substring
///
/// # Examples
///
/// ```no_run
/// use duckbox_core::ut::path::collect_file_paths;
/// use duckbox_core::constant::SUPPORTED_IMAGE_FORMATS;
///
/// let files = collect_file_paths("renders/", SUPPORTED_IMAGE_FORMATS.as_slice(), None);
/// ```
pub fn collect_file_paths<P>(
    directory: P,
    valid_ext: &[&str],
    substring: Option<String>,
) -> Result<Vec<PathBuf>, DuckboxError>
where
    P: AsRef<Path> + ToString,
{
    let message = directory.to_string();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| DuckboxError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| valid_ext.contains(&ext))
        })
        .collect();

    if let Some(substring) = substring {
        files.retain(|f| {
            f.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(&substring))
        });
    }

    Ok(files)
}

/// Collect file pairs that share a matching stem
///
/// Stems are compared after removing the per-set distinguishing substring,
/// so `frame_1_rgb.png` pairs with `frame_1_seg.png` when called with
/// `_rgb` / `_seg`. Files without a partner are dropped.
///
/// # Arguments
///
/// * `files_a` - List of file paths
/// * `files_b` - List of file paths
/// * `substring_a` - Optionally remove a substring from the first set of stems
/// * `substring_b` - Optionally remove a substring from the second set of stems
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use duckbox_core::ut::path::collect_file_pairs;
///
/// let renders: [PathBuf; 3] = [
///     PathBuf::from("renders/frame_1_rgb.png"),
///     PathBuf::from("renders/frame_2_rgb.png"),
///     PathBuf::from("renders/frame_3_rgb.png"),
/// ];
///
/// let segments: [PathBuf; 2] = [
///     PathBuf::from("renders/frame_1_seg.png"),
///     PathBuf::from("renders/frame_2_seg.png"),
/// ];
///
/// let pairs = collect_file_pairs(
///     &renders,
///     &segments,
///     Some("_rgb".to_string()),
///     Some("_seg".to_string()),
/// );
///
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[0].0, "frame_1");
/// ```
pub fn collect_file_pairs(
    files_a: &[PathBuf],
    files_b: &[PathBuf],
    substring_a: Option<String>,
    substring_b: Option<String>,
) -> Vec<(String, PathBuf, PathBuf)> {
    let substring_a = substring_a.unwrap_or_default();
    let substring_b = substring_b.unwrap_or_default();

    let file_map: HashMap<String, &PathBuf> = files_a
        .iter()
        .filter_map(|file| {
            file.file_stem().map(|stem| {
                let name = stem.to_string_lossy().replace(&substring_a, "");
                (name, file)
            })
        })
        .collect();

    files_b
        .par_iter()
        .filter_map(|file_b| {
            file_b.file_stem().and_then(|stem| {
                let name = stem.to_string_lossy().replace(&substring_b, "");
                file_map
                    .get(&name)
                    .map(|file_a| (name, (*file_a).clone(), file_b.clone()))
            })
        })
        .collect()
}

// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::DuckboxError;

/// Split sample names into training and validation sets
///
/// Names are shuffled with a seeded generator and split at
/// `round(len * train_fraction)`. The same names, fraction, and seed always
/// produce the same split; the two sets are disjoint and cover the input.
///
/// # Arguments
///
/// * `names` - Sample names to split
/// * `train_fraction` - Fraction of samples assigned to the training set
/// * `seed` - Seed for the shuffle generator
///
/// # Examples
///
/// ```
/// use duckbox_core::ds::split_samples;
///
/// let names: Vec<String> = (0..10).map(|i| format!("sim_{}", i)).collect();
/// let (train, val) = split_samples(names, 0.8, 42);
///
/// assert_eq!(train.len(), 8);
/// assert_eq!(val.len(), 2);
/// ```
pub fn split_samples(
    mut names: Vec<String>,
    train_fraction: f32,
    seed: u64,
) -> (Vec<String>, Vec<String>) {
    let mut rng = StdRng::seed_from_u64(seed);
    names.shuffle(&mut rng);

    let n_train = (names.len() as f32 * train_fraction).round() as usize;
    let n_train = n_train.min(names.len());

    let val = names.split_off(n_train);

    (names, val)
}

/// Collect the sample names present in a dataset directory
///
/// Sample names are the sorted stems of `root/labels/*.txt`. Sorting before
/// any seeded shuffle keeps splits reproducible across filesystems with
/// different directory iteration orders.
///
/// # Arguments
///
/// * `root` - Dataset directory holding a `labels/` subdirectory
pub fn collect_sample_names<P: AsRef<Path>>(root: P) -> Result<Vec<String>, DuckboxError> {
    let labels_dir = root.as_ref().join("labels");

    let entries =
        std::fs::read_dir(&labels_dir).map_err(|err| DuckboxError::DirError(err.to_string()))?;

    let mut names = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|err| DuckboxError::DirError(err.to_string()))?;

        let path = entry.path();

        if path.extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort();

    Ok(names)
}

/// Write train/validation list files into a dataset directory
///
/// Produces `root/train.txt` and `root/val.txt` with one sample name per
/// line, overwriting any previous lists.
///
/// # Arguments
///
/// * `root` - Dataset directory
/// * `train` - Training sample names
/// * `val` - Validation sample names
pub fn write_split_lists<P: AsRef<Path>>(
    root: P,
    train: &[String],
    val: &[String],
) -> Result<(), DuckboxError> {
    write_name_list(root.as_ref().join("train.txt"), train)?;
    write_name_list(root.as_ref().join("val.txt"), val)?;

    Ok(())
}

/// Write one sample name per line to a list file
fn write_name_list<P: AsRef<Path>>(path: P, names: &[String]) -> Result<(), DuckboxError> {
    let file =
        File::create(path).map_err(|err| DuckboxError::LabelWriteError(err.to_string()))?;

    let mut writer = BufWriter::new(file);

    for name in names {
        writeln!(writer, "{}", name)
            .map_err(|err| DuckboxError::LabelWriteError(err.to_string()))?;
    }

    writer
        .flush()
        .map_err(|err| DuckboxError::LabelWriteError(err.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod test {

    use super::*;

    fn sample_names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("sim_{}", i)).collect()
    }

    #[test]
    fn test_split_samples_deterministic() {
        let (train_a, val_a) = split_samples(sample_names(20), 0.8, 42);
        let (train_b, val_b) = split_samples(sample_names(20), 0.8, 42);

        assert_eq!(train_a, train_b);
        assert_eq!(val_a, val_b);
    }

    #[test]
    fn test_split_samples_disjoint_and_covering() {
        let names = sample_names(15);

        let (train, val) = split_samples(names.clone(), 0.6, 7);

        let mut combined = [train.as_slice(), val.as_slice()].concat();
        combined.sort();

        let mut expected = names;
        expected.sort();

        assert_eq!(combined, expected);

        for name in &train {
            assert!(!val.contains(name));
        }
    }

    #[test]
    fn test_split_samples_fraction_rounds() {
        let (train, val) = split_samples(sample_names(10), 0.8, 42);
        assert_eq!((train.len(), val.len()), (8, 2));

        let (train, val) = split_samples(sample_names(3), 0.5, 42);
        assert_eq!((train.len(), val.len()), (2, 1));
    }

    #[test]
    fn test_split_samples_degenerate_fractions() {
        let (train, val) = split_samples(sample_names(5), 1.0, 42);
        assert_eq!((train.len(), val.len()), (5, 0));

        let (train, val) = split_samples(sample_names(5), 0.0, 42);
        assert_eq!((train.len(), val.len()), (0, 5));

        let (train, val) = split_samples(Vec::new(), 0.8, 42);
        assert!(train.is_empty() && val.is_empty());
    }

    #[test]
    fn test_split_samples_seed_changes_shuffle() {
        let (train_a, _) = split_samples(sample_names(20), 0.8, 1);
        let (train_b, _) = split_samples(sample_names(20), 0.8, 2);

        assert_ne!(train_a, train_b);
    }

    #[test]
    fn test_collect_sample_names_sorted() {
        const ROOT: &str = "TEST_DS_SPLIT_COLLECT";

        let labels_dir = Path::new(ROOT).join("labels");
        std::fs::create_dir_all(&labels_dir).unwrap();
        std::fs::write(labels_dir.join("sim_1.txt"), "").unwrap();
        std::fs::write(labels_dir.join("sim_0.txt"), "").unwrap();
        std::fs::write(labels_dir.join("real_2.txt"), "").unwrap();
        std::fs::write(labels_dir.join("notes.md"), "").unwrap();

        let names = collect_sample_names(ROOT).unwrap();
        assert_eq!(names, ["real_2", "sim_0", "sim_1"]);

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_collect_sample_names_missing_labels() {
        let names = collect_sample_names("TEST_DS_SPLIT_DOES_NOT_EXIST");
        assert!(names.is_err());
    }

    #[test]
    fn test_write_split_lists() {
        const ROOT: &str = "TEST_DS_SPLIT_LISTS";

        std::fs::create_dir_all(ROOT).unwrap();

        let train = vec!["sim_0".to_string(), "real_1".to_string()];
        let val = vec!["sim_1".to_string()];

        write_split_lists(ROOT, &train, &val).unwrap();

        let train_list = std::fs::read_to_string(Path::new(ROOT).join("train.txt")).unwrap();
        let val_list = std::fs::read_to_string(Path::new(ROOT).join("val.txt")).unwrap();

        assert_eq!(train_list, "sim_0\nreal_1\n");
        assert_eq!(val_list, "sim_1\n");

        std::fs::remove_dir_all(ROOT).unwrap();
    }
}

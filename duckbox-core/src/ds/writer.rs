// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::an::Detections;
use crate::error::DuckboxError;
use crate::im::SceneImage;

/// An accumulator for writing numbered detection samples into a dataset
///
/// Each saved sample is an image/label pair named `<prefix>_<index>` under
/// `root/images/` and `root/labels/`. The writer owns all numbering state,
/// so two writers with different prefixes can share one dataset root and
/// interleaved runs never clobber each other. Re-opening a root with an
/// existing prefix resumes numbering after the highest saved index.
///
/// # Examples
///
/// ```no_run
/// use duckbox_core::an::Detections;
/// use duckbox_core::ds::DatasetWriter;
/// use duckbox_core::im::SceneImage;
///
/// let mut writer = DatasetWriter::create("dataset", "sim").unwrap();
///
/// let image = SceneImage::new(8, 8, 3, vec![0u8; 8 * 8 * 3]).unwrap();
/// let mut detections = Detections::new();
/// detections.push([1, 1, 4, 4], 0);
///
/// let name = writer.save(image, &detections).unwrap();
/// assert_eq!(name, "sim_0");
/// ```
#[derive(Debug)]
pub struct DatasetWriter {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    prefix: String,
    next_index: usize,
    names: Vec<String>,
}

impl DatasetWriter {
    /// Create a writer rooted at a dataset directory
    ///
    /// The `images/` and `labels/` subdirectories are created if missing
    /// and reused if present.
    ///
    /// # Arguments
    ///
    /// * `root` - Dataset directory that will hold `images/` and `labels/`
    /// * `prefix` - Sample name prefix (e.g. `sim` or `real`)
    pub fn create<P: AsRef<Path>>(root: P, prefix: &str) -> Result<DatasetWriter, DuckboxError> {
        let images_dir = root.as_ref().join("images");
        let labels_dir = root.as_ref().join("labels");

        std::fs::create_dir_all(&images_dir)
            .map_err(|err| DuckboxError::DirError(err.to_string()))?;

        std::fs::create_dir_all(&labels_dir)
            .map_err(|err| DuckboxError::DirError(err.to_string()))?;

        let next_index = next_sample_index(&images_dir, prefix)?;

        Ok(DatasetWriter {
            images_dir,
            labels_dir,
            prefix: prefix.to_string(),
            next_index,
            names: Vec::new(),
        })
    }

    /// Save one sample and return its assigned name
    ///
    /// Writes `images/<prefix>_<i>.jpg` and `labels/<prefix>_<i>.txt`,
    /// then advances the index. Empty detections are accepted and produce
    /// an empty label file; skipping empty samples is a caller decision.
    ///
    /// # Arguments
    ///
    /// * `image` - The image to write (consumed by encoding)
    /// * `detections` - Boxes and class indices for the image
    pub fn save(
        &mut self,
        image: SceneImage,
        detections: &Detections,
    ) -> Result<String, DuckboxError> {
        let name = format!("{}_{}", self.prefix, self.next_index);

        image.save(self.images_dir.join(format!("{}.jpg", name)))?;
        detections.save(self.labels_dir.join(format!("{}.txt", name)))?;

        self.next_index += 1;
        self.names.push(name.clone());

        Ok(name)
    }

    /// Names of all samples saved by this writer, in save order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of samples saved by this writer
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if this writer has saved no samples
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The index the next saved sample will receive
    pub fn next_index(&self) -> usize {
        self.next_index
    }
}

/// Find the next free sample index for a prefix by scanning saved images
fn next_sample_index(images_dir: &Path, prefix: &str) -> Result<usize, DuckboxError> {
    let entries =
        std::fs::read_dir(images_dir).map_err(|err| DuckboxError::DirError(err.to_string()))?;

    let mut next_index = 0;

    for entry in entries {
        let entry = entry.map_err(|err| DuckboxError::DirError(err.to_string()))?;

        let path = entry.path();

        let index = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_prefix(prefix))
            .and_then(|s| s.strip_prefix('_'))
            .and_then(|s| s.parse::<usize>().ok());

        if let Some(index) = index {
            next_index = next_index.max(index + 1);
        }
    }

    Ok(next_index)
}

#[cfg(test)]
mod test {

    use super::*;

    fn test_image() -> SceneImage {
        SceneImage::new(8, 8, 3, vec![128u8; 8 * 8 * 3]).unwrap()
    }

    fn test_detections() -> Detections {
        let mut detections = Detections::new();
        detections.push([1, 1, 4, 4], 0);
        detections
    }

    #[test]
    fn test_create_fresh_root() {
        const ROOT: &str = "TEST_DS_WRITER_FRESH";

        let mut writer = DatasetWriter::create(ROOT, "sim").unwrap();

        assert_eq!(writer.next_index(), 0);

        let first = writer.save(test_image(), &test_detections()).unwrap();
        let second = writer.save(test_image(), &test_detections()).unwrap();

        assert_eq!(first, "sim_0");
        assert_eq!(second, "sim_1");
        assert_eq!(writer.names(), ["sim_0", "sim_1"]);
        assert_eq!(writer.len(), 2);

        assert!(Path::new(ROOT).join("images/sim_0.jpg").exists());
        assert!(Path::new(ROOT).join("labels/sim_1.txt").exists());

        let labels = std::fs::read_to_string(Path::new(ROOT).join("labels/sim_0.txt")).unwrap();
        assert_eq!(labels, "0 1 1 4 4\n");

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_create_resumes_numbering() {
        const ROOT: &str = "TEST_DS_WRITER_RESUME";

        let images_dir = Path::new(ROOT).join("images");
        std::fs::create_dir_all(&images_dir).unwrap();
        std::fs::write(images_dir.join("sim_0.jpg"), b"x").unwrap();
        std::fs::write(images_dir.join("sim_7.jpg"), b"x").unwrap();

        let mut writer = DatasetWriter::create(ROOT, "sim").unwrap();

        assert_eq!(writer.next_index(), 8);

        let name = writer.save(test_image(), &test_detections()).unwrap();
        assert_eq!(name, "sim_8");

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_create_ignores_other_prefixes() {
        const ROOT: &str = "TEST_DS_WRITER_PREFIXES";

        let images_dir = Path::new(ROOT).join("images");
        std::fs::create_dir_all(&images_dir).unwrap();
        std::fs::write(images_dir.join("real_5.jpg"), b"x").unwrap();
        std::fs::write(images_dir.join("simulator_9.jpg"), b"x").unwrap();

        let writer = DatasetWriter::create(ROOT, "sim").unwrap();
        assert_eq!(writer.next_index(), 0);

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_shared_root_two_prefixes() {
        const ROOT: &str = "TEST_DS_WRITER_SHARED";

        let mut sim = DatasetWriter::create(ROOT, "sim").unwrap();
        let mut real = DatasetWriter::create(ROOT, "real").unwrap();

        sim.save(test_image(), &test_detections()).unwrap();
        real.save(test_image(), &test_detections()).unwrap();

        assert!(Path::new(ROOT).join("images/sim_0.jpg").exists());
        assert!(Path::new(ROOT).join("images/real_0.jpg").exists());

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_save_empty_detections() {
        const ROOT: &str = "TEST_DS_WRITER_EMPTY";

        let mut writer = DatasetWriter::create(ROOT, "sim").unwrap();
        writer.save(test_image(), &Detections::new()).unwrap();

        let labels = std::fs::read_to_string(Path::new(ROOT).join("labels/sim_0.txt")).unwrap();
        assert!(labels.is_empty());

        std::fs::remove_dir_all(ROOT).unwrap();
    }
}

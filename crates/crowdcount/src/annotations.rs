// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

//! Ground truth annotation table.
//!
//! Every dataset stores its ground truth in `data/annotations/{dataset}.json`,
//! a JSON object mapping image paths to lists of `[x, y]` head positions:
//!
//! ```json
//! { "data/ucf/1.jpg": [[120.5, 33.0], [140, 35]] }
//! ```
//!
//! [`AnnotationStore`] merges those files into one table and derives a
//! train/test split stratified by dataset.

use crate::{Dataset, Error, PathRegistry, Settings};
use itertools::Itertools;
use log::{debug, warn};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Directory, relative to the store root, holding one JSON file per dataset.
pub const ANNOTATIONS_DIR: &str = "data/annotations";

/// Seed for the split shuffle. Constant so every run yields the same split.
pub const SPLIT_SEED: u64 = 0;

/// Share of each dataset reserved for the test set, in percent.
pub const TEST_PERCENT: usize = 10;

/// Image path as stored in annotation files, e.g. `data/ucf/12.jpg`.
pub type ImagePath = String;

/// Pixel position `[x, y]` of one annotated person.
///
/// Integer coordinates in annotation files are read as floats, so a file
/// written back by [`write_annotations`] holds `[10.0, 20.0]` where the input
/// had `[10, 20]`. The values are unchanged.
pub type Point = [f64; 2];

pub type PointList = Vec<Point>;

/// Image path to ground truth points.
pub type AnnotationTable = HashMap<ImagePath, PointList>;

/// Train and test image paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Split {
    pub train: Vec<ImagePath>,
    pub test: Vec<ImagePath>,
}

impl Split {
    fn extend(&mut self, other: Split) {
        self.train.extend(other.train);
        self.test.extend(other.test);
    }
}

/// In-memory index of all known ground truth.
///
/// The table is read once on construction and replaced wholesale by
/// [`AnnotationStore::reload`].
///
/// ```rust,no_run
/// use crowdcount::AnnotationStore;
///
/// let store = AnnotationStore::load(".")?;
/// let split = store.train_test_split();
/// for path in &split.test {
///     println!("{}: {} people", path, store.get(path)?.len());
/// }
/// # Ok::<(), crowdcount::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    root: PathBuf,
    table: AnnotationTable,
    missing: Vec<Dataset>,
}

impl AnnotationStore {
    /// Create a store rooted at `root` and load every dataset's annotations.
    pub fn load<P: Into<PathBuf>>(root: P) -> Result<Self, Error> {
        let mut store = Self {
            root: root.into(),
            ..Default::default()
        };
        store.reload()?;
        Ok(store)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        Self::load(settings.root_dir())
    }

    /// Create a store over an existing table without touching the disk.
    pub fn from_table(table: AnnotationTable) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the annotation file for `dataset`.
    pub fn annotation_file(&self, dataset: Dataset) -> PathBuf {
        self.root
            .join(ANNOTATIONS_DIR)
            .join(format!("{}.json", dataset.name()))
    }

    /// Ground truth for `path`.
    ///
    /// The returned list is a copy; changing it does not affect the store.
    pub fn get(&self, path: &str) -> Result<PointList, Error> {
        self.table
            .get(path)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(path.to_string()))
    }

    /// Image paths with ground truth, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &ImagePath> {
        self.table.keys()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.table.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Datasets whose annotation file was absent at the last reload.
    pub fn missing_datasets(&self) -> &[Dataset] {
        &self.missing
    }

    /// Re-read every dataset's annotation file and replace the table.
    ///
    /// A missing file is logged and skipped. Any other read or parse failure
    /// aborts the reload and leaves the current table untouched.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub fn reload(&mut self) -> Result<&mut Self, Error> {
        let mut table = AnnotationTable::new();
        let mut missing = Vec::new();

        for dataset in PathRegistry::datasets() {
            let path = self.annotation_file(dataset);
            if !path.is_file() {
                warn!("Annotation file {} not found, skipping {}", path.display(), dataset);
                missing.push(dataset);
                continue;
            }

            let annotations = read_annotations(&path)?;
            debug!("Loaded {} annotated images from {:?}", annotations.len(), path);
            table.extend(annotations);
        }

        self.table = table;
        self.missing = missing;
        Ok(self)
    }

    /// Paths belonging to `dataset`, sorted.
    pub fn dataset_paths(&self, dataset: Dataset) -> Vec<&ImagePath> {
        let prefix = dataset.path_prefix();
        self.paths().filter(|p| p.starts_with(&prefix)).sorted().collect()
    }

    /// Split each dataset separately, in registry order.
    pub fn split_by_dataset(&self) -> Vec<(Dataset, Split)> {
        PathRegistry::datasets()
            .map(|dataset| (dataset, split_group(self.dataset_paths(dataset))))
            .collect()
    }

    /// Reproducible train/test split stratified by dataset.
    ///
    /// [`TEST_PERCENT`] of every dataset (rounded up) goes to test, so small
    /// datasets are represented on both sides. The per-dataset parts are
    /// concatenated in registry order.
    #[cfg_attr(feature = "profiling", tracing::instrument(skip(self)))]
    pub fn train_test_split(&self) -> Split {
        let mut split = Split::default();
        for (_, part) in self.split_by_dataset() {
            split.extend(part);
        }
        split
    }
}

/// Number of test samples for a group of `n`.
///
/// A group needs at least two members to be split; a lone sample stays in
/// train.
pub fn test_count(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    (n * TEST_PERCENT).div_ceil(100)
}

/// Shuffle one sorted group with the fixed seed and cut off the test share.
fn split_group(paths: Vec<&ImagePath>) -> Split {
    let mut paths: Vec<ImagePath> = paths.into_iter().cloned().collect();
    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    paths.shuffle(&mut rng);

    let train = paths.split_off(test_count(paths.len()));
    Split { train, test: paths }
}

/// Read one annotation file.
pub fn read_annotations<P: AsRef<Path>>(path: P) -> Result<AnnotationTable, Error> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Write `table` as an annotation file, with keys sorted.
pub fn write_annotations<P: AsRef<Path>>(path: P, table: &AnnotationTable) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let sorted: BTreeMap<_, _> = table.iter().collect();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &sorted)?;
    writer.flush()?;

    debug!("Wrote {} annotated images to {:?}", table.len(), path);
    Ok(())
}

// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

//! Dataset names and example image path resolution.
//!
//! Each [`Dataset`] has its own file naming convention and index range. The
//! naming rules live in a fixed set of [`PathGenerator`] implementations
//! selected by [`Dataset::generator`], and the [`PathRegistry`] roots the
//! generated relative paths for the current [`Environment`].
//!
//! ```rust
//! use crowdcount::{Dataset, Environment, PathRegistry};
//!
//! let registry = PathRegistry::new(Environment::Local);
//! let path = registry.resolve(Dataset::Ucf, Some(12))?;
//! assert_eq!(path.to_str(), Some("data/ucf/12.jpg"));
//!
//! let floyd = PathRegistry::new(Environment::Floyd);
//! let path = floyd.resolve(Dataset::Mall, Some(7))?;
//! assert_eq!(path.to_str(), Some("/data/mall/frames/seq_000007.jpg"));
//! # Ok::<(), crowdcount::Error>(())
//! ```

use crate::{Environment, Error, Settings};
use log::debug;
use rand::{Rng, RngCore, seq::SliceRandom};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use walkdir::WalkDir;

/// Local directory that every dataset lives under.
pub const DATA_DIR: &str = "data";

/// A named source of crowd images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Ucf,
    Mall,
    Shakecam,
}

impl Dataset {
    /// Every dataset, in the order used for loading and for split composition.
    pub const ALL: [Dataset; 3] = [Dataset::Ucf, Dataset::Mall, Dataset::Shakecam];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Ucf => "ucf",
            Dataset::Mall => "mall",
            Dataset::Shakecam => "shakecam",
        }
    }

    /// Prefix shared by all image paths of this dataset, e.g. `data/ucf`.
    pub fn path_prefix(&self) -> String {
        format!("{}/{}", DATA_DIR, self.name())
    }

    /// The naming convention for this dataset's image files.
    pub fn generator(&self) -> &'static dyn PathGenerator {
        match self {
            Dataset::Ucf => &UcfPath,
            Dataset::Mall => &MallPath,
            Dataset::Shakecam => &ShakecamPath,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| Error::UnknownDataset(s.to_string()))
    }
}

/// Produces image paths for one dataset.
///
/// Paths are returned relative to the data root (`data/...`); the
/// [`PathRegistry`] decides where that root lives.
pub trait PathGenerator: Sync {
    /// Relative path of the image with the given index.
    fn relative_path(&self, index: u64) -> PathBuf;

    /// Pick a valid index at random.
    fn random_index(&self, registry: &PathRegistry, rng: &mut dyn RngCore) -> Result<u64, Error>;
}

/// UCF_CC_50: `data/ucf/{1..=50}.jpg`.
pub struct UcfPath;

impl PathGenerator for UcfPath {
    fn relative_path(&self, index: u64) -> PathBuf {
        PathBuf::from(format!("{}/ucf/{}.jpg", DATA_DIR, index))
    }

    fn random_index(&self, _: &PathRegistry, rng: &mut dyn RngCore) -> Result<u64, Error> {
        Ok(rng.gen_range(1..=50))
    }
}

/// Mall dataset video frames: `data/mall/frames/seq_00NNNN.jpg`.
pub struct MallPath;

impl PathGenerator for MallPath {
    fn relative_path(&self, index: u64) -> PathBuf {
        PathBuf::from(format!("{}/mall/frames/seq_00{:04}.jpg", DATA_DIR, index))
    }

    fn random_index(&self, _: &PathRegistry, rng: &mut dyn RngCore) -> Result<u64, Error> {
        Ok(rng.gen_range(1..=2000))
    }
}

/// Webcam captures: `data/shakecam/shakeshack-{index}.jpg`.
///
/// Indices are capture timestamps with no fixed range, so a random index is
/// drawn from the files present on disk.
pub struct ShakecamPath;

impl ShakecamPath {
    const STEM: &'static str = "shakeshack-";

    fn parse_index(file_name: &str) -> Option<u64> {
        file_name
            .strip_prefix(Self::STEM)?
            .strip_suffix(".jpg")?
            .parse()
            .ok()
    }

    /// Indices of the captures available on disk, in ascending order.
    pub fn indices(&self, registry: &PathRegistry) -> Vec<u64> {
        let dir = registry.datapath(Path::new(DATA_DIR).join("shakecam"));
        let mut indices: Vec<u64> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| Self::parse_index(&e.file_name().to_string_lossy()))
            .collect();
        indices.sort_unstable();

        debug!("Found {} shakecam captures in {:?}", indices.len(), dir);
        indices
    }
}

impl PathGenerator for ShakecamPath {
    fn relative_path(&self, index: u64) -> PathBuf {
        PathBuf::from(format!("{}/shakecam/{}{}.jpg", DATA_DIR, Self::STEM, index))
    }

    fn random_index(&self, registry: &PathRegistry, rng: &mut dyn RngCore) -> Result<u64, Error> {
        self.indices(registry).choose(rng).copied().ok_or_else(|| {
            Error::MissingImages(format!(
                "no {}*.jpg files under {:?}",
                Self::STEM,
                registry.datapath(Path::new(DATA_DIR).join("shakecam"))
            ))
        })
    }
}

/// Resolves dataset image paths and output locations for an environment.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    environment: Environment,
    root: PathBuf,
}

impl PathRegistry {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            root: PathBuf::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            environment: settings.environment,
            root: settings.root_dir(),
        }
    }

    /// Resolve local paths against `root` instead of the working directory.
    /// Floyd paths are absolute mounts and ignore it.
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The known datasets, in split composition order.
    pub fn datasets() -> impl Iterator<Item = Dataset> {
        Dataset::ALL.into_iter()
    }

    /// Path of an example image for `dataset`. When `index` is `None` a random
    /// valid index is chosen.
    pub fn resolve(&self, dataset: Dataset, index: Option<u64>) -> Result<PathBuf, Error> {
        self.resolve_with_rng(dataset, index, &mut rand::thread_rng())
    }

    /// Like [`PathRegistry::resolve`] with a caller supplied random source.
    pub fn resolve_with_rng<R: RngCore>(
        &self,
        dataset: Dataset,
        index: Option<u64>,
        rng: &mut R,
    ) -> Result<PathBuf, Error> {
        let generator = dataset.generator();
        let index = match index {
            Some(index) => index,
            None => generator.random_index(self, rng)?,
        };
        Ok(self.datapath(generator.relative_path(index)))
    }

    /// Like [`PathRegistry::resolve`] for a dataset given by name.
    pub fn resolve_name(&self, name: &str, index: Option<u64>) -> Result<PathBuf, Error> {
        self.resolve(name.parse()?, index)
    }

    /// Root a relative `data/...` path for the current environment.
    pub fn datapath<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        match self.environment {
            Environment::Floyd => Path::new("/").join(path),
            Environment::Local => self.root.join(path),
        }
    }

    /// Location for job output: `/output/...` on Floyd, `tmp/...` locally.
    pub fn output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        match self.environment {
            Environment::Floyd => Path::new("/output").join(path),
            Environment::Local => self.root.join("tmp").join(path),
        }
    }
}

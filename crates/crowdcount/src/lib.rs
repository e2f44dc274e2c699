// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

//! # Crowdcount ground truth
//!
//! Metadata layer of the crowd counting pipeline: where annotated images live
//! and which of them are used for training and evaluation.
//!
//! ## Features
//!
//! - **Annotation store**: loads `data/annotations/{dataset}.json` for every
//!   known dataset into one table keyed by image path
//! - **Stratified split**: reproducible train/test split taking the same share
//!   of every dataset
//! - **Turk conversion**: turns Mechanical Turk CSV exports into annotation
//!   tables
//! - **Path resolution**: example image paths per dataset, rooted for the
//!   local or the Floyd environment
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crowdcount::{AnnotationStore, PathRegistry, Settings};
//!
//! fn main() -> Result<(), crowdcount::Error> {
//!     let settings = Settings::load()?;
//!     let store = AnnotationStore::from_settings(&settings)?;
//!     let registry = PathRegistry::from_settings(&settings);
//!
//!     let split = store.train_test_split();
//!     println!("{} train / {} test", split.train.len(), split.test.len());
//!
//!     for path in split.test.iter().take(3) {
//!         println!("{} {:?}", path, registry.datapath(path));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `profiling`: emits `tracing` spans around table reloads and splits

mod annotations;
mod error;
mod paths;
mod settings;
mod turk;

pub use crate::{
    annotations::{
        ANNOTATIONS_DIR, AnnotationStore, AnnotationTable, ImagePath, Point, PointList,
        SPLIT_SEED, Split, TEST_PERCENT, read_annotations, test_count, write_annotations,
    },
    error::Error,
    paths::{
        DATA_DIR, Dataset, MallPath, PathGenerator, PathRegistry, ShakecamPath, UcfPath,
    },
    settings::{Environment, FLOYD_MARKER, Settings},
    turk::{LOCAL_PREFIX, TURK_URL_PREFIX, TurkReadOptions, TurkReader, from_turk},
};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[ctor::ctor]
    fn init() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    #[test]
    fn test_store_and_registry_share_layout() {
        let temp_dir = TempDir::new().unwrap();
        let registry = PathRegistry::new(Environment::Local).with_root(temp_dir.path());

        let image = registry.resolve(Dataset::Ucf, Some(4)).unwrap();
        let key = image
            .strip_prefix(temp_dir.path())
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert_eq!(key, "data/ucf/4.jpg");

        let mut table = AnnotationTable::new();
        table.insert(key.clone(), vec![[1.0, 2.0]]);
        let store = AnnotationStore::from_table(table);
        assert_eq!(store.dataset_paths(Dataset::Ucf), vec![&key]);
    }
}

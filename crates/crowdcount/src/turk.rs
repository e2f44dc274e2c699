// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

//! Mechanical Turk export conversion.
//!
//! Annotation HITs export a CSV with one row per assignment. Two columns
//! matter: `Input.image_url`, the public URL the worker annotated, and
//! `Answer.annotation_data`, a JSON array of marker objects:
//!
//! ```json
//! [{"left": 10, "top": 20, "width": 1, "height": 1, "label": "Head"}]
//! ```
//!
//! Conversion produces an [`AnnotationTable`] keyed by local image path, ready
//! to be written to `data/annotations/{dataset}.json` with
//! [`write_annotations`](crate::write_annotations).

use crate::{AnnotationTable, Error, PointList};
use log::{debug, warn};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

/// Bucket URL prefix the HIT images are served from.
pub const TURK_URL_PREFIX: &str = "https://s3.amazonaws.com/dimroc-public";

/// Local directory replacing [`TURK_URL_PREFIX`].
pub const LOCAL_PREFIX: &str = "data";

/// Options for Turk CSV conversion.
#[derive(Debug, Clone)]
pub struct TurkReadOptions {
    /// Prefix of the image URLs in the export.
    pub url_prefix: String,
    /// Replacement for `url_prefix` in the resulting image paths.
    pub local_prefix: String,
}

impl Default for TurkReadOptions {
    fn default() -> Self {
        Self {
            url_prefix: TURK_URL_PREFIX.to_string(),
            local_prefix: LOCAL_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TurkRow {
    #[serde(rename = "Input.image_url")]
    image_url: String,
    #[serde(rename = "Answer.annotation_data")]
    annotation_data: String,
}

#[derive(Debug, Deserialize)]
struct TurkMarker {
    left: f64,
    top: f64,
}

/// Reader for Turk CSV exports.
///
/// # Example
///
/// ```rust,no_run
/// use crowdcount::TurkReader;
///
/// let table = TurkReader::new().read_csv("Batch_3012_batch_results.csv")?;
/// println!("Converted {} images", table.len());
/// # Ok::<(), crowdcount::Error>(())
/// ```
pub struct TurkReader {
    options: TurkReadOptions,
}

impl TurkReader {
    pub fn new() -> Self {
        Self {
            options: TurkReadOptions::default(),
        }
    }

    pub fn with_options(options: TurkReadOptions) -> Self {
        Self { options }
    }

    /// Convert the export at `path`.
    ///
    /// Fails on the first row whose payload cannot be decoded. When an image
    /// appears on several rows the last row wins.
    pub fn read_csv<P: AsRef<Path>>(&self, path: P) -> Result<AnnotationTable, Error> {
        let file = File::open(path.as_ref())?;
        self.read(BufReader::new(file))
    }

    /// Convert an export from any reader.
    pub fn read<R: std::io::Read>(&self, reader: R) -> Result<AnnotationTable, Error> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut table = AnnotationTable::new();

        for row in csv_reader.deserialize::<TurkRow>() {
            let row = row?;
            let key = self.url_to_key(&row.image_url);
            let points = parse_payload(&row.annotation_data)
                .map_err(|e| Error::MalformedAnnotation(format!("{}: {}", row.image_url, e)))?;
            table.insert(key, points);
        }

        debug!("Converted {} images from Turk export", table.len());
        Ok(table)
    }

    /// Map an image URL to its local path.
    ///
    /// URLs outside the expected bucket are passed through unchanged.
    pub fn url_to_key(&self, url: &str) -> String {
        if !url.contains(&self.options.url_prefix) {
            warn!(
                "Image URL {} is not under {}, keeping it as is",
                url, self.options.url_prefix
            );
        }
        url.replace(&self.options.url_prefix, &self.options.local_prefix)
    }
}

impl Default for TurkReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_payload(payload: &str) -> Result<PointList, serde_json::Error> {
    let markers: Vec<TurkMarker> = serde_json::from_str(payload)?;
    Ok(markers.into_iter().map(|m| [m.left, m.top]).collect())
}

/// Convert the Turk export at `path` with default options.
pub fn from_turk<P: AsRef<Path>>(path: P) -> Result<AnnotationTable, Error> {
    TurkReader::new().read_csv(path)
}

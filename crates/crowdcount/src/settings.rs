// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

//! Layered runtime settings.
//!
//! Settings are resolved from built-in defaults and then from environment
//! variables carrying the `CROWDCOUNT_` prefix:
//!
//! | Variable                 | Meaning                                      |
//! |--------------------------|----------------------------------------------|
//! | `CROWDCOUNT_ROOT`        | Directory holding the `data/` tree           |
//! | `CROWDCOUNT_ENVIRONMENT` | `local` or `floyd`                           |
//!
//! When `CROWDCOUNT_ENVIRONMENT` is unset, the presence of a `FLOYD` variable
//! selects the Floyd layout, matching how jobs on that platform are detected.

use crate::Error;
use log::debug;
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};

/// Variable whose presence marks a Floyd training job.
pub const FLOYD_MARKER: &str = "FLOYD";

const ENV_PREFIX: &str = "CROWDCOUNT";

/// Execution environment, which decides where data and output paths are
/// rooted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Paths are relative: `data/...` and `tmp/...`.
    #[default]
    Local,
    /// Floyd mounts datasets at `/data` and collects `/output`.
    Floyd,
}

impl Environment {
    fn name(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Floyd => "floyd",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved settings for a store and path registry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory the relative `data/...` tree is resolved against. `None`
    /// means the current working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    pub environment: Environment,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn load() -> Result<Self, Error> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load settings from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, Error> {
        let default_environment = if vars.contains_key(FLOYD_MARKER) {
            Environment::Floyd
        } else {
            Environment::Local
        };

        let settings: Settings = config::Config::builder()
            .set_default("environment", default_environment.name())?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
            .build()?
            .try_deserialize()?;

        debug!(
            "Settings resolved: environment={} root={:?}",
            settings.environment, settings.root
        );
        Ok(settings)
    }

    /// Directory the `data/` tree lives under.
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_vars(HashMap::new()).unwrap();
        assert_eq!(settings.environment, Environment::Local);
        assert_eq!(settings.root, None);
        assert_eq!(settings.root_dir(), PathBuf::new());
    }

    #[test]
    fn test_floyd_marker_selects_floyd() {
        let settings = Settings::from_vars(vars(&[("FLOYD", "1")])).unwrap();
        assert_eq!(settings.environment, Environment::Floyd);
    }

    #[test]
    fn test_explicit_environment_wins_over_marker() {
        let settings = Settings::from_vars(vars(&[
            ("FLOYD", "1"),
            ("CROWDCOUNT_ENVIRONMENT", "local"),
        ]))
        .unwrap();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn test_root_from_prefix() {
        let settings = Settings::from_vars(vars(&[("CROWDCOUNT_ROOT", "/srv/crowd")])).unwrap();
        assert_eq!(settings.root_dir(), PathBuf::from("/srv/crowd"));
    }

    #[test]
    fn test_invalid_environment() {
        let result = Settings::from_vars(vars(&[("CROWDCOUNT_ENVIRONMENT", "cloud")]));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_load_from_process_environment() {
        // SAFETY: serialised with other environment-mutating tests.
        unsafe { std::env::set_var("CROWDCOUNT_ENVIRONMENT", "floyd") };
        let settings = Settings::load();
        unsafe { std::env::remove_var("CROWDCOUNT_ENVIRONMENT") };

        assert_eq!(settings.unwrap().environment, Environment::Floyd);
    }
}

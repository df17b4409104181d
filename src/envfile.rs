//! Env Files
//!
//! Loads `.env` style files the way front-end dev tooling does: for a mode
//! such as `development` the files
//!
//! 1. `.env`
//! 2. `.env.local`
//! 3. `.env.development`
//! 4. `.env.development.local`
//!
//! are read in that order, later files overriding earlier ones, and the real
//! process environment overrides every file. The process environment itself
//! is never modified.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Merged variables from env files and the process environment
pub type EnvMap = HashMap<String, String>;

/// Env files for one directory and mode
#[derive(Debug, Clone)]
pub struct EnvFiles {
    dir: PathBuf,
    mode: String,
}

impl EnvFiles {
    pub fn new(dir: impl Into<PathBuf>, mode: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            mode: mode.into(),
        }
    }

    /// Candidate files, lowest priority first
    pub fn candidates(&self) -> Vec<PathBuf> {
        vec![
            self.dir.join(".env"),
            self.dir.join(".env.local"),
            self.dir.join(format!(".env.{}", self.mode)),
            self.dir.join(format!(".env.{}.local", self.mode)),
        ]
    }

    /// Variables from the files that exist. Missing files are skipped.
    pub fn load(&self) -> Result<EnvMap, ConfigError> {
        let mut vars = EnvMap::new();

        for path in self.candidates() {
            if !path.is_file() {
                continue;
            }

            let entries = dotenvy::from_path_iter(&path).map_err(|e| ConfigError::EnvFile {
                path: path.clone(),
                error: e.to_string(),
            })?;

            let mut count = 0;
            for entry in entries {
                let (key, value) = entry.map_err(|e| ConfigError::EnvFile {
                    path: path.clone(),
                    error: e.to_string(),
                })?;
                vars.insert(key, value);
                count += 1;
            }

            tracing::debug!("Loaded {} variables from {:?}", count, path);
        }

        Ok(vars)
    }

    /// File variables overlaid with the current process environment
    pub fn load_with_process_env(&self) -> Result<EnvMap, ConfigError> {
        Ok(overlay(self.load()?, std::env::vars()))
    }
}

/// Apply `overrides` on top of `base`
pub fn overlay(mut base: EnvMap, overrides: impl IntoIterator<Item = (String, String)>) -> EnvMap {
    base.extend(overrides);
    base
}

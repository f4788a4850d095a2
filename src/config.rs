// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration, read from a camelCase JSON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: usize = 200;
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum retained snapshots; `None` keeps everything for the session.
    pub history_limit: Option<usize>,
    /// Fold consecutive continuous edits of one field into a single undo step.
    pub coalesce_continuous_edits: bool,
    /// Empty the canvas as soon as a generation starts instead of on success.
    pub clear_on_generate: bool,
    /// Drop generation responses older than the newest one already applied.
    pub discard_stale_generations: bool,
    /// Give up on the generation service after this many milliseconds.
    pub generation_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            coalesce_continuous_edits: true,
            clear_on_generate: false,
            discard_stale_generations: false,
            generation_timeout_ms: Some(DEFAULT_GENERATION_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

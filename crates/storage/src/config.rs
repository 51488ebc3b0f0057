//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Raw clickstream CSV
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    /// Root directory for the result tables
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("data/raw/events.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/out")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_dir: default_output_dir(),
        }
    }
}

impl StorageConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
        }
    }
}

#![forbid(unsafe_code)]

use std::path::PathBuf;

use regroup_list::{ConfigError, ListError};
use thiserror::Error;

/// Errors raised while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid list config: {0}")]
    Config(#[from] ConfigError),
    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: ListError,
    },
    #[error("invalid scenario: {0}")]
    Scenario(String),
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl HarnessError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Output(_) => 74,
            Self::Toml(_) | Self::Json(_) | Self::Config(_) | Self::Scenario(_) => 65,
            Self::Step { .. } => 70,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

//! Fatal errors of a matrix run.

use std::path::PathBuf;

use crate::core::changes::GitHubError;
use crate::core::config::ConfigError;
use crate::core::scan::ScanError;

/// Anything that stops the run. Per-directory problems never end up here; they are logged
/// and degraded where they happen.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to set up GitHub client: {0}")]
    Client(#[from] GitHubError),
    #[error("Failed to serialize matrix: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write output file {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

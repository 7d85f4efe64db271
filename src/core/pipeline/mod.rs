//! The matrix pipeline: enumerate → static filters → change scope → metadata → matrix.

use crate::core::changes::{self, ChangeListing, ChangeScope, EventContext, LocalGit};
use crate::core::config::{ChangeBackend, Config, ConfigError};
use crate::core::error::MatrixError;
use crate::core::filter::StaticFilters;
use crate::core::matrix::Matrix;
use crate::core::{metadata, scan};

/// Work out how directories are tested for changes, fetching the change set if needed.
///
/// `remote` must be present when the GitHub backend is configured.
async fn resolve_scope<L: ChangeListing>(
    config: &Config,
    event: &EventContext,
    remote: Option<&L>,
) -> Result<Option<ChangeScope>, MatrixError> {
    let scope = match &config.changes {
        None => return Ok(None),
        Some(ChangeBackend::Git) => {
            log::debug!("Changed-only mode enabled, diffing against local git history...");
            ChangeScope::local(LocalGit::default(), event.clone())
        }
        Some(ChangeBackend::GitHub { .. }) => {
            log::debug!("Changed-only mode enabled, fetching changed files...");
            let remote = remote.ok_or(ConfigError::MissingToken)?;
            ChangeScope::Fixed(changes::fetch_change_set(remote, event).await)
        }
    };
    if scope.is_known_empty() {
        log::warn!(
            "No changed files were found. All directories will be excluded when using changed-only mode."
        );
    }
    Ok(Some(scope))
}

/// Build the matrix for `config`.
///
/// # Errors
/// Only fatal problems: a missing root directory, an unreadable root, or a GitHub backend
/// without a client. API failures, diff failures and bad metadata files are logged and degraded.
pub async fn build_matrix<L: ChangeListing>(
    config: &Config,
    event: &EventContext,
    remote: Option<&L>,
) -> Result<Matrix, MatrixError> {
    scan::ensure_root(&config.root)?;
    let scope = resolve_scope(config, event, remote).await?;

    let names = scan::list_subdirectories(&config.root)?;
    let mut names = StaticFilters::from_config(config).apply(names);

    if let Some(ref scope) = scope {
        names.retain(|name| {
            let changed = scope.includes(&config.root, name);
            if changed {
                log::info!("Including {}: changes detected", name);
            } else {
                log::info!("Skipping {}: no changes detected", name);
            }
            changed
        });
    }
    log::debug!("Found {} subdirectories after filtering", names.len());

    let matrix = match config.metadata_file {
        Some(ref file) => {
            log::debug!("Reading metadata from {} in each subdirectory", file);
            Matrix::Include {
                include: names
                    .iter()
                    .map(|dir| metadata::enrich(&config.root, dir, file))
                    .collect(),
            }
        }
        None => Matrix::Directories { directory: names },
    };

    if matrix.is_empty() {
        if config.changed_only() {
            log::warn!("No directories with changes were found. Matrix will be empty.");
        } else {
            log::warn!("No directories were found after filtering. Matrix will be empty.");
        }
    } else {
        log::info!(
            "Successfully created matrix with {} directories",
            matrix.len()
        );
    }
    Ok(matrix)
}

//! Runtime configuration: validated view of the CLI / action inputs.
//!
//! Everything that can make a run fail before touching the filesystem is checked here.

use std::path::PathBuf;

use clap::ValueEnum;
use regex::Regex;

use crate::cli::{Args, ChangeSource};

/// Action input consulted when `GITHUB_TOKEN` is not in the environment.
const TOKEN_INPUT_ENV: &str = "INPUT_GITHUB-TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Input required and not supplied: path")]
    MissingPath,
    #[error("GITHUB_TOKEN is required when changed-only is set to true")]
    MissingToken,
    #[error("Invalid change-source: {0}. Expected github or git")]
    InvalidChangeSource(String),
    #[error("Invalid regex pattern in filter: {pattern}. Error: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// How changed files are discovered when change-scoping is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeBackend {
    GitHub { token: String, api_url: String },
    Git,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub include_hidden: bool,
    pub exclude: Vec<String>,
    pub filter: Option<Regex>,
    pub metadata_file: Option<String>,
    /// `None` when changed-only is off.
    pub changes: Option<ChangeBackend>,
}

/// Treat empty and whitespace-only inputs as unset; the runner passes `''` for omitted inputs.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_exclude(input: Option<&str>) -> Vec<String> {
    non_blank(input)
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the change backend name; blank falls back to the GitHub API.
pub fn parse_change_source(input: Option<&str>) -> Result<ChangeSource, ConfigError> {
    match non_blank(input) {
        None => Ok(ChangeSource::default()),
        Some(name) => ChangeSource::from_str(name, true)
            .map_err(|_| ConfigError::InvalidChangeSource(name.to_string())),
    }
}

/// Compile the directory-name filter. Fails fast so no directory is processed with a bad pattern.
pub fn compile_filter(input: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    let Some(pattern) = non_blank(input) else {
        return Ok(None);
    };
    let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    log::debug!("Compiled regex filter: {}", pattern);
    Ok(Some(regex))
}

impl Config {
    /// Validate the parsed arguments into a runtime configuration.
    ///
    /// # Errors
    /// Missing path, invalid filter pattern, unknown change source, or a missing token when the GitHub
    /// change source is selected together with changed-only.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let token = non_blank(args.github_token.as_deref())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(TOKEN_INPUT_ENV)
                    .ok()
                    .filter(|t| !t.trim().is_empty())
            });
        Self::build(args, token)
    }

    fn build(args: &Args, token: Option<String>) -> Result<Self, ConfigError> {
        let root = non_blank(args.path.as_deref()).ok_or(ConfigError::MissingPath)?;
        let filter = compile_filter(args.filter.as_deref())?;
        let source = parse_change_source(args.change_source.as_deref())?;

        let changes = if args.changed_only {
            Some(match source {
                ChangeSource::Github => ChangeBackend::GitHub {
                    token: token.ok_or(ConfigError::MissingToken)?,
                    api_url: args.api_url.trim_end_matches('/').to_string(),
                },
                ChangeSource::Git => ChangeBackend::Git,
            })
        } else {
            None
        };

        Ok(Self {
            root: PathBuf::from(root),
            include_hidden: args.include_hidden,
            exclude: parse_exclude(args.exclude.as_deref()),
            filter,
            metadata_file: non_blank(args.metadata_file.as_deref()).map(str::to_string),
            changes,
        })
    }

    pub fn changed_only(&self) -> bool {
        self.changes.is_some()
    }

    /// Log the effective configuration, one option per line.
    pub fn log_summary(&self) {
        log::info!("Configuration: {{");
        log::info!("  path: {}", self.root.display());
        log::info!("  include_hidden: {}", self.include_hidden);
        if self.exclude.is_empty() {
            log::info!("  exclude: none");
        } else {
            log::info!("  exclude: {}", self.exclude.join(", "));
        }
        log::info!(
            "  filter: {}",
            self.filter.as_ref().map_or("none", |r| r.as_str())
        );
        log::info!(
            "  metadata_file: {}",
            self.metadata_file.as_deref().unwrap_or("none")
        );
        let source = match &self.changes {
            None => "off",
            Some(ChangeBackend::GitHub { .. }) => "github",
            Some(ChangeBackend::Git) => "git",
        };
        log::info!("  changed-only: {} ({})", self.changed_only(), source);
        log::info!("}}");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["folder-matrix"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn missing_path_is_rejected() {
        let mut a = args(&[]);
        a.path = None;
        let err = Config::build(&a, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath));
    }

    #[test]
    fn blank_path_counts_as_missing() {
        let err = Config::build(&args(&["--path", "  "]), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath));
    }

    #[test]
    fn exclude_list_is_trimmed_and_drops_empties() {
        assert_eq!(parse_exclude(Some(" a, b ,,c ")), vec!["a", "b", "c"]);
        assert!(parse_exclude(Some("")).is_empty());
        assert!(parse_exclude(None).is_empty());
    }

    #[test]
    fn invalid_pattern_is_fatal_with_message() {
        let err = compile_filter(Some("[unclosed")).unwrap_err();
        assert!(err.to_string().contains("Invalid regex pattern"));
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn blank_pattern_means_no_filter() {
        assert!(compile_filter(Some("   ")).unwrap().is_none());
    }

    #[test]
    fn changed_only_with_github_requires_token() {
        let a = args(&["--path", "repo", "--changed-only"]);
        let err = Config::build(&a, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GITHUB_TOKEN is required when changed-only is set to true"
        );
    }

    #[test]
    fn changed_only_with_git_needs_no_token() {
        let a = args(&["--path", "repo", "--changed-only", "--change-source", "git"]);
        let config = Config::build(&a, None).unwrap();
        assert_eq!(config.changes, Some(ChangeBackend::Git));
    }

    #[test]
    fn change_source_blank_defaults_to_github_and_ignores_case() {
        assert_eq!(parse_change_source(None).unwrap(), ChangeSource::Github);
        assert_eq!(parse_change_source(Some("  ")).unwrap(), ChangeSource::Github);
        assert_eq!(parse_change_source(Some("Git")).unwrap(), ChangeSource::Git);
    }

    #[test]
    fn unknown_change_source_is_rejected() {
        let a = args(&["--path", "repo", "--change-source", "svn"]);
        let err = Config::build(&a, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChangeSource(ref s) if s == "svn"));
    }

    #[test]
    fn github_backend_keeps_token_and_trims_api_url() {
        let a = args(&[
            "--path",
            "repo",
            "--changed-only",
            "--api-url",
            "https://ghe.example.com/api/v3/",
        ]);
        let config = Config::build(&a, Some("t0ken".to_string())).unwrap();
        assert_eq!(
            config.changes,
            Some(ChangeBackend::GitHub {
                token: "t0ken".to_string(),
                api_url: "https://ghe.example.com/api/v3".to_string(),
            })
        );
    }

    #[test]
    fn token_is_ignored_without_changed_only() {
        let config = Config::build(&args(&["--path", "repo"]), None).unwrap();
        assert!(!config.changed_only());
        assert!(config.metadata_file.is_none());
    }
}

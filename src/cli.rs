//! CLI definitions: argument parsing and help text.
//!
//! Every option doubles as a GitHub Actions input: the runner exposes `with:` values
//! as `INPUT_<NAME>` environment variables, which clap picks up through `env`. Omitted
//! inputs arrive as empty strings, so flags read them with falsey parsing and the change
//! source is validated later, once blanks have been dropped.

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, ValueEnum};

const AFTER_HELP: &str = "\
EXAMPLES:
  folder-matrix --path packages                         List every subdirectory of packages/
  folder-matrix --path apps --filter '^app-'            Only directories matching a pattern
  folder-matrix --path apps --exclude legacy,tmp        Skip some directories
  folder-matrix --path apps --metadata-file package.json
                                                        Attach package.json fields to each entry
  folder-matrix --path apps --changed-only              Only directories touched by this push/PR
  folder-matrix --path apps --changed-only --change-source git
                                                        Same, using the local git history
";

/// Backend used to find the files touched by the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChangeSource {
    /// GitHub REST API (needs a token).
    #[default]
    Github,
    /// Local `git diff` against the event's base.
    Git,
}

/// Command-line arguments for the application.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build a CI matrix from the subdirectories of a path",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Directory to scan for subdirectories
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<String>,

    /// Include directories whose name starts with '.'
    #[arg(
        long,
        env = "INPUT_INCLUDE_HIDDEN",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub include_hidden: bool,

    /// Comma-separated directory names to skip
    #[arg(long, env = "INPUT_EXCLUDE")]
    pub exclude: Option<String>,

    /// Regex that directory names must match
    #[arg(long, env = "INPUT_FILTER")]
    pub filter: Option<String>,

    /// File read from each directory and merged into its matrix entry (.json, .yaml, .yml)
    #[arg(long, env = "INPUT_METADATA_FILE")]
    pub metadata_file: Option<String>,

    /// Only keep directories containing files changed by the triggering push or pull request
    #[arg(
        long,
        env = "INPUT_CHANGED-ONLY",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub changed_only: bool,

    /// Where changed files come from when --changed-only is set: github (default) or git
    #[arg(long, env = "INPUT_CHANGE-SOURCE")]
    pub change_source: Option<String>,

    /// Token for the GitHub API (falls back to the `github-token` action input)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Log level based on -v/-q flags and the runner's environment: error, warn, info, or debug.
    ///
    /// Inside GitHub Actions the default is info, and `RUNNER_DEBUG=1` (step debug logging)
    /// turns on debug.
    pub fn log_level(&self) -> &'static str {
        let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
        if self.quiet {
            "error"
        } else if self.verbose >= 2 || runner_debug {
            "debug"
        } else if self.verbose >= 1 || crate::core::output::in_github_actions() {
            "info"
        } else {
            "warn"
        }
    }
}

//! Application run: logger init, configuration, pipeline, output.

use std::io::Write;

use crate::cli::Args;
use crate::core::changes::{EventContext, GitHubClient};
use crate::core::config::{ChangeBackend, Config};
use crate::core::error::MatrixError;
use crate::core::matrix::Matrix;
use crate::core::{output, pipeline};

/// Initialize env_logger. Inside GitHub Actions, log lines become workflow commands on stdout
/// so warnings and errors show up as annotations.
pub fn init_logger(args: &Args) {
    let level = args.log_level();
    let others = if level == "error" { "error" } else { "warn" };
    let filter = format!("{},{}={}", others, env!("CARGO_CRATE_NAME"), level);
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter));

    if output::in_github_actions() {
        logger
            .target(env_logger::Target::Stdout)
            .format(|buf, record| {
                let message = record.args().to_string();
                match record.level() {
                    log::Level::Error => {
                        writeln!(buf, "::error::{}", output::escape_command_data(&message))
                    }
                    log::Level::Warn => {
                        writeln!(buf, "::warning::{}", output::escape_command_data(&message))
                    }
                    log::Level::Info => writeln!(buf, "{}", message),
                    log::Level::Debug | log::Level::Trace => {
                        writeln!(buf, "::debug::{}", output::escape_command_data(&message))
                    }
                }
            });
    }
    let _ = logger.try_init();
}

/// Validate the inputs, build the matrix and publish it.
///
/// # Errors
/// Configuration errors, a missing root directory, or a failure writing the output.
pub async fn run(args: &Args) -> Result<Matrix, MatrixError> {
    let config = Config::from_args(args)?;
    config.log_summary();

    let event = EventContext::from_env();
    let client = match config.changes {
        Some(ChangeBackend::GitHub {
            ref token,
            ref api_url,
        }) => Some(GitHubClient::new(token, api_url)?),
        _ => None,
    };

    let matrix = pipeline::build_matrix(&config, &event, client.as_ref()).await?;
    log::debug!("Created matrix: {}", matrix.to_json()?);
    output::write_matrix(&matrix)?;
    Ok(matrix)
}

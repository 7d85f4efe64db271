//! Step output: the `matrix` value and GitHub Actions workflow-command helpers.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::core::error::MatrixError;
use crate::core::matrix::Matrix;

/// Output name read by workflows as `steps.<id>.outputs.matrix`.
pub const OUTPUT_KEY: &str = "matrix";

/// True when running as a GitHub Actions step.
pub fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escape a message for use as workflow-command data (`::warning::<data>`).
pub fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Append `key=value` to a `GITHUB_OUTPUT` file. `value` must be a single line.
pub fn append_output(path: &Path, key: &str, value: &str) -> Result<(), MatrixError> {
    let wrap = |source| MatrixError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;
    writeln!(file, "{}={}", key, value).map_err(wrap)
}

/// Publish the matrix: to the step's output file inside Actions, to stdout otherwise.
pub fn write_matrix(matrix: &Matrix) -> Result<(), MatrixError> {
    let json = matrix.to_json()?;
    match std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        Some(path) => {
            append_output(Path::new(&path), OUTPUT_KEY, &json)?;
            log::debug!("Wrote {} output to {}", OUTPUT_KEY, Path::new(&path).display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

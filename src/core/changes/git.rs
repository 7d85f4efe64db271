//! Local `git diff` backend: changed paths under one directory for the triggering event.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::event::{EventContext, EventKind};

/// `before` of a push that created the branch.
const NULL_SHA: &str = "0000000000000000000000000000000000000000";

#[derive(Debug, thiserror::Error)]
pub enum GitDiffError {
    #[error("could not run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git diff exited with {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("no base branch known for pull request diff")]
    MissingBaseRef,
    #[error("no diff range for {0} events")]
    UnsupportedEvent(String),
}

#[derive(Debug, Clone)]
pub struct LocalGit {
    program: String,
    /// Working tree to run in; the process's current directory when unset.
    workdir: Option<PathBuf>,
}

impl Default for LocalGit {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            workdir: None,
        }
    }
}

impl LocalGit {
    /// Use another executable in place of `git`.
    #[cfg(test)]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            workdir: None,
        }
    }

    /// Run git from `dir` instead of the current directory.
    #[cfg(test)]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Revision arguments for `git diff` covering the event's changes.
    pub fn diff_range(event: &EventContext) -> Result<Vec<String>, GitDiffError> {
        match &event.kind {
            EventKind::Push => {
                let head = event.sha.clone().unwrap_or_else(|| "HEAD".to_string());
                match event.before.as_deref() {
                    Some(before) if before != NULL_SHA => Ok(vec![before.to_string(), head]),
                    _ => Ok(vec![format!("{}~1", head), head]),
                }
            }
            EventKind::PullRequest => {
                let base = event
                    .base_ref
                    .as_deref()
                    .ok_or(GitDiffError::MissingBaseRef)?;
                Ok(vec![format!("origin/{}...HEAD", base)])
            }
            EventKind::Other(name) => Err(GitDiffError::UnsupportedEvent(name.clone())),
        }
    }

    /// Files changed under `path` by the event, one `git diff --name-only` invocation per call.
    pub fn changed_paths(
        &self,
        event: &EventContext,
        path: &Path,
    ) -> Result<Vec<String>, GitDiffError> {
        let range = Self::diff_range(event)?;
        log::debug!(
            "Running {} diff --name-only {} -- {}",
            self.program,
            range.join(" "),
            path.display()
        );
        let mut command = Command::new(&self.program);
        command
            .arg("diff")
            .arg("--name-only")
            .args(&range)
            .arg("--")
            .arg(path);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }
        let output = command.output()?;

        if !output.status.success() {
            return Err(GitDiffError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

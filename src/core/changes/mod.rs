//! Change-scope filtering: keep only directories touched by the triggering push or pull request.
//!
//! Two backends, each with its own failure policy:
//! - GitHub API: the change set is fetched once up front. A failed call yields an empty set,
//!   so nothing is in scope (fail closed).
//! - Local git: one `git diff` per directory. A failed diff counts the directory as changed
//!   (fail open).
//!
//! An unsupported event yields an empty change set with either backend.

mod event;
mod git;
mod github;
mod scope;

use std::path::Path;

pub use event::{EventContext, EventKind};
pub use git::LocalGit;
pub use github::{ChangeListing, GitHubClient, GitHubError};
pub use scope::ChangeSet;

/// Resolved change detection for one run.
#[derive(Debug, Clone)]
pub enum ChangeScope {
    /// Change set known up front.
    Fixed(ChangeSet),
    /// Ask git about each directory as it is checked.
    LocalDiff { git: LocalGit, event: EventContext },
}

impl ChangeScope {
    /// Local git backend. Unsupported events resolve to an empty change set right away.
    pub fn local(git: LocalGit, event: EventContext) -> Self {
        if let EventKind::Other(ref name) = event.kind {
            warn_unsupported(name);
            return Self::Fixed(ChangeSet::default());
        }
        Self::LocalDiff { git, event }
    }

    /// Whether `root/dir` contains a changed file.
    pub fn includes(&self, root: &Path, dir: &str) -> bool {
        match self {
            Self::Fixed(changes) => changes.touches(root, dir),
            Self::LocalDiff { git, event } => match git.changed_paths(event, &root.join(dir)) {
                Ok(paths) => {
                    log::debug!("git reports {} changed files in {}", paths.len(), dir);
                    !paths.is_empty()
                }
                Err(e) => {
                    log::warn!(
                        "Could not diff directory {}: {}. Treating it as changed.",
                        dir,
                        e
                    );
                    true
                }
            },
        }
    }

    /// True only for a fixed, empty change set, which excludes every directory.
    pub fn is_known_empty(&self) -> bool {
        matches!(self, Self::Fixed(changes) if changes.is_empty())
    }
}

fn warn_unsupported(name: &str) {
    log::warn!(
        "Unsupported event type: {}. No changed files will be considered.",
        name
    );
}

/// Fetch the files touched by the event from the remote API.
///
/// Never fails: API errors and unsupported events are logged and produce an empty set.
pub async fn fetch_change_set<L: ChangeListing>(listing: &L, event: &EventContext) -> ChangeSet {
    log::debug!("Getting changed files for {} event", event.kind);

    let result = match event.kind {
        EventKind::Push => fetch_push(listing, event).await,
        EventKind::PullRequest => fetch_pull_request(listing, event).await,
        EventKind::Other(ref name) => {
            warn_unsupported(name);
            Ok(Vec::new())
        }
    };

    let files = result.unwrap_or_else(|e| {
        let what = match event.kind {
            EventKind::PullRequest => "PR files",
            _ => "commit details",
        };
        log::warn!("Error getting {}: {}", what, e);
        Vec::new()
    });
    log::debug!("Found {} changed files", files.len());
    ChangeSet::new(files)
}

async fn fetch_push<L: ChangeListing>(
    listing: &L,
    event: &EventContext,
) -> Result<Vec<String>, GitHubError> {
    let repo = event
        .repository
        .as_ref()
        .ok_or(GitHubError::MissingField("GITHUB_REPOSITORY"))?;
    let sha = event
        .sha
        .as_deref()
        .ok_or(GitHubError::MissingField("GITHUB_SHA"))?;
    log::debug!("Fetching changed files from commit {} in {}", sha, repo);
    let files = listing.commit_files(repo, sha).await?;
    log::debug!("Changed files in commit: {:?}", files);
    Ok(files)
}

async fn fetch_pull_request<L: ChangeListing>(
    listing: &L,
    event: &EventContext,
) -> Result<Vec<String>, GitHubError> {
    let repo = event
        .repository
        .as_ref()
        .ok_or(GitHubError::MissingField("GITHUB_REPOSITORY"))?;
    let number = event
        .pull_number
        .ok_or(GitHubError::MissingField("pull request number"))?;
    log::debug!("Fetching changed files from PR #{} in {}", number, repo);
    let files = listing.pull_request_files(repo, number).await?;
    log::debug!("Changed files in PR: {:?}", files);
    Ok(files)
}

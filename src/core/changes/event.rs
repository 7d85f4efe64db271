//! Triggering event context, read once from the runner environment and passed explicitly.

use std::path::Path;

use serde_json::Value;

/// Kind of workflow trigger, as far as change detection cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push,
    PullRequest,
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "push" => Self::Push,
            "pull_request" | "pull_request_target" => Self::PullRequest,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::PullRequest => write!(f, "pull_request"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// `owner/name` of the repository the workflow runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub kind: EventKind,
    pub repository: Option<Repository>,
    /// Commit the workflow runs on.
    pub sha: Option<String>,
    /// Previous tip of the pushed ref (push events only).
    pub before: Option<String>,
    pub pull_number: Option<u64>,
    /// Target branch of the pull request.
    pub base_ref: Option<String>,
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn str_field(payload: &Value, pointer: &str) -> Option<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl EventContext {
    /// Build the context from the standard `GITHUB_*` variables and the webhook payload file.
    pub fn from_env() -> Self {
        let payload = env_non_empty("GITHUB_EVENT_PATH").and_then(|p| load_payload(Path::new(&p)));
        Self::from_parts(
            env_non_empty("GITHUB_EVENT_NAME").as_deref().unwrap_or(""),
            env_non_empty("GITHUB_REPOSITORY").as_deref(),
            env_non_empty("GITHUB_SHA"),
            env_non_empty("GITHUB_BASE_REF"),
            payload.as_ref(),
        )
    }

    pub fn from_parts(
        event_name: &str,
        repository: Option<&str>,
        sha: Option<String>,
        base_ref: Option<String>,
        payload: Option<&Value>,
    ) -> Self {
        let kind = EventKind::from_name(event_name);
        let pull_number = payload.and_then(|p| p.pointer("/pull_request/number")?.as_u64());
        let base_ref =
            base_ref.or_else(|| payload.and_then(|p| str_field(p, "/pull_request/base/ref")));
        let before = payload.and_then(|p| str_field(p, "/before"));

        Self {
            kind,
            repository: repository.and_then(Repository::parse),
            sha,
            before,
            pull_number,
            base_ref,
        }
    }
}

fn load_payload(path: &Path) -> Option<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Could not read event payload {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Could not parse event payload {}: {}", path.display(), e);
            None
        }
    }
}

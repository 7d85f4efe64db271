//! GitHub REST client for the files touched by a commit or a pull request.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::app;

use super::event::Repository;

/// GitHub's maximum page size for the pull request files endpoint.
const PER_PAGE: usize = 100;
/// The endpoint stops at 3000 files, i.e. 30 full pages.
const MAX_PAGES: usize = 30;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("missing {0} in event context")]
    MissingField(&'static str),
}

/// Source of changed file lists. Implemented by [`GitHubClient`]; tests substitute their own.
#[allow(async_fn_in_trait)]
pub trait ChangeListing {
    /// Paths of the files touched by commit `sha`.
    async fn commit_files(&self, repo: &Repository, sha: &str) -> Result<Vec<String>, GitHubError>;

    /// Paths of every file changed by pull request `number`, across all pages.
    async fn pull_request_files(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Vec<String>, GitHubError>;
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct Commit {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(token: impl AsRef<str>, api_url: impl AsRef<str>) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .user_agent(app::user_agent())
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            token: token.as_ref().to_string(),
            api_url: api_url.as_ref().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, GitHubError> {
        let url = format!("{}{}", self.api_url, endpoint);
        log::debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Pull the `message` field out of a GitHub error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl ChangeListing for GitHubClient {
    async fn commit_files(&self, repo: &Repository, sha: &str) -> Result<Vec<String>, GitHubError> {
        let endpoint = format!("/repos/{}/{}/commits/{}", repo.owner, repo.name, sha);
        let commit: Commit = self.get_json(&endpoint, &[]).await?;
        Ok(commit.files.into_iter().map(|f| f.filename).collect())
    }

    async fn pull_request_files(
        &self,
        repo: &Repository,
        number: u64,
    ) -> Result<Vec<String>, GitHubError> {
        let endpoint = format!("/repos/{}/{}/pulls/{}/files", repo.owner, repo.name, number);
        let mut files = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch: Vec<ChangedFile> = self
                .get_json(
                    &endpoint,
                    &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
                )
                .await?;
            let last = batch.len() < PER_PAGE;
            files.extend(batch.into_iter().map(|f| f.filename));
            if last {
                break;
            }
        }
        Ok(files)
    }
}

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::Result;

const GITHUB_WEB: &str = "https://github.com";

/// Errors raised while parsing an `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("repository must be in format 'owner/repo', got: '{0}'")]
    Format(String),
    #[error("repository owner must not be empty")]
    EmptyOwner,
    #[error("repository name must not be empty")]
    EmptyName,
    #[error("repository owner and name must not contain whitespace, got: '{0}'")]
    Whitespace(String),
}

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();

        if owner.trim().is_empty() {
            return Err(RepoError::EmptyOwner);
        }
        if name.trim().is_empty() {
            return Err(RepoError::EmptyName);
        }
        if owner.contains(char::is_whitespace) || name.contains(char::is_whitespace) {
            return Err(RepoError::Whitespace(format!("{owner}/{name}")));
        }

        Ok(Self { owner, name })
    }

    pub fn parse(repo: &str) -> Result<Self, RepoError> {
        match repo.trim().split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] => Self::new(*owner, *name),
            _ => Err(RepoError::Format(repo.to_string())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pull_url(&self, number: u64) -> String {
        format!("{GITHUB_WEB}/{self}/pull/{number}")
    }

    pub fn issue_url(&self, number: u64) -> String {
        format!("{GITHUB_WEB}/{self}/issues/{number}")
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    pub fn from_api(state: &str) -> Option<Self> {
        match state {
            "open" => Some(ItemState::Open),
            "closed" => Some(ItemState::Closed),
            _ => None,
        }
    }
}

/// Pull request fields the digest reads.
///
/// `merged_at` being present implies `state` is [`ItemState::Closed`].
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author_login: String,
    pub state: ItemState,
    pub draft: bool,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Case-sensitive exact match against the label names.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|name| name == label)
    }

    pub fn is_open(&self) -> bool {
        self.state == ItemState::Open
    }
}

/// Issue fields the digest reads.
///
/// `author_login` is `None` for items whose author account no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub author_login: Option<String>,
    pub state: ItemState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_pull_request: bool,
}

/// Read access to a source-control host.
#[async_trait]
pub trait Forge {
    /// Pull requests in any state, most recently updated first, one page of
    /// up to 100 items.
    async fn list_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequest>>;

    /// Open issues updated at or after `since`, one page of up to 100 items.
    /// The host may include pull requests; callers filter them out.
    async fn list_open_issues(&self, repo: &Repo, since: DateTime<Utc>) -> Result<Vec<Issue>>;
}

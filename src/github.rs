use std::process::Command;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{DigestError, Result},
    types::{Forge, Issue, ItemState, PullRequest, Repo},
};

/// Largest page the REST API serves; the digest reads a single page.
pub const PAGE_SIZE: u8 = 100;

/// Returns `explicit` if given, otherwise looks in `GH_TOKEN` and finally
/// asks the `gh` CLI.
pub fn resolve_token(explicit: Option<String>) -> Result<String> {
    if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN") {
        if !token.trim().is_empty() {
            return Ok(token);
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|_| {
            DigestError::configuration(
                "no GitHub token: set GITHUB_TOKEN or GH_TOKEN, or install the gh CLI",
            )
        })?;

    if !output.status.success() {
        return Err(DigestError::configuration(
            "no GitHub token: set GITHUB_TOKEN or run 'gh auth login' first",
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(DigestError::configuration("empty token returned from gh CLI"));
    }

    Ok(token)
}

/// [`Forge`] backed by the GitHub REST API.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Creates an authenticated client.
    pub fn connect(token: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|source| DigestError::Transport {
                route: "client setup".to_string(),
                source,
            })?;
        Ok(Self::new(client))
    }

    /// Fetches one page as untyped items; each item is decoded on its own.
    async fn get_page<P>(&self, route: String, params: &P) -> Result<Vec<Value>>
    where
        P: Serialize + ?Sized,
    {
        tracing::debug!(%route, "requesting page");
        let page = self.client.get(&route, Some(params)).await;
        page.map_err(|source| DigestError::Transport { route, source })
    }
}

#[derive(Debug, Serialize)]
struct PullListParams {
    state: &'static str,
    sort: &'static str,
    direction: &'static str,
    per_page: u8,
}

#[derive(Debug, Serialize)]
struct IssueListParams {
    state: &'static str,
    since: String,
    per_page: u8,
}

#[async_trait]
impl Forge for GitHub {
    async fn list_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequest>> {
        let route = format!("/repos/{}/{}/pulls", repo.owner(), repo.name());
        let params = PullListParams {
            state: "all",
            sort: "updated",
            direction: "desc",
            per_page: PAGE_SIZE,
        };

        let page = self.get_page(route, &params).await?;
        Ok(keep_well_formed(
            page,
            RestPullRequest::KIND,
            RestPullRequest::into_pull_request,
        ))
    }

    async fn list_open_issues(&self, repo: &Repo, since: DateTime<Utc>) -> Result<Vec<Issue>> {
        let route = format!("/repos/{}/{}/issues", repo.owner(), repo.name());
        let params = IssueListParams {
            state: "open",
            since: since.to_rfc3339(),
            per_page: PAGE_SIZE,
        };

        let page = self.get_page(route, &params).await?;
        Ok(keep_well_formed(page, RestIssue::KIND, RestIssue::into_issue))
    }
}

/// Decodes and converts every item, logging and skipping those that do not fit.
fn keep_well_formed<R, T>(
    page: Vec<Value>,
    kind: &'static str,
    convert: fn(R) -> Result<T>,
) -> Vec<T>
where
    R: DeserializeOwned,
{
    page.into_iter()
        .filter_map(|value| match decode_item(kind, value).and_then(convert) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(error = %err, "skipping item");
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct RestUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct RestLabel {
    pub name: String,
}

/// Pull request as served by `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Deserialize)]
pub struct RestPullRequest {
    pub number: u64,
    pub title: Option<String>,
    pub user: Option<RestUser>,
    pub state: Option<String>,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default)]
    pub labels: Option<Vec<RestLabel>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl RestPullRequest {
    const KIND: &'static str = "pull request";

    pub fn into_pull_request(self) -> Result<PullRequest> {
        let number = self.number;
        let missing =
            |field: &str| DigestError::mapping(Self::KIND, number, format!("missing {field}"));

        let state = parse_state(Self::KIND, number, self.state.as_deref())?;
        if self.merged_at.is_some() && state != ItemState::Closed {
            return Err(DigestError::mapping(Self::KIND, number, "merged but not closed"));
        }

        Ok(PullRequest {
            number,
            title: self.title.ok_or_else(|| missing("title"))?,
            author_login: self.user.map(|u| u.login).ok_or_else(|| missing("user"))?,
            state,
            draft: self.draft.unwrap_or(false),
            labels: self
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|label| label.name)
                .collect(),
            created_at: self.created_at.ok_or_else(|| missing("created_at"))?,
            updated_at: self.updated_at.ok_or_else(|| missing("updated_at"))?,
            merged_at: self.merged_at,
        })
    }
}

/// Issue as served by `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Deserialize)]
pub struct RestIssue {
    pub number: u64,
    pub title: Option<String>,
    pub user: Option<RestUser>,
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    // Only present when the "issue" is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl RestIssue {
    const KIND: &'static str = "issue";

    pub fn into_issue(self) -> Result<Issue> {
        let number = self.number;
        let missing =
            |field: &str| DigestError::mapping(Self::KIND, number, format!("missing {field}"));

        Ok(Issue {
            number,
            title: self.title.ok_or_else(|| missing("title"))?,
            author_login: self.user.map(|u| u.login),
            state: parse_state(Self::KIND, number, self.state.as_deref())?,
            created_at: self.created_at.ok_or_else(|| missing("created_at"))?,
            updated_at: self.updated_at.ok_or_else(|| missing("updated_at"))?,
            is_pull_request: self.pull_request.is_some_and(|marker| !marker.is_null()),
        })
    }
}

fn decode_item<R: DeserializeOwned>(kind: &'static str, value: Value) -> Result<R> {
    let number = value.get("number").and_then(Value::as_u64).unwrap_or_default();
    serde_json::from_value(value).map_err(|err| DigestError::mapping(kind, number, err.to_string()))
}

fn parse_state(kind: &'static str, number: u64, state: Option<&str>) -> Result<ItemState> {
    match state {
        Some(state) => ItemState::from_api(state)
            .ok_or_else(|| DigestError::mapping(kind, number, format!("unknown state '{state}'"))),
        None => Err(DigestError::mapping(kind, number, "missing state")),
    }
}

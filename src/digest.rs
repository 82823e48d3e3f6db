use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    classify::{Buckets, Rules, classify},
    error::Result,
    report::{Branding, Report},
    types::{Forge, Issue, PullRequest, Repo},
    window::ReportingWindow,
};

/// Everything one run needs, built once from the command line.
#[derive(Clone)]
pub struct DigestConfig {
    pub repo: Repo,
    pub token: Option<String>,
    pub rules: Rules,
    pub branding: Branding,
    /// Overrides the wall clock when set.
    pub now: Option<DateTime<Utc>>,
}

impl DigestConfig {
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestConfig")
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("rules", &self.rules)
            .field("branding", &self.branding)
            .field("now", &self.now)
            .finish()
    }
}

/// Raw items fetched for one window.
#[derive(Debug, Clone, Default)]
pub struct Activity {
    pub pull_requests: Vec<PullRequest>,
    pub issues: Vec<Issue>,
}

/// Output of a complete run.
#[derive(Debug, Clone)]
pub struct Digest {
    pub window: ReportingWindow,
    pub buckets: Buckets,
    pub report: Report,
}

/// Fetches pull requests, then issues, one after the other.
///
/// Items the issue endpoint reports as pull requests are dropped here.
pub async fn fetch_activity<F>(
    forge: &F,
    repo: &Repo,
    window: &ReportingWindow,
) -> Result<Activity>
where
    F: Forge + Sync,
{
    let pull_requests = forge.list_pull_requests(repo).await?;
    let mut issues = forge.list_open_issues(repo, window.start).await?;
    issues.retain(|issue| !issue.is_pull_request);

    tracing::debug!(
        %repo,
        pull_requests = pull_requests.len(),
        issues = issues.len(),
        "fetched activity"
    );

    Ok(Activity {
        pull_requests,
        issues,
    })
}

/// Runs fetch, classify and render for the week preceding `now`.
pub async fn build_digest<F>(
    config: &DigestConfig,
    forge: &F,
    now: DateTime<Utc>,
) -> Result<Digest>
where
    F: Forge + Sync,
{
    let window = ReportingWindow::preceding(now);
    tracing::info!(start = %window.start, end = %window.end, "reporting window");

    let activity = fetch_activity(forge, &config.repo, &window).await?;
    let buckets = classify(
        &activity.pull_requests,
        &activity.issues,
        &config.rules,
        &window,
        now,
    );
    let report = Report::render(&buckets, &config.repo, &window, &config.branding);

    Ok(Digest {
        window,
        buckets,
        report,
    })
}

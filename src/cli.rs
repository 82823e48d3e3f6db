use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{
    classify::Rules,
    digest::DigestConfig,
    error::DigestError,
    report::Branding,
    types::Repo,
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

pub const DEFAULT_READY_LABEL: &str = "ready-for-review";
pub const DEFAULT_EXCLUDED_USERS: [&str; 2] = ["dependabot[bot]", "github-actions[bot]"];

#[derive(Parser, Debug)]
#[command(
    name = "weekly-digest",
    about = "Summarise last week's merged, waiting, in-progress pull requests and new issues for a GitHub repository"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// GitHub repository in format 'owner/repo'
    #[arg(short = 'r', long, env = "DIGEST_REPO", value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// GitHub token (falls back to GH_TOKEN, then `gh auth token`)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Label marking a pull request as ready for review
    #[arg(
        long = "ready-label",
        env = "DIGEST_READY_LABEL",
        default_value = DEFAULT_READY_LABEL,
        value_name = "LABEL"
    )]
    pub ready_label: String,

    /// Author logins left out of every section (can specify multiple or comma-separated)
    #[arg(
        short = 'x',
        long = "exclude-user",
        env = "DIGEST_EXCLUDED_USERS",
        value_delimiter = ',',
        default_values = DEFAULT_EXCLUDED_USERS,
        value_name = "LOGIN"
    )]
    pub exclude_user: Vec<String>,

    /// Team name used in the plain report greeting
    #[arg(long, default_value = "Samourai", value_name = "NAME")]
    pub team: String,

    /// Project name heading the plain report body
    #[arg(long, default_value = "Dither", value_name = "NAME")]
    pub project: String,

    /// Pretend the current time is this RFC 3339 timestamp
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<DateTime<Utc>>,
}

impl CliArgs {
    fn into_config(self) -> Result<DigestConfig, DigestError> {
        let repo = self
            .repo
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| {
                DigestError::configuration("repository is required (--repo or DIGEST_REPO)")
            })?;
        let repo = Repo::parse(repo)?;

        let excluded = self
            .exclude_user
            .into_iter()
            .map(|login| login.trim().to_string())
            .filter(|login| !login.is_empty());

        Ok(DigestConfig {
            repo,
            token: self.token,
            rules: Rules::new(self.ready_label, excluded),
            branding: Branding {
                team: self.team,
                project: self.project,
            },
            now: self.now,
        })
    }
}

/// Parses command-line arguments (and their environment fallbacks) into a
/// run configuration.
pub fn parse_args<I, T>(args: I) -> Result<DigestConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    Ok(cli.into_config()?)
}

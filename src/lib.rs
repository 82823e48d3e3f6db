//! Weekly digest: a one-shot summary of a GitHub repository's last week.
//!
//! Fetches one page of pull requests and open issues, sorts them into
//! merged, waiting-for-review, in-progress and newly-opened buckets, and
//! renders a Markdown report plus a plain-text variant for chat.

pub mod classify;
pub mod cli;
pub mod digest;
pub mod error;
pub mod github;
pub mod report;
pub mod types;
pub mod window;

pub use classify::{Buckets, Rules, classify};
pub use cli::parse_args;
pub use digest::{Activity, Digest, DigestConfig, build_digest, fetch_activity};
pub use error::{DigestError, Result};
pub use github::{GitHub, resolve_token};
pub use report::{Branding, EMPTY_REPORT, Report, Section};
pub use types::{Forge, Issue, ItemState, PullRequest, Repo, RepoError};
pub use window::{ReportingWindow, format_date_range};

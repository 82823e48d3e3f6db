use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::{
    types::{Issue, PullRequest},
    window::ReportingWindow,
};

/// Hours a ready pull request must sit untouched before it is reported as
/// waiting for review.
pub const REVIEW_QUIET_HOURS: i64 = 24;

/// Label and author rules shared by every bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub ready_label: String,
    pub excluded_users: BTreeSet<String>,
}

impl Rules {
    pub fn new<I, S>(ready_label: impl Into<String>, excluded_users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ready_label: ready_label.into(),
            excluded_users: excluded_users.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, login: &str) -> bool {
        self.excluded_users.contains(login)
    }
}

/// Classified items, each bucket in API return order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub merged_this_week: Vec<PullRequest>,
    pub waiting_review: Vec<PullRequest>,
    pub in_progress: Vec<PullRequest>,
    pub issues_opened: Vec<Issue>,
}

impl Buckets {
    pub fn is_empty(&self) -> bool {
        self.merged_this_week.is_empty()
            && self.waiting_review.is_empty()
            && self.in_progress.is_empty()
            && self.issues_opened.is_empty()
    }
}

pub fn is_merged_this_week(pr: &PullRequest, rules: &Rules, window: &ReportingWindow) -> bool {
    let Some(merged_at) = pr.merged_at else {
        return false;
    };
    !rules.is_excluded(&pr.author_login) && window.contains(merged_at)
}

pub fn is_waiting_review(pr: &PullRequest, rules: &Rules, now: DateTime<Utc>) -> bool {
    if !pr.is_open() || pr.draft || pr.merged_at.is_some() {
        return false;
    }
    if rules.is_excluded(&pr.author_login) || !pr.has_label(&rules.ready_label) {
        return false;
    }
    pr.updated_at < now - Duration::hours(REVIEW_QUIET_HOURS)
}

pub fn is_in_progress(pr: &PullRequest, rules: &Rules, window: &ReportingWindow) -> bool {
    if !pr.is_open() || rules.is_excluded(&pr.author_login) {
        return false;
    }
    pr.created_at >= window.start && !pr.has_label(&rules.ready_label)
}

/// Issues without an author pass; they are dropped later when rendering.
pub fn is_issue_opened(issue: &Issue, rules: &Rules) -> bool {
    issue
        .author_login
        .as_deref()
        .is_none_or(|login| !rules.is_excluded(login))
}

/// Splits fetched items into the four report buckets.
///
/// Predicates are evaluated independently per item and the input order is
/// preserved within each bucket.
pub fn classify(
    prs: &[PullRequest],
    issues: &[Issue],
    rules: &Rules,
    window: &ReportingWindow,
    now: DateTime<Utc>,
) -> Buckets {
    let buckets = Buckets {
        merged_this_week: select(prs, |pr| is_merged_this_week(pr, rules, window)),
        waiting_review: select(prs, |pr| is_waiting_review(pr, rules, now)),
        in_progress: select(prs, |pr| is_in_progress(pr, rules, window)),
        issues_opened: issues
            .iter()
            .filter(|issue| is_issue_opened(issue, rules))
            .cloned()
            .collect(),
    };

    tracing::debug!(
        merged = buckets.merged_this_week.len(),
        waiting_review = buckets.waiting_review.len(),
        in_progress = buckets.in_progress.len(),
        issues_opened = buckets.issues_opened.len(),
        "classified activity"
    );

    buckets
}

fn select<P>(prs: &[PullRequest], pred: P) -> Vec<PullRequest>
where
    P: Fn(&PullRequest) -> bool,
{
    prs.iter().filter(|pr| pred(pr)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::ItemState;

    const READY: &str = "ready-for-review";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap()
    }

    fn window() -> ReportingWindow {
        ReportingWindow::preceding(now())
    }

    fn rules() -> Rules {
        Rules::new(READY, ["dependabot[bot]"])
    }

    fn open_pr(number: u64, author: &str) -> PullRequest {
        PullRequest {
            number,
            title: format!("PR {number}"),
            author_login: author.to_string(),
            state: ItemState::Open,
            draft: false,
            labels: vec![],
            created_at: window().start + Duration::days(1),
            updated_at: now() - Duration::hours(48),
            merged_at: None,
        }
    }

    fn merged_pr(number: u64, author: &str, merged_at: DateTime<Utc>) -> PullRequest {
        PullRequest {
            state: ItemState::Closed,
            merged_at: Some(merged_at),
            ..open_pr(number, author)
        }
    }

    fn ready_pr(number: u64, author: &str) -> PullRequest {
        PullRequest {
            labels: vec![READY.to_string()],
            ..open_pr(number, author)
        }
    }

    fn issue(number: u64, author: Option<&str>) -> Issue {
        Issue {
            number,
            title: format!("Issue {number}"),
            author_login: author.map(str::to_string),
            state: ItemState::Open,
            created_at: window().start,
            updated_at: window().start,
            is_pull_request: false,
        }
    }

    #[test]
    fn unmerged_prs_never_count_as_merged() {
        let mut closed = open_pr(1, "alice");
        closed.state = ItemState::Closed;
        assert!(!is_merged_this_week(&closed, &rules(), &window()));
        assert!(!is_merged_this_week(&open_pr(2, "alice"), &rules(), &window()));
    }

    #[test]
    fn merged_window_boundaries() {
        let w = window();
        assert!(is_merged_this_week(
            &merged_pr(1, "alice", w.start),
            &rules(),
            &w
        ));
        assert!(!is_merged_this_week(
            &merged_pr(2, "alice", w.end),
            &rules(),
            &w
        ));
        assert!(!is_merged_this_week(
            &merged_pr(3, "alice", w.start - Duration::seconds(1)),
            &rules(),
            &w
        ));
    }

    #[test]
    fn waiting_review_needs_a_quiet_day() {
        let mut recent = ready_pr(1, "alice");
        recent.updated_at = now() - Duration::hours(23);
        assert!(!is_waiting_review(&recent, &rules(), now()));

        let mut stale = ready_pr(2, "alice");
        stale.updated_at = now() - Duration::hours(25);
        assert!(is_waiting_review(&stale, &rules(), now()));

        let mut exact = ready_pr(3, "alice");
        exact.updated_at = now() - Duration::hours(24);
        assert!(!is_waiting_review(&exact, &rules(), now()));
    }

    #[test]
    fn waiting_review_requires_ready_label_and_non_draft() {
        assert!(!is_waiting_review(&open_pr(1, "alice"), &rules(), now()));

        let mut draft = ready_pr(2, "alice");
        draft.draft = true;
        assert!(!is_waiting_review(&draft, &rules(), now()));

        let mut other_case = open_pr(3, "alice");
        other_case.labels = vec!["Ready-For-Review".to_string()];
        assert!(!is_waiting_review(&other_case, &rules(), now()));
    }

    #[test]
    fn in_progress_is_new_work_without_ready_label() {
        assert!(is_in_progress(&open_pr(1, "alice"), &rules(), &window()));
        assert!(!is_in_progress(&ready_pr(2, "alice"), &rules(), &window()));

        let mut old = open_pr(3, "alice");
        old.created_at = window().start - Duration::seconds(1);
        assert!(!is_in_progress(&old, &rules(), &window()));

        let mut boundary = open_pr(4, "alice");
        boundary.created_at = window().start;
        assert!(is_in_progress(&boundary, &rules(), &window()));

        let mut drafted = open_pr(5, "alice");
        drafted.draft = true;
        assert!(is_in_progress(&drafted, &rules(), &window()));
    }

    #[test]
    fn excluded_authors_are_dropped_from_every_bucket() {
        let bot = "dependabot[bot]";
        let prs = vec![
            merged_pr(1, bot, window().start),
            ready_pr(2, bot),
            open_pr(3, bot),
        ];
        let issues = vec![issue(4, Some(bot))];

        let buckets = classify(&prs, &issues, &rules(), &window(), now());
        assert!(buckets.is_empty());
    }

    #[test]
    fn authorless_issue_passes_exclusion() {
        let issues = vec![issue(1, None), issue(2, Some("alice"))];
        let buckets = classify(&[], &issues, &rules(), &window(), now());
        let numbers: Vec<_> = buckets.issues_opened.iter().map(|i| i.number).collect();
        assert_eq!(numbers, [1, 2]);
    }

    #[test]
    fn buckets_keep_input_order_and_are_disjoint() {
        let prs = vec![
            open_pr(10, "carol"),
            merged_pr(11, "alice", window().start + Duration::hours(3)),
            ready_pr(12, "bob"),
            open_pr(13, "alice"),
            merged_pr(14, "bob", window().start + Duration::hours(1)),
            ready_pr(15, "carol"),
        ];

        let buckets = classify(&prs, &[], &rules(), &window(), now());
        let numbers = |prs: &[PullRequest]| prs.iter().map(|pr| pr.number).collect::<Vec<_>>();

        assert_eq!(numbers(&buckets.merged_this_week), [11, 14]);
        assert_eq!(numbers(&buckets.waiting_review), [12, 15]);
        assert_eq!(numbers(&buckets.in_progress), [10, 13]);

        for pr in &prs {
            let hits = [
                &buckets.merged_this_week,
                &buckets.waiting_review,
                &buckets.in_progress,
            ]
            .iter()
            .filter(|bucket| bucket.iter().any(|b| b.number == pr.number))
            .count();
            assert!(hits <= 1, "PR {} landed in {hits} buckets", pr.number);
        }
    }
}

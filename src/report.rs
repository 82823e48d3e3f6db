//! Markdown and plain-text renderings of the weekly buckets.

use crate::{
    classify::Buckets,
    types::{PullRequest, Repo},
    window::ReportingWindow,
};

pub const EMPTY_REPORT: &str = "No items to report this week.";

const EMPHASIS: &str = "**";
const ITEM_INDENT: &str = "    ";
const SIGN_OFF: &str = "Have a nice week! ✨";

/// Report sections in the order they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Merged,
    WaitingReview,
    InProgress,
    IssuesOpened,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Merged,
        Section::WaitingReview,
        Section::InProgress,
        Section::IssuesOpened,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Merged => "PR Merged",
            Section::WaitingReview => "PR Waiting for Review",
            Section::InProgress => "PR In Progress",
            Section::IssuesOpened => "Issues Opened",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Section::Merged => "✅",
            Section::WaitingReview => "⚠️",
            Section::InProgress => "🚧",
            Section::IssuesOpened => "❗",
        }
    }

    fn heading(&self) -> String {
        format!("- {} {}", self.title(), self.glyph())
    }
}

/// Names used in the plain report's greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub team: String,
    pub project: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            team: "Samourai".to_string(),
            project: "Dither".to_string(),
        }
    }
}

/// Both renderings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub rich: String,
    pub plain: String,
}

impl Report {
    pub fn render(
        buckets: &Buckets,
        repo: &Repo,
        window: &ReportingWindow,
        branding: &Branding,
    ) -> Self {
        let rich = render_rich(buckets, repo);
        let plain = plain_from_rich(&rich, window, branding);
        Self { rich, plain }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    Rich,
    Plain,
}

impl Markup {
    fn emphasize(self, text: &str) -> String {
        match self {
            Markup::Rich => format!("{EMPHASIS}{text}{EMPHASIS}"),
            Markup::Plain => strip_emphasis(text),
        }
    }
}

/// One rendered item: title, link and author.
struct Line<'a> {
    title: &'a str,
    url: String,
    author: &'a str,
}

impl Line<'_> {
    fn render(&self, markup: Markup) -> String {
        format!(
            "{ITEM_INDENT}- {} {} {}\n",
            markup.emphasize(self.title),
            self.url,
            self.author
        )
    }
}

fn section_lines<'a>(
    section: Section,
    buckets: &'a Buckets,
    repo: &Repo,
) -> Option<Vec<Line<'a>>> {
    let pull_lines = |prs: &'a [PullRequest]| {
        prs.iter()
            .map(|pr| Line {
                title: &pr.title,
                url: repo.pull_url(pr.number),
                author: &pr.author_login,
            })
            .collect::<Vec<_>>()
    };

    let lines = match section {
        Section::Merged if !buckets.merged_this_week.is_empty() => {
            pull_lines(&buckets.merged_this_week)
        }
        Section::WaitingReview if !buckets.waiting_review.is_empty() => {
            pull_lines(&buckets.waiting_review)
        }
        Section::InProgress if !buckets.in_progress.is_empty() => pull_lines(&buckets.in_progress),
        // Authorless issues keep the section alive but produce no line.
        Section::IssuesOpened if !buckets.issues_opened.is_empty() => buckets
            .issues_opened
            .iter()
            .filter_map(|issue| {
                issue.author_login.as_deref().map(|author| Line {
                    title: &issue.title,
                    url: repo.issue_url(issue.number),
                    author,
                })
            })
            .collect(),
        _ => return None,
    };

    Some(lines)
}

fn render_body(buckets: &Buckets, repo: &Repo, markup: Markup) -> String {
    let mut body = String::new();

    for section in Section::ALL {
        let Some(lines) = section_lines(section, buckets, repo) else {
            continue;
        };
        body.push_str(&section.heading());
        body.push('\n');
        for line in lines {
            body.push_str(&line.render(markup));
        }
    }

    if body.is_empty() {
        EMPTY_REPORT.to_string()
    } else {
        body
    }
}

/// Markdown report with bold titles, or [`EMPTY_REPORT`] when nothing happened.
pub fn render_rich(buckets: &Buckets, repo: &Repo) -> String {
    render_body(buckets, repo, Markup::Rich)
}

/// Plain report rendered straight from the buckets.
pub fn render_plain(
    buckets: &Buckets,
    repo: &Repo,
    window: &ReportingWindow,
    branding: &Branding,
) -> String {
    wrap_plain(&render_body(buckets, repo, Markup::Plain), window, branding)
}

/// Plain report derived from an already rendered rich report.
pub fn plain_from_rich(rich: &str, window: &ReportingWindow, branding: &Branding) -> String {
    wrap_plain(&strip_emphasis(rich), window, branding)
}

pub fn strip_emphasis(text: &str) -> String {
    text.replace(EMPHASIS, "")
}

fn wrap_plain(body: &str, window: &ReportingWindow, branding: &Branding) -> String {
    format!(
        "{}{}\n{}",
        plain_header(window, branding),
        space_sections(body),
        SIGN_OFF
    )
}

fn plain_header(window: &ReportingWindow, branding: &Branding) -> String {
    format!(
        "Here's the weekly report on the {} team's contributions 🥷\n{}\n\n{}:\n\n",
        branding.team,
        window.display_range(),
        branding.project
    )
}

/// Puts a blank line before every section heading after the first.
fn space_sections(body: &str) -> String {
    let mut spaced = String::with_capacity(body.len() + 8);
    for (index, line) in body.split_inclusive('\n').enumerate() {
        if index > 0 && line.starts_with("- ") {
            spaced.push('\n');
        }
        spaced.push_str(line);
    }
    spaced
}

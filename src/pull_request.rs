/*!
 * Pull request draft for an objectives update.
 *
 * The sync never talks to the source-control host itself. It writes this
 * draft as JSON and the CI step that opens the pull request reads it.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write;

use crate::objectives::{split_weight, Objective, ObjectiveDiff, ObjectiveSet};

pub const PR_TITLE: &str = "Update AZ-305 exam objectives";
pub const PR_LABELS: [&str; 3] = ["automated", "exam-objectives", "documentation"];
const BRANCH_PREFIX: &str = "sync/exam-objectives-";

/// Everything needed to open the pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub branch: String,
}

/// Inputs for building a draft
pub struct DraftContext<'a> {
    /// Free-text message from the manual dispatch
    pub update_message: Option<&'a str>,
    /// Page the objectives came from
    pub source_url: &'a str,
    /// Rendered objectives block, used to derive the branch name
    pub section: &'a str,
    pub objectives: &'a ObjectiveSet,
    pub diff: &'a ObjectiveDiff,
    pub date: NaiveDate,
}

impl PullRequestDraft {
    pub fn build(ctx: &DraftContext<'_>) -> Self {
        let message = ctx.update_message.map(str::trim).filter(|m| !m.is_empty());

        let title = match message {
            Some(message) => format!("{}: {}", PR_TITLE, message),
            None => PR_TITLE.to_string(),
        };

        Self {
            title,
            body: render_body(ctx, message),
            labels: PR_LABELS.iter().map(|l| l.to_string()).collect(),
            branch: branch_name(ctx.section),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Branch derived from the rendered content, so identical objectives always
/// map to the same branch
pub fn branch_name(section: &str) -> String {
    let digest = Sha256::digest(section.as_bytes());
    let hex: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    format!("{}{}", BRANCH_PREFIX, hex)
}

fn render_body(ctx: &DraftContext<'_>, message: Option<&str>) -> String {
    let mut body = String::from("## Exam objectives sync\n\n");

    if let Some(message) = message {
        let _ = writeln!(body, "{}\n", message);
    }

    let _ = writeln!(body, "- Source: {}", ctx.source_url);
    let _ = writeln!(body, "- Synced: {}", ctx.date.format("%B %d, %Y"));
    let _ = writeln!(body, "- Objectives: {}", ctx.objectives.len());

    body.push_str("\n### Domains\n\n");
    for domain in ctx.objectives.domains() {
        match split_weight(domain) {
            (title, Some(weight)) => {
                let _ = writeln!(body, "- {} ({})", title, weight);
            }
            (title, None) => {
                let _ = writeln!(body, "- {}", title);
            }
        }
    }

    push_list(&mut body, "Added", &ctx.diff.added);
    push_list(&mut body, "Removed", &ctx.diff.removed);

    body
}

fn push_list(body: &mut String, heading: &str, items: &[Objective]) {
    let _ = writeln!(body, "\n### {} ({})\n", heading, items.len());
    if items.is_empty() {
        body.push_str("_None_\n");
    }
    for item in items {
        let _ = writeln!(body, "- {}", item);
    }
}

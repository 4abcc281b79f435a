/*!
 * Tests for the pull request draft
 */

use anyhow::Result;
use chrono::NaiveDate;

use az305_sync::objectives::document::render_section;
use az305_sync::objectives::{parse_objectives, ObjectiveDiff, ObjectiveSet};
use az305_sync::pull_request::{DraftContext, PullRequestDraft, PR_LABELS, PR_TITLE};
use crate::common;

/// Test that the JSON draft carries the fields the PR step reads
#[test]
fn test_to_json_withFixtureObjectives_shouldExposeAllFields() -> Result<()> {
    let objectives = parse_objectives(&common::read_resource("one_domain_two_skills.html"))?;
    let diff = ObjectiveDiff::between(&ObjectiveSet::new(), &objectives);
    let section = render_section(&objectives);

    let draft = PullRequestDraft::build(&DraftContext {
        update_message: None,
        source_url: "https://example.test/az-305",
        section: &section,
        objectives: &objectives,
        diff: &diff,
        date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
    });

    let value: serde_json::Value = serde_json::from_str(&draft.to_json()?)?;
    assert_eq!(value["title"], PR_TITLE);
    assert_eq!(value["labels"], serde_json::json!(PR_LABELS));
    assert!(value["branch"].as_str().unwrap().starts_with("sync/exam-objectives-"));

    let body = value["body"].as_str().unwrap();
    assert!(body.contains("Synced: January 05, 2026"));
    assert!(body.contains("- Design infrastructure solutions (30–35%)"));
    assert!(body.contains("### Added (2)"));
    assert!(body.contains("### Removed (0)"));
    Ok(())
}

/*!
 * Tests for rendering and replacing the objectives section
 */

use az305_sync::objectives::document::{apply, extract_section, render_section};
use az305_sync::objectives::{parse_objectives, DocumentUpdate, END_MARKER, START_MARKER};
use crate::common;

fn updated(update: DocumentUpdate) -> String {
    match update {
        DocumentUpdate::Updated(content) => content,
        DocumentUpdate::Unchanged => panic!("expected the document to change"),
    }
}

/// One domain with two skills against an empty document gives one heading and two items
#[test]
fn test_apply_withEmptyDocument_shouldProduceOneHeadingAndTwoItems() {
    let objectives = parse_objectives(&common::read_resource("one_domain_two_skills.html")).unwrap();
    let content = updated(apply("", &objectives).unwrap());

    let headings: Vec<_> = content.lines().filter(|l| l.starts_with("## ")).collect();
    let items: Vec<_> = content.lines().filter(|l| l.trim_start().starts_with("- ")).collect();

    assert_eq!(headings, vec!["## Design infrastructure solutions (30–35%)"]);
    assert_eq!(items, vec!["- Design compute solutions", "- Design network solutions"]);
}

/// Applying the same objectives twice changes nothing the second time
#[test]
fn test_apply_withSameObjectivesTwice_shouldBeUnchanged() {
    let objectives = parse_objectives(&common::read_resource("skills_measured.html")).unwrap();
    let first = updated(apply("# Study notes\n", &objectives).unwrap());

    assert_eq!(apply(&first, &objectives).unwrap(), DocumentUpdate::Unchanged);
}

/// Content around the section survives byte for byte
#[test]
fn test_apply_withSurroundingContent_shouldPreserveItExactly() {
    let before = "# AZ-305\r\n\nIntro with trailing spaces   \n\n";
    let after = "\n\n## Study tips\n\n* keep *this* formatting\n\t- and tabs\n";
    let stale = format!("{}\n\n## Old domain\n\n- Old skill\n\n{}", START_MARKER, END_MARKER);
    let document = format!("{}{}{}", before, stale, after);

    let objectives = parse_objectives(&common::read_resource("skills_measured.html")).unwrap();
    let content = updated(apply(&document, &objectives).unwrap());

    assert!(content.starts_with(before));
    assert!(content.ends_with(after));
    assert!(!content.contains("Old domain"));
    assert_eq!(&content[before.len()..content.len() - after.len()], render_section(&objectives));
}

/// A document missing the start marker is refused rather than rewritten
#[test]
fn test_apply_withOnlyEndMarker_shouldReturnError() {
    let objectives = parse_objectives(&common::read_resource("one_domain_two_skills.html")).unwrap();
    let document = format!("# Notes\n{}\n", END_MARKER);

    assert!(apply(&document, &objectives).is_err());
}

/// The rendered section reads back into the same objectives
#[test]
fn test_extract_section_withRenderedDocument_shouldMatchParsedObjectives() {
    let objectives = parse_objectives(&common::read_resource("skills_measured.html")).unwrap();
    let content = updated(apply("", &objectives).unwrap());

    assert_eq!(extract_section(&content).unwrap(), Some(objectives));
}

/// A skill listed both bare and with sub-skills reads back as the same set
#[test]
fn test_extract_section_withSkillRepeatedBareAndNested_shouldRoundTrip() {
    let html = r##"
        <h2>Skills measured</h2>
        <h3>Design identity solutions</h3>
        <ul>
          <li>Design authentication</li>
          <li>Design authentication
            <ul><li>Recommend an <a href="#">identity</a> provider</li></ul>
          </li>
          <li>Design governance</li>
        </ul>"##;
    let objectives = parse_objectives(html).unwrap();
    assert_eq!(objectives.len(), 2);

    let content = updated(apply("", &objectives).unwrap());
    assert_eq!(extract_section(&content).unwrap(), Some(objectives.clone()));
    assert_eq!(apply(&content, &objectives).unwrap(), DocumentUpdate::Unchanged);
}

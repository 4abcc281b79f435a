/*!
 * Markdown rendering of the objectives section.
 *
 * The section lives between two HTML comment markers so the rest of the
 * document can be edited by hand without the sync touching it.
 */

use super::{Objective, ObjectiveSet};
use crate::errors::DocumentError;

pub const START_MARKER: &str = "<!-- objectives:start -->";
pub const END_MARKER: &str = "<!-- objectives:end -->";

/// Result of applying objectives to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentUpdate {
    /// The document already holds exactly these objectives
    Unchanged,
    /// New document content
    Updated(String),
}

/// Byte range of the marker-delimited block, markers included
fn locate_section(document: &str) -> Result<Option<(usize, usize)>, DocumentError> {
    match document.find(START_MARKER) {
        Some(start) => match document[start..].find(END_MARKER) {
            Some(offset) => Ok(Some((start, start + offset + END_MARKER.len()))),
            None => Err(DocumentError::MalformedMarkers(
                "end marker missing after start marker".to_string(),
            )),
        },
        None if document.contains(END_MARKER) => Err(DocumentError::MalformedMarkers(
            "end marker without start marker".to_string(),
        )),
        None => Ok(None),
    }
}

/// Render the marker-delimited objectives block
pub fn render_section(objectives: &ObjectiveSet) -> String {
    let mut lines = vec![START_MARKER.to_string()];

    for domain in objectives.domains() {
        lines.push(String::new());
        lines.push(format!("## {}", domain));
        lines.push(String::new());
        for skill in objectives.skills(domain) {
            lines.push(format!("- {}", skill));
            for sub_skill in objectives.sub_skills(domain, skill) {
                lines.push(format!("  - {}", sub_skill));
            }
        }
    }

    lines.push(String::new());
    lines.push(END_MARKER.to_string());
    lines.join("\n")
}

/// Replace (or insert) the objectives block in `existing`.
///
/// Text outside the block is kept byte for byte. A document without markers
/// gets the block appended; an empty one becomes just the block.
pub fn apply(existing: &str, objectives: &ObjectiveSet) -> Result<DocumentUpdate, DocumentError> {
    let section = render_section(objectives);

    let updated = match locate_section(existing)? {
        Some((start, end)) => {
            let mut doc = String::with_capacity(existing.len() + section.len());
            doc.push_str(&existing[..start]);
            doc.push_str(&section);
            doc.push_str(&existing[end..]);
            doc
        }
        None if existing.trim().is_empty() => format!("{}\n", section),
        None => {
            let mut doc = existing.to_string();
            if !doc.ends_with('\n') {
                doc.push('\n');
            }
            doc.push('\n');
            doc.push_str(&section);
            doc.push('\n');
            doc
        }
    };

    if updated == existing {
        Ok(DocumentUpdate::Unchanged)
    } else {
        Ok(DocumentUpdate::Updated(updated))
    }
}

fn close_skill(domain: Option<&str>, skill: &mut Option<(&str, bool)>, set: &mut ObjectiveSet) {
    if let (Some(d), Some((s, false))) = (domain, skill.take()) {
        set.push(Objective::new(d, s, None));
    }
}

/// Read the objectives currently recorded in `existing`.
/// Returns `None` when the document has no objectives block.
pub fn extract_section(existing: &str) -> Result<Option<ObjectiveSet>, DocumentError> {
    let Some((start, end)) = locate_section(existing)? else {
        return Ok(None);
    };
    let body = &existing[start + START_MARKER.len()..end - END_MARKER.len()];

    let mut set = ObjectiveSet::new();
    let mut domain: Option<&str> = None;
    // (skill, has sub-skills)
    let mut skill: Option<(&str, bool)> = None;

    for line in body.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            close_skill(domain, &mut skill, &mut set);
            domain = Some(title.trim());
        } else if let Some(sub) = line.strip_prefix("  - ") {
            if let (Some(d), Some((s, has_sub))) = (domain, skill.as_mut()) {
                *has_sub = true;
                set.push(Objective::new(d, *s, Some(sub.trim().to_string())));
            }
        } else if let Some(name) = line.strip_prefix("- ") {
            close_skill(domain, &mut skill, &mut set);
            if domain.is_some() {
                skill = Some((name.trim(), false));
            }
        }
    }
    close_skill(domain, &mut skill, &mut set);

    Ok(Some(set))
}

/*!
 * Extraction of exam objectives from a Microsoft Learn page.
 *
 * The page lists domains as `<h3>` headings after the "Skills measured"
 * `<h2>`. Skills are either `<h4>` headings followed by a list of
 * sub-skills, or top-level list items whose nested list holds the
 * sub-skills.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use super::{Objective, ObjectiveSet};
use crate::errors::ParseError;

static SKILLS_MEASURED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)skills\s+measured").unwrap());

/// Trailing exam weight such as "(25–30%)"
static DOMAIN_WEIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.*?)\s*\((?P<weight>\d+\s*[–-]\s*\d+\s*%)\)\s*$").unwrap()
});

/// Parse the skills measured section of `html` into objectives, in source order
pub fn parse_objectives(html: &str) -> Result<ObjectiveSet, ParseError> {
    let document = Html::parse_document(html);
    let mut elements = document.root_element().descendants().filter_map(ElementRef::wrap);

    elements
        .by_ref()
        .find(|el| el.value().name() == "h2" && SKILLS_MEASURED.is_match(&collapse(el.text())))
        .ok_or(ParseError::MissingSection)?;

    let mut walker = SectionWalker::default();
    for element in elements {
        match element.value().name() {
            "h2" => break,
            "h3" => walker.start_domain(collapse(element.text())),
            "h4" => walker.start_heading_skill(collapse(element.text())),
            "li" => walker.list_item(own_text(element), is_nested_item(element)),
            _ => {}
        }
    }

    let objectives = walker.finish();
    if objectives.is_empty() {
        return Err(ParseError::NoObjectives);
    }
    Ok(objectives)
}

/// Split a domain title into its name and exam weight, if it carries one
pub fn split_weight(domain: &str) -> (&str, Option<&str>) {
    match DOMAIN_WEIGHT.captures(domain) {
        Some(caps) => {
            let title = caps.name("title").map_or(domain, |m| m.as_str());
            (title, caps.name("weight").map(|m| m.as_str()))
        }
        None => (domain.trim(), None),
    }
}

struct OpenSkill {
    name: String,
    has_sub_skills: bool,
}

#[derive(Default)]
struct SectionWalker {
    objectives: ObjectiveSet,
    domain: Option<String>,
    skill: Option<OpenSkill>,
    // Set while the current skill came from an <h4>
    heading_skill: bool,
}

impl SectionWalker {
    fn start_domain(&mut self, title: String) {
        self.close_skill();
        self.heading_skill = false;
        self.domain = (!title.is_empty()).then_some(title);
    }

    fn start_heading_skill(&mut self, name: String) {
        if self.domain.is_none() || name.is_empty() {
            return;
        }
        self.close_skill();
        self.skill = Some(OpenSkill { name, has_sub_skills: false });
        self.heading_skill = true;
    }

    fn list_item(&mut self, text: String, nested: bool) {
        if self.domain.is_none() || text.is_empty() {
            return;
        }

        if self.heading_skill || (nested && self.skill.is_some()) {
            self.add_sub_skill(text);
        } else {
            self.close_skill();
            self.skill = Some(OpenSkill { name: text, has_sub_skills: false });
        }
    }

    fn add_sub_skill(&mut self, text: String) {
        let (Some(domain), Some(skill)) = (&self.domain, self.skill.as_mut()) else {
            return;
        };
        skill.has_sub_skills = true;
        self.objectives.push(Objective::new(domain.clone(), skill.name.clone(), Some(text)));
    }

    fn close_skill(&mut self) {
        if let (Some(domain), Some(skill)) = (&self.domain, self.skill.take()) {
            if !skill.has_sub_skills {
                self.objectives.push(Objective::new(domain.clone(), skill.name, None));
            }
        }
    }

    fn finish(mut self) -> ObjectiveSet {
        self.close_skill();
        self.objectives
    }
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of a list item without the text of its nested lists
fn own_text(item: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for child in item.children() {
        if let Some(text) = child.value().as_text() {
            parts.push(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !matches!(child_el.value().name(), "ul" | "ol") {
                parts.extend(child_el.text());
            }
        }
    }
    collapse(parts.into_iter())
}

fn is_nested_item(item: ElementRef<'_>) -> bool {
    item.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "li")
}

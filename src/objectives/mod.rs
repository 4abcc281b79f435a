/*!
 * Exam objectives model.
 *
 * An objective is a (domain, skill, sub-skill) triple taken from the
 * "Skills measured" section of an exam page. This module contains:
 * - `parser`: HTML to `ObjectiveSet`
 * - `document`: rendering and in-place replacement of the Markdown section
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub mod document;
pub mod parser;

pub use document::{DocumentUpdate, END_MARKER, START_MARKER};
pub use parser::{parse_objectives, split_weight};

/// A single exam objective
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Objective {
    /// Functional group, e.g. "Design data storage solutions (20–25%)"
    pub domain: String,

    /// Skill within the domain
    pub skill: String,

    /// Sub-skill, absent when the skill lists none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_skill: Option<String>,
}

impl Objective {
    pub fn new(domain: impl Into<String>, skill: impl Into<String>, sub_skill: Option<String>) -> Self {
        Self {
            domain: domain.into(),
            skill: skill.into(),
            sub_skill,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.domain, self.skill)?;
        if let Some(sub) = &self.sub_skill {
            write!(f, " > {}", sub)?;
        }
        Ok(())
    }
}

/// Ordered collection of objectives, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveSet {
    objectives: Vec<Objective>,
}

impl ObjectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an objective. An equal objective already present is dropped so
    /// that the last occurrence determines the position.
    ///
    /// A skill is either bare or has sub-skills, never both: a sub-skill
    /// replaces the bare entry of its skill, and a bare entry is ignored
    /// once the skill has sub-skills.
    pub fn push(&mut self, objective: Objective) {
        let same_skill = |existing: &Objective| {
            existing.domain == objective.domain && existing.skill == objective.skill
        };

        if objective.sub_skill.is_none() {
            if self.objectives.iter().any(|o| same_skill(o) && o.sub_skill.is_some()) {
                return;
            }
        } else {
            self.objectives.retain(|o| !(same_skill(o) && o.sub_skill.is_none()));
        }

        self.objectives.retain(|existing| existing != &objective);
        self.objectives.push(objective);
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Objective> {
        self.objectives.iter()
    }

    pub fn as_slice(&self) -> &[Objective] {
        &self.objectives
    }

    /// Domains in order of first appearance
    pub fn domains(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.objectives
            .iter()
            .map(|o| o.domain.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }

    /// Skills of one domain in order of first appearance
    pub fn skills(&self, domain: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.objectives
            .iter()
            .filter(|o| o.domain == domain)
            .map(|o| o.skill.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Sub-skills of one skill, in order
    pub fn sub_skills(&self, domain: &str, skill: &str) -> Vec<&str> {
        self.objectives
            .iter()
            .filter(|o| o.domain == domain && o.skill == skill)
            .filter_map(|o| o.sub_skill.as_deref())
            .collect()
    }
}

impl FromIterator<Objective> for ObjectiveSet {
    fn from_iter<I: IntoIterator<Item = Objective>>(iter: I) -> Self {
        let mut set = ObjectiveSet::new();
        for objective in iter {
            set.push(objective);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ObjectiveSet {
    type Item = &'a Objective;
    type IntoIter = std::slice::Iter<'a, Objective>;

    fn into_iter(self) -> Self::IntoIter {
        self.objectives.iter()
    }
}

/// Objectives added and removed between two sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveDiff {
    pub added: Vec<Objective>,
    pub removed: Vec<Objective>,
}

impl ObjectiveDiff {
    /// Compare `old` against `new`; both lists keep the order of their source set
    pub fn between(old: &ObjectiveSet, new: &ObjectiveSet) -> Self {
        let old_keys: HashSet<&Objective> = old.iter().collect();
        let new_keys: HashSet<&Objective> = new.iter().collect();

        Self {
            added: new.iter().filter(|o| !old_keys.contains(o)).cloned().collect(),
            removed: old.iter().filter(|o| !new_keys.contains(o)).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

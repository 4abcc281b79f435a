use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info, warn};
use std::path::Path;

use crate::app_config::Config;
use crate::diagrams::{DiagramDownloader, DiagramReport};
use crate::fetcher::{HttpFetcher, PageSource};
use crate::file_utils::FileManager;
use crate::objectives::document::{self, DocumentUpdate};
use crate::objectives::{parse_objectives, ObjectiveDiff, ObjectiveSet};
use crate::pull_request::{DraftContext, PullRequestDraft};

// @module: Application controller for objective syncs and diagram downloads

/// Options for a single sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Message from the manual dispatch, carried into the PR draft
    pub update_message: Option<String>,
    /// Compute everything but write nothing
    pub dry_run: bool,
}

/// What a sync run did
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The objectives document was (or, in a dry run, would have been) rewritten
    pub changed: bool,
    pub objectives: ObjectiveSet,
    pub diff: ObjectiveDiff,
    /// Present only when the document changed
    pub pr_draft: Option<PullRequestDraft>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the exam page, refresh the objectives document and, when it
    /// changed, write the pull request draft.
    ///
    /// Nothing is written unless fetching and parsing both succeed.
    pub async fn sync<S>(&self, source: &S, options: &SyncOptions) -> Result<SyncOutcome>
    where
        S: PageSource + ?Sized,
    {
        let start_time = std::time::Instant::now();
        let url = &self.config.exam_url;

        info!("Fetching exam objectives from {}", url);
        let html = source.fetch_page(url).await?;

        let objectives = parse_objectives(&html)
            .with_context(|| format!("Failed to parse exam objectives from {}", url))?;
        info!(
            "Parsed {} objectives across {} domains",
            objectives.len(),
            objectives.domains().len()
        );

        let target = &self.config.objectives_file;
        let existing = FileManager::read_or_empty(target)?;
        let previous = document::extract_section(&existing)
            .with_context(|| format!("Failed to read objectives section of {:?}", target))?
            .unwrap_or_default();
        let diff = ObjectiveDiff::between(&previous, &objectives);

        let update = document::apply(&existing, &objectives)
            .with_context(|| format!("Failed to update {:?}", target))?;

        let DocumentUpdate::Updated(content) = update else {
            info!("Objectives are up to date, nothing to do");
            return Ok(SyncOutcome {
                changed: false,
                objectives,
                diff,
                pr_draft: None,
            });
        };

        let section = document::render_section(&objectives);
        let draft = PullRequestDraft::build(&DraftContext {
            update_message: options.update_message.as_deref(),
            source_url: url,
            section: &section,
            objectives: &objectives,
            diff: &diff,
            date: Local::now().date_naive(),
        });

        debug!(
            "{} objectives added, {} removed",
            diff.added.len(),
            diff.removed.len()
        );

        if options.dry_run {
            warn!("Dry run: not writing {:?}", target);
        } else {
            FileManager::write_atomic(target, content.as_bytes())?;
            info!("Updated {:?}", target);

            if let Some(draft_path) = &self.config.pr_draft_file {
                self.write_pr_draft(&draft, draft_path)?;
            }
        }

        info!("Sync finished in {:.1?}", start_time.elapsed());

        Ok(SyncOutcome {
            changed: true,
            objectives,
            diff,
            pr_draft: Some(draft),
        })
    }

    /// Download the configured architecture diagrams
    pub async fn download_diagrams(&self, fetcher: &HttpFetcher) -> Result<DiagramReport> {
        info!("Downloading architecture diagrams into {:?}", self.config.diagrams.output_dir);
        DiagramDownloader::new(fetcher, &self.config.diagrams).run().await
    }

    fn write_pr_draft(&self, draft: &PullRequestDraft, path: &Path) -> Result<()> {
        let json = draft.to_json().context("Failed to serialize pull request draft")?;
        FileManager::write_atomic(path, json.as_bytes())?;
        info!("Wrote pull request draft to {:?}", path);
        Ok(())
    }
}

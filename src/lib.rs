/*!
 * # az305-sync
 *
 * Keeps the AZ-305 study corpus in step with Microsoft Learn.
 *
 * ## Features
 *
 * - Fetch the exam's "Skills measured" page and extract the
 *   (domain, skill, sub-skill) objectives
 * - Rewrite the objectives section of a Markdown document in place,
 *   leaving the rest of the document untouched
 * - Produce a pull request draft (title, body, labels, branch) for the
 *   CI step that opens the pull request
 * - Download the architecture diagrams referenced by the study guides
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `fetcher`: HTTP retrieval behind the `PageSource` trait
 * - `objectives`: Objective model, HTML parser and Markdown writer:
 *   - `objectives::parser`: HTML to objectives
 *   - `objectives::document`: Section rendering and replacement
 * - `pull_request`: Pull request draft templates
 * - `diagrams`: Architecture diagram downloader
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod diagrams;
pub mod errors;
pub mod fetcher;
pub mod file_utils;
pub mod objectives;
pub mod pull_request;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, SyncOptions, SyncOutcome};
pub use errors::{DocumentError, FetchError, ParseError};
pub use objectives::{Objective, ObjectiveDiff, ObjectiveSet};
pub use pull_request::PullRequestDraft;

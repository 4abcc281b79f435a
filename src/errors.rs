/*!
 * Error types for the az305-sync application.
 *
 * This module contains custom error types for the different stages of a sync
 * run, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while fetching a remote page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("Request to {url} failed: {message}")]
    Request {
        /// URL that was requested
        url: String,
        /// Transport error description
        message: String,
    },

    /// The server answered with a non-success status
    #[error("{url} responded with HTTP {status_code}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// URL that was requested
        url: String,
    },

    /// The response body could not be read
    #[error("Failed to read response body from {url}: {message}")]
    Body {
        /// URL that was requested
        url: String,
        /// Underlying error description
        message: String,
    },

    /// The URL itself is unusable
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while extracting objectives from HTML
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// No "Skills measured" heading on the page
    #[error("Could not find the skills measured section")]
    MissingSection,

    /// The section exists but yielded no objectives
    #[error("Skills measured section contains no objectives")]
    NoObjectives,

    /// A CSS selector failed to compile
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Errors that can occur while rewriting a Markdown document
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// Only one marker present, or they appear out of order
    #[error("Malformed objectives markers: {0}")]
    MalformedMarkers(String),
}

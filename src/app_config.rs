use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::file_utils::FileManager;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Exam page listing the skills measured
    #[serde(default = "default_exam_url")]
    pub exam_url: String,

    /// Markdown document holding the objectives section
    #[serde(default = "default_objectives_file")]
    pub objectives_file: PathBuf,

    /// Where to write the pull request draft, if anywhere
    #[serde(default)]
    pub pr_draft_file: Option<PathBuf>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Diagram downloader settings
    #[serde(default)]
    pub diagrams: DiagramConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP client configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// A single image fetched by URL and stored under a fixed name
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DirectImage {
    // @field: Image URL
    pub url: String,

    // @field: File name inside the output directory
    pub filename: String,
}

impl DirectImage {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Diagram downloader configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiagramConfig {
    /// Directory the images are saved to
    #[serde(default = "default_images_dir")]
    pub output_dir: PathBuf,

    /// Pages scanned for architecture images
    #[serde(default = "default_diagram_pages")]
    pub pages: Vec<String>,

    /// Images downloaded directly by URL
    #[serde(default = "default_direct_images")]
    pub direct_images: Vec<DirectImage>,

    /// An image source must contain one of these (lower-cased) to be kept
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Pause between two downloads in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            output_dir: default_images_dir(),
            pages: default_diagram_pages(),
            direct_images: default_direct_images(),
            keywords: default_keywords(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_exam_url() -> String {
    "https://learn.microsoft.com/en-us/credentials/certifications/resources/study-guides/az-305".to_string()
}

fn default_objectives_file() -> PathBuf {
    PathBuf::from("az305-exam-metadata/az305-OD.md")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("az305-sync/{}", env!("CARGO_PKG_VERSION"))
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_keywords() -> Vec<String> {
    ["architecture", "diagram", "reference"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_diagram_pages() -> Vec<String> {
    const BASE: &str = "https://learn.microsoft.com/en-us/azure/architecture";
    [
        "guide/",
        "guide/architecture-styles/",
        "guide/technology-choices/",
        "patterns/",
        "framework/",
        "reference-architectures/",
        "example-scenario/",
        "browse/",
        "guide/security/security-start-here",
        "framework/security/security-principles",
        "framework/resiliency/backup-and-recovery",
        "framework/scalability/performance-efficiency",
        "guide/technology-choices/compute-decision-tree",
    ]
    .iter()
    .map(|p| format!("{}/{}", BASE, p))
    .collect()
}

fn default_direct_images() -> Vec<DirectImage> {
    const LEARN: &str = "https://learn.microsoft.com/en-us/azure";
    [
        ("architecture/guide/architecture-styles/images/microservices-logical.png", "microservices-architecture.png"),
        ("architecture/reference-architectures/containers/aks/images/aks-baseline-architecture.svg", "aks-baseline-architecture.svg"),
        ("architecture/reference-architectures/hybrid-networking/images/hub-spoke.png", "hub-spoke-architecture.png"),
        ("architecture/reference-architectures/app-service-web-app/images/scalable-web-app.png", "scalable-web-app-architecture.png"),
        ("virtual-network/media/service-endpoints-overview.png", "service-endpoints.png"),
        ("private-link/media/private-endpoint-basics.png", "private-endpoint-basics.png"),
        ("private-link/media/private-link-service-overview.png", "private-link-service.png"),
        ("dns/media/private-dns-portal.png", "private-dns-portal.png"),
        ("virtual-network/media/routing-overview.png", "vnet-routing-overview.png"),
        ("dns/media/dns-overview.png", "azure-dns-overview.png"),
        ("dns/media/private-resolver-overview.png", "private-resolver-overview.png"),
        ("dns/media/custom-domain-name.png", "custom-domain-dns.png"),
        ("active-directory/conditional-access/media/overview/conditional-access-overview.png", "conditional-access-overview.png"),
        ("active-directory/conditional-access/media/what-if-tool/what-if-tool.png", "conditional-access-what-if.png"),
        ("active-directory/conditional-access/media/location-condition.png", "conditional-access-location.png"),
        ("architecture/reference-architectures/containers/aks/images/secure-baseline-architecture.svg", "aks-secure-baseline.svg"),
        ("architecture/solution-ideas/media/devsecops-in-azure.png", "aks-devsecops.png"),
        ("container-registry/media/container-registry-service-tiers.png", "acr-service-tiers.png"),
    ]
    .iter()
    .map(|(path, name)| DirectImage::new(format!("{}/{}", LEARN, path), *name))
    .collect()
}

impl Config {
    /// Load the configuration from a JSON file, falling back to the defaults
    /// when the file does not exist yet. Nothing is written.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file not found at {:?}, using default config.", path);
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        FileManager::write_atomic(path, config_json.as_bytes())
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.exam_url)
            .map_err(|e| anyhow!("Invalid exam URL '{}': {}", self.exam_url, e))?;

        if self.objectives_file.as_os_str().is_empty() {
            return Err(anyhow!("Objectives file path must not be empty"));
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("HTTP timeout must be greater than zero"));
        }

        if self.diagrams.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("Diagram output directory must not be empty"));
        }

        for page in &self.diagrams.pages {
            Url::parse(page).map_err(|e| anyhow!("Invalid diagram page URL '{}': {}", page, e))?;
        }

        for image in &self.diagrams.direct_images {
            Url::parse(&image.url)
                .map_err(|e| anyhow!("Invalid diagram image URL '{}': {}", image.url, e))?;
            if image.filename.trim().is_empty() {
                return Err(anyhow!("Diagram image '{}' has no file name", image.url));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            exam_url: default_exam_url(),
            objectives_file: default_objectives_file(),
            pr_draft_file: None,
            http: HttpConfig::default(),
            diagrams: DiagramConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

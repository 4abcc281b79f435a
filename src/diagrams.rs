/*!
 * Architecture diagram downloader.
 *
 * Two sources feed the images directory:
 * - pages whose `<img>` tags are filtered by keyword and downloaded
 * - a fixed list of image URLs saved under given names
 *
 * A failing page or image is logged and counted; the run carries on.
 */

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::app_config::{DiagramConfig, DirectImage};
use crate::errors::ParseError;
use crate::fetcher::{HttpFetcher, PageSource};
use crate::file_utils::FileManager;

/// Totals for one downloader run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiagramReport {
    pub pages_processed: usize,
    pub images_downloaded: usize,
    pub failures: usize,
    /// Files written, in download order
    pub files: Vec<PathBuf>,
}

/// Absolute URLs of the images on a page whose source mentions a keyword
pub fn extract_image_urls(html: &str, page_url: &str, keywords: &[String]) -> Result<Vec<String>, ParseError> {
    let selector = Selector::parse("img[src]").map_err(|e| ParseError::Selector(e.to_string()))?;
    let base = Url::parse(page_url).ok();
    let document = Html::parse_document(html);

    let mut urls = Vec::new();
    for img in document.select(&selector) {
        let src = img.value().attr("src").unwrap_or_default().trim();
        if src.is_empty() {
            continue;
        }

        let absolute = match (Url::parse(src), &base) {
            (Ok(url), _) => url.to_string(),
            (Err(_), Some(base)) => match base.join(src) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    debug!("Skipping image with unusable source {}: {}", src, e);
                    continue;
                }
            },
            (Err(_), None) => continue,
        };

        let lowered = absolute.to_lowercase();
        if keywords.iter().any(|k| lowered.contains(&k.to_lowercase())) {
            urls.push(absolute);
        }
    }

    Ok(urls)
}

/// File extension for a downloaded image; png when nothing else matches
pub fn image_extension(content_type: Option<&str>, url: &str) -> &'static str {
    let content_type = content_type.unwrap_or_default().to_lowercase();
    let url = url.to_lowercase();

    if content_type.contains("svg") || url.ends_with(".svg") {
        "svg"
    } else if content_type.contains("png") || url.ends_with(".png") {
        "png"
    } else if content_type.contains("jpg")
        || content_type.contains("jpeg")
        || url.ends_with(".jpg")
        || url.ends_with(".jpeg")
    {
        "jpg"
    } else {
        "png"
    }
}

/// Downloads diagrams into the configured directory, one request at a time
pub struct DiagramDownloader<'a> {
    fetcher: &'a HttpFetcher,
    config: &'a DiagramConfig,
}

impl<'a> DiagramDownloader<'a> {
    pub fn new(fetcher: &'a HttpFetcher, config: &'a DiagramConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn run(&self) -> Result<DiagramReport> {
        FileManager::ensure_dir(&self.config.output_dir)?;

        let total = (self.config.pages.len() + self.config.direct_images.len()) as u64;
        let progress = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);

        let mut report = DiagramReport::default();

        for page in &self.config.pages {
            progress.set_message(FileManager::clean_filename(page));
            info!("Processing: {}", page);
            match self.process_page(page, &mut report).await {
                Ok(count) => info!("Downloaded {} images from {}", count, page),
                Err(e) => {
                    error!("Error processing {}: {}", page, e);
                    report.failures += 1;
                }
            }
            report.pages_processed += 1;
            progress.inc(1);
        }

        for image in &self.config.direct_images {
            progress.set_message(image.filename.clone());
            self.download_direct(image, &mut report).await;
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!(
            "Total images downloaded: {} ({} failures)",
            report.images_downloaded, report.failures
        );

        Ok(report)
    }

    /// Download the matching images of one page; returns how many were saved
    async fn process_page(&self, page_url: &str, report: &mut DiagramReport) -> Result<usize> {
        let html = self.fetcher.fetch_page(page_url).await?;
        let sources = extract_image_urls(&html, page_url, &self.config.keywords)?;
        let stem = FileManager::clean_filename(page_url);

        let mut saved = 0;
        for src in sources {
            let name = if saved == 0 {
                stem.clone()
            } else {
                format!("{}_{}", stem, saved)
            };

            match self.save_image(&src, |content_type| {
                format!("{}.{}", name, image_extension(content_type, &src))
            })
            .await
            {
                Ok(path) => {
                    saved += 1;
                    report.images_downloaded += 1;
                    report.files.push(path);
                    self.pause().await;
                }
                Err(e) => {
                    error!("Error downloading {}: {}", src, e);
                    report.failures += 1;
                }
            }
        }

        Ok(saved)
    }

    async fn download_direct(&self, image: &DirectImage, report: &mut DiagramReport) {
        match self.save_image(&image.url, |_| image.filename.clone()).await {
            Ok(path) => {
                report.images_downloaded += 1;
                report.files.push(path);
                self.pause().await;
            }
            Err(e) => {
                error!("Error downloading {}: {}", image.filename, e);
                report.failures += 1;
            }
        }
    }

    async fn save_image<F>(&self, url: &str, file_name: F) -> Result<PathBuf>
    where
        F: FnOnce(Option<&str>) -> String,
    {
        let download = self.fetcher.fetch_bytes(url).await?;
        let path = self.config.output_dir.join(file_name(download.content_type.as_deref()));
        FileManager::write_atomic(&path, &download.body)?;
        info!("Downloaded: {:?}", path);
        Ok(path)
    }

    async fn pause(&self) {
        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }
    }
}

/*!
 * Diagram downloader tests against a local mock server
 */

use anyhow::Result;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use az305_sync::app_config::DirectImage;
use az305_sync::fetcher::HttpFetcher;
use az305_sync::Controller;
use crate::common;

async fn mount_image(server: &MockServer, image_path: &str, content_type: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", content_type)
                .set_body_bytes(body.to_vec()),
        )
        .mount(server)
        .await;
}

/// Test that matching images of a page are saved with numbered names
#[tokio::test]
async fn test_download_diagrams_withArchitecturePage_shouldSaveMatchingImages() -> Result<()> {
    common::init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/azure/architecture/hub-spoke-topology/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::read_resource("architecture_page.html")))
        .mount(&server)
        .await;
    mount_image(&server, "/azure/architecture/hub-spoke-topology/images/hub-spoke-architecture.svg", "image/svg+xml", b"<svg/>").await;
    mount_image(&server, "/azure/architecture/hub-spoke-topology/images/reference-flow.png", "image/png", b"png").await;
    Mock::given(method("GET"))
        .and(path("/azure/architecture/hub-spoke-topology/images/broken-diagram.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/site-logo.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config("https://example.test/az-305", temp_dir.path());
    config.diagrams.pages = vec![format!("{}/azure/architecture/hub-spoke-topology/", server.uri())];
    let images_dir = config.diagrams.output_dir.clone();

    let controller = Controller::with_config(config)?;
    let fetcher = HttpFetcher::new(&controller.config().http)?;
    let report = controller.download_diagrams(&fetcher).await?;

    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.images_downloaded, 2);
    assert_eq!(report.failures, 1);
    assert_eq!(
        report.files,
        vec![
            images_dir.join("hub_spoke_topology.svg"),
            images_dir.join("hub_spoke_topology_1.png"),
        ]
    );
    assert_eq!(fs::read(images_dir.join("hub_spoke_topology.svg"))?, b"<svg/>");
    Ok(())
}

/// Test that direct images keep their configured names and failures do not stop the run
#[tokio::test]
async fn test_download_diagrams_withDirectImages_shouldContinuePastFailures() -> Result<()> {
    common::init_test_logging();
    let server = MockServer::start().await;
    mount_image(&server, "/media/hub-spoke.png", "image/png", b"hub").await;
    Mock::given(method("GET"))
        .and(path("/media/missing.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_image(&server, "/media/dns.png", "image/png", b"dns").await;

    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config("https://example.test/az-305", temp_dir.path());
    config.diagrams.direct_images = vec![
        DirectImage::new(format!("{}/media/hub-spoke.png", server.uri()), "hub-spoke-architecture.png"),
        DirectImage::new(format!("{}/media/missing.png", server.uri()), "missing.png"),
        DirectImage::new(format!("{}/media/dns.png", server.uri()), "azure-dns-overview.png"),
    ];
    let images_dir = config.diagrams.output_dir.clone();

    let controller = Controller::with_config(config)?;
    let fetcher = HttpFetcher::new(&controller.config().http)?;
    let report = controller.download_diagrams(&fetcher).await?;

    assert_eq!(report.images_downloaded, 2);
    assert_eq!(report.failures, 1);
    assert_eq!(fs::read(images_dir.join("hub-spoke-architecture.png"))?, b"hub");
    assert_eq!(fs::read(images_dir.join("azure-dns-overview.png"))?, b"dns");
    assert!(!images_dir.join("missing.png").exists());
    Ok(())
}

/// Test that an unreachable page is counted and the run still succeeds
#[tokio::test]
async fn test_download_diagrams_withFailingPage_shouldCountFailure() -> Result<()> {
    common::init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config("https://example.test/az-305", temp_dir.path());
    config.diagrams.pages = vec![format!("{}/gone/", server.uri())];
    let images_dir = config.diagrams.output_dir.clone();

    let controller = Controller::with_config(config)?;
    let fetcher = HttpFetcher::new(&controller.config().http)?;
    let report = controller.download_diagrams(&fetcher).await?;

    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.images_downloaded, 0);
    assert_eq!(report.failures, 1);
    assert!(images_dir.is_dir());
    Ok(())
}

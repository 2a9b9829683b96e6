use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiki_scrape::config::{parse_resources, Resources, RetryPolicy, Settings};
use wiki_scrape::localization::{LocalizationIndex, TermExtractor};
use wiki_scrape::parsers::Sanitizer;
use wiki_scrape::runner::{RunSummary, Runner};
use wiki_scrape::scrapers::{HttpImageFetcher, ImageFetcher, WikiScraper};
use wiki_scrape::storage::{Storage, XmlStorage};
use wiki_scrape::utils::http::create_client;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

fn fish_page(base: &str) -> String {
    format!(
        r#"<html><body>
<table class="sortable">
<tr><th>Name</th><th>Image</th><th>Price</th><th>Location</th><th>Jan</th><th>Jul</th></tr>
<tr><td><a href="/wiki/Sea_Bass">Sea Bass</a></td><td><a><img src="data:image/gif;base64,R0lG" data-src="{base}/images/Sea_Bass.png/revision/latest?cb=1" data-image-key="Sea_Bass.png"></a></td><td>1,200 Bells</td><td>Sea</td><td>✓</td><td>-</td></tr>
<tr><th colspan="6">Rare fish</th></tr>
<tr><td>Koi</td><td><img src="{base}/images/Koi.png/revision/latest/scale-to-width-down/50?cb=2" data-image-key="Koi.png"></td><td>4,000</td><td>Pond</td><td>-</td><td>✓</td></tr>
</table>
</body></html>"#
    )
}

const TOOLS_PAGE: &str = r#"<html><body>
<table class="article-table">
<tr><th>Name</th><th>Customizable</th><th>Location</th></tr>
<tr><td>Flimsy net</td><td>✓</td><td>Pond</td></tr>
<tr><td>Net</td><td>-</td><td>Shop</td></tr>
</table>
</body></html>"#;

fn settings(server: &MockServer, output: &Path) -> Settings {
    Settings {
        base_url: format!("{}/wiki/", server.uri()),
        output_dir: output.to_path_buf(),
        timeout_seconds: 5,
        page_retry: RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
        },
        image_retry: RetryPolicy::once(),
        ..Settings::default()
    }
}

fn resources() -> Resources {
    parse_resources(
        r#"{
            "nh": {
                "fish_nh": {"endpoint": "Fish", "table_selector": "table.sortable", "uid_offset": 100},
                "tools": {"endpoint": "Tools", "table_selector": "table.article-table", "flags": "boolean", "availability": "always"}
            }
        }"#,
    )
    .unwrap()
}

async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/wiki/Fish"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fish_page(&server.uri())))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Tools"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOOLS_PAGE))
        .mount(server)
        .await;
}

async fn mount_images(server: &MockServer) {
    for image in ["/images/Sea_Bass.png", "/images/Koi.png"] {
        Mock::given(method("GET"))
            .and(path(image))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
            .mount(server)
            .await;
    }
}

async fn run(settings: Settings, resources: &Resources, index: &mut LocalizationIndex) -> RunSummary {
    let settings = Arc::new(settings);
    let storage = XmlStorage::new(&settings.output_dir);
    let client = create_client(&settings).unwrap();
    let images: Arc<dyn ImageFetcher> = Arc::new(
        HttpImageFetcher::new(client.clone(), &settings.base_url, settings.image_retry, Sanitizer::default()).unwrap(),
    );
    let scraper = WikiScraper::new(client, settings.clone(), images);
    let terms = TermExtractor::new(Sanitizer::default(), settings.translatable_fields.clone());

    Runner::new(&scraper, &storage, &terms)
        .run(resources, None, index)
        .await
        .unwrap()
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn scrapes_tables_images_and_strings() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    mount_images(&server).await;
    let out = tempfile::tempdir().unwrap();

    let mut index = LocalizationIndex::new();
    let summary = run(settings(&server, out.path()), &resources(), &mut index).await;

    assert!(summary.is_success(), "{:?}", summary.failed);
    assert_eq!(summary.succeeded.len(), 2);

    let fish = read(out.path().join("data/nh/fish_nh.xml"));
    let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<RecordList>
  <Record>
    <id>101</id>
    <name>sea_bass</name>
    <image>sea_bass.png</image>
    <price>1200</price>
    <location>sea</location>
    <availability>100000000000</availability>
  </Record>
  <Record>
    <id>102</id>
    <name>koi</name>
    <image>koi.png</image>
    <price>4000</price>
    <location>pond</location>
    <availability>000000100000</availability>
  </Record>
</RecordList>
"#;
    assert_eq!(fish, expected);

    let tools = read(out.path().join("data/nh/tools.xml"));
    assert!(tools.contains("<id>1</id>"));
    assert!(tools.contains("<name>flimsy_net</name>"));
    assert!(tools.contains("<customizable>true</customizable>"));
    assert!(tools.contains("<customizable>false</customizable>"));
    assert!(tools.contains("<availability>000000000000</availability>"));

    assert_eq!(fs::read(out.path().join("images/nh/sea_bass.png")).unwrap(), PNG_BYTES);
    assert_eq!(fs::read(out.path().join("images/nh/koi.png")).unwrap(), PNG_BYTES);

    let fish_strings = read(out.path().join("values/fish_strings.xml"));
    assert!(fish_strings.contains(r#"<string name="sea_bass">Sea Bass</string>"#));
    assert!(fish_strings.contains(r#"<string name="koi">Koi</string>"#));

    let generic = read(out.path().join("values/strings.xml"));
    assert!(generic.contains(r#"<string name="sea">Sea</string>"#));
    assert_eq!(generic.matches(r#"<string name="pond">"#).count(), 1);
    assert!(generic.contains(r#"<string name="shop">Shop</string>"#));
}

#[tokio::test]
async fn rerun_with_persisted_index_is_stable() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    mount_images(&server).await;
    let out = tempfile::tempdir().unwrap();
    let storage = XmlStorage::new(out.path());

    let mut first_index = LocalizationIndex::new();
    run(settings(&server, out.path()), &resources(), &mut first_index).await;
    let first_records = read(out.path().join("data/nh/fish_nh.xml"));
    let first_strings = read(out.path().join("values/fish_strings.xml"));

    let mut second_index = storage.load_index().await.unwrap();
    assert_eq!(second_index, first_index);
    run(settings(&server, out.path()), &resources(), &mut second_index).await;

    assert_eq!(second_index, first_index);
    assert_eq!(read(out.path().join("data/nh/fish_nh.xml")), first_records);
    assert_eq!(read(out.path().join("values/fish_strings.xml")), first_strings);
}

#[tokio::test]
async fn failing_resource_does_not_stop_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Fish"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Tools"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOOLS_PAGE))
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let mut index = LocalizationIndex::new();
    let summary = run(settings(&server, out.path()), &resources(), &mut index).await;

    assert!(!summary.is_success());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].resource, "fish_nh");
    assert_eq!(summary.succeeded.len(), 1);
    assert!(!out.path().join("data/nh/fish_nh.xml").exists());
    assert!(out.path().join("data/nh/tools.xml").exists());
    assert!(out.path().join("values/tools_strings.xml").exists());
}

#[tokio::test]
async fn rate_limited_image_aborts_only_its_resource() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    Mock::given(method("GET"))
        .and(path("/images/Sea_Bass.png"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let mut index = LocalizationIndex::new();
    let summary = run(settings(&server, out.path()), &resources(), &mut index).await;

    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].error.contains("429"));
    assert!(!out.path().join("data/nh/fish_nh.xml").exists());
    assert!(!out.path().join("images/nh/sea_bass.png").exists());
    assert!(!out.path().join("images/nh/sea_bass.png.part").exists());
    assert!(out.path().join("data/nh/tools.xml").exists());
}

#[tokio::test]
async fn missing_table_is_reported_per_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Fish"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>moved</p></body></html>"))
        .mount(&server)
        .await;
    let out = tempfile::tempdir().unwrap();

    let mut only_fish: Resources = BTreeMap::new();
    only_fish.insert("nh".into(), resources()["nh"].clone());
    only_fish.get_mut("nh").unwrap().remove("tools");

    let mut index = LocalizationIndex::new();
    let summary = run(settings(&server, out.path()), &only_fish, &mut index).await;

    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].error.contains("matched no tables"));
}

//! HTTP fetcher and harvest tests against a mock transcript archive.

use std::fs;
use std::path::Path;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hansard_harvester::fetch::{DocumentFetcher, HttpFetcher};
use hansard_harvester::store::JsonStore;
use hansard_harvester::{harvest, Chamber, HarvestReport, HarvestRequest, HarvesterError};

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn fetcher(base_url: String) -> HttpFetcher {
    HttpFetcher::with_base_url(base_url)
        .expect("client creation")
        .with_retry_delay(Duration::from_millis(1))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_latest_revision() {
    let mock_server = MockServer::start().await;

    for suffix in ["a", "b"] {
        Mock::given(method("GET"))
            .and(path(format!("/debates/debates2024-01-15{suffix}.xml")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("<publicwhip>{suffix}</publicwhip>")))
            .mount(&mock_server)
            .await;
    }

    let base_url = mock_server.uri();
    let latest = tokio::task::spawn_blocking(move || {
        fetcher(base_url).fetch_latest("2024-01-15", Chamber::Commons)
    })
    .await
    .expect("blocking task")
    .expect("fetch succeeds");

    let (suffix, xml) = latest.expect("a revision exists");
    assert_eq!(suffix, "b");
    assert_eq!(xml, "<publicwhip>b</publicwhip>");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_document_is_none() {
    let mock_server = MockServer::start().await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        fetcher(base_url).fetch("2024-01-15", "a", Chamber::Lords)
    })
    .await
    .expect("blocking task")
    .expect("404 is not an error");

    assert!(result.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_errors_are_retried() {
    let mock_server = MockServer::start().await;
    let url_path = "/westminhall/westminster2024-01-16a.xml";

    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string("<publicwhip/>"))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        fetcher(base_url).fetch("2024-01-16", "a", Chamber::WestminsterHall)
    })
    .await
    .expect("blocking task")
    .expect("third attempt succeeds");

    assert_eq!(result.as_deref(), Some("<publicwhip/>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let err = tokio::task::spawn_blocking(move || {
        fetcher(base_url).fetch("2024-01-16", "a", Chamber::Commons)
    })
    .await
    .expect("blocking task")
    .unwrap_err();

    assert!(matches!(err, HarvesterError::RetriesExhausted { attempts: 3, .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_harvest_into_json_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/debates/debates2024-01-15a.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("commons_speakers_statement.xml")),
        )
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let root = temp_dir.path().to_path_buf();
    let base_url = mock_server.uri();

    let report = tokio::task::spawn_blocking(move || {
        let mut store = JsonStore::new(root);
        harvest(
            &fetcher(base_url),
            &mut store,
            HarvestRequest::new("2024-01-15", Chamber::Commons),
        )
    })
    .await
    .expect("blocking task")
    .expect("harvest succeeds");

    let HarvestReport::Stored { suffix, items, .. } = report else {
        panic!("expected stored report, got {report:?}");
    };
    assert_eq!(suffix, "a");
    assert_eq!(items, 2);

    let stored = temp_dir
        .path()
        .join("debates")
        .join("uk.org.publicwhip_debate_2024-01-15a.1.0.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(stored).expect("item file")).expect("valid json");
    assert_eq!(json["title"], "Speaker's Statement");
    assert_eq!(json["speaker_ids"][0], "10295");
}

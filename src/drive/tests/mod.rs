use chrono::Utc;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{AccessToken, DriveSession};
use crate::config::Config;
use crate::drive::DriveClient;
use crate::error::{DownloadError, Error};
use crate::types::Event;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a client bound to a mock server, bypassing the token exchange
fn test_client(mock_uri: &str, chunk_size: u64, follow_pagination: bool) -> DriveClient {
    let session = DriveSession::new(
        reqwest::Client::new(),
        AccessToken {
            token: "test-token".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        },
        Url::parse(mock_uri).unwrap(),
        "robot@test-project.iam.gserviceaccount.com".to_string(),
    );
    let config = Config {
        chunk_size,
        follow_pagination,
        api_base: mock_uri.to_string(),
        ..Default::default()
    };
    DriveClient::new(session, &config)
}

fn list_body(next_page_token: Option<&str>, files: &[(&str, &str)]) -> serde_json::Value {
    let files: Vec<serde_json::Value> = files
        .iter()
        .map(|(id, name)| serde_json::json!({"id": id, "name": name}))
        .collect();
    match next_page_token {
        Some(token) => serde_json::json!({"nextPageToken": token, "files": files}),
        None => serde_json::json!({"files": files}),
    }
}

// ---------------------------------------------------------------------------
// File location
// ---------------------------------------------------------------------------

#[tokio::test]
async fn find_file_returns_single_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", "name = 'invoices_2023.zip'"))
        .and(query_param("spaces", "drive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            None,
            &[("abc123", "invoices_2023.zip")],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let file = client.find_file("name = 'invoices_2023.zip'").await.unwrap();

    assert_eq!(file.id, "abc123");
    assert_eq!(file.name, "invoices_2023.zip");
}

#[tokio::test]
async fn find_file_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(list_body(None, &[("f1", "a.zip")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    client.find_file("name contains 'a'").await.unwrap();
}

#[tokio::test]
async fn find_file_keeps_last_of_multiple_matches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            None,
            &[
                ("first-id", "invoices_a.zip"),
                ("middle-id", "invoices_b.zip"),
                ("last-id", "invoices_c.zip"),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let file = client.find_file("name contains 'invoices'").await.unwrap();

    assert_eq!(file.id, "last-id");
}

#[tokio::test]
async fn find_file_with_no_matches_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(None, &[])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let err = client.find_file("name = 'missing.zip'").await.unwrap_err();

    match err {
        Error::NotFound { query } => assert_eq!(query, "name = 'missing.zip'"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn find_file_follows_pagination_across_pages() {
    let mock_server = MockServer::start().await;

    // Specific mock first: wiremock evaluates mocks in mount order.
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            None,
            &[("page2-id", "invoices_new.zip")],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            Some("page-2"),
            &[("page1-id", "invoices_old.zip")],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let file = client.find_file("name contains 'invoices'").await.unwrap();

    assert_eq!(file.id, "page2-id");
}

#[tokio::test]
async fn find_file_single_page_mode_ignores_next_page_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            None,
            &[("page2-id", "invoices_new.zip")],
        )))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            Some("page-2"),
            &[("page1-id", "invoices_old.zip")],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, false);
    let file = client.find_file("name contains 'invoices'").await.unwrap();

    assert_eq!(file.id, "page1-id");
}

#[tokio::test]
async fn find_file_propagates_api_rejection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let err = client.find_file("name contains 'x'").await.unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("insufficient permissions"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn find_file_emits_located_event() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(None, &[("abc123", "invoices_2023.zip")])),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let mut events = client.subscribe();

    client.find_file("name contains 'invoices'").await.unwrap();

    match events.try_recv().unwrap() {
        Event::FileLocated { id, name } => {
            assert_eq!(id, "abc123");
            assert_eq!(name, "invoices_2023.zip");
        }
        other => panic!("expected FileLocated, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Media download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_media_handles_full_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"zip bytes"[..]))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let bytes = client.download_media("abc123").await.unwrap();

    assert_eq!(bytes, b"zip bytes");
}

#[tokio::test]
async fn download_media_assembles_ranged_chunks() {
    let mock_server = MockServer::start().await;
    let payload = b"hello world";

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=0-4"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 0-4/11")
                .set_body_bytes(&payload[0..5]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=5-9"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 5-9/11")
                .set_body_bytes(&payload[5..10]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=10-14"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 10-10/11")
                .set_body_bytes(&payload[10..11]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 5, true);
    let bytes = client.download_media("abc123").await.unwrap();

    assert_eq!(bytes, payload);
}

#[tokio::test]
async fn download_media_reports_progress_per_chunk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=0-3"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 0-3/8")
                .set_body_bytes(&b"aaaa"[..]),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=4-7"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 4-7/8")
                .set_body_bytes(&b"bbbb"[..]),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 4, true);
    let mut events = client.subscribe();

    client.download_media("abc123").await.unwrap();

    let mut percents = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Event::Downloading { percent, .. } = event {
            percents.push(percent);
        }
    }
    assert_eq!(percents, vec![50.0, 100.0]);
}

#[tokio::test]
async fn download_media_rejects_206_without_content_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(&b"aaaa"[..]))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 4, true);
    let err = client.download_media("abc123").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Download(DownloadError::MissingContentRange { status: 206 })
    ));
}

#[tokio::test]
async fn download_media_propagates_http_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("file not found"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), 1024, true);
    let err = client.download_media("gone").await.unwrap_err();

    match err {
        Error::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn download_to_file_writes_expected_byte_length() {
    let mock_server = MockServer::start().await;
    let payload = vec![0x42u8; 1000];

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let client = test_client(&mock_server.uri(), 1024, true);

    let written = client
        .download_to_file("abc123", dir.path(), "out.zip")
        .await
        .unwrap();

    assert_eq!(written, dir.path().join("out.zip"));
    assert_eq!(std::fs::metadata(&written).unwrap().len(), 1000);
}

#[tokio::test]
async fn failed_chunk_leaves_no_file_on_disk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=0-3"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 0-3/8")
                .set_body_bytes(&b"aaaa"[..]),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/abc123"))
        .and(header("Range", "bytes=4-7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let client = test_client(&mock_server.uri(), 4, true);

    let result = client.download_to_file("abc123", dir.path(), "out.zip").await;

    assert!(result.is_err());
    assert!(!dir.path().join("out.zip").exists());
}

use axum::{
    body::Body,
    http::{header::ALLOW, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    cli_args::CliArgs,
    error::ErrorVerbosity,
    server::{Server, ServerConfig},
};

const INDEX_HTML: &str = "<!doctype html><title>Archive of Constraint</title>";

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

#[tokio::test]
async fn config_file_keys_are_optional() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, "port: 8080\nerror_verbosity: message\n")
        .await
        .unwrap();

    let config = ServerConfig::from_config_file(&path).await.unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.error_verbosity, ErrorVerbosity::Message);
    assert_eq!(config.upstream_url, ServerConfig::default().upstream_url);
    assert!(!config.trace_response_body);
}

#[tokio::test]
async fn config_file_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, "prot: 8080\n").await.unwrap();

    assert!(ServerConfig::from_config_file(&path).await.is_err());
}

#[tokio::test]
async fn cli_args_override_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, "port: 8080\nupstream_url: http://file.example/a.json\n")
        .await
        .unwrap();

    let args = CliArgs {
        config_file: Some(path),
        port: Some(9090),
        ..Default::default()
    };

    let config = ServerConfig::from_cli_args(args).await.unwrap();

    assert_eq!(config.port, 9090);
    assert_eq!(config.upstream_url, "http://file.example/a.json");
}

#[tokio::test]
async fn defaults_listen_on_port_3000() {
    let config = ServerConfig::from_cli_args(CliArgs::default()).await.unwrap();

    assert_eq!(config.socket_address().to_string(), "0.0.0.0:3000");
}

struct TestApp {
    router: Router,
    _public_dir: TempDir,
}

impl TestApp {
    fn new(upstream_url: String) -> Self {
        let public_dir = TempDir::new().unwrap();
        std::fs::write(public_dir.path().join("index.html"), INDEX_HTML).unwrap();

        let config = ServerConfig {
            upstream_url,
            public_dir: public_dir.path().to_path_buf(),
            ..Default::default()
        };

        TestApp {
            router: Server::new(config).router(),
            _public_dir: public_dir,
        }
    }

    async fn request(&self, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        (status, headers, body.to_vec())
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self.request(Method::GET, uri).await;

        (status, serde_json::from_slice(&body).unwrap())
    }
}

async fn archive_server() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/archive.json");
            then.status(200).json_body(json!([
                {
                    "accession_number": "A1",
                    "title_from_seller": "Old Map of Boston",
                    "format": "Map",
                    "date_of_sale": "2024-05-01",
                    "cost_less_shipping": 45,
                    "notes": null,
                    "seller_id": 9
                },
                { "accession_number": "A2", "title_from_seller": "Letters", "notes": "mentions a map" },
                { "accession_number": "A3", "format": "Photograph" }
            ]));
        })
        .await;

    server
}

#[tokio::test]
async fn data_returns_projected_archive() {
    let upstream = archive_server().await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(3));
    assert_eq!(
        body["data"][0],
        json!({
            "accession_number": "A1",
            "title_from_seller": "Old Map of Boston",
            "format": "Map",
            "date_of_sale": "2024-05-01",
            "cost_less_shipping": 45,
            "notes": null
        })
    );
    assert_eq!(body["data"][2]["title_from_seller"], Value::Null);
}

#[tokio::test]
async fn data_fails_when_upstream_is_not_found() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/archive.json");
            then.status(404);
        })
        .await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/data").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "error": "HTTP error! status: 404" })
    );
}

#[tokio::test]
async fn data_fails_when_upstream_body_is_not_json() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/archive.json");
            then.status(200).body("<html>rate limited</html>");
        })
        .await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/data").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().starts_with("Failed to parse the archive"));
}

#[tokio::test]
async fn search_in_one_field() {
    let upstream = archive_server().await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app
        .get_json("/api/search?q=MAP&field=title_from_seller")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["data"][0]["accession_number"], json!("A1"));
}

#[tokio::test]
async fn search_in_all_fields() {
    let upstream = archive_server().await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/search?q=map").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["data"][0]["accession_number"], json!("A1"));
    assert_eq!(body["data"][1]["accession_number"], json!("A2"));
}

#[tokio::test]
async fn search_without_query_returns_everything() {
    let upstream = archive_server().await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/search").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(3));
}

#[tokio::test]
async fn search_in_unknown_field_is_empty() {
    let upstream = archive_server().await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/search?q=a&field=price").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "count": 0, "data": [] }));
}

#[tokio::test]
async fn search_with_repeated_query_fails() {
    let upstream = archive_server().await;
    let app = TestApp::new(upstream.url("/archive.json"));

    let (status, body) = app.get_json("/api/search?q=a&q=b").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn health_ignores_upstream() {
    let app = TestApp::new("http://127.0.0.1:1/archive.json".to_string());

    let (status, body) = app.get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("OK"));
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(timestamp.ends_with('Z'));
}

#[tokio::test]
async fn root_serves_landing_page() {
    let app = TestApp::new("http://127.0.0.1:1/archive.json".to_string());

    let (status, _, body) = app.request(Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new("http://127.0.0.1:1/archive.json".to_string());

    let (status, body) = app.get_json("/api/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "error": "The requested resource was not found" })
    );
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let app = TestApp::new("http://127.0.0.1:1/archive.json".to_string());

    let (status, headers, body) = app.request(Method::POST, "/api/data").await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(headers.contains_key(ALLOW));
    assert_eq!(body["error"], json!("Method not allowed"));
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = TestApp::new("http://127.0.0.1:1/archive.json".to_string());

    let (status, body) = app.get_json("/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    for path in ["/api/data", "/api/search", "/health"] {
        assert!(body["paths"].get(path).is_some(), "missing {path}");
    }
}

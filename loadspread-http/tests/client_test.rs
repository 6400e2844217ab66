use loadspread_http::{HttpClient, HttpConfig, HttpError, HttpManager, HttpMethod};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_text_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string("S1"))
        .mount(&mock_server)
        .await;

    let manager = HttpManager::new().unwrap();
    let body = manager
        .get_text(&format!("{}/home", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "S1");
}

#[tokio::test]
async fn test_get_text_rejects_non_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let manager = HttpManager::new().unwrap();
    let result = manager.get_text(&format!("{}/home", mock_server.uri())).await;

    assert!(matches!(result, Err(HttpError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_get_text_classifies_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        timeout: Duration::from_millis(200),
        connect_timeout: Duration::from_millis(200),
        ..HttpConfig::default()
    };
    let manager = HttpManager::with_config(config).unwrap();
    let result = manager.get_text(&format!("{}/home", mock_server.uri())).await;

    assert!(matches!(result, Err(HttpError::Timeout { .. })));
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_sending() {
    let manager = HttpManager::new().unwrap();
    let result = manager.get_text("not a url").await;
    assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_send_json_keeps_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .and(body_json(json!({"n": 1, "hostnames": ["S3"]})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"status": "failure"})))
        .mount(&mock_server)
        .await;

    let manager = HttpManager::new().unwrap();
    let payload = json!({"n": 1, "hostnames": ["S3"]});
    let response = manager
        .send_json(
            HttpMethod::Post,
            &format!("{}/add", mock_server.uri()),
            Some(&payload),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 400);
    assert!(!response.is_success());
    assert_eq!(response.json::<serde_json::Value>().unwrap()["status"], "failure");
}

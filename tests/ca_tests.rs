use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{certificate_json, setup_test_client};
use openvox_client::{CertificateState, OpenVoxError};

#[tokio::test]
async fn test_status_sends_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ca/status"))
        .and(body_json(json!({ "States": ["requested", "revoked"], "Filter": "web" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": {
                "CertificateStatuses": [
                    certificate_json("web01.example.com", "requested"),
                    certificate_json("web02.example.com", "revoked")
                ]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let certificates = client
        .ca()
        .status()
        .state(CertificateState::Requested)
        .state(CertificateState::Revoked)
        .filter("web")
        .send()
        .await
        .unwrap();

    assert_eq!(certificates.len(), 2);
    assert_eq!(certificates[0].name, "web01.example.com");
    assert_eq!(certificates[0].state, CertificateState::Requested);
    assert_eq!(certificates[1].state, CertificateState::Revoked);
}

#[tokio::test]
async fn test_status_without_options_sends_empty_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ca/status"))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Data": { "CertificateStatuses": [] } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let certificates = client.ca().status().send().await.unwrap();

    assert!(certificates.is_empty());
}

#[tokio::test]
async fn test_status_states_from_iterator() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ca/status"))
        .and(body_json(json!({ "States": ["signed"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": { "CertificateStatuses": [certificate_json("db01", "signed")] }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let certificates =
        client.ca().status().states([CertificateState::Signed]).send().await.unwrap();

    assert_eq!(certificates[0].dns_alt_names, vec!["DNS:db01".to_string()]);
}

#[tokio::test]
async fn test_sign_and_revoke() {
    let mock_server = MockServer::start().await;

    for action in ["sign", "revoke"] {
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/ca/status/web01.example.com/{action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Data": null })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = setup_test_client(&mock_server.uri());
    client.ca().sign("web01.example.com").await.unwrap();
    client.ca().revoke("web01.example.com").await.unwrap();
}

#[tokio::test]
async fn test_clean() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/ca/status/web01.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Data": null })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    client.ca().clean("web01.example.com").await.unwrap();
}

#[tokio::test]
async fn test_sign_failure_carries_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ca/status/web01.example.com/sign"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "Error": "unexpected status code: 409" })),
        )
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    match client.ca().sign("web01.example.com").await {
        Err(OpenVoxError::ApiError { message, .. }) => {
            assert_eq!(message, "unexpected status code: 409")
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_name_is_rejected_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Data": null })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    let err = client.ca().clean("  ").await.unwrap_err();

    assert!(matches!(err, OpenVoxError::InvalidEndpoint(_)), "got {err:?}");
}

#[tokio::test]
async fn test_dot_names_are_rejected_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Data": null })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = setup_test_client(&mock_server.uri());
    for name in [".", ".."] {
        let err = client.ca().sign(name).await.unwrap_err();
        assert!(matches!(err, OpenVoxError::InvalidEndpoint(_)), "got {err:?}");
    }
}

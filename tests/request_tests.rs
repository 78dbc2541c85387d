//! Verb method tests against a mock API

mod support;

use github_base::{Body, Error, Method, RequestOptions, StatusCode};
use serde_json::json;
use std::sync::{Arc, Mutex};
use support::{authed_client_for, client_for, recording_client};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn test_get_interpolates_and_authenticates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/doowb/gists"))
        .and(header("authorization", "token abc"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "g1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let github = authed_client_for(&server, "abc");
    let response = github
        .get("/users/:owner/gists", &RequestOptions::new().set("owner", "doowb"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Body::Json(json!([{"id": "g1"}])));

    let received = server.received_requests().await.unwrap();
    let query = received[0].url.query().unwrap_or_default();
    assert!(query.starts_with("_="), "cache buster missing: {}", query);
}

#[tokio::test]
async fn test_post_sends_remainder_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "x"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "x", "id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let github = authed_client_for(&server, "abc");
    let response = github
        .post("/user/repos", &RequestOptions::new().set("name", "x"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].url.query().is_none());
}

#[tokio::test]
async fn test_put_without_body_has_zero_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/user/starred/doowb/base"))
        .and(header("content-length", "0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let github = authed_client_for(&server, "abc");
    let response = github
        .put(
            "/user/starred/:owner/:repo",
            &RequestOptions::new().set("owner", "doowb").set("repo", "base"),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_patch_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/gists/abc"))
        .and(body_json(json!({"description": "new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/gists/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let github = client_for(&server);
    let options = RequestOptions::new().set("id", "abc");
    github
        .patch("/gists/:id", &options.clone().set("description", "new"))
        .await
        .unwrap();
    github.delete("/gists/:id", &options).await.unwrap();
    github.del("/gists/:id", &options).await.unwrap();
}

#[tokio::test]
async fn test_raw_markdown_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown/raw"))
        .and(header("content-type", "text/plain"))
        .and(body_string("foo **bar**"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>foo <strong>bar</strong></p>")
                .insert_header("content-type", "text/html;charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let github = client_for(&server);
    let response = github
        .post(
            "/markdown/raw",
            &RequestOptions::new()
                .with_json(false)
                .set("text", "foo **bar**")
                .with_header("Content-Type", "text/plain"),
        )
        .await
        .unwrap();
    assert_eq!(response.body.text(), "<p>foo <strong>bar</strong></p>");
}

#[tokio::test]
async fn test_markdown_json_endpoint_keeps_text_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdown"))
        .and(body_json(json!({"text": "# hi", "mode": "gfm"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>hi</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .post(
            "/markdown",
            &RequestOptions::new().set("text", "# hi").set("mode", "gfm"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/doowb/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get(
            "/repos/:owner/:repo",
            &RequestOptions::new().set("owner", "doowb").set("repo", "missing"),
        )
        .await
        .unwrap_err();

    match &err {
        Error::HttpStatus {
            status, message, ..
        } => {
            assert_eq!(*status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
    assert_eq!(err.body(), Some(&Body::Json(json!({"message": "Not Found"}))));
}

#[tokio::test]
async fn test_invalid_json_on_success_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get("/broken", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[tokio::test]
async fn test_json_option_forces_decoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"ok":true}"#)
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let github = client_for(&server);
    let raw = github.get("/plain", &RequestOptions::new()).await.unwrap();
    assert!(raw.body.as_json().is_none());

    let parsed = github
        .get("/plain", &RequestOptions::new().with_json(true))
        .await
        .unwrap();
    assert_eq!(parsed.body, Body::Json(json!({"ok": true})));
}

#[tokio::test]
async fn test_query_option_overrides_template_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("sort", "created"))
        .and(query_param("type", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .get(
            "/user/repos?type=all&sort=updated",
            &RequestOptions::new().with_query("sort", "created"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_network_error() {
    let github = github_base::GitHub::new(RequestOptions::new().with_apiurl("http://127.0.0.1:1")).unwrap();
    let err = github.get("/user", &RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_unresolved_placeholder_sends_nothing() {
    let (github, transport) = recording_client(RequestOptions::new());
    let err = github
        .get("/repos/:owner/:repo", &RequestOptions::new().set("owner", "doowb"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedPlaceholder { ref name, .. } if name == "repo"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_custom_transport_sees_resolved_request() {
    let (github, transport) = recording_client(RequestOptions::new().with_bearer("jwt"));
    transport.push_json(200, json!({"ok": true}));

    let response = github
        .request(
            Method::POST,
            "/repos/:owner/:repo/issues",
            &RequestOptions::new()
                .set("owner", "doowb")
                .set("repo", "base")
                .set("title", "bug"),
        )
        .await
        .unwrap();
    assert_eq!(response.body, Body::Json(json!({"ok": true})));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "https://api.github.com/repos/doowb/base/issues");
    assert_eq!(sent[0].headers["authorization"], "Bearer jwt");
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(sent[0].body.as_ref().unwrap()).unwrap(),
        json!({"title": "bug"})
    );
}

#[tokio::test]
async fn test_spawn_request_calls_back_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "doowb"})))
        .mount(&server)
        .await;

    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let handle = client_for(&server).spawn_request(
        Method::GET,
        "/user",
        RequestOptions::new(),
        move |result| {
            recorded
                .lock()
                .unwrap()
                .push(result.map(|response| response.status));
        },
    );
    handle.await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].as_ref().unwrap(), &StatusCode::OK);
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/doowb/base/topics"))
        .and(header("accept", "application/vnd.github.mercy-preview+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"names": []})))
        .expect(1)
        .mount(&server)
        .await;

    let github = client_for(&server);
    github
        .get(
            "/repos/:owner/:repo/topics",
            &RequestOptions::new()
                .set("owner", "doowb")
                .set("repo", "base")
                .with_header("Accept", "application/vnd.github.mercy-preview+json"),
        )
        .await
        .unwrap();

    let received: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(received[0].headers.get_all("accept").iter().count(), 1);
}

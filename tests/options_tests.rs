//! Option layering and configuration tests

mod support;

use github_base::{ClientBuilder, GitHub, Method, RequestOptions, merge};
use serde_json::json;
use serial_test::serial;
use std::fs;
use support::recording_client;
use tempfile::TempDir;

#[test]
fn test_call_beats_instance_beats_defaults() {
    let defaults = RequestOptions::defaults();
    let instance = RequestOptions::new()
        .with_apiurl("http://instance.example")
        .set("owner", "instance");
    let call = RequestOptions::new().set("owner", "call");

    let merged = merge(&defaults, &instance, &call);
    assert_eq!(merged.api_base(), "http://instance.example");
    assert_eq!(merged.get_str("owner"), Some("call"));
}

#[test]
fn test_resolve_is_deterministic_apart_from_cache_buster() {
    let github = GitHub::new(RequestOptions::new().with_token("abc")).unwrap();
    let options = RequestOptions::new().set("owner", "doowb");

    let first = github
        .resolve(Method::GET, "/users/:owner/gists", &options)
        .unwrap();
    let second = github
        .resolve(Method::GET, "/users/:owner/gists", &options)
        .unwrap();

    let (first_base, first_bust) = first.url.split_once("?_=").unwrap();
    let (second_base, second_bust) = second.url.split_once("?_=").unwrap();
    assert_eq!(first_base, second_base);
    assert_eq!(first.headers, second.headers);
    assert!(second_bust.parse::<i64>().unwrap() > first_bust.parse::<i64>().unwrap());
}

#[test]
fn test_call_headers_add_to_instance_headers() {
    let github = GitHub::new(
        RequestOptions::new()
            .with_header("X-Instance", "1")
            .with_header("X-Shared", "instance"),
    )
    .unwrap();
    let request = github
        .resolve(
            Method::GET,
            "/user",
            &RequestOptions::new().with_header("x-shared", "call"),
        )
        .unwrap();
    assert_eq!(request.headers["x-instance"], "1");
    assert_eq!(request.headers["x-shared"], "call");
}

#[test]
fn test_call_options_are_validated() {
    let github = GitHub::new(RequestOptions::new()).unwrap();
    let err = github
        .resolve(Method::GET, "/user", &RequestOptions::new().set("username", "u"))
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_huge_timeout_is_a_configuration_error() {
    let github = GitHub::new(RequestOptions::new()).unwrap();
    let err = github
        .resolve(Method::GET, "/user", &RequestOptions::new().set("timeout", 1e20))
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("timeout is too large"));
}

#[tokio::test]
async fn test_instance_options_are_not_mutated_by_calls() {
    let (github, transport) = recording_client(RequestOptions::new().set("owner", "a"));
    let before = github.options().clone();

    github
        .post(
            "/repos/:owner/:repo/forks",
            &RequestOptions::new().set("owner", "b").set("repo", "r"),
        )
        .await
        .unwrap();

    assert_eq!(github.options(), &before);
    assert!(transport.sent()[0].url.ends_with("/repos/b/r/forks"));
}

#[test]
fn test_client_from_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("github-base.yaml");
    fs::write(
        &path,
        "apiurl: https://github.example.com/api/v3\nusername: u\npassword: p\nheaders:\n  X-GitHub-Api-Version: '2022-11-28'\n",
    )
    .unwrap();

    let github = ClientBuilder::from_options(RequestOptions::load(&path).unwrap())
        .build()
        .unwrap();
    let request = github.resolve(Method::DELETE, "/user/keys/:id", &RequestOptions::new().set("id", 7)).unwrap();

    assert_eq!(request.url, "https://github.example.com/api/v3/user/keys/7");
    assert_eq!(request.headers["authorization"], "Basic dTpw");
    assert_eq!(request.headers["x-github-api-version"], "2022-11-28");
    assert!(request.body.is_none());
}

#[test]
fn test_invalid_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("github-base.yaml");
    fs::write(&path, "apiurl: [unclosed\n").unwrap();

    let err = RequestOptions::load(&path).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("failed to load config file"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("github-base.yaml");
    fs::write(&path, "token: from-file\nowner: doowb\n").unwrap();

    unsafe {
        std::env::set_var("GITHUB_TOKEN", "from-env");
    }
    let options = RequestOptions::load(&path)
        .unwrap()
        .merged_with(&RequestOptions::from_env());
    unsafe {
        std::env::remove_var("GITHUB_TOKEN");
    }

    assert_eq!(options.token(), Some("from-env"));
    assert_eq!(options.get("owner"), Some(&json!("doowb")));
}

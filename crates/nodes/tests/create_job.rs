//! Integration tests for the `CreateVideoJob` node.

mod common;

use common::MockApi;
use serde_json::json;
use sora_nodes::create::CreateVideoJob;

fn node(base_url: &str) -> CreateVideoJob {
    CreateVideoJob {
        base_url: base_url.to_string(),
        api_key: "sk-test".into(),
        prompt: "a paper boat in the rain".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn creates_job_and_extracts_id() {
    let api = MockApi::default();
    let base_url = api.start().await;

    let out = CreateVideoJob {
        image_base64: "data:image/png;base64,iVBORw0KGgo=".into(),
        extra_fields_json: r#"{"seconds": 15}"#.into(),
        ..node(&base_url)
    }
    .run()
    .await;

    assert!(out.response.ok, "unexpected envelope: {:?}", out.response);
    assert_eq!(out.value, "video_123");
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn job_id_falls_back_through_field_names() {
    let api = MockApi::default();
    let base_url = api.start().await;
    api.set_create_body(json!({"id": "", "task_id": "task-77"}));

    let out = node(&base_url).run().await;

    assert_eq!(out.value, "task-77");
}

#[tokio::test]
async fn missing_id_yields_empty_value() {
    let api = MockApi::default();
    let base_url = api.start().await;
    api.set_create_body(json!({"message": "accepted"}));

    let out = node(&base_url).run().await;

    assert!(out.response.ok);
    assert_eq!(out.value, "");
}

#[tokio::test]
async fn malformed_extra_fields_never_reach_network() {
    let api = MockApi::default();
    let base_url = api.start().await;

    for bad in ["{", "not json", "{\"a\": }"] {
        let out = CreateVideoJob {
            extra_fields_json: bad.into(),
            ..node(&base_url)
        }
        .run()
        .await;

        assert!(!out.response.ok);
        assert!(out.response.status_code.is_none());
        assert!(out
            .response
            .error
            .as_deref()
            .unwrap()
            .starts_with("extra_fields_json parse error"));
        assert_eq!(out.value, "");
    }
    assert_eq!(api.hits(), 0);
}

#[tokio::test]
async fn malformed_base64_never_reaches_network() {
    let api = MockApi::default();
    let base_url = api.start().await;

    let out = CreateVideoJob {
        image_base64: "data:image/png;base64,@@not-base64@@".into(),
        ..node(&base_url)
    }
    .run()
    .await;

    assert!(!out.response.ok);
    assert!(out
        .response
        .error
        .unwrap()
        .starts_with("image_base64 decode error"));
    assert_eq!(out.value, "");
    assert_eq!(api.hits(), 0);
}

#[tokio::test]
async fn missing_upload_file_never_reaches_network() {
    let api = MockApi::default();
    let base_url = api.start().await;

    let out = CreateVideoJob {
        file_path: "/definitely/not/here.png".into(),
        ..node(&base_url)
    }
    .run()
    .await;

    assert!(!out.response.ok);
    assert_eq!(
        out.response.error.as_deref(),
        Some("file not found: /definitely/not/here.png")
    );
    assert_eq!(api.hits(), 0);
}

#[tokio::test]
async fn timeout_is_reported_in_envelope() {
    let api = MockApi::default();
    let base_url = api.start().await;

    // The request timeout is whole seconds; the slow route sleeps for five.
    let out = CreateVideoJob {
        endpoint: "/slow".into(),
        timeout: 1,
        ..node(&base_url)
    }
    .run()
    .await;

    assert!(!out.response.ok);
    assert!(out.response.status_code.is_none());
    assert!(!out.response.error.unwrap().is_empty());
    assert_eq!(out.value, "");
}

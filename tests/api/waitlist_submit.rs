use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use waitlist::{config::Environment, web::types::SubmitResponse};
use wiremock::{
    matchers::{any, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::TestApp;

async fn mount_email_api(app: &TestApp, status: u16, expected_calls: u64) {
    Mock::given(path("/emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(&app.email_server)
        .await;
}

#[tokio::test]
async fn submit_valid_entry_returns_201_and_count_becomes_1() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_api(&app, 200, 1).await;

    let res = app
        .post_waitlist(&json!({
            "name": "Alex",
            "email": "alex@example.com"
        }))
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::CREATED,
        "Wrong response StatusCode: {}",
        res.status()
    );

    let body: SubmitResponse = res.json().await?;
    assert!(body.success);
    assert!(body.email_sent);
    assert_eq!(body.data.email, "alex@example.com");
    assert_eq!(body.data.name, "Alex");

    assert_eq!(app.get_count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn submit_response_uses_camel_case_keys() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_api(&app, 200, 1).await;

    let res = app
        .post_waitlist(&json!({
            "name": "Ursula",
            "email": "le_guin@example.com",
        }))
        .await?;
    let body: Value = res.json().await?;

    assert_eq!(body["success"], true);
    assert_eq!(body["emailSent"], true);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());

    Ok(())
}

#[tokio::test]
async fn submit_each_valid_entry_increments_count_by_one() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_api(&app, 200, 3).await;

    for (i, email) in ["a@example.com", "b@example.com", "c@example.com"]
        .into_iter()
        .enumerate()
    {
        let before = app.get_count().await?;
        let res = app
            .post_waitlist(&json!({ "name": format!("Person {i}"), "email": email }))
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(app.get_count().await?, before + 1);
    }

    Ok(())
}

#[tokio::test]
async fn submit_returns_400_when_fields_are_missing_or_invalid() -> Result<()> {
    let app = TestApp::spawn().await?;

    // No email should ever be sent for an invalid submission
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let cases = [
        (json!({ "name": "Alex" }), "Missing email"),
        (
            json!({ "name": "Alex", "email": "not-an-email" }),
            "Invalid email",
        ),
        (json!({ "name": "Alex", "email": "" }), "Empty email"),
        (json!({ "name": "", "email": "jd@example.com" }), "Empty name"),
        (
            json!({ "name": null, "email": "jd@example.com" }),
            "Null name",
        ),
        (json!({}), "Empty json"),
    ];

    for (body, description) in cases {
        let res = app.post_waitlist(&body).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST when the payload was: {description}."
        );

        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Invalid input", "{description}");
        assert!(body["details"].is_array(), "{description}");
    }

    assert_eq!(app.get_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn submit_reports_every_invalid_field() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({ "name": " ", "email": "not-an-email" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    let fields = body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    assert_eq!(fields, vec!["name", "email"]);

    Ok(())
}

#[tokio::test]
async fn submit_returns_400_for_unreadable_bodies() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/waitlist"))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["details"][0]["field"], "body");

    let res = app
        .post_waitlist(&json!({ "name": 42, "email": "alex@example.com" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .http_client
        .post(app.url("/waitlist"))
        .body(r#"{"name": "Alex", "email": "alex@example.com"}"#)
        .send()
        .await?;
    assert_eq!(
        res.status(),
        StatusCode::BAD_REQUEST,
        "A body without a JSON content type must be rejected"
    );

    assert_eq!(app.get_count().await?, 0);

    Ok(())
}

#[tokio::test]
async fn submit_duplicate_email_returns_409_and_count_is_unchanged() -> Result<()> {
    let app = TestApp::spawn().await?;
    // Only the first submission gets a confirmation email
    mount_email_api(&app, 200, 1).await;

    let body = json!({ "name": "Alex", "email": "alex@example.com" });

    let first = app.post_waitlist(&body).await?;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(app.get_count().await?, 1);

    let second = app
        .post_waitlist(&json!({ "name": "Alex Again", "email": "alex@example.com" }))
        .await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let second_body: Value = second.json().await?;
    assert_eq!(second_body["error"], "Email already registered");

    assert_eq!(app.get_count().await?, 1);
    assert_eq!(app.store.len(), 1);

    Ok(())
}

#[tokio::test]
async fn submit_succeeds_when_the_email_api_fails() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_api(&app, 500, 1).await;

    let res = app
        .post_waitlist(&json!({ "name": "Alex", "email": "alex@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: SubmitResponse = res.json().await?;
    assert!(!body.email_sent);
    assert_eq!(body.data.email, "alex@example.com");

    assert_eq!(app.get_count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn submit_succeeds_when_the_email_api_times_out() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(10)))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .post_waitlist(&json!({ "name": "Alex", "email": "alex@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: SubmitResponse = res.json().await?;
    assert!(!body.email_sent);
    assert_eq!(app.get_count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn submit_storage_failure_returns_500_with_details_locally() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.store.set_unavailable(true);

    let res = app
        .post_waitlist(&json!({ "name": "Alex", "email": "alex@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Failed to join waitlist");
    assert!(body["details"]
        .as_str()
        .is_some_and(|details| details.contains("timed out")));

    Ok(())
}

#[tokio::test]
async fn submit_storage_failure_hides_details_in_production() -> Result<()> {
    let app = TestApp::spawn_in(Environment::Production).await?;
    app.store.set_unavailable(true);

    let res = app
        .post_waitlist(&json!({ "name": "Alex", "email": "alex@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Failed to join waitlist");
    assert_eq!(body["details"], "Please try again later");

    Ok(())
}

#[tokio::test]
async fn submit_is_also_served_under_api_prefix() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_api(&app, 200, 1).await;

    let res = app
        .http_client
        .post(app.url("/api/waitlist"))
        .json(&json!({ "name": "Alex", "email": "alex@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .http_client
        .get(app.url("/api/waitlist/count"))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["count"], 1);

    Ok(())
}

#[tokio::test]
async fn submit_error_body_request_id_matches_header() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({ "name": "Alex", "email": "not-an-email" }))
        .await?;

    let header_id = res
        .headers()
        .get("x-request-id")
        .and_then(|id| id.to_str().ok())
        .map(str::to_string);
    let body: Value = res.json().await?;

    assert!(header_id.is_some());
    assert_eq!(body["requestId"].as_str(), header_id.as_deref());

    Ok(())
}

#[tokio::test]
async fn submit_wrong_method_returns_405() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in ["/waitlist", "/api/waitlist"] {
        let res = app.http_client.get(app.url(path)).send().await?;

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{path}");
        let allow = res
            .headers()
            .get("allow")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(allow.contains("POST"), "{path} allow: {allow}");

        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Method GET Not Allowed", "{path}");
        assert!(body["requestId"].is_string(), "{path}");
    }

    Ok(())
}

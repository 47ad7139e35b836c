use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;
use waitlist::config::Environment;

use crate::helpers::TestApp;

#[tokio::test]
async fn count_is_zero_without_submissions() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .get(app.url("/waitlist/count"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, serde_json::json!({ "count": 0 }));

    Ok(())
}

#[tokio::test]
async fn count_storage_failure_returns_500() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.store.set_unavailable(true);

    let res = app
        .http_client
        .get(app.url("/waitlist/count"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Failed to get count");
    assert!(body["details"].is_string());

    Ok(())
}

#[tokio::test]
async fn count_storage_failure_hides_details_in_production() -> Result<()> {
    let app = TestApp::spawn_in(Environment::Production).await?;
    app.store.set_unavailable(true);

    let res = app
        .http_client
        .get(app.url("/waitlist/count"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["details"], "Please try again later");

    Ok(())
}

#[tokio::test]
async fn count_wrong_method_returns_405() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .delete(app.url("/waitlist/count"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(res.headers().contains_key("allow"));
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Method DELETE Not Allowed");

    Ok(())
}

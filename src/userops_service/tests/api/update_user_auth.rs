use reqwest::StatusCode;
use serde_json::{Value, json};
use userops_adapters::http::routes::update_user_auth::USER_UPDATED_MESSAGE;
use userops_core::IdentityProvider;

use crate::helpers::{TestApp, id_token};

#[tokio::test]
async fn update_requires_authenticated_caller() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "u1", "newEmail": "new@example.com" } }),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "error": {
                "status": "UNAUTHENTICATED",
                "message": "The function must be called while authenticated."
            }
        })
    );

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "u1" } }),
            Some("garbage"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user = app.identity_provider.get_user("u1").await.unwrap();
    assert_eq!(user.email.as_deref(), Some("u1@example.com"));
    assert!(app.identity_provider.password_matches("u1", "password123").await);
}

#[tokio::test]
async fn anonymous_update_is_unauthenticated_whatever_the_fields() {
    let app = TestApp::new().await;

    for data in [
        json!({ "uid": 7 }),
        json!({ "uid": "u1", "newEmail": ["a@b.com"] }),
        json!({ "uid": "u1", "newPassword": 123456 }),
        json!("not an object"),
    ] {
        let response = app
            .call("updateUserAuth", json!({ "data": data }), None)
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["status"], json!("UNAUTHENTICATED"));
    }
}

#[tokio::test]
async fn authenticated_update_with_non_string_field_surfaces_provider_rejection() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;
    let token = id_token("caller", json!({}));

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "u1", "newEmail": 5 } }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], json!("UNKNOWN"));
    assert_eq!(body["error"]["details"]["code"], json!("auth/invalid-email"));

    let user = app.identity_provider.get_user("u1").await.unwrap();
    assert_eq!(user.email.as_deref(), Some("u1@example.com"));
}

#[tokio::test]
async fn update_changes_email_and_returns_the_record() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;
    let token = id_token("caller", json!({}));

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "u1", "newEmail": "new@example.com" } }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["message"], json!(USER_UPDATED_MESSAGE));
    assert_eq!(body["result"]["user"]["uid"], json!("u1"));
    assert_eq!(body["result"]["user"]["email"], json!("new@example.com"));
    assert_eq!(body["result"]["user"]["emailVerified"], json!(false));
    assert!(body["result"]["user"].get("passwordHash").is_none());

    assert!(app.identity_provider.password_matches("u1", "password123").await);
}

#[tokio::test]
async fn update_changes_password_only() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;
    let token = id_token("caller", json!({}));

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "u1", "newPassword": "rotated-secret" } }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["user"]["email"], json!("u1@example.com"));
    assert!(app.identity_provider.password_matches("u1", "rotated-secret").await);
}

#[tokio::test]
async fn update_without_uid_surfaces_provider_error() {
    let app = TestApp::new().await;
    let token = id_token("caller", json!({}));

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "newEmail": "x@example.com" } }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], json!("UNKNOWN"));
    assert_eq!(body["error"]["details"]["code"], json!("auth/invalid-uid"));
}

#[tokio::test]
async fn update_to_taken_email_carries_provider_details() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;
    app.seed_user("u2", "u2@example.com").await;
    let token = id_token("caller", json!({}));

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "u1", "newEmail": "u2@example.com" } }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"]["details"],
        json!({
            "code": "auth/email-already-exists",
            "message": "The email address is already in use by another account."
        })
    );

    let response = app
        .call(
            "updateUserAuth",
            json!({ "data": { "uid": "missing" } }),
            Some(&token),
        )
        .await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["details"]["code"], json!("auth/user-not-found"));
}

#[tokio::test]
async fn update_with_malformed_envelope_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .call("updateUserAuth", json!({ "uid": "u1" }), None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": { "status": "INVALID_ARGUMENT", "message": "Bad Request" } })
    );
}

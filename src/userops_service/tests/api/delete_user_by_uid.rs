use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use userops_adapters::{
    http::{AccessPolicies, CallableState},
    persistence::InMemoryIdentityProvider,
};
use userops_core::{DocumentData, DocumentStore, DocumentStoreError, IdentityProvider, NewUser};

use crate::helpers::{TestApp, id_token, spawn_service, token_verifier};

#[tokio::test]
async fn delete_removes_identity_and_profile() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;

    let response = app
        .call("deleteUserByUid", json!({ "data": { "uid": "u1" } }), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "result": { "success": true } }));

    assert!(!app.identity_provider.contains("u1").await);
    assert!(!app.has_profile("u1").await);
}

#[tokio::test]
async fn delete_without_uid_is_rejected_before_any_side_effect() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;

    for data in [json!({}), json!({ "uid": "" }), json!({ "uid": null })] {
        let response = app
            .call("deleteUserByUid", json!({ "data": data }), None)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "error": { "status": "INVALID_ARGUMENT", "message": "No uid provided." } })
        );
    }

    assert!(app.identity_provider.contains("u1").await);
    assert!(app.has_profile("u1").await);
}

#[tokio::test]
async fn delete_with_malformed_envelope_is_bad_request() {
    let app = TestApp::new().await;

    for body in [json!({ "uid": "u1" }), json!({})] {
        let response = app.call("deleteUserByUid", body, None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["message"], json!("Bad Request"));
    }
}

#[tokio::test]
async fn delete_with_falsy_uid_reports_missing_uid() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;

    for uid in [json!(0), json!(false)] {
        let response = app
            .call("deleteUserByUid", json!({ "data": { "uid": uid } }), None)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "error": { "status": "INVALID_ARGUMENT", "message": "No uid provided." } })
        );
    }

    assert!(app.identity_provider.contains("u1").await);
}

#[tokio::test]
async fn delete_with_non_string_uid_surfaces_provider_rejection() {
    let app = TestApp::new().await;
    app.seed_user("42", "answer@example.com").await;

    let response = app
        .call("deleteUserByUid", json!({ "data": { "uid": 42 } }), None)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], json!("UNKNOWN"));
    assert_eq!(
        body["error"]["message"],
        json!("The uid must be a non-empty string with at most 128 characters.")
    );

    assert!(app.identity_provider.contains("42").await);
    assert!(app.has_profile("42").await);
}

#[tokio::test]
async fn delete_unknown_user_fails_and_keeps_profile() {
    let app = TestApp::new().await;
    app.document_store
        .set_document("users", "u1", json!({ "name": "orphan" }).as_object().cloned().unwrap())
        .await
        .unwrap();

    let response = app
        .call("deleteUserByUid", json!({ "data": { "uid": "u1" } }), None)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], json!("UNKNOWN"));
    assert_eq!(
        body["error"]["message"],
        json!("There is no user record corresponding to the provided identifier.")
    );
    assert!(body["error"].get("details").is_none());

    // The profile document is only removed after the identity is gone.
    assert!(app.has_profile("u1").await);
}

#[tokio::test]
async fn delete_ignores_caller_identity_under_standard_policy() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;
    let token = id_token("someone-else", json!({}));

    let response = app
        .call(
            "deleteUserByUid",
            json!({ "data": { "uid": "u1" } }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.identity_provider.contains("u1").await);
}

#[tokio::test]
async fn delete_with_invalid_token_is_unauthenticated() {
    let app = TestApp::new().await;
    app.seed_user("u1", "u1@example.com").await;

    let response = app
        .call(
            "deleteUserByUid",
            json!({ "data": { "uid": "u1" } }),
            Some("not-a-jwt"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], json!("UNAUTHENTICATED"));
    assert!(app.identity_provider.contains("u1").await);
}

#[tokio::test]
async fn admin_only_delete_requires_admin_claim() {
    let app = TestApp::with_policies(AccessPolicies::admin_only()).await;
    app.seed_user("u1", "u1@example.com").await;
    let request = json!({ "data": { "uid": "u1" } });

    let response = app.call("deleteUserByUid", request.clone(), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let member = id_token("member", json!({}));
    let response = app
        .call("deleteUserByUid", request.clone(), Some(&member))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], json!("PERMISSION_DENIED"));
    assert!(app.identity_provider.contains("u1").await);

    let admin = id_token("root", json!({ "admin": true }));
    let response = app.call("deleteUserByUid", request, Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.identity_provider.contains("u1").await);
}

#[derive(Clone)]
struct UnavailableDocumentStore;

#[async_trait]
impl DocumentStore for UnavailableDocumentStore {
    async fn get_document(
        &self,
        _collection: &str,
        _id: &str,
    ) -> Result<Option<DocumentData>, DocumentStoreError> {
        Err(DocumentStoreError::Unexpected("store unavailable".into()))
    }

    async fn set_document(
        &self,
        _collection: &str,
        _id: &str,
        _data: DocumentData,
    ) -> Result<(), DocumentStoreError> {
        Err(DocumentStoreError::Unexpected("store unavailable".into()))
    }

    async fn delete_document(&self, _collection: &str, _id: &str) -> Result<(), DocumentStoreError> {
        Err(DocumentStoreError::Unexpected("store unavailable".into()))
    }
}

#[tokio::test]
async fn profile_failure_after_identity_delete_reports_error() {
    let identity_provider = InMemoryIdentityProvider::new();
    identity_provider
        .create_user(NewUser {
            uid: Some("u1".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let address = spawn_service(CallableState::new(
        identity_provider.clone(),
        UnavailableDocumentStore,
        token_verifier(),
        AccessPolicies::standard(),
        "users",
    ))
    .await;

    let response = reqwest::Client::new()
        .post(format!("{address}/deleteUserByUid"))
        .json(&json!({ "data": { "uid": "u1" } }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["message"], json!("store unavailable"));

    // No compensation: the identity stays deleted.
    assert!(!identity_provider.contains("u1").await);
}

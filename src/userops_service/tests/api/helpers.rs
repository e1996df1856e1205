use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use userops_adapters::{
    auth_validation::{HmacTokenVerifier, TokenVerifierConfig},
    config::{
        firebase::DEFAULT_USERS_COLLECTION,
        test::{APP_ADDRESS, JWT_SECRET},
    },
    http::{AccessPolicies, CallableState},
    persistence::{InMemoryDocumentStore, InMemoryIdentityProvider},
};
use userops_core::{DocumentStore, IdentityProvider, NewUser, TokenVerifier};
use userops_service::UserOpsService;

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub identity_provider: InMemoryIdentityProvider,
    pub document_store: InMemoryDocumentStore,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policies(AccessPolicies::standard()).await
    }

    pub async fn with_policies(policies: AccessPolicies) -> Self {
        let identity_provider = InMemoryIdentityProvider::new();
        let document_store = InMemoryDocumentStore::new();

        let address = spawn_service(CallableState::new(
            identity_provider.clone(),
            document_store.clone(),
            token_verifier(),
            policies,
            DEFAULT_USERS_COLLECTION,
        ))
        .await;

        Self {
            address,
            http_client: reqwest::Client::new(),
            identity_provider,
            document_store,
        }
    }

    pub async fn call(&self, operation: &str, body: Value, token: Option<&str>) -> reqwest::Response {
        let mut request = self
            .http_client
            .post(format!("{}/{operation}", self.address))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn seed_user(&self, uid: &str, email: &str) {
        self.identity_provider
            .create_user(NewUser {
                uid: Some(uid.to_string()),
                email: Some(email.to_string()),
                password: Some(Secret::new("password123".to_string())),
                ..Default::default()
            })
            .await
            .expect("Failed to seed user");

        let profile = json!({ "email": email, "displayName": uid })
            .as_object()
            .cloned()
            .unwrap();
        self.document_store
            .set_document(DEFAULT_USERS_COLLECTION, uid, profile)
            .await
            .expect("Failed to seed profile");
    }

    pub async fn has_profile(&self, uid: &str) -> bool {
        self.document_store
            .get_document(DEFAULT_USERS_COLLECTION, uid)
            .await
            .unwrap()
            .is_some()
    }
}

/// Serves the callables on an ephemeral port and returns the base URL.
pub async fn spawn_service<I, D>(state: CallableState<I, D>) -> String
where
    I: IdentityProvider + Clone + 'static,
    D: DocumentStore + Clone + 'static,
{
    let listener = TcpListener::bind(APP_ADDRESS)
        .await
        .expect("Failed to bind test listener");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(UserOpsService::new(state).run_standalone(listener, None));

    address
}

pub fn token_verifier() -> Arc<dyn TokenVerifier> {
    Arc::new(HmacTokenVerifier::new(&TokenVerifierConfig {
        secret: Secret::new(JWT_SECRET.to_string()),
        issuer: None,
        audience: None,
    }))
}

/// Signs an identity token for `uid` carrying `claims` on top of `sub`/`exp`.
pub fn id_token(uid: &str, claims: Value) -> String {
    let mut all_claims = json!({ "sub": uid, "exp": Utc::now().timestamp() + 600 });
    if let (Some(target), Value::Object(extra)) = (all_claims.as_object_mut(), claims) {
        target.extend(extra);
    }

    encode(
        &Header::default(),
        &all_claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

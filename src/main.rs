use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use reqwest::Client as HttpClient;
use userops::{
    AccessPolicies, CallableState, FirebaseTokenVerifier, FirestoreDocumentStore,
    HmacTokenVerifier, IdentityToolkitClient, InMemoryDocumentStore, InMemoryIdentityProvider,
    Settings, TokenVerifier, TokenVerifierConfig, UserOpsService,
    adapters::config::{Backend, TokenVerifierKind},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    telemetry::init_tracing()?;

    // Load configuration
    let settings = Settings::load()?;

    // Shared by both callables for the lifetime of the process
    let http_client = HttpClient::builder()
        .timeout(settings.firebase.timeout())
        .build()?;

    let token_verifier: Arc<dyn TokenVerifier> = match settings.auth.verifier {
        TokenVerifierKind::FirebaseIdToken => Arc::new(
            FirebaseTokenVerifier::new(
                &settings.firebase.project_id,
                &settings.auth.jwks_url,
                http_client.clone(),
            )
            .map_err(|e| eyre!(e))?,
        ),
        TokenVerifierKind::Hmac => Arc::new(HmacTokenVerifier::new(
            &TokenVerifierConfig::try_from(&settings.auth).map_err(|e| eyre!(e))?,
        )),
    };
    let policies = AccessPolicies::from_settings(&settings.auth);
    let users_collection = settings.firebase.users_collection.clone();
    let allowed_origins = Some(settings.cors.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(settings.application.address()?).await?;

    match settings.firebase.backend {
        Backend::Firebase => {
            let firebase = &settings.firebase;

            let identity_provider = IdentityToolkitClient::new(
                &firebase.identity_base_url,
                firebase.project_id.clone(),
                firebase.access_token.clone(),
                http_client.clone(),
            )
            .map_err(|e| eyre!(e))?;

            let document_store = FirestoreDocumentStore::new(
                &firebase.firestore_base_url,
                firebase.project_id.clone(),
                firebase.database_id.clone(),
                firebase.access_token.clone(),
                http_client,
            )
            .map_err(|e| eyre!(e))?;

            tracing::info!(project_id = %firebase.project_id, "Starting user ops service");

            let state = CallableState::new(
                identity_provider,
                document_store,
                token_verifier,
                policies,
                users_collection,
            );
            UserOpsService::new(state)
                .run_standalone(listener, allowed_origins)
                .await?;
        }
        Backend::InMemory => {
            tracing::warn!("Starting user ops service with in-memory backends");

            let state = CallableState::new(
                InMemoryIdentityProvider::new(),
                InMemoryDocumentStore::new(),
                token_verifier,
                policies,
                users_collection,
            );
            UserOpsService::new(state)
                .run_standalone(listener, allowed_origins)
                .await?;
        }
    }

    Ok(())
}

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, jwk::JwkSet};
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use userops_core::{AuthContext, TokenVerificationError, TokenVerifier};

use super::claims::auth_context_from_claims;
use crate::config::firebase::ID_TOKEN_ISSUER_PREFIX;

/// Verifies Firebase ID tokens against Google's published signing keys.
///
/// Tokens must be RS256, name a key id, carry the project as audience and
/// `https://securetoken.google.com/{project}` as issuer. Keys are fetched on
/// first use and again whenever a token names a key id that is not cached.
#[derive(Clone)]
pub struct FirebaseTokenVerifier {
    http_client: Client,
    jwks_url: Url,
    validation: Validation,
    keys: Arc<RwLock<HashMap<String, DecodingKey>>>,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: &str, jwks_url: &str, http_client: Client) -> Result<Self, String> {
        let jwks_url = Url::parse(jwks_url).map_err(|e| e.to_string())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{ID_TOKEN_ISSUER_PREFIX}{project_id}")]);

        Ok(Self {
            http_client,
            jwks_url,
            validation,
            keys: Arc::default(),
        })
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, TokenVerificationError> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        self.refresh_keys().await?;

        self.keys
            .read()
            .await
            .get(kid)
            .cloned()
            .ok_or_else(|| TokenVerificationError::InvalidToken(format!("Unknown signing key {kid}")))
    }

    #[tracing::instrument(name = "Refresh Firebase signing keys", skip_all)]
    async fn refresh_keys(&self) -> Result<(), TokenVerificationError> {
        let unavailable = |e: reqwest::Error| TokenVerificationError::KeysUnavailable(e.to_string());

        let jwks: JwkSet = self
            .http_client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        let keys = jwks
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(%kid, error = %e, "Skipping unusable signing key");
                        None
                    }
                }
            })
            .collect::<HashMap<_, _>>();

        tracing::debug!(count = keys.len(), "Loaded signing keys");
        *self.keys.write().await = keys;

        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthContext, TokenVerificationError> {
        let header =
            decode_header(token).map_err(|e| TokenVerificationError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(TokenVerificationError::InvalidToken(format!(
                "Unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| TokenVerificationError::InvalidToken("Token has no key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let token_data = decode::<Map<String, Value>>(token, &key, &self.validation)
            .map_err(|e| TokenVerificationError::InvalidToken(e.to_string()))?;

        auth_context_from_claims(token_data.claims)
    }
}

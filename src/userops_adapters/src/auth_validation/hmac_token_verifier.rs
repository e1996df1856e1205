use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};
use userops_core::{AuthContext, TokenVerificationError, TokenVerifier};

use super::claims::auth_context_from_claims;
use crate::config::AuthSettings;

#[derive(Clone)]
pub struct TokenVerifierConfig {
    pub secret: Secret<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl TryFrom<&AuthSettings> for TokenVerifierConfig {
    type Error = String;

    fn try_from(settings: &AuthSettings) -> Result<Self, Self::Error> {
        let secret = settings
            .jwt_secret
            .clone()
            .ok_or_else(|| "auth.jwt_secret is required by the hmac verifier".to_string())?;

        Ok(Self {
            secret,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
        })
    }
}

/// Verifies HS256 identity tokens signed with a shared secret.
#[derive(Clone)]
pub struct HmacTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl HmacTokenVerifier {
    pub fn new(config: &TokenVerifierConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for HmacTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthContext, TokenVerificationError> {
        let token_data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenVerificationError::InvalidToken(e.to_string()))?;
        auth_context_from_claims(token_data.claims)
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// Returns `Ok(None)` when no header was sent.
pub fn bearer_token(header: Option<&str>) -> Result<Option<&str>, TokenVerificationError> {
    let Some(header) = header else {
        return Ok(None);
    };

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(Some(token.trim()))
        }
        _ => Err(TokenVerificationError::MalformedHeader),
    }
}

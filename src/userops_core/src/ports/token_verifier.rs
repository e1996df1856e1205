use async_trait::async_trait;
use thiserror::Error;

use crate::domain::auth_context::AuthContext;

#[derive(Debug, Error)]
pub enum TokenVerificationError {
    #[error("Malformed authorization header")]
    MalformedHeader,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token has no subject")]
    MissingSubject,
    #[error("Signing keys unavailable: {0}")]
    KeysUnavailable(String),
}

/// Verifies identity tokens presented by callers.
///
/// Different deployments verify tokens differently:
/// - shared-secret HMAC tokens minted by a fronting gateway
/// - provider-issued RS256 tokens checked against published keys
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and build the caller context from its claims.
    async fn verify(&self, token: &str) -> Result<AuthContext, TokenVerificationError>;
}

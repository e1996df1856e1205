use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use userops_core::{
    AuthContext, AuthorizationPolicy, Capability, RequireAuthenticated, RequireCapability,
    TokenVerificationError, TokenVerifier, Unrestricted,
};

use super::callable::CallableError;
use crate::{auth_validation::bearer_token, config::AuthSettings};

/// Authorization policy applied to each callable operation.
#[derive(Clone)]
pub struct AccessPolicies {
    pub delete_user: Arc<dyn AuthorizationPolicy>,
    pub update_user_auth: Arc<dyn AuthorizationPolicy>,
}

impl AccessPolicies {
    /// Deleting is open and updating needs a signed-in caller.
    pub fn standard() -> Self {
        Self {
            delete_user: Arc::new(Unrestricted),
            update_user_auth: Arc::new(RequireAuthenticated),
        }
    }

    /// Both operations need a caller holding the admin capability.
    pub fn admin_only() -> Self {
        Self {
            delete_user: Arc::new(RequireCapability(Capability::Admin)),
            update_user_auth: Arc::new(RequireCapability(Capability::Admin)),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        if settings.require_admin {
            Self::admin_only()
        } else {
            Self::standard()
        }
    }
}

/// Shared, read-only state of the callable routes.
///
/// Built once at startup; every request works on cheap clones of it.
#[derive(Clone)]
pub struct CallableState<I, D> {
    pub identity_provider: I,
    pub document_store: D,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub policies: AccessPolicies,
    pub users_collection: Arc<str>,
}

impl<I, D> CallableState<I, D> {
    pub fn new(
        identity_provider: I,
        document_store: D,
        token_verifier: Arc<dyn TokenVerifier>,
        policies: AccessPolicies,
        users_collection: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            identity_provider,
            document_store,
            token_verifier,
            policies,
            users_collection: users_collection.into(),
        }
    }

    /// Resolves the caller from the `Authorization` header.
    ///
    /// No header means an anonymous call (`None`); a header that does not
    /// carry a valid token fails the request.
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<AuthContext>, CallableError> {
        let header = headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| CallableError::from(TokenVerificationError::MalformedHeader))?;

        match bearer_token(header)? {
            Some(token) => Ok(Some(self.token_verifier.verify(token).await?)),
            None => Ok(None),
        }
    }
}

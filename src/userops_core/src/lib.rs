pub mod authorization;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    auth_context::{AuthContext, Capability},
    uid::{Uid, UidError},
    user_record::{ProviderInfo, UserMetadata, UserRecord},
    user_update::{NewUser, UserUpdate},
};

pub use ports::{
    document_store::{DocumentData, DocumentStore, DocumentStoreError},
    identity_provider::{IdentityProvider, IdentityProviderError},
    token_verifier::{TokenVerificationError, TokenVerifier},
};

pub use authorization::{
    AuthorizationError, AuthorizationPolicy, RequireAuthenticated, RequireCapability, Unrestricted,
};

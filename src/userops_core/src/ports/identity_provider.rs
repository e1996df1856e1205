use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    user_record::UserRecord,
    user_update::{NewUser, UserUpdate},
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityProviderError {
    #[error("There is no user record corresponding to the provided identifier.")]
    UserNotFound,
    #[error("The user with the provided uid already exists.")]
    UidAlreadyExists,
    #[error("The email address is already in use by another account.")]
    EmailAlreadyExists,
    #[error("The uid must be a non-empty string with at most 128 characters.")]
    InvalidUid,
    #[error("The email address is improperly formatted.")]
    InvalidEmail,
    #[error("The password must be a string with at least 6 characters.")]
    InvalidPassword,
    #[error("{0}")]
    Unexpected(String),
}

impl IdentityProviderError {
    /// Stable machine-readable code, e.g. `auth/user-not-found`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound => "auth/user-not-found",
            Self::UidAlreadyExists => "auth/uid-already-exists",
            Self::EmailAlreadyExists => "auth/email-already-exists",
            Self::InvalidUid => "auth/invalid-uid",
            Self::InvalidEmail => "auth/invalid-email",
            Self::InvalidPassword => "auth/invalid-password",
            Self::Unexpected(_) => "auth/internal-error",
        }
    }
}

/// Port to the service that owns user identity records.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, IdentityProviderError>;
    async fn get_user(&self, uid: &str) -> Result<UserRecord, IdentityProviderError>;
    /// Applies `update` and returns the record as it is after the change.
    async fn update_user(
        &self,
        uid: &str,
        update: UserUpdate,
    ) -> Result<UserRecord, IdentityProviderError>;
    async fn delete_user(&self, uid: &str) -> Result<(), IdentityProviderError>;
}

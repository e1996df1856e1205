use userops_core::{
    AuthContext, AuthorizationError, AuthorizationPolicy, DocumentStore, DocumentStoreError,
    IdentityProvider, IdentityProviderError, Uid, UidError,
};

/// Error types for delete user use case
#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error(transparent)]
    InvalidUid(#[from] UidError),
    #[error(transparent)]
    IdentityProvider(#[from] IdentityProviderError),
    /// The identity record is already gone when this is returned.
    #[error(transparent)]
    DocumentStore(#[from] DocumentStoreError),
}

/// Delete user use case - removes the identity record and the profile document
pub struct DeleteUserUseCase<I, D, P>
where
    I: IdentityProvider,
    D: DocumentStore,
    P: AuthorizationPolicy,
{
    identity_provider: I,
    document_store: D,
    policy: P,
    users_collection: String,
}

impl<I, D, P> DeleteUserUseCase<I, D, P>
where
    I: IdentityProvider,
    D: DocumentStore,
    P: AuthorizationPolicy,
{
    pub fn new(
        identity_provider: I,
        document_store: D,
        policy: P,
        users_collection: impl Into<String>,
    ) -> Self {
        Self {
            identity_provider,
            document_store,
            policy,
            users_collection: users_collection.into(),
        }
    }

    /// Execute the delete user use case
    ///
    /// The identity record is deleted first, then `{users_collection}/{uid}`.
    /// If the document deletion fails the identity stays deleted.
    ///
    /// # Arguments
    /// * `context` - The caller, if the call carried a valid identity token
    /// * `uid` - Identifier of the user to delete, as received. It is only
    ///   converted once the policy has accepted the caller.
    #[tracing::instrument(
        name = "DeleteUserUseCase::execute",
        skip_all,
        fields(uid = tracing::field::Empty)
    )]
    pub async fn execute<U>(
        &self,
        context: Option<&AuthContext>,
        uid: U,
    ) -> Result<(), DeleteUserError>
    where
        U: TryInto<Uid>,
        DeleteUserError: From<U::Error>,
    {
        self.policy.authorize(context)?;
        let uid: Uid = uid.try_into()?;
        tracing::Span::current().record("uid", uid.as_str());

        if let Err(e) = self.identity_provider.delete_user(uid.as_str()).await {
            tracing::error!(%uid, error = %e, "Delete user error");
            return Err(e.into());
        }

        if let Err(e) = self
            .document_store
            .delete_document(&self.users_collection, uid.as_str())
            .await
        {
            tracing::error!(
                %uid,
                collection = %self.users_collection,
                error = %e,
                "Delete user error: identity deleted but profile document remains"
            );
            return Err(e.into());
        }

        Ok(())
    }
}

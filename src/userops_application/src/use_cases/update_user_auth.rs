use std::convert::Infallible;

use secrecy::Secret;
use userops_core::{
    AuthContext, AuthorizationError, AuthorizationPolicy, IdentityProvider, IdentityProviderError,
    UserRecord, UserUpdate,
};

/// Error types for update user auth use case
#[derive(Debug, thiserror::Error)]
pub enum UpdateUserAuthError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error(transparent)]
    IdentityProvider(#[from] IdentityProviderError),
}

impl From<Infallible> for UpdateUserAuthError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Input of the update user auth use case.
#[derive(Debug, Default)]
pub struct UpdateUserAuthCommand {
    pub uid: Option<String>,
    pub new_email: Option<String>,
    pub new_password: Option<Secret<String>>,
}

/// Update user auth use case - changes the email and/or password of an identity record
pub struct UpdateUserAuthUseCase<I, P>
where
    I: IdentityProvider,
    P: AuthorizationPolicy,
{
    identity_provider: I,
    policy: P,
}

impl<I, P> UpdateUserAuthUseCase<I, P>
where
    I: IdentityProvider,
    P: AuthorizationPolicy,
{
    pub fn new(identity_provider: I, policy: P) -> Self {
        Self {
            identity_provider,
            policy,
        }
    }

    /// Execute the update user auth use case
    ///
    /// The caller is checked before the input is looked at. The uid is
    /// forwarded without local validation; a missing one is sent as an empty
    /// identifier and the provider's rejection is returned.
    ///
    /// # Returns
    /// The identity record after the update, or UpdateUserAuthError
    #[tracing::instrument(
        name = "UpdateUserAuthUseCase::execute",
        skip_all,
        fields(uid = tracing::field::Empty)
    )]
    pub async fn execute<C>(
        &self,
        context: Option<&AuthContext>,
        command: C,
    ) -> Result<UserRecord, UpdateUserAuthError>
    where
        C: TryInto<UpdateUserAuthCommand>,
        UpdateUserAuthError: From<C::Error>,
    {
        self.policy.authorize(context)?;
        let command: UpdateUserAuthCommand = command.try_into()?;
        tracing::Span::current().record("uid", command.uid.as_deref().unwrap_or_default());

        let uid = command.uid.unwrap_or_default();
        let update = UserUpdate::new(command.new_email, command.new_password);

        let record = self.identity_provider.update_user(&uid, update).await?;

        Ok(record)
    }
}

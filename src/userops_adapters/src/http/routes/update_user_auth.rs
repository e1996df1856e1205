use axum::{body::Bytes, extract::State, http::HeaderMap};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use userops_application::{UpdateUserAuthCommand, UpdateUserAuthUseCase};
use userops_core::{IdentityProvider, IdentityProviderError, UserRecord};

use crate::http::{
    callable::{CallableError, CallableResponse, parse_request},
    state::CallableState,
};

pub const USER_UPDATED_MESSAGE: &str = "User updated successfully";

/// Input of `updateUserAuth`, kept as sent until the caller is authorized.
///
/// Fields that are present but not strings are rejected the way the provider
/// rejects them: `uid`, `newEmail` and `newPassword` each map to their own
/// invalid-argument error.
#[derive(Deserialize)]
#[serde(transparent)]
pub struct UpdateUserAuthRequest(Value);

impl TryFrom<UpdateUserAuthRequest> for UpdateUserAuthCommand {
    type Error = IdentityProviderError;

    fn try_from(request: UpdateUserAuthRequest) -> Result<Self, Self::Error> {
        let data = request.0;
        Ok(UpdateUserAuthCommand {
            uid: string_field(&data, "uid", IdentityProviderError::InvalidUid)?,
            new_email: string_field(&data, "newEmail", IdentityProviderError::InvalidEmail)?,
            new_password: string_field(&data, "newPassword", IdentityProviderError::InvalidPassword)?
                .map(Secret::new),
        })
    }
}

fn string_field(
    data: &Value,
    field: &str,
    invalid: IdentityProviderError,
) -> Result<Option<String>, IdentityProviderError> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(invalid),
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateUserAuthResponse {
    pub message: &'static str,
    pub user: UserRecord,
}

#[tracing::instrument(name = "Update User Auth", skip_all)]
pub async fn update_user_auth<I, D>(
    State(state): State<CallableState<I, D>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<CallableResponse<UpdateUserAuthResponse>, CallableError>
where
    I: IdentityProvider + Clone + 'static,
    D: Clone + Send + Sync + 'static,
{
    let context = state.authenticate(&headers).await?;
    let request: UpdateUserAuthRequest = parse_request(&body)?;

    let use_case = UpdateUserAuthUseCase::new(
        state.identity_provider.clone(),
        state.policies.update_user_auth.clone(),
    );
    let user = use_case.execute(context.as_ref(), request).await?;

    Ok(CallableResponse::new(UpdateUserAuthResponse {
        message: USER_UPDATED_MESSAGE,
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn command_from(data: Value) -> Result<UpdateUserAuthCommand, IdentityProviderError> {
        UpdateUserAuthCommand::try_from(UpdateUserAuthRequest(data))
    }

    #[test]
    fn string_fields_are_read_by_their_wire_names() {
        let command = command_from(json!({
            "uid": "u1",
            "newEmail": "a@b.com",
            "newPassword": "hunter22"
        }))
        .unwrap();

        assert_eq!(command.uid.as_deref(), Some("u1"));
        assert_eq!(command.new_email.as_deref(), Some("a@b.com"));
        assert_eq!(
            command.new_password.as_ref().map(|p| p.expose_secret().as_str()),
            Some("hunter22")
        );
    }

    #[test]
    fn absent_and_null_fields_are_left_out() {
        for data in [json!({}), json!({ "uid": null, "newEmail": null }), json!(null)] {
            let command = command_from(data).unwrap();
            assert!(command.uid.is_none());
            assert!(command.new_email.is_none());
            assert!(command.new_password.is_none());
        }
    }

    #[test]
    fn non_string_fields_map_to_provider_rejections() {
        assert_eq!(
            command_from(json!({ "uid": 7 })).unwrap_err(),
            IdentityProviderError::InvalidUid
        );
        assert_eq!(
            command_from(json!({ "uid": "u1", "newEmail": false })).unwrap_err(),
            IdentityProviderError::InvalidEmail
        );
        assert_eq!(
            command_from(json!({ "uid": "u1", "newPassword": 123456 })).unwrap_err(),
            IdentityProviderError::InvalidPassword
        );
    }
}

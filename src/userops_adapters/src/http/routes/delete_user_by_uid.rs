use axum::{body::Bytes, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use userops_application::{DeleteUserError, DeleteUserUseCase};
use userops_core::{DocumentStore, IdentityProvider, IdentityProviderError, Uid, UidError};

use crate::http::{
    callable::{CallableError, CallableResponse, parse_request},
    state::CallableState,
};

/// Input of `deleteUserByUid`, kept as sent until the policy has run.
///
/// A missing or falsy `uid` (`null`, `""`, `0`, `false`) counts as not
/// provided; any other non-string is an identifier the provider rejects.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct DeleteUserByUidRequest(Value);

impl TryFrom<DeleteUserByUidRequest> for Uid {
    type Error = DeleteUserError;

    fn try_from(request: DeleteUserByUidRequest) -> Result<Self, Self::Error> {
        match request.0.get("uid").cloned().unwrap_or(Value::Null) {
            Value::String(uid) => Ok(Uid::try_from(uid)?),
            Value::Null | Value::Bool(false) => Err(UidError::Missing.into()),
            Value::Number(n) if n.as_f64() == Some(0.0) => Err(UidError::Missing.into()),
            _ => Err(IdentityProviderError::InvalidUid.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteUserByUidResponse {
    pub success: bool,
}

#[tracing::instrument(name = "Delete User By Uid", skip_all)]
pub async fn delete_user_by_uid<I, D>(
    State(state): State<CallableState<I, D>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<CallableResponse<DeleteUserByUidResponse>, CallableError>
where
    I: IdentityProvider + Clone + 'static,
    D: DocumentStore + Clone + 'static,
{
    let context = state.authenticate(&headers).await?;
    let request: DeleteUserByUidRequest = parse_request(&body)?;

    let use_case = DeleteUserUseCase::new(
        state.identity_provider.clone(),
        state.document_store.clone(),
        state.policies.delete_user.clone(),
        state.users_collection.as_ref(),
    );
    use_case.execute(context.as_ref(), request).await?;

    Ok(CallableResponse::new(DeleteUserByUidResponse {
        success: true,
    }))
}

use serde_json::{Map, Value};
use userops_core::{AuthContext, TokenVerificationError};

/// `sub` becomes the caller uid, `email` the caller email; every claim is kept
/// on the context so capabilities can be derived from custom claims.
pub(crate) fn auth_context_from_claims(
    claims: Map<String, Value>,
) -> Result<AuthContext, TokenVerificationError> {
    let uid = claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|sub| !sub.is_empty())
        .ok_or(TokenVerificationError::MissingSubject)?
        .to_string();
    let email = claims
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(AuthContext::new(uid, email, claims))
}

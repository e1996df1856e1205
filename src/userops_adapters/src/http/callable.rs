//! The callable-function wire protocol.
//!
//! Requests are `POST`ed as `{"data": <input>}`. Success answers
//! `{"result": <output>}`; failure answers
//! `{"error": {"status": "INVALID_ARGUMENT", "message": "...", "details": ...}}`
//! with an HTTP status derived from the error code.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use thiserror::Error;
use userops_application::{DeleteUserError, UpdateUserAuthError};
use userops_core::{AuthorizationError, TokenVerificationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableErrorCode {
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    Internal,
    Unknown,
}

impl CallableErrorCode {
    /// Client-facing code, e.g. `invalid-argument`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid-argument",
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied => "permission-denied",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        }
    }

    /// Canonical status sent on the wire, e.g. `INVALID_ARGUMENT`.
    pub fn canonical_status(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Internal => "INTERNAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Internal | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for CallableErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct CallableError {
    pub code: CallableErrorCode,
    pub message: String,
    pub details: Option<Value>,
}

impl CallableError {
    pub fn new(code: CallableErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request() -> Self {
        Self::new(CallableErrorCode::InvalidArgument, "Bad Request")
    }
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        let mut error = json!({
            "status": self.code.canonical_status(),
            "message": self.message,
        });
        if let Some(details) = self.details {
            error["details"] = details;
        }

        (self.code.http_status(), Json(json!({ "error": error }))).into_response()
    }
}

impl From<AuthorizationError> for CallableError {
    fn from(error: AuthorizationError) -> Self {
        let code = match error {
            AuthorizationError::Unauthenticated => CallableErrorCode::Unauthenticated,
            AuthorizationError::PermissionDenied(_) => CallableErrorCode::PermissionDenied,
        };
        CallableError::new(code, error.to_string())
    }
}

impl From<TokenVerificationError> for CallableError {
    fn from(error: TokenVerificationError) -> Self {
        tracing::warn!(error = %error, "Rejected caller identity token");
        CallableError::new(CallableErrorCode::Unauthenticated, "Unauthenticated")
    }
}

impl From<DeleteUserError> for CallableError {
    fn from(error: DeleteUserError) -> Self {
        match error {
            DeleteUserError::Unauthorized(e) => e.into(),
            DeleteUserError::InvalidUid(e) => {
                CallableError::new(CallableErrorCode::InvalidArgument, e.to_string())
            }
            DeleteUserError::IdentityProvider(e) => {
                CallableError::new(CallableErrorCode::Unknown, e.to_string())
            }
            DeleteUserError::DocumentStore(e) => {
                CallableError::new(CallableErrorCode::Unknown, e.to_string())
            }
        }
    }
}

impl From<UpdateUserAuthError> for CallableError {
    fn from(error: UpdateUserAuthError) -> Self {
        match error {
            UpdateUserAuthError::Unauthorized(e) => e.into(),
            UpdateUserAuthError::IdentityProvider(e) => {
                CallableError::new(CallableErrorCode::Unknown, e.to_string()).with_details(json!({
                    "code": e.code(),
                    "message": e.to_string(),
                }))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallableRequest<T> {
    data: T,
}

#[derive(Debug, Serialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

impl<T> CallableResponse<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

impl<T: Serialize> IntoResponse for CallableResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self) {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize callable result");
                CallableError::new(CallableErrorCode::Internal, "Internal").into_response()
            }
        }
    }
}

/// Parses a `{"data": ...}` request body into the operation's input.
pub fn parse_request<T: DeserializeOwned>(body: &[u8]) -> Result<T, CallableError> {
    serde_json::from_slice::<CallableRequest<T>>(body)
        .map(|request| request.data)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid callable request body");
            CallableError::bad_request()
        })
}

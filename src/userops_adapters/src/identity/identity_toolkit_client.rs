use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use userops_core::{
    IdentityProvider, IdentityProviderError, NewUser, ProviderInfo, UserMetadata, UserRecord,
    UserUpdate,
};

use crate::rest::{endpoint, error_message, parse_base_url};

const MAX_UID_LENGTH: usize = 128;

/// Identity provider backed by the Identity Toolkit REST API (Firebase Auth).
///
/// Works against production or the Auth emulator, depending on `base_url`.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http_client: Client,
    base_url: Url,
    project_id: String,
    access_token: Secret<String>,
}

impl IdentityToolkitClient {
    pub fn new(
        base_url: &str,
        project_id: String,
        access_token: Secret<String>,
        http_client: Client,
    ) -> Result<Self, String> {
        Ok(Self {
            http_client,
            base_url: parse_base_url(base_url)?,
            project_id,
            access_token,
        })
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, IdentityProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = endpoint(
            &self.base_url,
            &["v1", "projects", &self.project_id, method],
        )
        .map_err(IdentityProviderError::Unexpected)?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityProviderError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(map_error_message(&error_message(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityProviderError::Unexpected(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityToolkitClient {
    #[tracing::instrument(name = "IdentityToolkit::create_user", skip_all)]
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, IdentityProviderError> {
        if let Some(uid) = &new_user.uid {
            validate_uid(uid)?;
        }

        let request = CreateAccountRequest {
            local_id: new_user.uid.as_deref(),
            email: new_user.email.as_deref(),
            password: new_user.password.as_ref().map(|p| p.expose_secret().as_str()),
            display_name: new_user.display_name.as_deref(),
            disabled: new_user.disabled,
        };
        let created: LocalIdResponse = self.call("accounts", &request).await?;

        self.get_user(&created.local_id).await
    }

    #[tracing::instrument(name = "IdentityToolkit::get_user", skip(self))]
    async fn get_user(&self, uid: &str) -> Result<UserRecord, IdentityProviderError> {
        validate_uid(uid)?;

        let request = LookupRequest { local_id: [uid] };
        let response: LookupResponse = self.call("accounts:lookup", &request).await?;

        response
            .users
            .into_iter()
            .next()
            .map(UserRecord::from)
            .ok_or(IdentityProviderError::UserNotFound)
    }

    #[tracing::instrument(name = "IdentityToolkit::update_user", skip(self, update))]
    async fn update_user(
        &self,
        uid: &str,
        update: UserUpdate,
    ) -> Result<UserRecord, IdentityProviderError> {
        validate_uid(uid)?;

        let request = UpdateAccountRequest {
            local_id: uid,
            email: update.email.as_deref(),
            password: update.password.as_ref().map(|p| p.expose_secret().as_str()),
        };
        let _: LocalIdResponse = self.call("accounts:update", &request).await?;

        self.get_user(uid).await
    }

    #[tracing::instrument(name = "IdentityToolkit::delete_user", skip(self))]
    async fn delete_user(&self, uid: &str) -> Result<(), IdentityProviderError> {
        validate_uid(uid)?;

        let request = DeleteAccountRequest { local_id: uid };
        let _: Value = self.call("accounts:delete", &request).await?;

        Ok(())
    }
}

// The API answers an empty identifier with a generic error, so it is rejected
// before any request is made.
fn validate_uid(uid: &str) -> Result<(), IdentityProviderError> {
    if uid.is_empty() || uid.chars().count() > MAX_UID_LENGTH {
        return Err(IdentityProviderError::InvalidUid);
    }
    Ok(())
}

/// Error messages look like `WEAK_PASSWORD : Password should be at least 6 characters`.
fn map_error_message(message: &str) -> IdentityProviderError {
    let code = message.split(" : ").next().unwrap_or_default().trim();
    match code {
        "USER_NOT_FOUND" => IdentityProviderError::UserNotFound,
        "DUPLICATE_LOCAL_ID" => IdentityProviderError::UidAlreadyExists,
        "EMAIL_EXISTS" => IdentityProviderError::EmailAlreadyExists,
        "INVALID_EMAIL" => IdentityProviderError::InvalidEmail,
        "WEAK_PASSWORD" | "INVALID_PASSWORD" => IdentityProviderError::InvalidPassword,
        "MISSING_LOCAL_ID" | "INVALID_LOCAL_ID" => IdentityProviderError::InvalidUid,
        _ => IdentityProviderError::Unexpected(message.to_string()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    local_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    disabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccountRequest<'a> {
    local_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccountRequest<'a> {
    local_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    local_id: [&'a str; 1],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalIdResponse {
    local_id: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    display_name: Option<String>,
    photo_url: Option<String>,
    phone_number: Option<String>,
    #[serde(default)]
    disabled: bool,
    /// Milliseconds since the epoch, as a string.
    created_at: Option<String>,
    last_login_at: Option<String>,
    /// RFC 3339.
    last_refresh_at: Option<String>,
    /// Seconds since the epoch, as a string.
    valid_since: Option<String>,
    /// JSON-encoded object.
    custom_attributes: Option<String>,
    #[serde(default)]
    provider_user_info: Vec<ProviderUserInfo>,
    tenant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderUserInfo {
    provider_id: String,
    raw_id: Option<String>,
    federated_id: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    phone_number: Option<String>,
}

impl From<AccountInfo> for UserRecord {
    fn from(info: AccountInfo) -> Self {
        let custom_claims = info
            .custom_attributes
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Map<String, Value>>(raw).ok());

        UserRecord {
            uid: info.local_id,
            email: info.email,
            email_verified: info.email_verified,
            display_name: info.display_name,
            photo_url: info.photo_url,
            phone_number: info.phone_number,
            disabled: info.disabled,
            metadata: UserMetadata {
                creation_time: parse_millis(info.created_at.as_deref()),
                last_sign_in_time: parse_millis(info.last_login_at.as_deref()),
                last_refresh_time: info
                    .last_refresh_at
                    .as_deref()
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                    .map(|time| time.with_timezone(&Utc)),
            },
            provider_data: info
                .provider_user_info
                .into_iter()
                .map(ProviderInfo::from)
                .collect(),
            custom_claims,
            tokens_valid_after_time: info
                .valid_since
                .as_deref()
                .and_then(|raw| raw.parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            tenant_id: info.tenant_id,
        }
    }
}

impl From<ProviderUserInfo> for ProviderInfo {
    fn from(info: ProviderUserInfo) -> Self {
        ProviderInfo {
            uid: info.raw_id.or(info.federated_id).unwrap_or_default(),
            provider_id: info.provider_id,
            email: info.email,
            display_name: info.display_name,
            photo_url: info.photo_url,
            phone_number: info.phone_number,
        }
    }
}

fn parse_millis(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|raw| raw.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
}

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A user record as held by the identity provider.
///
/// Serializes to the JSON shape clients of the admin API expect
/// (`uid`, `email`, `emailVerified`, `photoURL`, ...). Credential material
/// such as password hashes is never part of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub disabled: bool,
    pub metadata: UserMetadata,
    pub provider_data: Vec<ProviderInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_claims: Option<Map<String, Value>>,
    #[serde(
        serialize_with = "serialize_utc_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tokens_valid_after_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl UserRecord {
    /// A fresh record with no profile data, as created by the provider.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            email_verified: false,
            display_name: None,
            photo_url: None,
            phone_number: None,
            disabled: false,
            metadata: UserMetadata::default(),
            provider_data: Vec::new(),
            custom_claims: None,
            tokens_valid_after_time: None,
            tenant_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    #[serde(serialize_with = "serialize_utc_string")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_utc_string")]
    pub last_sign_in_time: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_utc_string")]
    pub last_refresh_time: Option<DateTime<Utc>>,
}

/// A linked sign-in provider (password, google.com, phone, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub uid: String,
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

// Timestamps are rendered as HTTP dates, e.g. "Tue, 01 Jan 2019 00:00:00 GMT".
fn serialize_utc_string<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(time) => {
            serializer.serialize_str(&time.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        }
        None => serializer.serialize_none(),
    }
}

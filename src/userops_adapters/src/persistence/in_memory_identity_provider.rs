use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use userops_core::{
    IdentityProvider, IdentityProviderError, NewUser, ProviderInfo, UserRecord, UserUpdate,
};

const MAX_UID_LENGTH: usize = 128;
const MIN_PASSWORD_LENGTH: usize = 6;
const PASSWORD_PROVIDER_ID: &str = "password";

struct StoredUser {
    record: UserRecord,
    password: Option<Secret<String>>,
}

/// Identity provider kept in process memory.
///
/// Applies the same acceptance rules as the hosted provider for identifiers,
/// emails and passwords.
#[derive(Default, Clone)]
pub struct InMemoryIdentityProvider {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, uid: &str) -> bool {
        self.users.read().await.contains_key(uid)
    }

    pub async fn password_matches(&self, uid: &str, password: &str) -> bool {
        self.users
            .read()
            .await
            .get(uid)
            .and_then(|user| user.password.as_ref())
            .is_some_and(|stored| stored.expose_secret() == password)
    }

    fn generate_uid(&self) -> String {
        let next_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("user-{next_id:020}")
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, IdentityProviderError> {
        let uid = match new_user.uid {
            Some(uid) => {
                validate_uid(&uid)?;
                uid
            }
            None => self.generate_uid(),
        };
        if let Some(email) = &new_user.email {
            validate_email(email)?;
        }
        if let Some(password) = &new_user.password {
            validate_password(password)?;
        }

        let mut users = self.users.write().await;
        if users.contains_key(&uid) {
            return Err(IdentityProviderError::UidAlreadyExists);
        }
        if let Some(email) = &new_user.email {
            ensure_email_unused(&users, email, &uid)?;
        }

        let mut record = UserRecord::new(uid.clone());
        record.email = new_user.email;
        record.display_name = new_user.display_name;
        record.disabled = new_user.disabled;
        record.metadata.creation_time = Some(Utc::now());
        if new_user.password.is_some() {
            sync_password_provider(&mut record);
        }

        users.insert(
            uid,
            StoredUser {
                record: record.clone(),
                password: new_user.password,
            },
        );

        Ok(record)
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, IdentityProviderError> {
        validate_uid(uid)?;
        self.users
            .read()
            .await
            .get(uid)
            .map(|user| user.record.clone())
            .ok_or(IdentityProviderError::UserNotFound)
    }

    async fn update_user(
        &self,
        uid: &str,
        update: UserUpdate,
    ) -> Result<UserRecord, IdentityProviderError> {
        validate_uid(uid)?;
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(password) = &update.password {
            validate_password(password)?;
        }

        let mut users = self.users.write().await;
        if !users.contains_key(uid) {
            return Err(IdentityProviderError::UserNotFound);
        }
        if let Some(email) = &update.email {
            ensure_email_unused(&users, email, uid)?;
        }

        let user = users
            .get_mut(uid)
            .ok_or(IdentityProviderError::UserNotFound)?;

        if let Some(email) = update.email {
            user.record.email = Some(email);
            user.record.email_verified = false;
        }
        if let Some(password) = update.password {
            user.password = Some(password);
            // Changing the password revokes previously issued sessions.
            user.record.tokens_valid_after_time = Some(Utc::now());
        }
        if user.password.is_some() {
            sync_password_provider(&mut user.record);
        }

        Ok(user.record.clone())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), IdentityProviderError> {
        validate_uid(uid)?;
        self.users
            .write()
            .await
            .remove(uid)
            .map(|_| ())
            .ok_or(IdentityProviderError::UserNotFound)
    }
}

fn validate_uid(uid: &str) -> Result<(), IdentityProviderError> {
    if uid.is_empty() || uid.chars().count() > MAX_UID_LENGTH {
        return Err(IdentityProviderError::InvalidUid);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), IdentityProviderError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(IdentityProviderError::InvalidEmail),
    }
}

fn validate_password(password: &Secret<String>) -> Result<(), IdentityProviderError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(IdentityProviderError::InvalidPassword);
    }
    Ok(())
}

fn ensure_email_unused(
    users: &HashMap<String, StoredUser>,
    email: &str,
    uid: &str,
) -> Result<(), IdentityProviderError> {
    let taken = users.iter().any(|(other_uid, other)| {
        other_uid != uid
            && other
                .record
                .email
                .as_deref()
                .is_some_and(|other_email| other_email.eq_ignore_ascii_case(email))
    });
    if taken {
        return Err(IdentityProviderError::EmailAlreadyExists);
    }
    Ok(())
}

// The password provider entry mirrors the account email.
fn sync_password_provider(record: &mut UserRecord) {
    let Some(email) = record.email.clone() else {
        return;
    };
    record
        .provider_data
        .retain(|provider| provider.provider_id != PASSWORD_PROVIDER_ID);
    record.provider_data.push(ProviderInfo {
        uid: email.clone(),
        provider_id: PASSWORD_PROVIDER_ID.to_string(),
        email: Some(email),
        display_name: record.display_name.clone(),
        photo_url: None,
        phone_number: None,
    });
}

use secrecy::Secret;

/// Changes to apply to an existing identity record.
///
/// `None` leaves the corresponding attribute untouched. The values are not
/// validated here; the identity provider decides what it accepts.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

impl UserUpdate {
    pub fn new(email: Option<String>, password: Option<Secret<String>>) -> Self {
        Self { email, password }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Attributes of an identity record to create.
#[derive(Debug, Default)]
pub struct NewUser {
    /// Provider assigns an identifier when absent.
    pub uid: Option<String>,
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
    pub display_name: Option<String>,
    pub disabled: bool,
}

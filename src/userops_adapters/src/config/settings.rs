use std::{net::SocketAddr, time::Duration};

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{self, env, firebase, prod};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub firebase: FirebaseSettings,
    pub auth: AuthSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Which implementation backs the identity provider and document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Firebase,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseSettings {
    pub backend: Backend,
    pub project_id: String,
    /// OAuth2 bearer token sent to the Google APIs (`owner` for the emulators).
    pub access_token: Secret<String>,
    pub identity_base_url: String,
    pub firestore_base_url: String,
    pub database_id: String,
    pub users_collection: String,
    pub timeout_millis: u64,
}

impl FirebaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

/// How caller identity tokens are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenVerifierKind {
    /// RS256 Firebase ID tokens checked against Google's published keys.
    FirebaseIdToken,
    /// HS256 tokens signed with `jwt_secret`.
    Hmac,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub verifier: TokenVerifierKind,
    /// HMAC secret the caller identity tokens are signed with. Only read by
    /// the `hmac` verifier.
    pub jwt_secret: Option<Secret<String>>,
    pub jwks_url: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Restrict both operations to callers holding the admin capability.
    pub require_admin: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0
            .iter()
            .any(|allowed| allowed.as_bytes() == origin.as_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Settings {
    /// Load settings from `config/base.json`, `config/{USEROPS_ENVIRONMENT}.json`
    /// and `USEROPS__*` environment variables, in increasing precedence.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = std::env::var(env::ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| constants::DEFAULT_ENVIRONMENT.to_string());

        Self::defaults()?
            .add_source(File::with_name(&format!("{}/base", constants::CONFIG_DIR)).required(false))
            .add_source(
                File::with_name(&format!("{}/{environment}", constants::CONFIG_DIR))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(env::SETTINGS_ENV_PREFIX)
                    .prefix_separator(env::SETTINGS_ENV_SEPARATOR)
                    .separator(env::SETTINGS_ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builder pre-populated with every default; sources added on top override them.
    pub fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.host", prod::APP_HOST)?
            .set_default("application.port", prod::APP_PORT)?
            .set_default("firebase.backend", "firebase")?
            .set_default("firebase.access_token", firebase::EMULATOR_ACCESS_TOKEN)?
            .set_default("firebase.identity_base_url", firebase::IDENTITY_TOOLKIT_BASE_URL)?
            .set_default("firebase.firestore_base_url", firebase::FIRESTORE_BASE_URL)?
            .set_default("firebase.database_id", firebase::DEFAULT_DATABASE_ID)?
            .set_default("firebase.users_collection", firebase::DEFAULT_USERS_COLLECTION)?
            .set_default("firebase.timeout_millis", firebase::DEFAULT_TIMEOUT_MILLIS)?
            .set_default("auth.verifier", "firebase_id_token")?
            .set_default("auth.jwks_url", firebase::ID_TOKEN_JWKS_URL)?
            .set_default("auth.require_admin", false)?
            .set_default("cors.allowed_origins", Vec::<String>::new())
    }
}

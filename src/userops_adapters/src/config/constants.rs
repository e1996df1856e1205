pub mod env {
    /// Selects `config/{name}.json` on top of `config/base.json`.
    pub const ENVIRONMENT_ENV_VAR: &str = "USEROPS_ENVIRONMENT";
    /// Prefix of variables overriding settings, e.g. `USEROPS__FIREBASE__PROJECT_ID`.
    pub const SETTINGS_ENV_PREFIX: &str = "USEROPS";
    pub const SETTINGS_ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_DIR: &str = "config";
pub const DEFAULT_ENVIRONMENT: &str = "local";

pub mod firebase {
    pub const IDENTITY_TOOLKIT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
    pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
    pub const DEFAULT_DATABASE_ID: &str = "(default)";
    pub const DEFAULT_USERS_COLLECTION: &str = "users";
    /// Token accepted by the local emulators in place of an OAuth2 access token.
    pub const EMULATOR_ACCESS_TOKEN: &str = "owner";
    pub const DEFAULT_TIMEOUT_MILLIS: u64 = 10_000;
    /// Public keys the ID tokens of every Firebase project are signed with.
    pub const ID_TOKEN_JWKS_URL: &str =
        "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
    pub const ID_TOKEN_ISSUER_PREFIX: &str = "https://securetoken.google.com/";
}

pub mod prod {
    pub const APP_HOST: &str = "0.0.0.0";
    pub const APP_PORT: u16 = 3000;
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const JWT_SECRET: &str = "test-signing-secret";
}

mod claims;
pub mod firebase_token_verifier;
pub mod hmac_token_verifier;

pub use firebase_token_verifier::FirebaseTokenVerifier;
pub use hmac_token_verifier::{HmacTokenVerifier, TokenVerifierConfig, bearer_token};

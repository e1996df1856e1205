//! Axum routes for the callable operations.
//!
//! Each route authenticates the caller, unwraps the `{"data": ...}` envelope,
//! runs the use case and wraps the outcome back into the callable protocol.

pub mod delete_user_by_uid;
pub mod update_user_auth;

pub use delete_user_by_uid::delete_user_by_uid;
pub use update_user_auth::update_user_auth;

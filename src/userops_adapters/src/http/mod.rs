pub mod callable;
pub mod routes;
pub mod state;

pub use callable::{CallableError, CallableErrorCode, CallableResponse};
pub use state::{AccessPolicies, CallableState};

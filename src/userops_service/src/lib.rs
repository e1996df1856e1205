mod service;
pub mod telemetry;

pub use service::UserOpsService;

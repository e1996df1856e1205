pub mod auth_context;
pub mod uid;
pub mod user_record;
pub mod user_update;

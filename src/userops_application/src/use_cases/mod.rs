pub mod delete_user;
pub mod update_user_auth;

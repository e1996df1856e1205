mod delete_user_by_uid;
mod helpers;
mod update_user_auth;

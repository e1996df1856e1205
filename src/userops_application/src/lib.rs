pub mod use_cases;

pub use use_cases::{
    delete_user::{DeleteUserError, DeleteUserUseCase},
    update_user_auth::{UpdateUserAuthCommand, UpdateUserAuthError, UpdateUserAuthUseCase},
};

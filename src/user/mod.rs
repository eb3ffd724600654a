//! User account management.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;
mod password;

pub use core::{
    CreateUserForm, User, UserId, count_users, create_user, create_user_table, get_user,
    get_user_by_email,
};
pub use create_endpoint::{create_user_endpoint, get_new_user_page};
pub use delete_endpoint::delete_user_endpoint;
pub use edit_endpoint::{get_edit_user_page, update_user_endpoint};
pub use list::get_users_page;
pub use password::{PasswordHash, ValidatedPassword};

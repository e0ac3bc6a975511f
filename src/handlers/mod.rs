pub mod user_handlers;

pub use user_handlers::{
    create_user, delete_user, health, home, list_users, read_user, update_user,
};

pub mod user_service;

pub use user_service::{UpdateUserRequest, UserAction, UserService, UserServiceError};

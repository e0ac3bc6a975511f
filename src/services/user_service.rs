use crate::models::user::{NewUser, User, UserPatch};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use std::fmt;
use std::sync::Arc;

/// The operation a persistence failure happened in, used for the client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Save,
    Update,
    Delete,
    Load,
    List,
}

impl UserAction {
    /// Client-facing message for a persistence failure in this operation.
    pub fn failure_message(&self) -> &'static str {
        match self {
            UserAction::Save => "Failed to save user",
            UserAction::Update => "Failed to update user",
            UserAction::Delete => "Failed to delete user",
            UserAction::Load => "Failed to load user",
            UserAction::List => "Failed to load users",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            UserAction::Save => "save",
            UserAction::Update => "update",
            UserAction::Delete => "delete",
            UserAction::Load => "load",
            UserAction::List => "list",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{}: {source}", .action.failure_message())]
    Persistence {
        action: UserAction,
        #[source]
        source: RepositoryError,
    },
}

impl UserServiceError {
    fn from_repository(action: UserAction, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => UserServiceError::UserNotFound,
            source => {
                tracing::error!("{}: {}", action.failure_message(), source);
                UserServiceError::Persistence { action, source }
            }
        }
    }
}

pub struct UpdateUserRequest {
    pub document: String,
    pub patch: UserPatch,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserServiceError> {
        validate_document(&new_user.document)?;

        let user = self
            .repository
            .insert(&new_user)
            .await
            .map_err(|e| UserServiceError::from_repository(UserAction::Save, e))?;

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    /// Applies a partial update to the first user matching `request.document`.
    ///
    /// Fails with `UserNotFound` before anything is written when no user has that
    /// document.
    pub async fn update_user(&self, request: UpdateUserRequest) -> Result<User, UserServiceError> {
        validate_document(&request.document)?;

        match self
            .repository
            .update_by_document(&request.document, &request.patch)
            .await
        {
            Ok(user) => {
                tracing::info!("Updated user {}", user.id);
                Ok(user)
            }
            Err(RepositoryError::NotFound) => {
                tracing::warn!("No user with document {:?} to update", request.document);
                Err(UserServiceError::UserNotFound)
            }
            Err(e) => Err(UserServiceError::from_repository(UserAction::Update, e)),
        }
    }

    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| UserServiceError::from_repository(UserAction::Load, e))?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn find_user_by_document(
        &self,
        document: &str,
    ) -> Result<Option<User>, UserServiceError> {
        self.repository
            .find_by_document(document)
            .await
            .map_err(|e| UserServiceError::from_repository(UserAction::Load, e))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        self.repository
            .list_all()
            .await
            .map_err(|e| UserServiceError::from_repository(UserAction::List, e))
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        match self.repository.delete_by_id(id).await {
            Ok(()) => {
                tracing::info!("Deleted user {}", id);
                Ok(())
            }
            Err(RepositoryError::NotFound) => {
                tracing::warn!("No user with id {} to delete", id);
                Err(UserServiceError::UserNotFound)
            }
            Err(e) => Err(UserServiceError::from_repository(UserAction::Delete, e)),
        }
    }

    pub async fn check_database(&self) -> Result<(), UserServiceError> {
        self.repository
            .ping()
            .await
            .map_err(|e| UserServiceError::from_repository(UserAction::Load, e))
    }
}

/// A blank document could never be matched by an update, so both create and
/// update refuse it.
fn validate_document(document: &str) -> Result<(), UserServiceError> {
    if document.trim().is_empty() {
        return Err(UserServiceError::Validation(
            "document must not be empty".to_string(),
        ));
    }
    Ok(())
}

use crate::error::{AppError, Result};
use crate::models::user::{NewUser, User, UserPatch};
use crate::services::user_service::UpdateUserRequest;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            id: None,
        }
    }
}

/// Body of `PUT /update_user`: the lookup document plus any subset of fields.
#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub document: String,
    #[serde(flatten)]
    pub patch: UserPatch,
}

/// GET / - liveness message
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new("User service is running"))
}

/// GET /health - liveness plus a database round trip
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    state
        .user_service
        .check_database()
        .await
        .map_err(|_| AppError::Unavailable)?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// POST /create_user (also mounted at POST /user/)
///
/// Requires all six user fields. Responds 201 with the new id.
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(new_user), _): WithRejection<Json<NewUser>, AppError>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user = state.user_service.create_user(new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
            id: Some(user.id),
        }),
    ))
}

/// PUT /update_user - partial update matched by `document`
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateUserBody>, AppError>,
) -> Result<Json<MessageResponse>> {
    state
        .user_service
        .update_user(UpdateUserRequest {
            document: body.document,
            patch: body.patch,
        })
        .await?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// GET /users/{id}
pub async fn read_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<User>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<MessageResponse>> {
    state.user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// GET /users - every user, ordered by id
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

//! User handlers
//!
//! Signup, signin and session endpoints plus user management under `/auth`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::hash_password;
use crate::auth::Session;
use crate::domain::entities::{UpdateUser, User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use crate::AppState;

/// Request body for signup and signin
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    pub password: String,
}

/// Request body for partial user updates
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Query parameters for listing users
#[derive(Debug, Deserialize)]
pub struct FindUsersQuery {
    pub email: String,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// POST /auth/signup
///
/// Create an account and sign it in.
pub async fn signup<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request.validate()?;

    let user = state
        .auth_service
        .signup(&request.email, &request.password)
        .await?;
    session.set_user_id(Some(user.id));

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/signin
pub async fn signin<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request.validate()?;

    let user = state
        .auth_service
        .signin(&request.email, &request.password)
        .await?;
    session.set_user_id(Some(user.id));

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/signout
pub async fn signout(Extension(session): Extension<Session>) -> StatusCode {
    session.set_user_id(None);
    StatusCode::NO_CONTENT
}

/// GET /auth/whoami
///
/// Requires a signed-in user (see `auth_guard`).
pub async fn whoami(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

/// GET /auth/:id
pub async fn find_user<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users_service
        .find_one(&UserId::from(id))
        .await?
        .ok_or_else(AppError::user_not_found)?;

    Ok(Json(user.into()))
}

/// GET /auth?email=
pub async fn find_all_users<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Query(query): Query<FindUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users_service.find(&query.email).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PATCH /auth/:id
///
/// Update email and/or password. New passwords are hashed before storage.
pub async fn update_user<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    request.validate()?;
    let id = UserId::from(id);

    if let Some(email) = &request.email {
        let taken = state
            .users_service
            .find(email)
            .await?
            .iter()
            .any(|u| u.id != id);
        if taken {
            return Err(AppError::email_in_use());
        }
    }

    let password = request
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let user = state
        .users_service
        .update(
            &id,
            UpdateUser {
                email: request.email,
                password,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

/// DELETE /auth/:id
pub async fn remove_user<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users_service.remove(&UserId::from(id)).await?;

    Ok(Json(user.into()))
}

//! Current-user middleware
//!
//! Resolves the user referenced by the session and exposes it to handlers
//! as a `User` request extension.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::auth::Session;
use crate::domain::entities::User;
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use crate::AppState;

/// Attach the signed-in user, if any, to the request
///
/// Never rejects: a missing or stale session just leaves the request
/// anonymous. Must run inside `session_middleware`.
pub async fn current_user_middleware<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = request
        .extensions()
        .get::<Session>()
        .and_then(Session::user_id);

    if let Some(user_id) = user_id {
        match state.users_service.find_one(&user_id).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => {
                tracing::debug!(user_id = %user_id, "Session refers to a missing user");
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "Failed to load current user");
            }
        }
    }

    next.run(request).await
}

/// Reject requests without a signed-in user
pub async fn auth_guard(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<User>().is_none() {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

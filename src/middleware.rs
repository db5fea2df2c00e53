use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth,
    error::AppError,
    model::CurrentUser,
    session::{Flash, Session},
    AppState,
};

/// Login gate for protected routes. On success the resolved principal is
/// available to handlers as `Extension<CurrentUser>`.
pub async fn require_login<B>(
    State(data): State<Arc<AppState>>,
    mut session: Session,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    match auth::require_user(&data.users, &session).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser::from(user));
            Ok(next.run(request).await)
        }
        Err(AppError::AuthenticationRequired) => {
            session.flash(Flash::info("Please log in to access this page."));
            Ok((session, Redirect::to("/login")).into_response())
        }
        Err(err) => Err(err),
    }
}

use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    model::{NewUser, User},
    repository::UserRepository,
    session::Session,
};

/// Creates an account unless the username or email is already taken.
///
/// The lookup and the insert are separate statements; two racing registrations
/// for the same name end at the table's unique constraint as a database error.
pub async fn register(users: &UserRepository, new_user: NewUser) -> AppResult<User> {
    new_user.validate()?;

    if users
        .find_by_username_or_email(&new_user.username, &new_user.email)
        .await?
        .is_some()
    {
        info!("Registration refused, {} or {} already taken", new_user.username, new_user.email);
        return Err(AppError::Conflict);
    }

    let user = users.insert(&new_user).await?;
    info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}

/// Finds the user with exactly this email and password.
pub async fn authenticate(users: &UserRepository, email: &str, password: &str) -> AppResult<User> {
    match users.find_by_credentials(email, password).await? {
        Some(user) => {
            info!("User {} logged in", user.id);
            Ok(user)
        }
        None => {
            warn!("Failed login attempt for {}", email);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Resolves the session's user id to a stored user. A stale id resolves to `None`.
pub async fn current_user(users: &UserRepository, session: &Session) -> AppResult<Option<User>> {
    match session.user_id() {
        Some(id) => Ok(users.find_by_id(id).await?),
        None => Ok(None),
    }
}

pub async fn require_user(users: &UserRepository, session: &Session) -> AppResult<User> {
    current_user(users, session)
        .await?
        .ok_or(AppError::AuthenticationRequired)
}

use serde::Serialize;

use crate::error::{AppError, AppResult};

pub const USERNAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 120;
pub const PASSWORD_MAX: usize = 100;
pub const TITLE_MAX: usize = 150;
pub const CATEGORY_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 300;
pub const DATE_TO_COMPLETE_MAX: usize = 20;

// Registered account. The password is kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

// Data model representing a Todo item
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date_to_complete: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> AppResult<()> {
        check_len("username", &self.username, USERNAME_MAX)?;
        check_len("email", &self.email, EMAIL_MAX)?;
        check_len("password", &self.password, PASSWORD_MAX)
    }
}

/// Fields accepted when creating a task. `category` has no input path and stays unset.
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub date_to_complete: String,
}

impl NewTodo {
    pub fn validate(&self) -> AppResult<()> {
        check_len("title", &self.title, TITLE_MAX)?;
        check_len("description", &self.description, DESCRIPTION_MAX)?;
        check_len("date_to_complete", &self.date_to_complete, DATE_TO_COMPLETE_MAX)
    }
}

/// Principal resolved for the current request by the login guard.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        CurrentUser {
            id: user.id,
            username: user.username,
        }
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::Validation { field, max });
    }
    Ok(())
}

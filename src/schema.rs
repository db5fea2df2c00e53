use serde::Deserialize;

use crate::model::{NewTodo, NewUser};

// Form body for the registration page
#[derive(Debug, Deserialize)]
pub struct RegisterSchema {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterSchema> for NewUser {
    fn from(form: RegisterSchema) -> Self {
        NewUser {
            username: form.username,
            email: form.email,
            password: form.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginSchema {
    pub email: String,
    pub password: String,
}

// Form body for adding a task
#[derive(Debug, Deserialize)]
pub struct CreateTodoSchema {
    pub title: String,
    pub description: String,
    pub date_to_complete: String,
}

impl From<CreateTodoSchema> for NewTodo {
    fn from(form: CreateTodoSchema) -> Self {
        NewTodo {
            title: form.title,
            description: form.description,
            date_to_complete: form.date_to_complete,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

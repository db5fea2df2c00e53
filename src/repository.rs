use sqlx::{query, query_as, Pool, Sqlite};

use crate::model::{NewTodo, NewUser, Todo, User};

const USER_COLUMNS: &str = "id, username, email, password";
const TODO_COLUMNS: &str = "id, title, category, description, date_to_complete, user_id";

/// Storage for registered users.
#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Sqlite>,
}

impl UserRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// First user holding either the username or the email.
    pub async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? OR email = ? LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? AND password = ? LIMIT 1"
        ))
        .bind(email)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
    }
}

/// Storage for tasks, always addressed together with their owner where listing is concerned.
#[derive(Clone)]
pub struct TodoRepository {
    pool: Pool<Sqlite>,
}

impl TodoRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Tasks of `owner_id` whose title contains `term`, ignoring ASCII case.
    pub async fn find_by_owner_and_title_substring(
        &self,
        owner_id: i64,
        term: &str,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            r#"SELECT {TODO_COLUMNS} FROM todos
            WHERE user_id = ? AND lower(title) LIKE '%' || lower(?) || '%' ESCAPE '\'
            ORDER BY id"#
        ))
        .bind(owner_id)
        .bind(escape_like(term))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert(&self, owner_id: i64, todo: &NewTodo) -> Result<Todo, sqlx::Error> {
        query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, date_to_complete, user_id) VALUES (?, ?, ?, ?) RETURNING {TODO_COLUMNS}"
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(&todo.date_to_complete)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Returns `false` when no row had that id.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let rows_affected = query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

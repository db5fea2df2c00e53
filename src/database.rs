use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::info;

use crate::model::{
    CATEGORY_MAX, DATE_TO_COMPLETE_MAX, DESCRIPTION_MAX, EMAIL_MAX, PASSWORD_MAX, TITLE_MAX,
    USERNAME_MAX,
};

/// Opens the pool, creating the database file first when it does not exist yet.
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    } else {
        info!("Database already exists");
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("Connection to the database is successful");
    Ok(pool)
}

/// Creates the `users` and `todos` tables if they are absent.
pub async fn create_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE CHECK (length(username) <= {USERNAME_MAX}),
        email TEXT NOT NULL UNIQUE CHECK (length(email) <= {EMAIL_MAX}),
        password TEXT NOT NULL CHECK (length(password) <= {PASSWORD_MAX})
    );"#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(title) <= {TITLE_MAX}),
        category TEXT CHECK (length(category) <= {CATEGORY_MAX}),
        description TEXT CHECK (length(description) <= {DESCRIPTION_MAX}),
        date_to_complete TEXT CHECK (length(date_to_complete) <= {DATE_TO_COMPLETE_MAX}),
        user_id INTEGER NOT NULL REFERENCES users(id)
    );"#
    ))
    .execute(pool)
    .await?;

    info!("Created users and todos tables");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Pool<Sqlite> {
    // Every in-memory connection is its own database, so keep exactly one alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<std::time::Duration>)
        .max_lifetime(None::<std::time::Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    create_schema(&pool).await.expect("schema");
    pool
}

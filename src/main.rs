use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    repository::{TodoRepository, UserRepository},
    route::create_router,
    session::SessionKey,
};

mod auth;
mod config;
mod database;
mod error;
mod handler;
mod middleware;
mod model;
mod repository;
mod route;
mod schema;
mod session;
mod tasks;
mod view;

// Struct representing the application state
pub struct AppState {
    pub users: UserRepository,
    pub todos: TodoRepository,
    pub session_key: SessionKey,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, secret_key: &str) -> Self {
        AppState {
            users: UserRepository::new(db.clone()),
            todos: TodoRepository::new(db),
            session_key: SessionKey::new(secret_key),
        }
    }
}

// Entry point of the application
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_web=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match database::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = database::create_schema(&pool).await {
        error!("Failed to create the schema: {:?}", err);
        std::process::exit(1);
    }

    let app_state = Arc::new(AppState::new(pool, &config.secret_key));
    let app = create_router(app_state);

    info!("Server started successfully on {}", config.bind_addr);

    if let Err(err) = axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await
    {
        error!("Server error: {}", err);
        std::process::exit(1);
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde_json::json;

use crate::{
    auth,
    error::{AppError, AppResult},
    model::CurrentUser,
    schema::{CreateTodoSchema, LoginSchema, RegisterSchema, SearchQuery},
    session::{Flash, Session},
    tasks, view, AppState,
};

// Handler for the landing page: the full task list, or the login page for visitors
pub async fn index(State(data): State<Arc<AppState>>, mut session: Session) -> AppResult<Response> {
    let Some(user) = auth::current_user(&data.users, &session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let todos = tasks::list_tasks(&data.todos, user.id, "").await?;
    let page = view::render(
        "index",
        &json!({
            "user": user,
            "todos": todos,
            "flashes": session.take_flashes(),
        }),
    )?;
    Ok((session, page).into_response())
}

pub async fn register_form(mut session: Session) -> AppResult<Response> {
    let page = view::render("register", &json!({ "flashes": session.take_flashes() }))?;
    Ok((session, page).into_response())
}

pub async fn register(
    State(data): State<Arc<AppState>>,
    mut session: Session,
    Form(body): Form<RegisterSchema>,
) -> AppResult<Response> {
    match auth::register(&data.users, body.into()).await {
        Ok(_) => {
            session.flash(Flash::success("Registration successful! Please log in."));
            Ok((session, Redirect::to("/login")).into_response())
        }
        Err(AppError::Conflict) => {
            session.flash(Flash::danger("User already exists!"));
            Ok((session, Redirect::to("/register")).into_response())
        }
        Err(err @ AppError::Validation { .. }) => {
            session.flash(Flash::danger(err.to_string()));
            Ok((session, Redirect::to("/register")).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn login_form(mut session: Session) -> AppResult<Response> {
    let page = view::render("login", &json!({ "flashes": session.take_flashes() }))?;
    Ok((session, page).into_response())
}

pub async fn login(
    State(data): State<Arc<AppState>>,
    mut session: Session,
    Form(body): Form<LoginSchema>,
) -> AppResult<Response> {
    match auth::authenticate(&data.users, &body.email, &body.password).await {
        Ok(user) => {
            session.log_in(user.id);
            session.flash(Flash::success("Login successful!"));
            Ok((session, Redirect::to("/")).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            // Shown right away on the re-rendered form.
            session.flash(Flash::danger("Invalid email or password"));
            let page = view::render("login", &json!({ "flashes": session.take_flashes() }))?;
            Ok((session, page).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(mut session: Session) -> Response {
    session.log_out();
    session.flash(Flash::info("Logged out successfully."));
    (session, Redirect::to("/login")).into_response()
}

// Handler for the searchable task list
pub async fn todo_list(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut session: Session,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let todos = tasks::list_tasks(&data.todos, user.id, &query.search).await?;
    let page = view::render(
        "todo",
        &json!({
            "user": { "id": user.id, "username": user.username },
            "todos": todos,
            "search_query": query.search,
            "flashes": session.take_flashes(),
        }),
    )?;
    Ok((session, page).into_response())
}

// Handler for creating a new Todo
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut session: Session,
    Form(body): Form<CreateTodoSchema>,
) -> AppResult<Response> {
    match tasks::create_task(&data.todos, user.id, body.into()).await {
        Ok(_) => session.flash(Flash::success("Task added successfully!")),
        Err(err @ AppError::Validation { .. }) => session.flash(Flash::danger(err.to_string())),
        Err(err) => return Err(err),
    }
    Ok((session, Redirect::to("/todo")).into_response())
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut session: Session,
    Path(todo_id): Path<i64>,
) -> AppResult<Response> {
    match tasks::delete_task(&data.todos, user.id, todo_id).await {
        Ok(()) => {
            session.flash(Flash::info("Task deleted successfully!"));
            Ok((session, Redirect::to("/todo")).into_response())
        }
        Err(AppError::Authorization(_)) => {
            session.flash(Flash::danger("You are not authorized to delete this task."));
            Ok((session, Redirect::to("/")).into_response())
        }
        Err(err) => Err(err),
    }
}

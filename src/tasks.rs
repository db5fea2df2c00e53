use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    model::{NewTodo, Todo},
    repository::TodoRepository,
};

/// Tasks owned by `owner_id` whose title contains `search_term` (case-insensitive).
/// An empty term lists every task of the owner.
pub async fn list_tasks(todos: &TodoRepository, owner_id: i64, search_term: &str) -> AppResult<Vec<Todo>> {
    Ok(todos
        .find_by_owner_and_title_substring(owner_id, search_term)
        .await?)
}

pub async fn create_task(todos: &TodoRepository, owner_id: i64, new_todo: NewTodo) -> AppResult<Todo> {
    new_todo.validate()?;
    let todo = todos.insert(owner_id, &new_todo).await?;
    info!("User {} created todo {}", owner_id, todo.id);
    Ok(todo)
}

/// Removes a task, but only on behalf of its owner.
pub async fn delete_task(todos: &TodoRepository, owner_id: i64, todo_id: i64) -> AppResult<()> {
    let todo = todos
        .find_by_id(todo_id)
        .await?
        .ok_or(AppError::NotFound(todo_id))?;

    if todo.user_id != owner_id {
        warn!("User {} tried to delete todo {} owned by {}", owner_id, todo_id, todo.user_id);
        return Err(AppError::Authorization(todo_id));
    }

    if !todos.delete(todo_id).await? {
        return Err(AppError::NotFound(todo_id));
    }
    info!("User {} deleted todo {}", owner_id, todo_id);
    Ok(())
}

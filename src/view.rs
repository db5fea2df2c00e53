use axum::response::Html;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Renders the named page from a JSON data mapping.
///
/// Known pages are `index`, `todo`, `login` and `register`. Every page reads an
/// optional `flashes` array; the task pages also read `user` and `todos`, and
/// `todo` reads `search_query`.
pub fn render(name: &str, data: &Value) -> AppResult<Html<String>> {
    let (title, body) = match name {
        "index" => ("My tasks", index_body(data)),
        "todo" => ("Tasks", todo_body(data)),
        "login" => ("Log in", login_body()),
        "register" => ("Register", register_body()),
        other => return Err(AppError::Template(other.to_string())),
    };

    Ok(Html(layout(title, data, &body)))
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn layout(title: &str, data: &Value, body: &str) -> String {
    let nav = match data.get("user") {
        Some(user) if !user.is_null() => format!(
            r#"<span>Signed in as {}</span> <a href="/">Home</a> <a href="/todo">Tasks</a> <a href="/logout">Log out</a>"#,
            escape(text(user, "username"))
        ),
        _ => r#"<a href="/login">Log in</a> <a href="/register">Register</a>"#.to_string(),
    };

    let flashes: String = data
        .get("flashes")
        .and_then(Value::as_array)
        .map(|flashes| {
            flashes
                .iter()
                .map(|flash| {
                    format!(
                        r#"<div class="flash flash-{}">{}</div>"#,
                        escape(text(flash, "category")),
                        escape(text(flash, "message"))
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<nav>{nav}</nav>\n{flashes}\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn todo_items(data: &Value, with_delete: bool) -> String {
    let todos = data.get("todos").and_then(Value::as_array);
    let Some(todos) = todos.filter(|todos| !todos.is_empty()) else {
        return "<p class=\"empty\">No tasks yet.</p>".to_string();
    };

    let items: String = todos
        .iter()
        .map(|todo| {
            let id = todo.get("id").and_then(Value::as_i64).unwrap_or_default();
            let delete = if with_delete {
                format!(r#" <a href="/delete/{id}">Delete</a>"#)
            } else {
                String::new()
            };
            format!(
                "<li class=\"todo\" data-id=\"{id}\"><strong>{}</strong> <span>{}</span> <em>{}</em>{delete}</li>\n",
                escape(text(todo, "title")),
                escape(text(todo, "description")),
                escape(text(todo, "date_to_complete")),
            )
        })
        .collect();

    format!("<ul class=\"todos\">\n{items}</ul>")
}

fn index_body(data: &Value) -> String {
    format!("<h1>My tasks</h1>\n{}", todo_items(data, false))
}

fn todo_body(data: &Value) -> String {
    format!(
        r#"<h1>Tasks</h1>
<form method="get" action="/todo">
  <input type="text" name="search" value="{search}" placeholder="Search by title">
  <button type="submit">Search</button>
</form>
<form method="post" action="/todo">
  <input type="text" name="title" maxlength="150" placeholder="Title">
  <input type="text" name="description" maxlength="300" placeholder="Description">
  <input type="text" name="date_to_complete" maxlength="20" placeholder="Due">
  <button type="submit">Add</button>
</form>
{items}"#,
        search = escape(text(data, "search_query")),
        items = todo_items(data, true),
    )
}

fn login_body() -> String {
    r#"<h1>Log in</h1>
<form method="post" action="/login">
  <input type="email" name="email" placeholder="Email">
  <input type="password" name="password" placeholder="Password">
  <button type="submit">Log in</button>
</form>"#
        .to_string()
}

fn register_body() -> String {
    r#"<h1>Register</h1>
<form method="post" action="/register">
  <input type="text" name="username" maxlength="100" placeholder="Username">
  <input type="email" name="email" maxlength="120" placeholder="Email">
  <input type="password" name="password" maxlength="100" placeholder="Password">
  <button type="submit">Register</button>
</form>"#
        .to_string()
}

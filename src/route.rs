use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::require_login, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todo", get(todo_list).post(create_todo))
        .route("/delete/:todo_id", get(delete_todo))
        .route("/logout", get(logout))
        .route_layer(from_fn_with_state(app_state.clone(), require_login))
        .route("/", get(index).post(index))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::database::test_pool;

    struct Client {
        app: Router,
        pool: sqlx::SqlitePool,
        cookie: Option<String>,
    }

    impl Client {
        async fn new() -> Self {
            let pool = test_pool().await;
            let app = create_router(Arc::new(AppState::new(pool.clone(), "test-secret")));
            Client {
                app,
                pool,
                cookie: None,
            }
        }

        /// Same server, fresh cookie jar.
        fn other_browser(&self) -> Self {
            Client {
                app: self.app.clone(),
                pool: self.pool.clone(),
                cookie: None,
            }
        }

        async fn send(&mut self, request: Request<Body>) -> Response {
            let response = self.app.clone().oneshot(request).await.unwrap();
            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_string());
            }
            response
        }

        async fn get(&mut self, uri: &str) -> Response {
            let mut builder = Request::builder().uri(uri);
            if let Some(cookie) = &self.cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post(&mut self, uri: &str, form: &str) -> Response {
            let mut builder = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(cookie) = &self.cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            self.send(builder.body(Body::from(form.to_string())).unwrap()).await
        }

        async fn sign_up_and_log_in(&mut self, username: &str, email: &str, password: &str) {
            let form = format!("username={username}&email={email}&password={password}");
            let response = self.post("/register", &form).await;
            assert_eq!(location(&response), "/login");
            let response = self.post("/login", &format!("email={email}&password={password}")).await;
            assert_eq!(location(&response), "/");
        }

        async fn todo_count(&self) -> i64 {
            sqlx::query_scalar("SELECT COUNT(*) FROM todos")
                .fetch_one(&self.pool)
                .await
                .unwrap()
        }
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn task_count(page: &str) -> usize {
        page.matches("class=\"todo\"").count()
    }

    #[tokio::test]
    async fn visitors_are_sent_to_login() {
        let mut client = Client::new().await;

        let response = client.get("/").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let response = client.get("/todo").await;
        assert_eq!(location(&response), "/login");

        let page = body_text(client.get("/login").await).await;
        assert!(page.contains("Please log in to access this page."));
    }

    #[tokio::test]
    async fn search_scenario() {
        let mut client = Client::new().await;
        client.sign_up_and_log_in("alice", "a%40x.com", "pw1").await;

        let response = client
            .post("/todo", "title=buy+milk&description=&date_to_complete=2024-01-01")
            .await;
        assert_eq!(location(&response), "/todo");

        let page = body_text(client.get("/todo?search=milk").await).await;
        assert_eq!(task_count(&page), 1);
        assert!(page.contains("buy milk"));
        assert!(page.contains("Task added successfully!"));

        let page = body_text(client.get("/todo?search=bread").await).await;
        assert_eq!(task_count(&page), 0);

        let page = body_text(client.get("/").await).await;
        assert_eq!(task_count(&page), 1);
    }

    #[tokio::test]
    async fn foreign_delete_is_refused() {
        let mut alice = Client::new().await;
        alice.sign_up_and_log_in("alice", "a%40x.com", "pw1").await;
        alice
            .post("/todo", "title=buy+milk&description=&date_to_complete=")
            .await;
        let todo_id: i64 = sqlx::query_scalar("SELECT id FROM todos")
            .fetch_one(&alice.pool)
            .await
            .unwrap();

        let mut bob = alice.other_browser();
        bob.sign_up_and_log_in("bob", "b%40x.com", "pw2").await;

        let response = bob.get(&format!("/delete/{todo_id}")).await;
        assert_eq!(location(&response), "/");
        assert_eq!(alice.todo_count().await, 1);

        let page = body_text(bob.get("/").await).await;
        assert!(page.contains("You are not authorized to delete this task."));
        assert_eq!(task_count(&page), 0);

        let response = alice.get(&format!("/delete/{todo_id}")).await;
        assert_eq!(location(&response), "/todo");
        assert_eq!(alice.todo_count().await, 0);
    }

    #[tokio::test]
    async fn deleting_missing_task_is_404() {
        let mut client = Client::new().await;
        client.sign_up_and_log_in("alice", "a%40x.com", "pw1").await;

        let response = client.get("/delete/42").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_registration_flashes_conflict() {
        let mut client = Client::new().await;
        client
            .post("/register", "username=alice&email=a%40x.com&password=pw1")
            .await;

        let response = client
            .post("/register", "username=alice&email=new%40x.com&password=pw1")
            .await;
        assert_eq!(location(&response), "/register");

        let page = body_text(client.get("/register").await).await;
        assert!(page.contains("User already exists!"));
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&client.pool)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }

    #[tokio::test]
    async fn bad_credentials_rerender_login() {
        let mut client = Client::new().await;
        client
            .post("/register", "username=alice&email=a%40x.com&password=pw1")
            .await;

        let response = client.post("/login", "email=a%40x.com&password=nope").await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Invalid email or password"));

        let response = client.get("/todo").await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let mut client = Client::new().await;
        client.sign_up_and_log_in("alice", "a%40x.com", "pw1").await;

        let response = client.get("/logout").await;
        assert_eq!(location(&response), "/login");
        let page = body_text(client.get("/login").await).await;
        assert!(page.contains("Logged out successfully."));

        let response = client.get("/").await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn forged_cookie_is_ignored() {
        let mut client = Client::new().await;
        client.sign_up_and_log_in("alice", "a%40x.com", "pw1").await;
        client.cookie = Some("session=eyJ1c2VyX2lkIjoxfQ.AAAA".to_string());

        let response = client.get("/").await;
        assert_eq!(location(&response), "/login");
    }
}

/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An in-memory store seeded with reference data and three users
/// - JWT token generation
/// - Request helpers driving the full router

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use taskmanager_api::app::{build_router, AppState};
use taskmanager_api::config::Config;
use taskmanager_shared::auth::jwt::{create_token, Claims};
use taskmanager_shared::auth::password::hash_password;
use taskmanager_shared::gateway::memory::MemoryStore;
use taskmanager_shared::models::reference::{RoleKind, TaskStatusKind};
use taskmanager_shared::models::task::Task;
use taskmanager_shared::models::user::User;
use tower::ServiceExt;

pub const PASSWORD: &str = "Passw0rd!";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
    pub admin: User,
    pub user: User,
    pub other: User,
}

/// Status code and parsed envelope of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgresql://localhost/taskmanager_test"),
        ("JWT_SECRET", "test-secret-key-at-least-32-bytes-long"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Config::from_vars(&vars).expect("test config")
}

impl TestContext {
    /// Creates a context over a fresh seeded store
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::seeded());
        let config = test_config();

        let admin = store
            .insert_user(user("admin@example.com", "Ada Admin", RoleKind::Admin))
            .await;
        let user_row = store
            .insert_user(user("jane@example.com", "Jane Doe", RoleKind::User))
            .await;
        let other = store
            .insert_user(user("john@example.com", "John Roe", RoleKind::User))
            .await;

        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self {
            store,
            app,
            config,
            admin,
            user: user_row,
            other,
        }
    }

    /// Signed bearer token for a user
    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims::for_user(
            user.id,
            user.role_id,
            &user.email,
            user.full_name.as_deref().unwrap_or_default(),
            &self.config.jwt,
        );
        create_token(&claims, &self.config.jwt.secret).expect("token")
    }

    /// Inserts an active task assigned to `user_id`
    pub async fn task_for(&self, user_id: i32, title: &str, status: TaskStatusKind) -> Task {
        self.store
            .insert_task(Task {
                id: 0,
                title: title.to_string(),
                description: None,
                task_status_id: Some(status.id()),
                task_priority_id: Some(2),
                due_date: None,
                user_id: Some(user_id),
                tags: None,
                is_active: true,
                created_on: Utc::now(),
                created_by: Some(self.admin.id),
                updated_on: None,
                updated_by: None,
            })
            .await
    }

    /// Sends a request through the full router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        send(self.app.clone(), method, uri, token, body).await
    }
}

/// Sends a request through any router and parses the JSON body
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

fn user(email: &str, full_name: &str, role: RoleKind) -> User {
    let (first, last) = full_name.split_once(' ').unwrap_or((full_name, ""));

    User {
        id: 0,
        email: email.to_string(),
        full_name: Some(full_name.to_string()),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        password_hash: hash_password(PASSWORD).expect("hash"),
        role_id: role.id(),
        is_active: true,
        created_on: Utc::now(),
        updated_on: None,
    }
}

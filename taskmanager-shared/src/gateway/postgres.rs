/// PostgreSQL gateway
///
/// Thin adapter from the model functions to the gateway traits. Database
/// errors are logged here and leave this module only as Error envelopes.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use super::{month_bounds, ReferenceGateway, TaskGateway, UserGateway};
use crate::models::reference::{Role, TaskPriority, TaskStatus, TaskStatusKind};
use crate::models::task::{CreateTask, Task, TaskDetail};
use crate::models::user::{CreateUser, User};
use crate::response::ResponseMessage;

/// Gateway over a Postgres pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_failure<T>(operation: &str, e: sqlx::Error) -> ResponseMessage<T> {
    error!(operation, error = %e, "Database operation failed");
    ResponseMessage::error(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl UserGateway for PgStore {
    async fn find_active_by_email(&self, email: &str) -> ResponseMessage<User> {
        match User::find_active_by_email(&self.pool, email).await {
            Ok(Some(user)) => ResponseMessage::ok(user, "Success"),
            Ok(None) => ResponseMessage::not_found("User not found"),
            Err(e) => db_failure("find_user_by_email", e),
        }
    }

    async fn find_active_by_id(&self, id: i32) -> ResponseMessage<User> {
        match User::find_active_by_id(&self.pool, id).await {
            Ok(Some(user)) => ResponseMessage::ok(user, "Success"),
            Ok(None) => ResponseMessage::not_found("User not found"),
            Err(e) => db_failure("find_user_by_id", e),
        }
    }

    async fn create_if_absent(&self, data: CreateUser) -> ResponseMessage<User> {
        match User::email_exists(&self.pool, &data.email).await {
            Ok(true) => return ResponseMessage::bad_request("Email already exists"),
            Ok(false) => {}
            Err(e) => return db_failure("check_email", e),
        }

        // A concurrent signup can still win the race; the unique constraint decides.
        match User::create(&self.pool, data).await {
            Ok(user) => ResponseMessage::created(user, "User created successfully"),
            Err(e) if is_unique_violation(&e) => {
                ResponseMessage::bad_request("Email already exists")
            }
            Err(e) => db_failure("create_user", e),
        }
    }
}

#[async_trait]
impl TaskGateway for PgStore {
    async fn create(&self, data: CreateTask) -> ResponseMessage<Task> {
        match Task::create(&self.pool, data).await {
            Ok(task) => ResponseMessage::created(task, "Task created successfully"),
            Err(e) => db_failure("create_task", e),
        }
    }

    async fn find_active_by_id(&self, id: i32) -> ResponseMessage<TaskDetail> {
        match Task::find_active_by_id(&self.pool, id).await {
            Ok(Some(task)) => ResponseMessage::ok(task, "Success"),
            Ok(None) => ResponseMessage::not_found("Task not found"),
            Err(e) => db_failure("find_task", e),
        }
    }

    async fn list_active_by_user(
        &self,
        user_id: i32,
        status: Option<TaskStatusKind>,
    ) -> ResponseMessage<Vec<TaskDetail>> {
        match Task::list_active(&self.pool, Some(user_id), status).await {
            Ok(tasks) => ResponseMessage::ok(tasks, "Success"),
            Err(e) => db_failure("list_user_tasks", e),
        }
    }

    async fn list_active(
        &self,
        status: Option<TaskStatusKind>,
    ) -> ResponseMessage<Vec<TaskDetail>> {
        match Task::list_active(&self.pool, None, status).await {
            Ok(tasks) => ResponseMessage::ok(tasks, "Success"),
            Err(e) => db_failure("list_tasks", e),
        }
    }

    async fn update(&self, task: &Task) -> ResponseMessage<()> {
        match Task::update(&self.pool, task).await {
            Ok(true) => ResponseMessage::ok_empty("Task updated successfully"),
            Ok(false) => ResponseMessage::not_found("Task not found"),
            Err(e) => db_failure("update_task", e),
        }
    }

    async fn soft_delete(&self, id: i32) -> ResponseMessage<()> {
        match Task::soft_delete(&self.pool, id).await {
            Ok(true) => ResponseMessage::ok_empty("Task deleted successfully"),
            Ok(false) => ResponseMessage::not_found("Task not found"),
            Err(e) => db_failure("delete_task", e),
        }
    }

    async fn count_completed_in_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> ResponseMessage<i64> {
        let Some((start, end)) = month_bounds(year, month) else {
            return ResponseMessage::bad_request("Invalid month");
        };

        match Task::count_completed_updated_between(&self.pool, user_id, start, end).await {
            Ok(count) => ResponseMessage::ok(count, "Success"),
            Err(e) => db_failure("count_completed_tasks", e),
        }
    }
}

#[async_trait]
impl ReferenceGateway for PgStore {
    async fn list_priorities(&self) -> ResponseMessage<Vec<TaskPriority>> {
        match TaskPriority::list(&self.pool).await {
            Ok(priorities) => ResponseMessage::ok(priorities, "Success"),
            Err(e) => db_failure("list_priorities", e),
        }
    }

    async fn list_statuses(&self) -> ResponseMessage<Vec<TaskStatus>> {
        match TaskStatus::list(&self.pool).await {
            Ok(statuses) => ResponseMessage::ok(statuses, "Success"),
            Err(e) => db_failure("list_statuses", e),
        }
    }

    async fn find_role(&self, id: i32) -> ResponseMessage<Role> {
        match Role::find_by_id(&self.pool, id).await {
            Ok(Some(role)) => ResponseMessage::ok(role, "Success"),
            Ok(None) => ResponseMessage::not_found("Role not found"),
            Err(e) => db_failure("find_role", e),
        }
    }
}

/// Persistence gateways
///
/// One trait per entity family. Every operation returns a
/// [`ResponseMessage`] so that "not found" and store failures travel to the
/// services in the same shape as successes; nothing in this layer panics or
/// returns a raw database error.
///
/// Two implementations ship:
///
/// - [`postgres::PgStore`]: the production store over a `PgPool`
/// - [`memory::MemoryStore`]: an in-process store used by tests and local runs
///
/// Services hold the gateways as `Arc<dyn ...>` so either can be plugged in.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::models::reference::{Role, TaskPriority, TaskStatus, TaskStatusKind};
use crate::models::task::{CreateTask, Task, TaskDetail};
use crate::models::user::{CreateUser, User};
use crate::response::ResponseMessage;

/// User lookups and signup
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Active user by normalized email; NotFound("User not found") otherwise
    async fn find_active_by_email(&self, email: &str) -> ResponseMessage<User>;

    /// Active user by id; NotFound("User not found") otherwise
    async fn find_active_by_id(&self, id: i32) -> ResponseMessage<User>;

    /// Inserts the user unless the email is taken
    ///
    /// Created on success, BadRequest("Email already exists") on a duplicate.
    async fn create_if_absent(&self, data: CreateUser) -> ResponseMessage<User>;
}

/// Task persistence; every read sees active tasks only
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Created("Task created successfully") with the stored row
    async fn create(&self, data: CreateTask) -> ResponseMessage<Task>;

    /// NotFound("Task not found") when missing or soft-deleted
    async fn find_active_by_id(&self, id: i32) -> ResponseMessage<TaskDetail>;

    async fn list_active_by_user(
        &self,
        user_id: i32,
        status: Option<TaskStatusKind>,
    ) -> ResponseMessage<Vec<TaskDetail>>;

    async fn list_active(&self, status: Option<TaskStatusKind>) -> ResponseMessage<Vec<TaskDetail>>;

    /// Ok("Task updated successfully") or NotFound("Task not found")
    async fn update(&self, task: &Task) -> ResponseMessage<()>;

    /// Ok("Task deleted successfully") or NotFound("Task not found")
    async fn soft_delete(&self, id: i32) -> ResponseMessage<()>;

    /// Completed, active tasks of a user whose last update falls in the
    /// given calendar month
    async fn count_completed_in_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> ResponseMessage<i64>;
}

/// Read-only reference tables
#[async_trait]
pub trait ReferenceGateway: Send + Sync {
    async fn list_priorities(&self) -> ResponseMessage<Vec<TaskPriority>>;

    async fn list_statuses(&self) -> ResponseMessage<Vec<TaskStatus>>;

    /// NotFound("Role not found") for unknown ids
    async fn find_role(&self, id: i32) -> ResponseMessage<Role>;
}

/// Half-open UTC range `[first day of month, first day of next month)`
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).single()?;
    Some((start, end))
}

/// Year and month of the calendar month before `now`
pub fn previous_month(now: DateTime<Utc>) -> (i32, u32) {
    if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    }
}

/// Whether `at` falls in the given calendar month
pub fn in_month(at: DateTime<Utc>, year: i32, month: u32) -> bool {
    at.year() == year && at.month() == month
}

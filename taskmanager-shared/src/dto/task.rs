/// Task, dashboard and profile bodies

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;
use crate::models::task::TaskDetail;

/// Body of `POST /api/task/create`
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(custom(function = "not_blank"))]
    pub task_title: String,

    pub description: Option<String>,

    pub task_status_id: Option<i32>,

    pub task_priority_id: Option<i32>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(required, range(min = 1))]
    pub assigned_user_id: Option<i32>,

    pub tags: Option<String>,
}

/// Body of `POST /api/task/update-task`
///
/// Every field is optional; absent fields keep their stored value.
/// `assignedUserId` and `assignedTo` are accepted for client compatibility
/// but reassignment is not supported.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_title: Option<String>,
    pub task_description: Option<String>,
    pub status_id: Option<i32>,
    pub priority_id: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
    pub assigned_user_id: Option<i32>,
    pub assigned_to: Option<String>,
}

/// Task as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task_id: i32,
    pub task_title: String,
    pub description: Option<String>,
    pub status_id: Option<i32>,
    pub status_name: Option<String>,
    pub priority_id: Option<i32>,
    pub priority_name: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
    pub assigned_user_id: Option<i32>,

    /// Only filled by listings that resolve assignee names
    pub assigned_user_name: Option<String>,
}

impl TaskResponse {
    pub fn from_detail(detail: TaskDetail, assigned_user_name: Option<String>) -> Self {
        let TaskDetail {
            task,
            status_name,
            priority_name,
        } = detail;

        Self {
            task_id: task.id,
            task_title: task.title,
            description: task.description,
            status_id: task.task_status_id,
            status_name,
            priority_id: task.task_priority_id,
            priority_name,
            due_date: task.due_date,
            tags: task.tags,
            assigned_user_id: task.user_id,
            assigned_user_name,
        }
    }
}

/// Aggregate returned by `GET /api/task/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub in_progress_tasks: i64,

    #[serde(with = "rust_decimal::serde::float")]
    pub completion_percentage: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub growth_percentage: Decimal,

    pub previous_month_completed_tasks: i64,

    pub tasks: Vec<TaskResponse>,
}

/// Summary returned by `GET /api/task/user-profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: i32,

    /// Full name, empty when unset
    pub user_name: String,

    pub email: String,
    pub role_id: i32,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
    pub total_tasks: i64,
    pub completed_tasks: i64,

    #[serde(with = "rust_decimal::serde::float")]
    pub completion_rate: Decimal,
}

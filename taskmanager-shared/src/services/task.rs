/// Task rules: ownership on create, soft delete, partial update, dashboard
/// and profile aggregates
///
/// Status filters are opaque integers. Only the three well-known statuses
/// narrow a listing; any other value is ignored and the whole scope is
/// returned.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::auth::middleware::Identity;
use crate::dto::is_blank;
use crate::dto::task::{
    CreateTaskRequest, DashboardResponse, TaskResponse, UpdateTaskRequest, UserProfileResponse,
};
use crate::gateway::{in_month, previous_month, ReferenceGateway, TaskGateway, UserGateway};
use crate::models::reference::TaskStatusKind;
use crate::models::task::{CreateTask, TaskDetail};
use crate::response::ResponseMessage;

const INVALID_TASK_ID: &str = "Valid task ID is required";
const INVALID_USER_ID: &str = "Valid user ID is required";
const TASK_NOT_FOUND: &str = "Task not found";

pub struct TaskService {
    tasks: Arc<dyn TaskGateway>,
    users: Arc<dyn UserGateway>,
    references: Arc<dyn ReferenceGateway>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskGateway>,
        users: Arc<dyn UserGateway>,
        references: Arc<dyn ReferenceGateway>,
    ) -> Self {
        Self {
            tasks,
            users,
            references,
        }
    }

    /// Creates a task assigned to an active user
    ///
    /// Admins assign to anyone but themselves; everyone else only to
    /// themselves.
    pub async fn create_task(
        &self,
        request: &CreateTaskRequest,
        identity: Identity,
    ) -> ResponseMessage<TaskResponse> {
        if is_blank(Some(request.task_title.as_str())) {
            return ResponseMessage::bad_request("Task title is required");
        }

        let assignee = match request.assigned_user_id {
            Some(id) if id > 0 => id,
            _ => return ResponseMessage::bad_request("Valid assigned user ID is required"),
        };

        if identity.is_admin() {
            if assignee == identity.user_id {
                return ResponseMessage::bad_request("Admin cannot assign task to themselves");
            }
        } else if assignee != identity.user_id {
            return ResponseMessage::unauthorized("Users can only create tasks for themselves");
        }

        if !self.users.find_active_by_id(assignee).await.is_success() {
            return ResponseMessage::not_found("Assigned user not found or inactive");
        }

        let data = CreateTask {
            title: request.task_title.trim().to_string(),
            description: request.description.as_deref().map(|d| d.trim().to_string()),
            task_status_id: request.task_status_id,
            task_priority_id: request.task_priority_id,
            due_date: request.due_date,
            user_id: Some(assignee),
            tags: request.tags.as_deref().map(|t| t.trim().to_string()),
            created_by: identity.user_id,
        };

        self.tasks.create(data).await.map(|task| {
            TaskResponse::from_detail(
                TaskDetail {
                    task,
                    status_name: None,
                    priority_name: None,
                },
                None,
            )
        })
    }

    /// Single active task with its status and priority names
    pub async fn get_task_by_id(&self, task_id: i32) -> ResponseMessage<TaskResponse> {
        if task_id <= 0 {
            return ResponseMessage::bad_request(INVALID_TASK_ID);
        }

        match self.tasks.find_active_by_id(task_id).await.into_result::<()>() {
            Ok(detail) => ResponseMessage::ok(TaskResponse::from_detail(detail, None), "Success"),
            Err(failure) => not_found_as(failure, TASK_NOT_FOUND),
        }
    }

    /// The caller's active tasks, NotFound when there are none
    pub async fn get_my_tasks(
        &self,
        user_id: i32,
        status_filter: Option<i32>,
    ) -> ResponseMessage<Vec<TaskResponse>> {
        if user_id <= 0 {
            return ResponseMessage::bad_request(INVALID_USER_ID);
        }

        let status = status_filter.and_then(TaskStatusKind::from_id);
        let tasks = match self.tasks.list_active_by_user(user_id, status).await.into_result() {
            Ok(tasks) => tasks,
            Err(failure) => return failure,
        };

        if tasks.is_empty() {
            return ResponseMessage::not_found("No tasks found");
        }

        let list = tasks
            .into_iter()
            .map(|detail| TaskResponse::from_detail(detail, None))
            .collect();
        ResponseMessage::ok(list, "Success")
    }

    /// Every active task with assignee names; an empty list is still Ok
    pub async fn get_all_tasks(
        &self,
        status_filter: Option<i32>,
    ) -> ResponseMessage<Vec<TaskResponse>> {
        let status = status_filter.and_then(TaskStatusKind::from_id);
        let tasks = match self.tasks.list_active(status).await.into_result() {
            Ok(tasks) => tasks,
            Err(failure) => return failure,
        };

        let list = self.with_assignee_names(tasks).await;
        ResponseMessage::ok(list, "Success")
    }

    /// Soft-deletes an active task
    pub async fn delete_task_by_id(&self, task_id: i32) -> ResponseMessage<()> {
        if task_id <= 0 {
            return ResponseMessage::bad_request(INVALID_TASK_ID);
        }

        let deleted = self.tasks.soft_delete(task_id).await;
        match deleted.status_code() {
            200 => ResponseMessage::ok_empty("Task deleted successfully"),
            404 => ResponseMessage::not_found(TASK_NOT_FOUND),
            _ => {
                warn!(task_id, reason = deleted.message(), "Task deletion failed");
                ResponseMessage::error("Task deletion failed")
            }
        }
    }

    /// Overwrites the fields present in the request and stamps the update
    ///
    /// Last write wins. `updated_by` is left empty when the caller's
    /// subject claim did not parse.
    pub async fn update_task_by_id(
        &self,
        task_id: i32,
        request: &UpdateTaskRequest,
        updated_by: Option<i32>,
    ) -> ResponseMessage<()> {
        if task_id <= 0 {
            return ResponseMessage::bad_request(INVALID_TASK_ID);
        }

        let mut task = match self.tasks.find_active_by_id(task_id).await.into_result::<()>() {
            Ok(detail) => detail.task,
            Err(failure) => return not_found_as(failure, TASK_NOT_FOUND),
        };

        if let Some(title) = &request.task_title {
            task.title = title.clone();
        }
        if let Some(description) = &request.task_description {
            task.description = Some(description.clone());
        }
        if let Some(status_id) = request.status_id {
            task.task_status_id = Some(status_id);
        }
        if let Some(priority_id) = request.priority_id {
            task.task_priority_id = Some(priority_id);
        }
        if let Some(due_date) = request.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(tags) = &request.tags {
            task.tags = Some(tags.clone());
        }
        task.updated_on = Some(Utc::now());
        task.updated_by = updated_by;

        let updated = self.tasks.update(&task).await;
        if updated.is_success() {
            ResponseMessage::ok_empty("Task updated successfully")
        } else {
            not_found_as(updated, TASK_NOT_FOUND)
        }
    }

    /// Dashboard for one user, or for everyone when `user_id` is `None`
    pub async fn get_dashboard(&self, user_id: Option<i32>) -> ResponseMessage<DashboardResponse> {
        self.dashboard_at(user_id, Utc::now()).await
    }

    pub(crate) async fn dashboard_at(
        &self,
        user_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> ResponseMessage<DashboardResponse> {
        if user_id.is_some_and(|id| id <= 0) {
            return ResponseMessage::bad_request(INVALID_USER_ID);
        }

        let listed = match user_id {
            Some(id) => self.tasks.list_active_by_user(id, None).await,
            None => self.tasks.list_active(None).await,
        };
        let tasks = match listed.into_result() {
            Ok(tasks) => tasks,
            Err(failure) => return failure,
        };

        let (year, month) = previous_month(now);
        let previous_month_completed = match user_id {
            Some(id) => self
                .tasks
                .count_completed_in_month(id, year, month)
                .await
                .into_data()
                .unwrap_or(0),
            // Admin scope counts by creation month, not completion month.
            None => match self.tasks.list_active(None).await.into_data() {
                Some(all) => all
                    .iter()
                    .filter(|d| d.task.has_status(TaskStatusKind::Completed))
                    .filter(|d| in_month(d.task.created_on, year, month))
                    .count() as i64,
                None => 0,
            },
        };

        let count = |status: TaskStatusKind| {
            tasks.iter().filter(|d| d.task.has_status(status)).count() as i64
        };
        let total = tasks.len() as i64;
        let completed = count(TaskStatusKind::Completed);
        let pending = count(TaskStatusKind::Pending);
        let in_progress = count(TaskStatusKind::InProgress);

        debug!(total, completed, previous_month_completed, "Computed dashboard counts");

        let dashboard = DashboardResponse {
            total_tasks: total,
            completed_tasks: completed,
            pending_tasks: pending,
            in_progress_tasks: in_progress,
            completion_percentage: percentage(completed, total),
            growth_percentage: growth(completed, previous_month_completed),
            previous_month_completed_tasks: previous_month_completed,
            tasks: self.with_assignee_names(tasks).await,
        };

        ResponseMessage::ok(dashboard, "Dashboard data retrieved successfully")
    }

    /// Profile summary for an active user
    pub async fn get_user_profile(&self, user_id: i32) -> ResponseMessage<UserProfileResponse> {
        if user_id <= 0 {
            return ResponseMessage::bad_request(INVALID_USER_ID);
        }

        let user = match self.users.find_active_by_id(user_id).await.into_result::<()>() {
            Ok(user) => user,
            Err(failure) => return not_found_as(failure, "User not found"),
        };

        let tasks = match self.tasks.list_active_by_user(user_id, None).await.into_result() {
            Ok(tasks) => tasks,
            Err(failure) => return failure,
        };

        let role_name = self
            .references
            .find_role(user.role_id)
            .await
            .into_data()
            .map(|role| role.name)
            .unwrap_or_default();

        let total = tasks.len() as i64;
        let completed = tasks
            .iter()
            .filter(|d| d.task.has_status(TaskStatusKind::Completed))
            .count() as i64;

        let profile = UserProfileResponse {
            user_id: user.id,
            user_name: user.full_name.unwrap_or_default(),
            email: user.email,
            role_id: user.role_id,
            role_name,
            created_at: user.created_on,
            total_tasks: total,
            completed_tasks: completed,
            completion_rate: percentage(completed, total),
        };

        ResponseMessage::ok(profile, "User profile retrieved successfully")
    }

    /// Maps tasks to responses, resolving each distinct assignee once
    async fn with_assignee_names(&self, tasks: Vec<TaskDetail>) -> Vec<TaskResponse> {
        let mut names: HashMap<i32, Option<String>> = HashMap::new();

        for user_id in tasks.iter().filter_map(|d| d.task.user_id) {
            if names.contains_key(&user_id) {
                continue;
            }
            let name = self
                .users
                .find_active_by_id(user_id)
                .await
                .into_data()
                .map(|user| user.display_name());
            names.insert(user_id, name);
        }

        tasks
            .into_iter()
            .map(|detail| {
                let name = detail
                    .task
                    .user_id
                    .and_then(|id| names.get(&id).cloned().flatten());
                TaskResponse::from_detail(detail, name)
            })
            .collect()
    }
}

/// Replaces a 404's message, relays any other failure unchanged
fn not_found_as<T, U>(failure: ResponseMessage<T>, message: &str) -> ResponseMessage<U> {
    if failure.status_code() == 404 {
        ResponseMessage::not_found(message)
    } else {
        failure.into_failure()
    }
}

/// `part / whole * 100` to two places, 0 when `whole` is 0
pub fn percentage(part: i64, whole: i64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)).round_dp(2)
}

/// Month-over-month growth of completed tasks
///
/// 100 when there is no baseline but some current work, 0 when both are 0.
pub fn growth(current: i64, previous: i64) -> Decimal {
    if previous > 0 {
        (Decimal::from(current - previous) * Decimal::ONE_HUNDRED / Decimal::from(previous))
            .round_dp(2)
    } else if current > 0 {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

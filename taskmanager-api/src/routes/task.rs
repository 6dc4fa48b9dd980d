/// Task endpoints
///
/// Every route here sits behind `require_auth`, so an `AuthContext` is
/// always attached. Handlers still check that the claims they need parsed.
///
/// - `POST /api/task/create`
/// - `GET  /api/task/:task_id`
/// - `GET  /api/task/my-tasks?status=`
/// - `GET  /api/task/all?statusId=` (admins only)
/// - `POST /api/task/delete?taskId=`
/// - `POST /api/task/update-task?taskId=`
/// - `GET  /api/task/dashboard`
/// - `GET  /api/task/user-profile`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use taskmanager_shared::{
    auth::middleware::{AuthContext, Identity},
    dto::task::{
        CreateTaskRequest, DashboardResponse, TaskResponse, UpdateTaskRequest,
        UserProfileResponse,
    },
    response::ResponseMessage,
};
use validator::Validate;

const INVALID_TOKEN: &str = "Invalid token";
const INVALID_TASK_ID: &str = "Valid task ID is required";

/// `?status=` on `/my-tasks`
#[derive(Debug, Default, Deserialize)]
pub struct MyTasksQuery {
    pub status: Option<i32>,
}

/// `?statusId=` on `/all`
#[derive(Debug, Default, Deserialize)]
pub struct AllTasksQuery {
    #[serde(rename = "statusId")]
    pub status_id: Option<i32>,
}

/// `?taskId=`; a missing id reads as 0 and is rejected as invalid
#[derive(Debug, Default, Deserialize)]
pub struct TaskIdQuery {
    #[serde(default, rename = "taskId")]
    pub task_id: i32,
}

type Context = Option<Extension<AuthContext>>;

fn identity(context: &Context, message: &str) -> ApiResult<Identity> {
    context
        .as_ref()
        .and_then(|Extension(ctx)| ctx.identity())
        .ok_or_else(|| ApiError::Unauthorized(message.to_string()))
}

fn user_id(context: &Context) -> ApiResult<i32> {
    context
        .as_ref()
        .and_then(|Extension(ctx)| ctx.user_id)
        .ok_or_else(|| ApiError::Unauthorized(INVALID_TOKEN.to_string()))
}

fn valid_task_id(task_id: i32) -> ApiResult<i32> {
    if task_id <= 0 {
        return Err(ApiError::BadRequest(INVALID_TASK_ID.to_string()));
    }
    Ok(task_id)
}

fn completed<T>(operation: &str, response: ResponseMessage<T>) -> ApiResult<ResponseMessage<T>> {
    tracing::info!(
        status_code = response.status_code(),
        "{} completed with status code",
        operation
    );
    Ok(response)
}

/// Create a task
///
/// ```text
/// POST /api/task/create
/// Authorization: Bearer <token>
///
/// {
///   "taskTitle": "Write report",
///   "description": "Quarterly numbers",
///   "taskStatusId": 1,
///   "taskPriorityId": 2,
///   "dueDate": "2024-06-30T00:00:00Z",
///   "assignedUserId": 5,
///   "tags": "reports"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing title or assignee, admin assigning to self
/// - `401 Unauthorized`: Missing claims, or a user assigning to someone else
/// - `404 Not Found`: Assignee missing or inactive
pub async fn create_task(
    State(state): State<AppState>,
    context: Context,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<ResponseMessage<TaskResponse>> {
    tracing::info!("Create task request received");

    let identity = identity(&context, "Invalid token claims")?;

    let Json(req) = body?;
    if req.validate().is_err() {
        tracing::warn!("Create task request failed validation");
        return Err(ApiError::BadRequest(
            "Invalid task data. Title and assigned user are required.".to_string(),
        ));
    }

    let response = state.services.tasks.create_task(&req, identity).await;
    completed("Create task", response)
}

/// Fetch one active task
pub async fn get_task_by_id(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<ResponseMessage<TaskResponse>> {
    tracing::info!("Get task request received");

    let Path(task_id) = path?;
    let task_id = valid_task_id(task_id)?;

    let response = state.services.tasks.get_task_by_id(task_id).await;
    completed("Get task", response)
}

/// The caller's own tasks, optionally filtered by status
pub async fn get_my_tasks(
    State(state): State<AppState>,
    context: Context,
    query: Result<Query<MyTasksQuery>, QueryRejection>,
) -> ApiResult<ResponseMessage<Vec<TaskResponse>>> {
    tracing::info!("Get my tasks request received");

    let user_id = user_id(&context)?;
    let Query(query) = query?;

    let response = state.services.tasks.get_my_tasks(user_id, query.status).await;
    completed("Get my tasks", response)
}

/// Every active task; admins only
pub async fn get_all_tasks(
    State(state): State<AppState>,
    context: Context,
    query: Result<Query<AllTasksQuery>, QueryRejection>,
) -> ApiResult<ResponseMessage<Vec<TaskResponse>>> {
    tracing::info!("Get all tasks request received");

    let is_admin = context.as_ref().is_some_and(|Extension(ctx)| ctx.is_admin());
    if !is_admin {
        tracing::warn!("Non-admin attempted to list all tasks");
        return Err(ApiError::Unauthorized(
            "Only administrators can view all tasks".to_string(),
        ));
    }

    let Query(query) = query?;

    let response = state.services.tasks.get_all_tasks(query.status_id).await;
    completed("Get all tasks", response)
}

/// Soft-delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
) -> ApiResult<ResponseMessage<()>> {
    tracing::info!("Delete task request received");

    let Query(query) = query?;
    let task_id = valid_task_id(query.task_id)?;

    let response = state.services.tasks.delete_task_by_id(task_id).await;
    completed("Delete task", response)
}

/// Partial update; absent fields keep their stored value
pub async fn update_task(
    State(state): State<AppState>,
    context: Context,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<ResponseMessage<()>> {
    tracing::info!("Update task request received");

    let Query(query) = query?;
    let task_id = valid_task_id(query.task_id)?;
    let updated_by = context.as_ref().and_then(|Extension(ctx)| ctx.user_id);
    let Json(req) = body?;

    let response = state
        .services
        .tasks
        .update_task_by_id(task_id, &req, updated_by)
        .await;
    completed("Update task", response)
}

/// Dashboard; admins see every task, users their own
///
/// Only the subject claim is required. A missing or unparsable role falls
/// back to the user's own scope.
pub async fn get_dashboard(
    State(state): State<AppState>,
    context: Context,
) -> ApiResult<ResponseMessage<DashboardResponse>> {
    tracing::info!("Get dashboard request received");

    let user_id = user_id(&context)?;
    let is_admin = context.as_ref().is_some_and(|Extension(ctx)| ctx.is_admin());
    let scope = (!is_admin).then_some(user_id);

    let response = state.services.tasks.get_dashboard(scope).await;
    completed("Get dashboard", response)
}

/// The caller's profile summary
pub async fn get_user_profile(
    State(state): State<AppState>,
    context: Context,
) -> ApiResult<ResponseMessage<UserProfileResponse>> {
    tracing::info!("Get user profile request received");

    let user_id = user_id(&context)?;

    let response = state.services.tasks.get_user_profile(user_id).await;
    completed("Get user profile", response)
}

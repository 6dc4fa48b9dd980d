/// Task model and database operations
///
/// Tasks are soft-deleted: `is_active = FALSE` marks a task as logically
/// deleted, and every read in this module goes through
/// [`active_task_select`] so that inactive rows never leak into a listing or
/// lookup.
///
/// # Status
///
/// `task_status_id` is an opaque integer. The well-known values are listed in
/// [`TaskStatusKind`]; any other value is stored as-is.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description VARCHAR(500),
///     task_status_id INTEGER,
///     task_priority_id INTEGER,
///     due_date TIMESTAMPTZ,
///     user_id INTEGER REFERENCES users(id),
///     tags VARCHAR(255),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_by INTEGER,
///     updated_on TIMESTAMPTZ,
///     updated_by INTEGER
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::task::{Task, CreateTask};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write report".to_string(),
///     description: None,
///     task_status_id: Some(1),
///     task_priority_id: Some(2),
///     due_date: None,
///     user_id: Some(5),
///     tags: None,
///     created_by: 1,
/// }).await?;
///
/// Task::soft_delete(&pool, task.id).await?;
/// assert!(Task::find_active_by_id(&pool, task.id).await?.is_none());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::reference::TaskStatusKind;

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.task_status_id, t.task_priority_id, \
                            t.due_date, t.user_id, t.tags, t.is_active, t.created_on, \
                            t.created_by, t.updated_on, t.updated_by";

/// Task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i32,

    pub title: String,

    pub description: Option<String>,

    /// Raw status id
    pub task_status_id: Option<i32>,

    /// Raw priority id
    pub task_priority_id: Option<i32>,

    pub due_date: Option<DateTime<Utc>>,

    /// Assignee (nullable)
    pub user_id: Option<i32>,

    /// Free-text tags
    pub tags: Option<String>,

    /// `false` once the task is soft-deleted
    pub is_active: bool,

    pub created_on: DateTime<Utc>,

    pub created_by: Option<i32>,

    pub updated_on: Option<DateTime<Utc>>,

    pub updated_by: Option<i32>,
}

impl Task {
    /// Whether the task is in the given well-known status
    pub fn has_status(&self, status: TaskStatusKind) -> bool {
        status.matches(self.task_status_id)
    }
}

/// Task joined with its status and priority display names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,

    pub status_name: Option<String>,

    pub priority_name: Option<String>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub task_status_id: Option<i32>,
    pub task_priority_id: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    pub tags: Option<String>,

    /// Acting user
    pub created_by: i32,
}

/// Builds a SELECT over active tasks joined with their reference names
///
/// `filters` are extra SQL predicates ANDed onto the active-only predicate.
fn active_task_select(filters: &[String]) -> String {
    let mut query = format!(
        "SELECT {TASK_COLUMNS}, s.name AS status_name, p.name AS priority_name \
         FROM tasks t \
         LEFT JOIN task_statuses s ON s.id = t.task_status_id \
         LEFT JOIN task_priorities p ON p.id = t.task_priority_id \
         WHERE t.is_active = TRUE"
    );

    for filter in filters {
        query.push_str(" AND ");
        query.push_str(filter);
    }

    query.push_str(" ORDER BY t.id");
    query
}

impl Task {
    /// Inserts a new active task stamped with the current time
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, task_status_id, task_priority_id, due_date,
                               user_id, tags, is_active, created_on, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW(), $8)
            RETURNING id, title, description, task_status_id, task_priority_id, due_date,
                      user_id, tags, is_active, created_on, created_by, updated_on, updated_by
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.task_status_id)
        .bind(data.task_priority_id)
        .bind(data.due_date)
        .bind(data.user_id)
        .bind(data.tags)
        .bind(data.created_by)
        .fetch_one(pool)
        .await
    }

    /// Finds an active task by id
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<TaskDetail>, sqlx::Error> {
        let query = active_task_select(&["t.id = $1".to_string()]);

        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists active tasks, optionally narrowed to an assignee and a status
    pub async fn list_active(
        pool: &PgPool,
        user_id: Option<i32>,
        status: Option<TaskStatusKind>,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let mut filters = Vec::new();
        let mut bind_count = 0;

        if user_id.is_some() {
            bind_count += 1;
            filters.push(format!("t.user_id = ${}", bind_count));
        }
        if status.is_some() {
            bind_count += 1;
            filters.push(format!("t.task_status_id = ${}", bind_count));
        }

        let query = active_task_select(&filters);
        let mut q = sqlx::query_as::<_, TaskDetail>(&query);

        if let Some(user_id) = user_id {
            q = q.bind(user_id);
        }
        if let Some(status) = status {
            q = q.bind(status.id());
        }

        q.fetch_all(pool).await
    }

    /// Writes every mutable column of an active task back to the store
    ///
    /// Last write wins; there is no version check.
    ///
    /// # Returns
    ///
    /// True if an active row was updated
    pub async fn update(pool: &PgPool, task: &Task) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, task_status_id = $4, task_priority_id = $5,
                due_date = $6, tags = $7, updated_on = $8, updated_by = $9
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.task_status_id)
        .bind(task.task_priority_id)
        .bind(task.due_date)
        .bind(&task.tags)
        .bind(task.updated_on)
        .bind(task.updated_by)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips the active flag off
    ///
    /// # Returns
    ///
    /// True if an active task was found and deactivated
    pub async fn soft_delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_active = FALSE, updated_on = NOW()
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts a user's active completed tasks last updated in `[start, end)`
    pub async fn count_completed_updated_between(
        pool: &PgPool,
        user_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE user_id = $1 AND task_status_id = $2 AND is_active = TRUE
              AND updated_on >= $3 AND updated_on < $4
            "#,
        )
        .bind(user_id)
        .bind(TaskStatusKind::Completed.id())
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_select_always_filters_inactive() {
        let query = active_task_select(&[]);
        assert!(query.contains("t.is_active = TRUE"));
        assert!(query.contains("LEFT JOIN task_statuses"));
    }

    #[test]
    fn test_active_select_appends_filters() {
        let query = active_task_select(&["t.user_id = $1".to_string(), "t.id = $2".to_string()]);
        assert!(query.contains("t.is_active = TRUE AND t.user_id = $1 AND t.id = $2"));
        assert!(query.ends_with("ORDER BY t.id"));
    }

    #[test]
    fn test_has_status() {
        let task = Task {
            id: 1,
            title: "t".to_string(),
            description: None,
            task_status_id: Some(TaskStatusKind::InProgress.id()),
            task_priority_id: None,
            due_date: None,
            user_id: None,
            tags: None,
            is_active: true,
            created_on: Utc::now(),
            created_by: Some(1),
            updated_on: None,
            updated_by: None,
        };

        assert!(task.has_status(TaskStatusKind::InProgress));
        assert!(!task.has_status(TaskStatusKind::Completed));
    }
}

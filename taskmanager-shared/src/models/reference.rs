/// Static reference data: roles, task statuses, task priorities
///
/// These tables are seeded outside the application and never written by it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles           (id SERIAL PRIMARY KEY, name VARCHAR(50) NOT NULL);
/// CREATE TABLE task_statuses   (id SERIAL PRIMARY KEY, name VARCHAR(50) NOT NULL);
/// CREATE TABLE task_priorities (id SERIAL PRIMARY KEY, name VARCHAR(50) NOT NULL);
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Well-known role ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    /// Sees and manages every task
    Admin,

    /// Sees only their own tasks
    User,
}

impl RoleKind {
    /// Database id of the role
    pub fn id(self) -> i32 {
        match self {
            RoleKind::Admin => 1,
            RoleKind::User => 2,
        }
    }

    /// Looks up a role by id
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(RoleKind::Admin),
            2 => Some(RoleKind::User),
            _ => None,
        }
    }
}

/// Well-known task status ids
///
/// Status values on tasks are stored as plain integers; these are the only
/// ones the listing filters and dashboard counters understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatusKind {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatusKind {
    /// Database id of the status
    pub fn id(self) -> i32 {
        match self {
            TaskStatusKind::Pending => 1,
            TaskStatusKind::InProgress => 2,
            TaskStatusKind::Completed => 3,
        }
    }

    /// Recognizes a status id; anything else returns `None`
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(TaskStatusKind::Pending),
            2 => Some(TaskStatusKind::InProgress),
            3 => Some(TaskStatusKind::Completed),
            _ => None,
        }
    }

    /// Whether a raw status column holds this status
    pub fn matches(self, status_id: Option<i32>) -> bool {
        status_id == Some(self.id())
    }
}

/// Role row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    #[serde(rename = "roleId")]
    pub id: i32,

    #[serde(rename = "roleName")]
    pub name: String,
}

/// Task status row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStatus {
    #[serde(rename = "taskStatusId")]
    pub id: i32,

    #[serde(rename = "taskStatusName")]
    pub name: String,
}

/// Task priority row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskPriority {
    #[serde(rename = "taskPriorityId")]
    pub id: i32,

    #[serde(rename = "taskPriorityName")]
    pub name: String,
}

impl Role {
    /// Finds a role by id
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

impl TaskStatus {
    /// Lists every status, ordered by id
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TaskStatus>("SELECT id, name FROM task_statuses ORDER BY id")
            .fetch_all(pool)
            .await
    }
}

impl TaskPriority {
    /// Lists every priority, ordered by id
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TaskPriority>("SELECT id, name FROM task_priorities ORDER BY id")
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids_round_trip() {
        assert_eq!(RoleKind::from_id(RoleKind::Admin.id()), Some(RoleKind::Admin));
        assert_eq!(RoleKind::from_id(RoleKind::User.id()), Some(RoleKind::User));
        assert_eq!(RoleKind::from_id(99), None);
    }

    #[test]
    fn test_status_recognition() {
        assert_eq!(TaskStatusKind::from_id(1), Some(TaskStatusKind::Pending));
        assert_eq!(TaskStatusKind::from_id(3), Some(TaskStatusKind::Completed));
        assert_eq!(TaskStatusKind::from_id(0), None);
        assert_eq!(TaskStatusKind::from_id(42), None);
    }

    #[test]
    fn test_status_matches_raw_column() {
        assert!(TaskStatusKind::Completed.matches(Some(3)));
        assert!(!TaskStatusKind::Completed.matches(Some(1)));
        assert!(!TaskStatusKind::Completed.matches(None));
    }

    #[test]
    fn test_priority_serializes_with_original_names() {
        let priority = TaskPriority {
            id: 2,
            name: "High".to_string(),
        };
        let json = serde_json::to_value(&priority).unwrap();
        assert_eq!(json["taskPriorityId"], 2);
        assert_eq!(json["taskPriorityName"], "High");
    }
}

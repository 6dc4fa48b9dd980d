/// In-memory gateway
///
/// Keeps every table in a `Vec` behind a `tokio::sync::RwLock` and mirrors
/// the Postgres gateway's envelopes and filters, including the active-only
/// predicate. Used by the test suites so services and routes can be exercised
/// without a database.
///
/// Two hooks exist for tests: [`MemoryStore::set_unavailable`] makes every
/// operation fail with an Error envelope, and [`MemoryStore::user_lookups`]
/// counts calls to `UserGateway::find_active_by_id`.
///
/// # Example
///
/// ```
/// use taskmanager_shared::gateway::memory::MemoryStore;
/// use taskmanager_shared::gateway::ReferenceGateway;
///
/// # async fn example() {
/// let store = MemoryStore::seeded();
/// let statuses = store.list_statuses().await;
/// assert_eq!(statuses.data().map(Vec::len), Some(3));
/// # }
/// ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{month_bounds, ReferenceGateway, TaskGateway, UserGateway};
use crate::models::reference::{Role, RoleKind, TaskPriority, TaskStatus, TaskStatusKind};
use crate::models::task::{CreateTask, Task, TaskDetail};
use crate::models::user::{CreateUser, User};
use crate::response::ResponseMessage;

const UNAVAILABLE: &str = "Store unavailable";

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    roles: Vec<Role>,
    statuses: Vec<TaskStatus>,
    priorities: Vec<TaskPriority>,
}

impl Tables {
    fn next_user_id(&self) -> i32 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    fn next_task_id(&self) -> i32 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn detail(&self, task: &Task) -> TaskDetail {
        let status_name = task
            .task_status_id
            .and_then(|id| self.statuses.iter().find(|s| s.id == id))
            .map(|s| s.name.clone());
        let priority_name = task
            .task_priority_id
            .and_then(|id| self.priorities.iter().find(|p| p.id == id))
            .map(|p| p.name.clone());

        TaskDetail {
            task: task.clone(),
            status_name,
            priority_name,
        }
    }

    fn active_tasks<'a>(
        &'a self,
        user_id: Option<i32>,
        status: Option<TaskStatusKind>,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(|t| t.is_active)
            .filter(move |t| user_id.map_or(true, |uid| t.user_id == Some(uid)))
            .filter(move |t| status.map_or(true, |s| t.has_status(s)))
    }
}

/// Gateway backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    user_lookups: AtomicUsize,
}

impl MemoryStore {
    /// Empty store, no reference data
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the standard roles, statuses and priorities
    pub fn seeded() -> Self {
        let tables = Tables {
            roles: vec![
                Role {
                    id: RoleKind::Admin.id(),
                    name: "Admin".to_string(),
                },
                Role {
                    id: RoleKind::User.id(),
                    name: "User".to_string(),
                },
            ],
            statuses: vec![
                TaskStatus {
                    id: TaskStatusKind::Pending.id(),
                    name: "Pending".to_string(),
                },
                TaskStatus {
                    id: TaskStatusKind::InProgress.id(),
                    name: "In Progress".to_string(),
                },
                TaskStatus {
                    id: TaskStatusKind::Completed.id(),
                    name: "Completed".to_string(),
                },
            ],
            priorities: vec![
                TaskPriority {
                    id: 1,
                    name: "Low".to_string(),
                },
                TaskPriority {
                    id: 2,
                    name: "Medium".to_string(),
                },
                TaskPriority {
                    id: 3,
                    name: "High".to_string(),
                },
            ],
            ..Default::default()
        };

        Self {
            tables: RwLock::new(tables),
            ..Default::default()
        }
    }

    /// Makes every subsequent operation fail with an Error envelope
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `find_active_by_id` user lookups served so far
    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    /// Inserts a user row as-is; an `id` of 0 is replaced with the next id
    pub async fn insert_user(&self, mut user: User) -> User {
        let mut tables = self.tables.write().await;
        if user.id == 0 {
            user.id = tables.next_user_id();
        }
        tables.users.push(user.clone());
        user
    }

    /// Inserts a task row as-is, keeping its timestamps; an `id` of 0 is
    /// replaced with the next id
    pub async fn insert_task(&self, mut task: Task) -> Task {
        let mut tables = self.tables.write().await;
        if task.id == 0 {
            task.id = tables.next_task_id();
        }
        tables.tasks.push(task.clone());
        task
    }

    /// Raw task row, including soft-deleted ones
    pub async fn task(&self, id: i32) -> Option<Task> {
        self.tables.read().await.tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Raw user row by email, including inactive ones
    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserGateway for MemoryStore {
    async fn find_active_by_email(&self, email: &str) -> ResponseMessage<User> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let tables = self.tables.read().await;
        match tables.users.iter().find(|u| u.is_active && u.email == email) {
            Some(user) => ResponseMessage::ok(user.clone(), "Success"),
            None => ResponseMessage::not_found("User not found"),
        }
    }

    async fn find_active_by_id(&self, id: i32) -> ResponseMessage<User> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let tables = self.tables.read().await;
        match tables.users.iter().find(|u| u.is_active && u.id == id) {
            Some(user) => ResponseMessage::ok(user.clone(), "Success"),
            None => ResponseMessage::not_found("User not found"),
        }
    }

    async fn create_if_absent(&self, data: CreateUser) -> ResponseMessage<User> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == data.email) {
            return ResponseMessage::bad_request("Email already exists");
        }

        let user = User {
            id: tables.next_user_id(),
            email: data.email,
            full_name: Some(data.full_name),
            first_name: Some(data.first_name),
            last_name: Some(data.last_name),
            password_hash: data.password_hash,
            role_id: data.role_id,
            is_active: true,
            created_on: Utc::now(),
            updated_on: None,
        };
        tables.users.push(user.clone());

        ResponseMessage::created(user, "User created successfully")
    }
}

#[async_trait]
impl TaskGateway for MemoryStore {
    async fn create(&self, data: CreateTask) -> ResponseMessage<Task> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let mut tables = self.tables.write().await;
        let task = Task {
            id: tables.next_task_id(),
            title: data.title,
            description: data.description,
            task_status_id: data.task_status_id,
            task_priority_id: data.task_priority_id,
            due_date: data.due_date,
            user_id: data.user_id,
            tags: data.tags,
            is_active: true,
            created_on: Utc::now(),
            created_by: Some(data.created_by),
            updated_on: None,
            updated_by: None,
        };
        tables.tasks.push(task.clone());

        ResponseMessage::created(task, "Task created successfully")
    }

    async fn find_active_by_id(&self, id: i32) -> ResponseMessage<TaskDetail> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let tables = self.tables.read().await;
        let found = match tables.active_tasks(None, None).find(|t| t.id == id) {
            Some(task) => ResponseMessage::ok(tables.detail(task), "Success"),
            None => ResponseMessage::not_found("Task not found"),
        };
        found
    }

    async fn list_active_by_user(
        &self,
        user_id: i32,
        status: Option<TaskStatusKind>,
    ) -> ResponseMessage<Vec<TaskDetail>> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let tables = self.tables.read().await;
        let tasks = tables
            .active_tasks(Some(user_id), status)
            .map(|t| tables.detail(t))
            .collect();
        ResponseMessage::ok(tasks, "Success")
    }

    async fn list_active(
        &self,
        status: Option<TaskStatusKind>,
    ) -> ResponseMessage<Vec<TaskDetail>> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let tables = self.tables.read().await;
        let tasks = tables
            .active_tasks(None, status)
            .map(|t| tables.detail(t))
            .collect();
        ResponseMessage::ok(tasks, "Success")
    }

    async fn update(&self, task: &Task) -> ResponseMessage<()> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let mut tables = self.tables.write().await;
        let Some(stored) = tables
            .tasks
            .iter_mut()
            .find(|t| t.is_active && t.id == task.id)
        else {
            return ResponseMessage::not_found("Task not found");
        };

        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.task_status_id = task.task_status_id;
        stored.task_priority_id = task.task_priority_id;
        stored.due_date = task.due_date;
        stored.tags = task.tags.clone();
        stored.updated_on = task.updated_on;
        stored.updated_by = task.updated_by;

        ResponseMessage::ok_empty("Task updated successfully")
    }

    async fn soft_delete(&self, id: i32) -> ResponseMessage<()> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let mut tables = self.tables.write().await;
        match tables.tasks.iter_mut().find(|t| t.is_active && t.id == id) {
            Some(task) => {
                task.is_active = false;
                task.updated_on = Some(Utc::now());
                ResponseMessage::ok_empty("Task deleted successfully")
            }
            None => ResponseMessage::not_found("Task not found"),
        }
    }

    async fn count_completed_in_month(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> ResponseMessage<i64> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }
        let Some((start, end)) = month_bounds(year, month) else {
            return ResponseMessage::bad_request("Invalid month");
        };

        let tables = self.tables.read().await;
        let count = tables
            .active_tasks(Some(user_id), Some(TaskStatusKind::Completed))
            .filter(|t| t.updated_on.is_some_and(|at| at >= start && at < end))
            .count();

        ResponseMessage::ok(count as i64, "Success")
    }
}

#[async_trait]
impl ReferenceGateway for MemoryStore {
    async fn list_priorities(&self) -> ResponseMessage<Vec<TaskPriority>> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }
        ResponseMessage::ok(self.tables.read().await.priorities.clone(), "Success")
    }

    async fn list_statuses(&self) -> ResponseMessage<Vec<TaskStatus>> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }
        ResponseMessage::ok(self.tables.read().await.statuses.clone(), "Success")
    }

    async fn find_role(&self, id: i32) -> ResponseMessage<Role> {
        if self.is_unavailable() {
            return ResponseMessage::error(UNAVAILABLE);
        }

        let tables = self.tables.read().await;
        match tables.roles.iter().find(|r| r.id == id) {
            Some(role) => ResponseMessage::ok(role.clone(), "Success"),
            None => ResponseMessage::not_found("Role not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn task(user_id: i32, status: TaskStatusKind) -> Task {
        Task {
            id: 0,
            title: "t".to_string(),
            description: None,
            task_status_id: Some(status.id()),
            task_priority_id: Some(2),
            due_date: None,
            user_id: Some(user_id),
            tags: None,
            is_active: true,
            created_on: Utc::now(),
            created_by: Some(1),
            updated_on: None,
            updated_by: None,
        }
    }

    #[tokio::test]
    async fn test_soft_deleted_tasks_are_invisible() {
        let store = MemoryStore::seeded();
        let kept = store.insert_task(task(2, TaskStatusKind::Pending)).await;
        let gone = store.insert_task(task(2, TaskStatusKind::Pending)).await;

        assert!(store.soft_delete(gone.id).await.is_success());
        assert_eq!(
            TaskGateway::find_active_by_id(&store, gone.id).await.status_code(),
            404
        );
        assert_eq!(store.soft_delete(gone.id).await.status_code(), 404);

        let listed = store.list_active(None).await.into_data().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].task.id, kept.id);
        assert!(!store.task(gone.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_detail_joins_reference_names() {
        let store = MemoryStore::seeded();
        let created = store.insert_task(task(2, TaskStatusKind::Completed)).await;

        let detail = TaskGateway::find_active_by_id(&store, created.id)
            .await
            .into_data()
            .unwrap();
        assert_eq!(detail.status_name.as_deref(), Some("Completed"));
        assert_eq!(detail.priority_name.as_deref(), Some("Medium"));
    }

    #[tokio::test]
    async fn test_list_filters_by_user_and_status() {
        let store = MemoryStore::seeded();
        store.insert_task(task(2, TaskStatusKind::Pending)).await;
        store.insert_task(task(2, TaskStatusKind::Completed)).await;
        store.insert_task(task(3, TaskStatusKind::Completed)).await;

        let mine = store.list_active_by_user(2, None).await.into_data().unwrap();
        assert_eq!(mine.len(), 2);

        let done = store
            .list_active_by_user(2, Some(TaskStatusKind::Completed))
            .await
            .into_data()
            .unwrap();
        assert_eq!(done.len(), 1);

        let all_done = store
            .list_active(Some(TaskStatusKind::Completed))
            .await
            .into_data()
            .unwrap();
        assert_eq!(all_done.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::seeded();
        let data = CreateUser {
            email: "a@b.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: "A B".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            role_id: RoleKind::User.id(),
        };

        assert_eq!(store.create_if_absent(data.clone()).await.status_code(), 201);

        let duplicate = store.create_if_absent(data).await;
        assert_eq!(duplicate.status_code(), 400);
        assert_eq!(duplicate.message(), "Email already exists");
    }

    #[tokio::test]
    async fn test_count_completed_in_month_uses_updated_on() {
        let store = MemoryStore::seeded();
        let march = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();

        let mut in_march = task(2, TaskStatusKind::Completed);
        in_march.updated_on = Some(march);
        store.insert_task(in_march).await;

        let mut in_april = task(2, TaskStatusKind::Completed);
        in_april.updated_on = Some(march + Duration::days(30));
        store.insert_task(in_april).await;

        let mut pending = task(2, TaskStatusKind::Pending);
        pending.updated_on = Some(march);
        store.insert_task(pending).await;

        let count = store.count_completed_in_month(2, 2025, 3).await;
        assert_eq!(count.into_data(), Some(1));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_with_error() {
        let store = MemoryStore::seeded();
        store.set_unavailable(true);

        let statuses = store.list_statuses().await;
        assert_eq!(statuses.status_code(), 500);
        assert!(!statuses.is_success());

        store.set_unavailable(false);
        assert!(store.list_statuses().await.is_success());
    }

    #[tokio::test]
    async fn test_user_lookups_are_counted() {
        let store = MemoryStore::seeded();
        UserGateway::find_active_by_id(&store, 1).await;
        UserGateway::find_active_by_id(&store, 2).await;
        assert_eq!(store.user_lookups(), 2);
    }
}

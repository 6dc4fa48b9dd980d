/// Database models for the task manager
///
/// Each model owns the SQL for its table.
///
/// # Models
///
/// - `user`: user accounts
/// - `task`: work items (soft-deleted via `is_active`)
/// - `reference`: roles, task statuses and task priorities
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::reference::TaskStatus;
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let statuses = TaskStatus::list(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod reference;
pub mod task;
pub mod user;

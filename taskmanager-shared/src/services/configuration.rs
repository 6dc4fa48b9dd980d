/// Reference-data lookups for client dropdowns

use std::sync::Arc;

use crate::gateway::ReferenceGateway;
use crate::models::reference::{TaskPriority, TaskStatus};
use crate::response::ResponseMessage;

pub struct ConfigurationService {
    references: Arc<dyn ReferenceGateway>,
}

impl ConfigurationService {
    pub fn new(references: Arc<dyn ReferenceGateway>) -> Self {
        Self { references }
    }

    /// Every task priority
    pub async fn get_all_priorities(&self) -> ResponseMessage<Vec<TaskPriority>> {
        match self.references.list_priorities().await.into_result() {
            Ok(priorities) => ResponseMessage::ok(priorities, "Success"),
            Err(failure) => failure,
        }
    }

    /// Every task status
    pub async fn get_all_statuses(&self) -> ResponseMessage<Vec<TaskStatus>> {
        match self.references.list_statuses().await.into_result() {
            Ok(statuses) => ResponseMessage::ok(statuses, "Success"),
            Err(failure) => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryStore;

    #[tokio::test]
    async fn test_lists_reference_tables() {
        let service = ConfigurationService::new(Arc::new(MemoryStore::seeded()));

        let priorities = service.get_all_priorities().await;
        assert_eq!(priorities.status_code(), 200);
        assert_eq!(priorities.message(), "Success");
        assert_eq!(priorities.data().map(Vec::len), Some(3));

        let statuses = service.get_all_statuses().await.into_data().unwrap();
        assert_eq!(statuses[2].name, "Completed");
    }

    #[tokio::test]
    async fn test_store_failure_becomes_error() {
        let store = Arc::new(MemoryStore::seeded());
        store.set_unavailable(true);
        let service = ConfigurationService::new(store);

        let priorities = service.get_all_priorities().await;
        assert_eq!(priorities.status_code(), 500);
        assert!(priorities.data().is_none());
    }
}

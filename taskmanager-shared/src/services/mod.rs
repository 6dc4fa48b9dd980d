/// Domain services
///
/// Services apply validation and authorization rules on top of the gateways
/// and always answer with a [`ResponseMessage`](crate::response::ResponseMessage).
/// Fallible inner steps (hashing, signing) return [`ServiceError`], which is
/// folded into an Error envelope at the service boundary.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskmanager_shared::auth::jwt::JwtSettings;
/// use taskmanager_shared::gateway::memory::MemoryStore;
/// use taskmanager_shared::services::Services;
///
/// # async fn example(settings: JwtSettings) {
/// let services = Services::new(Arc::new(MemoryStore::seeded()), Arc::new(settings));
/// let priorities = services.configuration.get_all_priorities().await;
/// assert!(priorities.is_success());
/// # }
/// ```

pub mod auth;
pub mod configuration;
pub mod task;

use std::sync::Arc;

pub use auth::AuthService;
pub use configuration::ConfigurationService;
pub use task::TaskService;

use crate::auth::jwt::{JwtError, JwtSettings};
use crate::auth::password::PasswordError;
use crate::gateway::{ReferenceGateway, TaskGateway, UserGateway};

/// Unexpected faults inside a service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// Every service, wired to one store
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub tasks: Arc<TaskService>,
    pub configuration: Arc<ConfigurationService>,
}

impl Services {
    /// Wires all services to a store implementing every gateway
    pub fn new<S>(store: Arc<S>, jwt: Arc<JwtSettings>) -> Self
    where
        S: UserGateway + TaskGateway + ReferenceGateway + 'static,
    {
        let users: Arc<dyn UserGateway> = store.clone();
        let tasks: Arc<dyn TaskGateway> = store.clone();
        let references: Arc<dyn ReferenceGateway> = store;

        Self {
            auth: Arc::new(AuthService::new(users.clone(), jwt)),
            tasks: Arc::new(TaskService::new(tasks, users, references.clone())),
            configuration: Arc::new(ConfigurationService::new(references)),
        }
    }
}

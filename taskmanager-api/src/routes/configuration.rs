/// Reference list endpoints
///
/// - `GET /api/configuration/priorities`
/// - `GET /api/configuration/statuses`
///
/// Both are public.

use crate::app::AppState;
use axum::extract::State;
use taskmanager_shared::{
    models::reference::{TaskPriority, TaskStatus},
    response::ResponseMessage,
};

pub async fn get_priorities(State(state): State<AppState>) -> ResponseMessage<Vec<TaskPriority>> {
    tracing::info!("Get priorities request received");
    let response = state.services.configuration.get_all_priorities().await;
    tracing::info!(
        status_code = response.status_code(),
        "Get priorities completed with status code"
    );
    response
}

pub async fn get_statuses(State(state): State<AppState>) -> ResponseMessage<Vec<TaskStatus>> {
    tracing::info!("Get statuses request received");
    let response = state.services.configuration.get_all_statuses().await;
    tracing::info!(
        status_code = response.status_code(),
        "Get statuses completed with status code"
    );
    response
}

/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskmanager_api::{app::AppState, config::Config};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskmanager_shared::gateway::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::new(&config.database.url, 10)).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = taskmanager_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{fault, user_context},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskmanager_shared::{
    auth::{
        jwt::JwtSettings,
        middleware::{create_auth_middleware, require_auth},
    },
    gateway::{ReferenceGateway, TaskGateway, UserGateway},
    response::ResponseMessage,
    services::Services,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Domain services wired to the store
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token settings shared with the authentication layer
    pub jwt: Arc<JwtSettings>,
}

impl AppState {
    /// Creates new application state over any store implementing every gateway
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: UserGateway + TaskGateway + ReferenceGateway + 'static,
    {
        let jwt = Arc::new(config.jwt.clone());

        Self {
            services: Services::new(store, jwt.clone()),
            config: Arc::new(config),
            jwt,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                     # Health check (public)
/// └── /api/
///     ├── /auth/                      # Public
///     │   ├── POST /login
///     │   └── POST /signup
///     ├── /configuration/             # Public
///     │   ├── GET /priorities
///     │   └── GET /statuses
///     └── /task/                      # Bearer token required
///         ├── POST /create
///         ├── GET  /my-tasks?status=
///         ├── GET  /all?statusId=     # Admin only
///         ├── POST /delete?taskId=
///         ├── POST /update-task?taskId=
///         ├── GET  /dashboard
///         ├── GET  /user-profile
///         └── GET  /:task_id
/// ```
pub fn build_router(state: AppState) -> Router {
    with_middleware(api_routes(), state)
}

/// Every route, without the outer middleware stack
pub fn api_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/signup", post(routes::auth::signup));

    let configuration_routes = Router::new()
        .route("/priorities", get(routes::configuration::get_priorities))
        .route("/statuses", get(routes::configuration::get_statuses));

    let task_routes = Router::new()
        .route("/create", post(routes::task::create_task))
        .route("/my-tasks", get(routes::task::get_my_tasks))
        .route("/all", get(routes::task::get_all_tasks))
        .route("/delete", post(routes::task::delete_task))
        .route("/update-task", post(routes::task::update_task))
        .route("/dashboard", get(routes::task::get_dashboard))
        .route("/user-profile", get(routes::task::get_user_profile))
        .route("/:task_id", get(routes::task::get_task_by_id))
        .route_layer(axum::middleware::from_fn(require_auth));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/configuration", configuration_routes)
        .nest("/task", task_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .fallback(not_found)
}

/// Wraps routes in the shared middleware stack and attaches state
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Panic recovery (500 envelope)
/// 2. CORS
/// 3. Request tracing (tower-http TraceLayer)
/// 4. Bearer token authentication (attaches `AuthContext`)
/// 5. User context span for log enrichment
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    routes
        .layer(axum::middleware::from_fn(user_context::log_user_context))
        .layer(axum::middleware::from_fn(create_auth_middleware(
            state.jwt.clone(),
        )))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(CatchPanicLayer::custom(fault::panic_response))
        .with_state(state)
}

async fn not_found() -> ResponseMessage<()> {
    ResponseMessage::not_found("Resource not found")
}

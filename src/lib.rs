use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use middleware::basic_auth_middleware;
use store::memory::{MemoryGoalStore, MemoryUserStore};
use store::postgres::{PgGoalStore, PgUserStore};
use store::{GoalStore, UserStore};

/// Shared application state: the store adapters behind trait objects so the
/// router can be driven by Postgres in production and the in-memory adapters
/// in tests.
#[derive(Clone)]
pub struct AppState {
    pub goals: Arc<dyn GoalStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            goals: Arc::new(PgGoalStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            goals: Arc::new(MemoryGoalStore::new()),
            users: Arc::new(MemoryUserStore::new()),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cfg = config::config();

    // Everything under /goals requires basic auth; registration and the
    // service banner stay public.
    let protected = Router::new()
        .route(
            "/goals",
            get(handlers::goals::list).post(handlers::goals::create),
        )
        .route(
            "/goals/:goal_id",
            put(handlers::goals::update)
                .patch(handlers::goals::update)
                .delete(handlers::goals::remove),
        )
        .route(
            "/goals/:goal_id/tasks",
            get(handlers::tasks::list).post(handlers::tasks::create),
        )
        .route(
            "/goals/:goal_id/tasks/:task_id",
            put(handlers::tasks::update)
                .patch(handlers::tasks::update)
                .delete(handlers::tasks::remove),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            basic_auth_middleware,
        ));

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/users", post(handlers::users::register))
        .merge(protected)
        .with_state(state);

    if cfg.api.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if cfg.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Goal Keeper API",
            "version": version,
            "description": "Personal goal tracking with tasks nested inside each goal",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "register": "POST /users (public)",
                "goals": "/goals[/:goal_id] (basic auth)",
                "tasks": "/goals/:goal_id/tasks[/:task_id] (basic auth)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.goals.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

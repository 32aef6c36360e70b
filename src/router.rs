use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::DatabaseManager;
use crate::handlers::courses;
use crate::middleware::principal_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Gateway-authenticated
        .merge(course_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn course_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/courses", get(courses::list).post(courses::create))
        // Static segment wins over `:courseId`; content id "recent" is not addressable here
        .route("/courses/recent", get(courses::recent))
        .route("/courses/:courseId", get(courses::get).patch(courses::update))
        .route("/courses/:courseId/upload-url", post(courses::upload_url))
        .route_layer(middleware::from_fn_with_state(state, principal_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Course Service",
        "version": version,
        "endpoints": {
            "list": "GET /courses?page&size",
            "recent": "GET /courses/recent?size",
            "get": "GET /courses/:courseId",
            "create": "POST /courses",
            "update": "PATCH /courses/:courseId",
            "upload_url": "POST /courses/:courseId/upload-url",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

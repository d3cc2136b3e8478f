mod feedback;
mod stats;

use std::path::PathBuf;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// On-disk locations of the frontend bundle and its assets.
#[derive(Debug, Clone)]
pub struct StaticDirs {
    pub public_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl StaticDirs {
    pub fn from_config(config: &feedback_core::AppConfig) -> Self {
        Self {
            public_dir: config.public_dir.clone(),
            assets_dir: config.assets_dir.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client omitted or malformed a required input.
    Validation,
    /// The submission duplicates an existing (client, project) pair.
    Conflict,
    /// Any failure reported by the store.
    Storage,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            body: ErrorBody {
                error: message.into(),
                details: None,
            },
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Conflict,
            body: ErrorBody {
                error: message.into(),
                details: None,
            },
        }
    }

    pub fn storage(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Storage,
            body: ErrorBody {
                error: message.into(),
                details: Some(details.into()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.body)).into_response()
    }
}

pub(super) fn map_db_error(request_id: &str, message: &str, error: &feedback_db::DbError) -> ApiError {
    tracing::error!(request_id, error = %error, "{message}");
    ApiError::storage(message, error.to_string())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/feedback", post(feedback::submit_feedback))
        .route("/api/stats", get(stats::get_monthly_stats))
}

pub fn build_app(state: AppState, statics: &StaticDirs) -> Router {
    let frontend = ServeDir::new(&statics.public_dir).append_index_html_on_directories(true);

    Router::new()
        .merge(api_router())
        .nest_service("/assets", ServeDir::new(&statics.assets_dir))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match feedback_db::server_version(&state.pool).await {
        Ok(version) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                version: Some(version),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    version: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const REACTIVITY_TEXT: &str =
        "Responsiveness: define an SLA (e.g., response < 24h), weekly check-in, single channel.";

    fn test_app(pool: PgPool) -> Router {
        let statics = StaticDirs {
            public_dir: PathBuf::from("./does-not-exist/public"),
            assets_dir: PathBuf::from("./does-not-exist/assets"),
        };
        build_app(AppState { pool }, &statics)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json parse")
        };
        (status, json)
    }

    fn post_feedback(body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn acme_alpha(ratings: [i64; 4]) -> Value {
        json!({
            "email": "a@b.com",
            "client_name": "Acme",
            "project": "Alpha",
            "reactivity": ratings[0],
            "deadlines": ratings[1],
            "deliverables": ratings[2],
            "professionalism": ratings[3],
        })
    }

    async fn row_count(pool: &PgPool) -> i64 {
        feedback_db::count_feedback(pool).await.expect("count")
    }

    #[test]
    fn api_error_kinds_map_to_status_codes() {
        assert_eq!(
            ApiError::validation("Missing field: email")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("duplicate").into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::storage("failed", "boom").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_body_omits_details_when_absent() {
        let body = serde_json::to_value(ApiError::validation("nope").body).expect("serialize");
        assert_eq!(body, json!({ "error": "nope" }));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_database_version(pool: PgPool) {
        let (status, json) = send(test_app(pool), get_uri("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert!(json["version"].as_str().is_some_and(|v| v.contains("PostgreSQL")));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_failure_when_pool_is_closed(pool: PgPool) {
        pool.close().await;
        let (status, json) = send(test_app(pool), get_uri("/api/health")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["ok"], false);
        assert!(json["error"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn submit_then_resubmit_conflicts(pool: PgPool) {
        let (status, json) = send(test_app(pool.clone()), post_feedback(&acme_alpha([5, 5, 5, 5]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert!(json["message"].is_string());

        let (status, json) = send(test_app(pool.clone()), post_feedback(&acme_alpha([1, 2, 3, 4]))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"]
            .as_str()
            .is_some_and(|m| m.contains("different project")));
        assert_eq!(row_count(&pool).await, 1);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn resubmit_with_padded_names_still_conflicts(pool: PgPool) {
        send(test_app(pool.clone()), post_feedback(&acme_alpha([5, 5, 5, 5]))).await;

        let mut padded = acme_alpha([3, 3, 3, 3]);
        padded["client_name"] = json!("  Acme ");
        padded["project"] = json!(" Alpha");
        let (status, _) = send(test_app(pool.clone()), post_feedback(&padded)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn missing_field_is_named_and_nothing_is_written(pool: PgPool) {
        for field in [
            "email",
            "client_name",
            "project",
            "reactivity",
            "deadlines",
            "deliverables",
            "professionalism",
        ] {
            let mut body = acme_alpha([5, 5, 5, 5]);
            body.as_object_mut().expect("object").remove(field);
            let (status, json) = send(test_app(pool.clone()), post_feedback(&body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
            assert!(
                json["error"].as_str().is_some_and(|m| m.contains(field)),
                "error names {field}: {json}"
            );
        }
        assert_eq!(row_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn out_of_range_rating_is_a_storage_error(pool: PgPool) {
        let (status, json) = send(test_app(pool.clone()), post_feedback(&acme_alpha([5, 5, 6, 5]))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].is_string());
        assert!(json["details"].is_string());
        assert_eq!(row_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn rating_beyond_integer_range_is_a_storage_error(pool: PgPool) {
        let body = acme_alpha([3_000_000_000, 5, 5, 5]);
        let (status, json) = send(test_app(pool.clone()), post_feedback(&body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].is_string());
        assert!(json["details"].is_string());
        assert_eq!(row_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn non_integer_ratings_are_storage_errors(pool: PgPool) {
        for rating in [json!(4.5), json!("great")] {
            let mut body = acme_alpha([5, 5, 5, 5]);
            body["deadlines"] = rating;
            let (status, json) = send(test_app(pool.clone()), post_feedback(&body)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {json}");
            assert!(json["details"].is_string());
        }
        assert_eq!(row_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn malformed_json_is_a_bad_request(pool: PgPool) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, json) = send(test_app(pool), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn stats_requires_month(pool: PgPool) {
        let (status, json) = send(test_app(pool.clone()), get_uri("/api/stats")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().is_some_and(|m| m.contains("month")));

        let (status, _) = send(test_app(pool), get_uri("/api/stats?month=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn stats_rejects_repeated_month_with_json_error(pool: PgPool) {
        let (status, json) = send(
            test_app(pool),
            get_uri("/api/stats?month=2026-01&month=2026-02"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
        assert!(json.get("details").is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn stats_with_malformed_month_is_a_storage_error(pool: PgPool) {
        let (status, json) = send(test_app(pool), get_uri("/api/stats?month=soon")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["details"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn stats_for_empty_month(pool: PgPool) {
        let (status, json) = send(test_app(pool), get_uri("/api/stats?month=2026-01")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "month": "2026-01",
                "start": "2026-01-01",
                "projects": [],
                "action_plan": [],
            })
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn stats_reports_averages_and_action_plan(pool: PgPool) {
        let january = chrono::NaiveDate::from_ymd_opt(2026, 1, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("timestamp");
        let february = chrono::NaiveDate::from_ymd_opt(2026, 2, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("timestamp");

        for (client, ratings, created_at) in [
            ("Acme", [2, 5, 5, 5], january),
            ("Globex", [1, 1, 1, 1], february),
        ] {
            sqlx::query(
                "INSERT INTO feedback \
                     (created_at, email, client_name, project, \
                      reactivity, deadlines, deliverables, professionalism) \
                 VALUES ($1, 'x@example.com', $2, 'Alpha', $3, $4, $5, $6)",
            )
            .bind(created_at)
            .bind(client)
            .bind(ratings[0])
            .bind(ratings[1])
            .bind(ratings[2])
            .bind(ratings[3])
            .execute(&pool)
            .await
            .expect("insert");
        }

        let (status, json) = send(test_app(pool), get_uri("/api/stats?month=2026-01")).await;
        assert_eq!(status, StatusCode::OK);

        let projects = json["projects"].as_array().expect("projects array");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0]["project"], "Alpha");
        assert_eq!(projects[0]["responses"], 1);
        assert_eq!(projects[0]["avg_reactivity"], 2.0);
        assert_eq!(projects[0]["avg_total"], 4.25);

        assert_eq!(
            json["action_plan"],
            json!([{ "project": "Alpha", "recommendations": [REACTIVITY_TEXT] }])
        );
    }
}

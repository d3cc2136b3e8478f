//! `GET /api/stats?month=YYYY-MM`: monthly per-project averages and action plan.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use feedback_core::MonthlyReport;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct StatsQuery {
    pub month: Option<String>,
}

pub(super) async fn get_monthly_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<MonthlyReport>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected stats query");
        ApiError::validation(rejection.body_text())
    })?;

    // Format is not checked here; PostgreSQL rejects malformed months.
    let month = query
        .month
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Missing query parameter: month (YYYY-MM)"))?;

    let report = feedback_db::get_monthly_report(&state.pool, &month)
        .await
        .map_err(|e| map_db_error(&req_id.0, "failed to compute monthly stats", &e))?;

    tracing::debug!(
        month = %report.month,
        projects = report.projects.len(),
        planned = report.action_plan.len(),
        "monthly stats computed"
    );

    Ok(Json(report))
}

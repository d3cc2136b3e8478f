//! Read-only monthly aggregation over the `feedback` table.

use chrono::NaiveDate;
use feedback_core::{MonthlyReport, ProjectStats};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// One project's aggregate for a month, as returned by
/// [`list_monthly_project_stats`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthlyProjectStatsRow {
    pub project: String,
    pub responses: i64,
    pub avg_reactivity: f64,
    pub avg_deadlines: f64,
    pub avg_deliverables: f64,
    pub avg_professionalism: f64,
    pub avg_total: f64,
}

impl From<MonthlyProjectStatsRow> for ProjectStats {
    fn from(row: MonthlyProjectStatsRow) -> Self {
        Self {
            project: row.project,
            responses: row.responses,
            avg_reactivity: row.avg_reactivity,
            avg_deadlines: row.avg_deadlines,
            avg_deliverables: row.avg_deliverables,
            avg_professionalism: row.avg_professionalism,
            avg_total: row.avg_total,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Resolve `"YYYY-MM"` to the first day of that month.
///
/// Parsing is left to PostgreSQL; a malformed month surfaces as a database
/// error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the value is not a valid month or the query fails.
pub async fn month_start(pool: &PgPool, month: &str) -> Result<NaiveDate, DbError> {
    let start: NaiveDate = sqlx::query_scalar("SELECT ($1::text || '-01')::date")
        .bind(month)
        .fetch_one(pool)
        .await?;
    Ok(start)
}

/// Aggregate submissions created in `[start, start + 1 month)` by project.
///
/// `avg_total` is the mean of the four dimension averages, not of the
/// individual ratings. Rows are ordered by `avg_total` ascending, then by
/// project name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_monthly_project_stats(
    pool: &PgPool,
    start: NaiveDate,
) -> Result<Vec<MonthlyProjectStatsRow>, DbError> {
    let rows = sqlx::query_as::<_, MonthlyProjectStatsRow>(
        "SELECT project, \
                COUNT(*) AS responses, \
                AVG(reactivity)::float8 AS avg_reactivity, \
                AVG(deadlines)::float8 AS avg_deadlines, \
                AVG(deliverables)::float8 AS avg_deliverables, \
                AVG(professionalism)::float8 AS avg_professionalism, \
                ((AVG(reactivity) + AVG(deadlines) + AVG(deliverables) + AVG(professionalism)) / 4)::float8 \
                    AS avg_total \
         FROM feedback \
         WHERE created_at >= $1::date \
           AND created_at < ($1::date + INTERVAL '1 month') \
         GROUP BY project \
         ORDER BY avg_total ASC, project ASC",
    )
    .bind(start)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Build the full monthly report: window start, per-project stats, and the
/// derived action plan.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the month cannot be parsed or a query fails.
pub async fn get_monthly_report(pool: &PgPool, month: &str) -> Result<MonthlyReport, DbError> {
    let start = month_start(pool, month).await?;
    let projects = list_monthly_project_stats(pool, start)
        .await?
        .into_iter()
        .map(ProjectStats::from)
        .collect();

    Ok(MonthlyReport::new(month, start, projects))
}

//! Database operations for the `feedback` table.

use chrono::{DateTime, Utc};
use feedback_core::NewFeedback;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `feedback` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub client_name: String,
    pub project: String,
    pub reactivity: i32,
    pub deadlines: i32,
    pub deliverables: i32,
    pub professionalism: i32,
    pub reactivity_suggestion: Option<String>,
    pub deadlines_suggestion: Option<String>,
    pub deliverables_suggestion: Option<String>,
    pub professionalism_suggestion: Option<String>,
    pub global_comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert one survey submission and return its generated id.
///
/// A single statement: either the row lands or nothing does. Ratings are
/// cast to INTEGER in the statement; values that do not cast, or fall outside
/// 1–5, are rejected there.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails. A duplicate
/// `(client_name, project)` pair is reported as a database error for which
/// [`DbError::is_unique_violation`] holds.
pub async fn insert_feedback(pool: &PgPool, record: &NewFeedback) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO feedback \
             (email, client_name, project, \
              reactivity, deadlines, deliverables, professionalism, \
              reactivity_suggestion, deadlines_suggestion, \
              deliverables_suggestion, professionalism_suggestion, global_comment) \
         VALUES ($1, $2, $3, $4::integer, $5::integer, $6::integer, $7::integer, \
                 $8, $9, $10, $11, $12) \
         RETURNING id",
    )
    .bind(&record.email)
    .bind(&record.client_name)
    .bind(&record.project)
    .bind(record.reactivity.as_str())
    .bind(record.deadlines.as_str())
    .bind(record.deliverables.as_str())
    .bind(record.professionalism.as_str())
    .bind(record.reactivity_suggestion.as_deref())
    .bind(record.deadlines_suggestion.as_deref())
    .bind(record.deliverables_suggestion.as_deref())
    .bind(record.professionalism_suggestion.as_deref())
    .bind(record.global_comment.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetch the submission a client left for a project, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_feedback_by_client_project(
    pool: &PgPool,
    client_name: &str,
    project: &str,
) -> Result<Option<FeedbackRow>, DbError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, created_at, email, client_name, project, \
                reactivity, deadlines, deliverables, professionalism, \
                reactivity_suggestion, deadlines_suggestion, \
                deliverables_suggestion, professionalism_suggestion, global_comment \
         FROM feedback \
         WHERE client_name = $1 AND project = $2",
    )
    .bind(client_name)
    .bind(project)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Count all stored submissions.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_feedback(pool: &PgPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

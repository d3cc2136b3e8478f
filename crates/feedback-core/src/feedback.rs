//! Survey submission payloads and their presence checks.
//!
//! Range checks (1–5) live in the `feedback` table's CHECK constraints, not here.

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// A rating as it arrives on the wire: clients send either a JSON number or
/// a numeric string (HTML form values).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Raw body of `POST /api/feedback`. Every field is optional at the
/// deserialization layer so a missing field can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackSubmission {
    pub email: Option<String>,
    pub client_name: Option<String>,
    pub project: Option<String>,
    pub reactivity: Option<RatingInput>,
    pub deadlines: Option<RatingInput>,
    pub deliverables: Option<RatingInput>,
    pub professionalism: Option<RatingInput>,
    pub reactivity_suggestion: Option<String>,
    pub deadlines_suggestion: Option<String>,
    pub deliverables_suggestion: Option<String>,
    pub professionalism_suggestion: Option<String>,
    pub global_comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Validated record
// ---------------------------------------------------------------------------

/// A rating coerced to its numeric text form (`"4.0"` becomes `"4"`).
///
/// The insert casts it to INTEGER, so out-of-range, fractional or
/// non-numeric values are rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating(String);

impl Rating {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i32> for Rating {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A submission that passed presence checks, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub email: String,
    pub client_name: String,
    pub project: String,
    pub reactivity: Rating,
    pub deadlines: Rating,
    pub deliverables: Rating,
    pub professionalism: Rating,
    pub reactivity_suggestion: Option<String>,
    pub deadlines_suggestion: Option<String>,
    pub deliverables_suggestion: Option<String>,
    pub professionalism_suggestion: Option<String>,
    pub global_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl FeedbackSubmission {
    /// Check required fields and normalize the payload.
    ///
    /// Required fields are checked in a fixed order and the first missing one
    /// is reported. `email`, `client_name` and `project` are trimmed; empty
    /// optional text becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first absent,
    /// `null` or blank required field.
    pub fn validate(self) -> Result<NewFeedback, ValidationError> {
        let email = required_text("email", self.email)?;
        let client_name = required_text("client_name", self.client_name)?;
        let project = required_text("project", self.project)?;
        let reactivity = required_rating("reactivity", self.reactivity)?;
        let deadlines = required_rating("deadlines", self.deadlines)?;
        let deliverables = required_rating("deliverables", self.deliverables)?;
        let professionalism = required_rating("professionalism", self.professionalism)?;

        Ok(NewFeedback {
            email,
            client_name,
            project,
            reactivity,
            deadlines,
            deliverables,
            professionalism,
            reactivity_suggestion: optional_text(self.reactivity_suggestion),
            deadlines_suggestion: optional_text(self.deadlines_suggestion),
            deliverables_suggestion: optional_text(self.deliverables_suggestion),
            professionalism_suggestion: optional_text(self.professionalism_suggestion),
            global_comment: optional_text(self.global_comment),
        })
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required_rating(
    field: &'static str,
    value: Option<RatingInput>,
) -> Result<Rating, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField(field)),
        Some(RatingInput::Integer(n)) => Ok(Rating(n.to_string())),
        Some(RatingInput::Float(f)) => Ok(Rating(f.to_string())),
        Some(RatingInput::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::MissingField(field));
            }
            let normalized = match (trimmed.parse::<i64>(), trimmed.parse::<f64>()) {
                (Ok(n), _) => n.to_string(),
                (Err(_), Ok(f)) => f.to_string(),
                (Err(_), Err(_)) => trimmed.to_owned(),
            };
            Ok(Rating(normalized))
        }
    }
}

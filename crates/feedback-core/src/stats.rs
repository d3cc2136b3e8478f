//! Monthly report shapes and the rule-based action plan.

use chrono::NaiveDate;
use serde::Serialize;

/// A dimension average strictly below this value triggers a recommendation.
pub const RECOMMENDATION_THRESHOLD: f64 = 4.0;

/// The four rated dimensions of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Reactivity,
    Deadlines,
    Deliverables,
    Professionalism,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Reactivity,
        Dimension::Deadlines,
        Dimension::Deliverables,
        Dimension::Professionalism,
    ];

    #[must_use]
    pub fn recommendation(self) -> &'static str {
        match self {
            Dimension::Reactivity => {
                "Responsiveness: define an SLA (e.g., response < 24h), weekly check-in, single channel."
            }
            Dimension::Deadlines => {
                "Deadlines: milestones, buffer, regular tracking, risk management."
            }
            Dimension::Deliverables => {
                "Deliverables: quality checklist, internal review, templates."
            }
            Dimension::Professionalism => {
                "Professionalism/Innovation: monthly retrospective, training, best-practice sharing."
            }
        }
    }
}

/// Per-project aggregate over one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub project: String,
    pub responses: i64,
    pub avg_reactivity: f64,
    pub avg_deadlines: f64,
    pub avg_deliverables: f64,
    pub avg_professionalism: f64,
    /// Mean of the four dimension averages.
    pub avg_total: f64,
}

impl ProjectStats {
    #[must_use]
    pub fn average(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Reactivity => self.avg_reactivity,
            Dimension::Deadlines => self.avg_deadlines,
            Dimension::Deliverables => self.avg_deliverables,
            Dimension::Professionalism => self.avg_professionalism,
        }
    }

    /// Dimensions whose average falls strictly below [`RECOMMENDATION_THRESHOLD`].
    pub fn underperforming(&self) -> impl Iterator<Item = Dimension> + '_ {
        Dimension::ALL
            .into_iter()
            .filter(|d| self.average(*d) < RECOMMENDATION_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlanEntry {
    pub project: String,
    pub recommendations: Vec<String>,
}

/// Build the action plan for a set of project aggregates.
///
/// Projects with no underperforming dimension are left out entirely. Input
/// order is preserved.
#[must_use]
pub fn build_action_plan(projects: &[ProjectStats]) -> Vec<ActionPlanEntry> {
    projects
        .iter()
        .filter_map(|stats| {
            let recommendations: Vec<String> = stats
                .underperforming()
                .map(|d| d.recommendation().to_owned())
                .collect();
            if recommendations.is_empty() {
                None
            } else {
                Some(ActionPlanEntry {
                    project: stats.project.clone(),
                    recommendations,
                })
            }
        })
        .collect()
}

/// Body of `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub month: String,
    pub start: NaiveDate,
    pub projects: Vec<ProjectStats>,
    pub action_plan: Vec<ActionPlanEntry>,
}

impl MonthlyReport {
    /// Assemble a report; the action plan is derived from `projects`.
    #[must_use]
    pub fn new(month: impl Into<String>, start: NaiveDate, projects: Vec<ProjectStats>) -> Self {
        let action_plan = build_action_plan(&projects);
        Self {
            month: month.into(),
            start,
            projects,
            action_plan,
        }
    }
}

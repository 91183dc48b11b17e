//! Stability score: a reliability estimate derived from completed jobs, skill breadth and
//! application activity. Counts cover the full history with no decay or capping.

use serde::{Deserialize, Serialize};

use super::domain::{JobApplication, UserProfile, WorkHistoryRecord};

pub const POINTS_PER_COMPLETED_JOB: u32 = 5;
pub const POINTS_PER_SKILL: u32 = 2;
pub const POINTS_PER_APPLICATION: u32 = 1;

/// One labelled contribution to the total, kept for explainable scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub label: String,
    pub points: u32,
    #[serde(rename = "desc")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: u32,
    pub breakdown: Vec<ScoreComponent>,
}

/// Stateless scorer. `history` and `applications` must already be scoped to `worker`;
/// no filtering by worker id happens here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn score(
        &self,
        worker: &UserProfile,
        history: &[WorkHistoryRecord],
        applications: &[JobApplication],
    ) -> ScoreResult {
        compute_score(worker, history, applications)
    }
}

pub fn compute_score(
    worker: &UserProfile,
    history: &[WorkHistoryRecord],
    applications: &[JobApplication],
) -> ScoreResult {
    let breakdown = vec![
        component(
            "Completed Jobs",
            points(history.len(), POINTS_PER_COMPLETED_JOB),
            "5 points per job",
        ),
        component(
            "Skill Diversity",
            points(worker.skills.len(), POINTS_PER_SKILL),
            "2 points per skill",
        ),
        component(
            "Activity",
            points(applications.len(), POINTS_PER_APPLICATION),
            "1 point per application",
        ),
    ];

    let total = breakdown
        .iter()
        .fold(0u32, |total, entry| total.saturating_add(entry.points));

    ScoreResult { total, breakdown }
}

fn component(label: &str, points: u32, description: &str) -> ScoreComponent {
    ScoreComponent {
        label: label.to_string(),
        points,
        description: description.to_string(),
    }
}

fn points(count: usize, weight: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(weight)
}

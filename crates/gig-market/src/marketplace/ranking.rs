//! Worker search prioritisation for employers.
//!
//! Candidates are available workers with a skill containing the query (case-insensitive
//! substring). They are ordered by health/verification weight, then by average rating.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{UserId, UserProfile};

/// Shown when a worker has never had a health check-in. Ranking uses weight 0 instead.
pub const DISPLAY_DEFAULT_HEALTH_STATUS: &str = "Pending";

/// Search result row returned to employers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub id: UserId,
    pub name: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub avg_rating: f32,
    pub health_status: String,
}

impl WorkerSummary {
    fn from_profile(worker: &UserProfile) -> Self {
        Self {
            id: worker.id.clone(),
            name: worker.name.clone(),
            phone: worker.phone.clone(),
            skills: worker.skills.clone(),
            avg_rating: worker.avg_rating.unwrap_or(0.0),
            health_status: worker
                .health_status
                .clone()
                .unwrap_or_else(|| DISPLAY_DEFAULT_HEALTH_STATUS.to_string()),
        }
    }
}

/// Ranking weight for a health status: Done 4, Fine 3, Pending 2, Unsatisfactory 1, else 0.
pub fn health_weight(status: Option<&str>) -> u8 {
    match status.map(str::to_lowercase).as_deref() {
        Some("done") => 4,
        Some("fine") => 3,
        Some("pending") => 2,
        Some("unsatisfactory") => 1,
        _ => 0,
    }
}

/// Rank candidate workers for `skill_query`, returning at most `limit` summaries.
///
/// An empty or absent query returns nothing rather than the whole population. Workers equal
/// on both keys have no defined relative order.
pub fn rank_workers(
    workers: &[UserProfile],
    skill_query: Option<&str>,
    limit: usize,
) -> Vec<WorkerSummary> {
    let query = match skill_query {
        Some(query) if !query.is_empty() => query.to_lowercase(),
        _ => return Vec::new(),
    };

    let mut candidates: Vec<&UserProfile> = workers
        .iter()
        .filter(|worker| is_candidate(worker, &query))
        .collect();

    candidates.sort_by(|a, b| priority(b, a));

    candidates
        .into_iter()
        .take(limit)
        .map(WorkerSummary::from_profile)
        .collect()
}

fn is_candidate(worker: &UserProfile, query: &str) -> bool {
    worker.is_worker()
        && worker.is_available()
        && worker
            .skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(query))
}

fn priority(a: &UserProfile, b: &UserProfile) -> Ordering {
    health_weight(a.health_status.as_deref())
        .cmp(&health_weight(b.health_status.as_deref()))
        .then_with(|| {
            a.avg_rating
                .unwrap_or(0.0)
                .total_cmp(&b.avg_rating.unwrap_or(0.0))
        })
}

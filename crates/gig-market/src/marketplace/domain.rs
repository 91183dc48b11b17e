use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for workers and employers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Worker,
    Employer,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Worker => "worker",
            UserRole::Employer => "employer",
        }
    }
}

/// A registered marketplace participant. Worker-only fields stay empty for employers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Identity card number workers log in with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adhithi_id: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form health check-in category ("Done", "Fine", "Pending", "Unsatisfactory").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<bool>,
    /// Cached output of the score engine; recomputed on every read path that exposes it.
    #[serde(default)]
    pub stability_score: u32,
}

impl UserProfile {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            adhithi_id: None,
            skills: Vec::new(),
            phone: None,
            location: None,
            health_status: None,
            avg_rating: None,
            availability_status: None,
            stability_score: 0,
        }
    }

    pub fn is_worker(&self) -> bool {
        self.role == UserRole::Worker
    }

    /// Only an explicit `false` marks a worker unavailable.
    pub fn is_available(&self) -> bool {
        self.availability_status != Some(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
    Completed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub required_skill: String,
    pub wage: u32,
    /// Human readable duration such as "2 days".
    pub duration: String,
    pub location: String,
    pub employer_id: UserId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Open && self.expires_at.map(|at| at < now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
}

/// At most one application exists per (worker, job) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub worker_id: UserId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// One completed job assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHistoryRecord {
    pub id: HistoryId,
    pub worker_id: UserId,
    pub job_id: JobId,
    pub wage_paid: u32,
    pub completed_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub worker_id: UserId,
    pub employer_id: UserId,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueReport {
    pub id: IssueId,
    pub worker_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub issue_text: String,
    pub reported_at: DateTime<Utc>,
}

/// Sign-up payload. Skills arrive as a comma separated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub adhithi_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Worker profile edits. Missing or blank fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub required_skill: String,
    pub wage: u32,
    pub duration: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCompletion {
    pub job_id: JobId,
    pub worker_id: UserId,
    #[serde(default)]
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub job_id: JobId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSubmission {
    #[serde(default)]
    pub job_id: Option<JobId>,
    pub issue_text: String,
}

/// Split a comma separated skill list, trimming entries and dropping blanks.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn skill_list_is_trimmed() {
        assert_eq!(
            parse_skill_list(" Carpenter, Plumber ,,"),
            vec!["Carpenter".to_string(), "Plumber".to_string()]
        );
        assert!(parse_skill_list("").is_empty());
    }

    #[test]
    fn unset_availability_counts_as_available() {
        let mut worker = UserProfile::new(
            UserId("w1".into()),
            "Babu",
            "babu@test.com",
            UserRole::Worker,
        );
        assert!(worker.is_available());
        worker.availability_status = Some(true);
        assert!(worker.is_available());
        worker.availability_status = Some(false);
        assert!(!worker.is_available());
    }

    #[test]
    fn only_open_jobs_expire() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap();
        let mut job = JobPosting {
            id: JobId("j1".into()),
            title: "Farm Assistance".into(),
            required_skill: "Agriculture".into(),
            wage: 400,
            duration: "1 day".into(),
            location: "Malappuram".into(),
            employer_id: UserId("e1".into()),
            status: JobStatus::Open,
            created_at: now - Duration::days(40),
            expires_at: Some(now - Duration::days(10)),
        };
        assert!(job.is_expired(now));

        job.status = JobStatus::Completed;
        assert!(!job.is_expired(now));

        job.status = JobStatus::Open;
        job.expires_at = None;
        assert!(!job.is_expired(now));
    }
}

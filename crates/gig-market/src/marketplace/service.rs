use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::config::MarketplaceConfig;

use super::domain::{
    parse_skill_list, ApplicationId, ApplicationStatus, HistoryId, IssueId, IssueReport,
    IssueSubmission, JobApplication, JobCompletion, JobDraft, JobId, JobPosting, JobStatus,
    ProfileUpdate, RatingRecord, Registration, UserId, UserProfile, UserRole, WorkHistoryRecord,
};
use super::ranking::{rank_workers, WorkerSummary};
use super::repository::{CompletedWork, MarketplaceRepository, RepositoryError};
use super::scoring::{ScoreEngine, ScoreResult};
use super::views::{
    ApplicantView, ApplicationView, EmployerDashboard, HistoryView, OpenJobView, WelfareCatalog,
    WorkerDashboard, UNKNOWN_APPLIED_JOB, UNKNOWN_EMPLOYER, UNKNOWN_JOB,
};

/// Service composing the repository with the score and rank engines.
///
/// Every actor-scoped operation resolves the caller through the user store and checks the
/// role before touching anything else.
pub struct MarketplaceService<R> {
    repository: Arc<R>,
    scorer: ScoreEngine,
    config: MarketplaceConfig,
}

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_record_id(prefix: &str) -> String {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

impl<R> MarketplaceService<R>
where
    R: MarketplaceRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: MarketplaceConfig) -> Self {
        Self {
            repository,
            scorer: ScoreEngine,
            config,
        }
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    /// Create a worker or employer account.
    pub fn register(&self, registration: Registration) -> Result<UserProfile, MarketplaceError> {
        let Registration {
            name,
            email,
            role,
            skills,
            adhithi_id,
            phone,
            location,
        } = registration;

        let name = required("name", name)?;
        let email = required("email", email)?;
        let adhithi_id = match role {
            UserRole::Worker => non_blank(adhithi_id),
            UserRole::Employer => None,
        };

        let existing = self.repository.users()?;
        if existing.iter().any(|user| user.email == email) {
            return Err(MarketplaceError::DuplicateEmail);
        }
        if adhithi_id.is_some()
            && existing
                .iter()
                .any(|user| user.is_worker() && user.adhithi_id == adhithi_id)
        {
            return Err(MarketplaceError::DuplicateAdhithiId);
        }

        let mut user = UserProfile::new(UserId(next_record_id("usr")), name, email, role);
        user.adhithi_id = adhithi_id;
        user.skills = skills.as_deref().map(parse_skill_list).unwrap_or_default();
        user.phone = non_blank(phone);
        user.location = non_blank(location);
        user.stability_score = self.scorer.score(&user, &[], &[]).total;

        let stored = self.repository.insert_user(user)?;
        info!(user_id = %stored.id, role = stored.role.label(), "registered marketplace user");
        Ok(stored)
    }

    /// Everything a worker's landing page needs. Closes expired jobs and refreshes the
    /// worker's cached stability score as side effects.
    pub fn worker_dashboard(
        &self,
        worker_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<WorkerDashboard, MarketplaceError> {
        let mut worker = self.actor(worker_id, UserRole::Worker)?;

        let jobs = self.close_expired_jobs(now)?;
        let employer_names: HashMap<UserId, String> = self
            .repository
            .users()?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();
        let titles: HashMap<&JobId, &str> = jobs
            .iter()
            .map(|job| (&job.id, job.title.as_str()))
            .collect();

        let history = self.repository.history_for_worker(&worker.id)?;
        let applications = self.repository.applications_for_worker(&worker.id)?;
        let score = self.refresh_score(&mut worker, &history, &applications)?;

        let history = history
            .into_iter()
            .map(|record| HistoryView {
                job_title: title_or(&titles, &record.job_id, UNKNOWN_JOB),
                record,
            })
            .collect();
        let applications = applications
            .into_iter()
            .map(|application| ApplicationView {
                job_title: title_or(&titles, &application.job_id, UNKNOWN_APPLIED_JOB),
                application,
            })
            .collect();
        let open_jobs = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Open)
            .map(|job| OpenJobView {
                employer_name: employer_names
                    .get(&job.employer_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_EMPLOYER.to_string()),
                job: job.clone(),
            })
            .collect();

        Ok(WorkerDashboard {
            worker,
            jobs: open_jobs,
            history,
            applications,
            stability_score: score.total,
            welfare: WelfareCatalog::standard(),
        })
    }

    /// Explainable score for the worker, written back to the cached field.
    pub fn score_details(&self, worker_id: &UserId) -> Result<ScoreResult, MarketplaceError> {
        let mut worker = self.actor(worker_id, UserRole::Worker)?;
        let history = self.repository.history_for_worker(&worker.id)?;
        let applications = self.repository.applications_for_worker(&worker.id)?;
        self.refresh_score(&mut worker, &history, &applications)
    }

    pub fn update_profile(
        &self,
        worker_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, MarketplaceError> {
        self.actor(worker_id, UserRole::Worker)?;

        let skills = non_blank(update.skills).map(|raw| parse_skill_list(&raw));
        let location = non_blank(update.location);
        let phone = non_blank(update.phone);
        let mut worker = self.repository.modify_user(worker_id, &|user| {
            if let Some(skills) = &skills {
                user.skills = skills.clone();
            }
            if let Some(location) = &location {
                user.location = Some(location.clone());
            }
            if let Some(phone) = &phone {
                user.phone = Some(phone.clone());
            }
        })?;

        // skill count feeds the score
        let history = self.repository.history_for_worker(&worker.id)?;
        let applications = self.repository.applications_for_worker(&worker.id)?;
        self.refresh_score(&mut worker, &history, &applications)?;
        Ok(worker)
    }

    /// Flip availability, treating an unset flag as available. Returns the new value.
    pub fn toggle_availability(&self, worker_id: &UserId) -> Result<bool, MarketplaceError> {
        self.actor(worker_id, UserRole::Worker)?;
        let worker = self.repository.modify_user(worker_id, &|user| {
            user.availability_status = Some(!user.is_available());
        })?;
        let available = worker.is_available();
        info!(worker_id = %worker_id, available, "worker availability changed");
        Ok(available)
    }

    pub fn report_issue(
        &self,
        worker_id: &UserId,
        submission: IssueSubmission,
        now: DateTime<Utc>,
    ) -> Result<IssueReport, MarketplaceError> {
        self.actor(worker_id, UserRole::Worker)?;
        let issue_text = required("issue_text", submission.issue_text)?;

        let report = IssueReport {
            id: IssueId(next_record_id("iss")),
            worker_id: worker_id.clone(),
            job_id: submission.job_id,
            issue_text,
            reported_at: now,
        };
        self.repository.insert_issue(report.clone())?;
        info!(worker_id = %worker_id, issue = %report.issue_text, "issue reported");
        Ok(report)
    }

    pub fn apply(
        &self,
        worker_id: &UserId,
        job_id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<JobApplication, MarketplaceError> {
        let mut worker = self.actor(worker_id, UserRole::Worker)?;
        if self.repository.job(job_id)?.is_none() {
            return Err(MarketplaceError::UnknownJob(job_id.clone()));
        }
        if self.repository.find_application(worker_id, job_id)?.is_some() {
            return Err(MarketplaceError::AlreadyApplied);
        }

        let application = JobApplication {
            id: ApplicationId(next_record_id("app")),
            job_id: job_id.clone(),
            worker_id: worker_id.clone(),
            status: ApplicationStatus::Pending,
            applied_at: now,
        };
        let stored = match self.repository.insert_application(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(MarketplaceError::AlreadyApplied),
            Err(other) => return Err(other.into()),
        };

        let history = self.repository.history_for_worker(worker_id)?;
        let applications = self.repository.applications_for_worker(worker_id)?;
        self.refresh_score(&mut worker, &history, &applications)?;
        Ok(stored)
    }

    pub fn employer_dashboard(
        &self,
        employer_id: &UserId,
    ) -> Result<EmployerDashboard, MarketplaceError> {
        let employer = self.actor(employer_id, UserRole::Employer)?;

        let jobs: Vec<JobPosting> = self
            .repository
            .jobs()?
            .into_iter()
            .filter(|job| &job.employer_id == employer_id)
            .collect();
        let job_ids: Vec<JobId> = jobs.iter().map(|job| job.id.clone()).collect();

        let users: HashMap<UserId, UserProfile> = self
            .repository
            .users()?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        let applications = self
            .repository
            .applications_for_jobs(&job_ids)?
            .into_iter()
            .map(|application| ApplicantView {
                worker: users.get(&application.worker_id).cloned(),
                application,
            })
            .collect();

        Ok(EmployerDashboard {
            employer,
            jobs,
            applications,
        })
    }

    pub fn post_job(
        &self,
        employer_id: &UserId,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<JobPosting, MarketplaceError> {
        self.actor(employer_id, UserRole::Employer)?;
        let expires_at = Duration::try_days(self.config.job_expiry_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(MarketplaceError::ExpiryOutOfRange(self.config.job_expiry_days))?;

        let job = JobPosting {
            id: JobId(next_record_id("job")),
            title: required("title", draft.title)?,
            required_skill: required("required_skill", draft.required_skill)?,
            wage: draft.wage,
            duration: draft.duration,
            location: draft.location,
            employer_id: employer_id.clone(),
            status: JobStatus::Open,
            created_at: now,
            expires_at: Some(expires_at),
        };

        let stored = self.repository.insert_job(job)?;
        info!(job_id = %stored.id, employer_id = %employer_id, "job posted");
        Ok(stored)
    }

    /// Close out a job for a worker: history entry, optional rating, accepted application and
    /// a fresh stability score for the worker. The store records the completion as one unit, so
    /// a job can only be completed once.
    pub fn complete_job(
        &self,
        employer_id: &UserId,
        completion: JobCompletion,
        now: DateTime<Utc>,
    ) -> Result<WorkHistoryRecord, MarketplaceError> {
        self.actor(employer_id, UserRole::Employer)?;
        let JobCompletion {
            job_id,
            worker_id,
            rating,
        } = completion;

        let job = self
            .repository
            .job(&job_id)?
            .ok_or_else(|| MarketplaceError::UnknownJob(job_id.clone()))?;
        if job.status == JobStatus::Completed {
            return Err(MarketplaceError::JobAlreadyCompleted(job_id));
        }
        let mut worker = self
            .repository
            .user(&worker_id)?
            .filter(UserProfile::is_worker)
            .ok_or_else(|| MarketplaceError::UnknownUser(worker_id.clone()))?;

        let record = WorkHistoryRecord {
            id: HistoryId(next_record_id("hist")),
            worker_id: worker_id.clone(),
            job_id: job_id.clone(),
            wage_paid: job.wage,
            completed_on: now,
        };
        let rating = rating.map(|score| RatingRecord {
            worker_id: worker_id.clone(),
            employer_id: employer_id.clone(),
            score,
        });
        let work = CompletedWork {
            record: record.clone(),
            rating,
        };
        match self.repository.record_completion(work) {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                return Err(MarketplaceError::JobAlreadyCompleted(job_id))
            }
            Err(RepositoryError::NotFound) => return Err(MarketplaceError::UnknownJob(job_id)),
            Err(other) => return Err(other.into()),
        }
        info!(job_id = %job_id, worker_id = %worker_id, "job completed");

        let history = self.repository.history_for_worker(&worker_id)?;
        let applications = self.repository.applications_for_worker(&worker_id)?;
        self.refresh_score(&mut worker, &history, &applications)?;
        Ok(record)
    }

    /// Top candidates for a skill, capped by the configured search limit.
    pub fn search_workers(
        &self,
        employer_id: &UserId,
        skill: Option<&str>,
    ) -> Result<Vec<WorkerSummary>, MarketplaceError> {
        self.actor(employer_id, UserRole::Employer)?;
        let population = self.repository.users()?;
        let ranked = rank_workers(&population, skill, self.config.search_limit);
        debug!(skill = ?skill, matches = ranked.len(), "worker search ranked");
        Ok(ranked)
    }

    fn actor(&self, id: &UserId, role: UserRole) -> Result<UserProfile, MarketplaceError> {
        let user = self
            .repository
            .user(id)?
            .ok_or(MarketplaceError::Unauthenticated)?;
        if user.role != role {
            return Err(MarketplaceError::Forbidden(role));
        }
        Ok(user)
    }

    /// Recompute from scratch and overwrite the cached score; last write wins. Only the score
    /// field is written so concurrent profile or availability edits survive.
    fn refresh_score(
        &self,
        worker: &mut UserProfile,
        history: &[WorkHistoryRecord],
        applications: &[JobApplication],
    ) -> Result<ScoreResult, MarketplaceError> {
        let result = self.scorer.score(worker, history, applications);
        worker.stability_score = result.total;
        self.repository.set_stability_score(&worker.id, result.total)?;
        debug!(worker_id = %worker.id, total = result.total, "stability score refreshed");
        Ok(result)
    }

    fn close_expired_jobs(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>, MarketplaceError> {
        let mut jobs = self.repository.jobs()?;
        for job in jobs.iter_mut().filter(|job| job.is_expired(now)) {
            job.status = JobStatus::Closed;
            self.repository.update_job(job.clone())?;
            info!(job_id = %job.id, "closed expired job");
        }
        Ok(jobs)
    }
}

fn title_or(titles: &HashMap<&JobId, &str>, job_id: &JobId, fallback: &str) -> String {
    titles.get(job_id).copied().unwrap_or(fallback).to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn required(field: &str, value: String) -> Result<String, MarketplaceError> {
    non_blank(Some(value))
        .ok_or_else(|| MarketplaceError::InvalidRequest(format!("{field} must not be empty")))
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("access denied: {} accounts only", .0.label())]
    Forbidden(UserRole),
    #[error("user {0} not found")]
    UnknownUser(UserId),
    #[error("job {0} not found")]
    UnknownJob(JobId),
    #[error("already applied")]
    AlreadyApplied,
    #[error("job {0} is already completed")]
    JobAlreadyCompleted(JobId),
    #[error("email already exists")]
    DuplicateEmail,
    #[error("adhithi id already exists")]
    DuplicateAdhithiId,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("job expiry of {0} days is out of range")]
    ExpiryOutOfRange(i64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl MarketplaceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketplaceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            MarketplaceError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketplaceError::UnknownUser(_) | MarketplaceError::UnknownJob(_) => {
                StatusCode::NOT_FOUND
            }
            MarketplaceError::AlreadyApplied
            | MarketplaceError::JobAlreadyCompleted(_)
            | MarketplaceError::DuplicateEmail
            | MarketplaceError::DuplicateAdhithiId
            | MarketplaceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            MarketplaceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MarketplaceError::ExpiryOutOfRange(_) | MarketplaceError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::MarketplaceConfig;
use crate::marketplace::domain::{
    ApplicationId, ApplicationStatus, HistoryId, IssueReport, JobApplication, JobId, JobPosting,
    JobStatus, UserId, UserProfile, UserRole, WorkHistoryRecord,
};
use crate::marketplace::memory::MemoryMarketplace;
use crate::marketplace::repository::{
    ApplicationStore, CompletedWork, CompletionStore, FeedbackStore, HistoryStore, JobStore,
    RepositoryError, UserStore,
};
use crate::marketplace::{marketplace_router, MarketplaceService};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 10, 9, 0, 0).unwrap()
}

pub(super) fn worker(
    id: &str,
    skills: &[&str],
    health: Option<&str>,
    rating: Option<f32>,
) -> UserProfile {
    let mut worker = UserProfile::new(
        UserId(id.to_string()),
        format!("Worker {id}"),
        format!("{id}@test.com"),
        UserRole::Worker,
    );
    worker.adhithi_id = Some(format!("adh-{id}"));
    worker.skills = skills.iter().map(|skill| skill.to_string()).collect();
    worker.health_status = health.map(str::to_string);
    worker.avg_rating = rating;
    worker.phone = Some("9876543210".to_string());
    worker
}

pub(super) fn employer(id: &str) -> UserProfile {
    let mut employer = UserProfile::new(
        UserId(id.to_string()),
        "Aravind",
        format!("{id}@test.com"),
        UserRole::Employer,
    );
    employer.location = Some("Malappuram".to_string());
    employer
}

pub(super) fn job(id: &str, employer_id: &str, title: &str) -> JobPosting {
    JobPosting {
        id: JobId(id.to_string()),
        title: title.to_string(),
        required_skill: "Construction".to_string(),
        wage: 500,
        duration: "2 days".to_string(),
        location: "Malappuram".to_string(),
        employer_id: UserId(employer_id.to_string()),
        status: JobStatus::Open,
        created_at: now() - Duration::days(1),
        expires_at: Some(now() + Duration::days(29)),
    }
}

pub(super) fn history(id: &str, worker_id: &str, job_id: &str) -> WorkHistoryRecord {
    WorkHistoryRecord {
        id: HistoryId(id.to_string()),
        worker_id: UserId(worker_id.to_string()),
        job_id: JobId(job_id.to_string()),
        wage_paid: 1200,
        completed_on: now() - Duration::days(30),
    }
}

pub(super) fn application(id: &str, worker_id: &str, job_id: &str) -> JobApplication {
    JobApplication {
        id: ApplicationId(id.to_string()),
        job_id: JobId(job_id.to_string()),
        worker_id: UserId(worker_id.to_string()),
        status: ApplicationStatus::Pending,
        applied_at: now() - Duration::hours(2),
    }
}

/// Raju with three completed jobs and one pending application, an employer with one open job,
/// and a few construction workers for search.
pub(super) fn seeded_store() -> Result<Arc<MemoryMarketplace>, RepositoryError> {
    let store = Arc::new(MemoryMarketplace::default());

    let mut raju = worker("worker1", &["Construction", "Agriculture"], Some("Fine"), Some(4.7));
    raju.stability_score = 65;
    raju.availability_status = Some(true);
    store.insert_user(raju)?;
    store.insert_user(worker("co1", &["Construction"], Some("Done"), Some(4.9)))?;
    store.insert_user(worker("co2", &["Construction"], Some("Unsatisfactory"), Some(4.7)))?;
    store.insert_user(worker("co3", &["Construction"], Some("Fine"), Some(4.6)))?;
    store.insert_user(worker("c1", &["Carpenter"], Some("Done"), Some(4.8)))?;
    store.insert_user(employer("employer1"))?;

    store.insert_job(job("j1", "employer1", "Construction"))?;
    store.insert_job(job("j2", "employer1", "Agriculture"))?;
    store.insert_job(job("job_raju_1", "employer1", "House Renovation"))?;

    store.insert_history(history("h1", "worker1", "j1"))?;
    store.insert_history(history("h2", "worker1", "j2"))?;
    store.insert_history(history("h3", "worker1", "j1"))?;
    store.insert_application(application("app_raju_1", "worker1", "job_raju_1"))?;

    Ok(store)
}

pub(super) fn build_service() -> (MarketplaceService<MemoryMarketplace>, Arc<MemoryMarketplace>) {
    let store = seeded_store().expect("seed data loads");
    let service = MarketplaceService::new(store.clone(), MarketplaceConfig::default());
    (service, store)
}

pub(super) fn router_with_service(service: MarketplaceService<MemoryMarketplace>) -> axum::Router {
    marketplace_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Repository whose every call fails, for exercising the error paths.
pub(super) struct OfflineRepository;

impl UserStore for OfflineRepository {
    fn users(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn user(&self, _id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_user(&self, _user: UserProfile) -> Result<UserProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify_user(
        &self,
        _id: &UserId,
        _change: &dyn Fn(&mut UserProfile),
    ) -> Result<UserProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl JobStore for OfflineRepository {
    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn job(&self, _id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_job(&self, _job: JobPosting) -> Result<JobPosting, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_job(&self, _job: JobPosting) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ApplicationStore for OfflineRepository {
    fn applications_for_worker(
        &self,
        _worker_id: &UserId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_for_jobs(
        &self,
        _job_ids: &[JobId],
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_application(
        &self,
        _worker_id: &UserId,
        _job_id: &JobId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_application(
        &self,
        _application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl HistoryStore for OfflineRepository {
    fn history_for_worker(
        &self,
        _worker_id: &UserId,
    ) -> Result<Vec<WorkHistoryRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_history(&self, _record: WorkHistoryRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl FeedbackStore for OfflineRepository {
    fn insert_issue(&self, _issue: IssueReport) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl CompletionStore for OfflineRepository {
    fn record_completion(&self, _work: CompletedWork) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

type HistoryHook = Box<dyn Fn(&MemoryMarketplace) + Send + Sync>;

/// Memory store wrapper that can run another writer's change right before each history read
/// and can start failing writes once a budget is spent.
pub(super) struct ScriptedRepository {
    inner: Arc<MemoryMarketplace>,
    before_history_read: Option<HistoryHook>,
    writes_left: AtomicUsize,
}

impl ScriptedRepository {
    pub(super) fn new(inner: Arc<MemoryMarketplace>) -> Self {
        Self {
            inner,
            before_history_read: None,
            writes_left: AtomicUsize::new(usize::MAX),
        }
    }

    pub(super) fn interleave(
        mut self,
        hook: impl Fn(&MemoryMarketplace) + Send + Sync + 'static,
    ) -> Self {
        self.before_history_read = Some(Box::new(hook));
        self
    }

    pub(super) fn failing_after_writes(self, allowed: usize) -> Self {
        self.writes_left.store(allowed, Ordering::SeqCst);
        self
    }

    fn write_permit(&self) -> Result<(), RepositoryError> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| RepositoryError::Unavailable("write budget exhausted".to_string()))
    }
}

impl UserStore for ScriptedRepository {
    fn users(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        self.inner.users()
    }

    fn user(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        self.inner.user(id)
    }

    fn insert_user(&self, user: UserProfile) -> Result<UserProfile, RepositoryError> {
        self.write_permit()?;
        self.inner.insert_user(user)
    }

    fn modify_user(
        &self,
        id: &UserId,
        change: &dyn Fn(&mut UserProfile),
    ) -> Result<UserProfile, RepositoryError> {
        self.write_permit()?;
        self.inner.modify_user(id, change)
    }
}

impl JobStore for ScriptedRepository {
    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        self.inner.jobs()
    }

    fn job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.inner.job(id)
    }

    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        self.write_permit()?;
        self.inner.insert_job(job)
    }

    fn update_job(&self, job: JobPosting) -> Result<(), RepositoryError> {
        self.write_permit()?;
        self.inner.update_job(job)
    }
}

impl ApplicationStore for ScriptedRepository {
    fn applications_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        self.inner.applications_for_worker(worker_id)
    }

    fn applications_for_jobs(
        &self,
        job_ids: &[JobId],
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        self.inner.applications_for_jobs(job_ids)
    }

    fn find_application(
        &self,
        worker_id: &UserId,
        job_id: &JobId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        self.inner.find_application(worker_id, job_id)
    }

    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        self.write_permit()?;
        self.inner.insert_application(application)
    }
}

impl HistoryStore for ScriptedRepository {
    fn history_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Vec<WorkHistoryRecord>, RepositoryError> {
        if let Some(hook) = &self.before_history_read {
            hook(&self.inner);
        }
        self.inner.history_for_worker(worker_id)
    }

    fn insert_history(&self, record: WorkHistoryRecord) -> Result<(), RepositoryError> {
        self.write_permit()?;
        self.inner.insert_history(record)
    }
}

impl FeedbackStore for ScriptedRepository {
    fn insert_issue(&self, issue: IssueReport) -> Result<(), RepositoryError> {
        self.write_permit()?;
        self.inner.insert_issue(issue)
    }
}

impl CompletionStore for ScriptedRepository {
    fn record_completion(&self, work: CompletedWork) -> Result<(), RepositoryError> {
        self.write_permit()?;
        self.inner.record_completion(work)
    }
}

use super::domain::{
    IssueReport, JobApplication, JobId, JobPosting, RatingRecord, UserId, UserProfile,
    WorkHistoryRecord,
};

/// Worker and employer records.
pub trait UserStore: Send + Sync {
    fn users(&self) -> Result<Vec<UserProfile>, RepositoryError>;
    fn user(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    fn insert_user(&self, user: UserProfile) -> Result<UserProfile, RepositoryError>;

    /// Apply `change` to the stored record while holding the store's write lock and return the
    /// updated record. Callers never write back a whole profile read earlier.
    fn modify_user(
        &self,
        id: &UserId,
        change: &dyn Fn(&mut UserProfile),
    ) -> Result<UserProfile, RepositoryError>;

    /// Overwrite only the cached stability score; last write wins.
    fn set_stability_score(&self, id: &UserId, score: u32) -> Result<(), RepositoryError> {
        self.modify_user(id, &|user| user.stability_score = score).map(|_| ())
    }
}

pub trait JobStore: Send + Sync {
    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError>;
    fn job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn update_job(&self, job: JobPosting) -> Result<(), RepositoryError>;
}

/// Applications are appended by the apply flow and only ever change status afterwards.
pub trait ApplicationStore: Send + Sync {
    fn applications_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Vec<JobApplication>, RepositoryError>;
    fn applications_for_jobs(&self, job_ids: &[JobId])
        -> Result<Vec<JobApplication>, RepositoryError>;
    fn find_application(
        &self,
        worker_id: &UserId,
        job_id: &JobId,
    ) -> Result<Option<JobApplication>, RepositoryError>;
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError>;
}

pub trait HistoryStore: Send + Sync {
    fn history_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Vec<WorkHistoryRecord>, RepositoryError>;
    fn insert_history(&self, record: WorkHistoryRecord) -> Result<(), RepositoryError>;
}

/// Append-only sink for worker issue reports. Ratings arrive with a job completion.
pub trait FeedbackStore: Send + Sync {
    fn insert_issue(&self, issue: IssueReport) -> Result<(), RepositoryError>;
}

/// Everything written when an employer signs off a job for a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedWork {
    pub record: WorkHistoryRecord,
    pub rating: Option<RatingRecord>,
}

/// Records a job completion as one unit: either every write lands or none does.
pub trait CompletionStore: Send + Sync {
    /// Marks the job completed, appends the history record and rating, and accepts the
    /// worker's application for the job if one exists. A job that is already completed yields
    /// `RepositoryError::Conflict` and leaves the store untouched.
    fn record_completion(&self, work: CompletedWork) -> Result<(), RepositoryError>;
}

/// Everything the marketplace service reads from and writes to.
pub trait MarketplaceRepository:
    UserStore + JobStore + ApplicationStore + HistoryStore + FeedbackStore + CompletionStore
{
}

impl<T> MarketplaceRepository for T where
    T: UserStore + JobStore + ApplicationStore + HistoryStore + FeedbackStore + CompletionStore
{
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

//! Gig worker marketplace: accounts, jobs, applications and work history, plus the stability
//! score and worker search ranking that sit on top of them.

pub mod domain;
pub mod memory;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_skill_list, ApplicationId, ApplicationStatus, ApplyRequest, HistoryId, IssueId,
    IssueReport, IssueSubmission, JobApplication, JobCompletion, JobDraft, JobId, JobPosting,
    JobStatus, ProfileUpdate, RatingRecord, Registration, UserId, UserProfile, UserRole,
    WorkHistoryRecord,
};
pub use memory::MemoryMarketplace;
pub use ranking::{health_weight, rank_workers, WorkerSummary, DISPLAY_DEFAULT_HEALTH_STATUS};
pub use repository::{
    ApplicationStore, CompletedWork, CompletionStore, FeedbackStore, HistoryStore, JobStore,
    MarketplaceRepository, RepositoryError, UserStore,
};
pub use router::{marketplace_router, ACTOR_HEADER};
pub use scoring::{compute_score, ScoreComponent, ScoreEngine, ScoreResult};
pub use service::{MarketplaceError, MarketplaceService};
pub use views::{
    ApplicantView, ApplicationView, EmployerDashboard, HealthCamp, HealthCheckup, HistoryView,
    OpenJobView, WelfareCatalog, WelfareScheme, WorkerDashboard,
};

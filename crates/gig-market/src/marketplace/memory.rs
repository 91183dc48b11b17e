use std::sync::{Mutex, MutexGuard};

use super::domain::{
    ApplicationStatus, IssueReport, JobApplication, JobId, JobPosting, JobStatus, RatingRecord,
    UserId, UserProfile, WorkHistoryRecord,
};
use super::repository::{
    ApplicationStore, CompletedWork, CompletionStore, FeedbackStore, HistoryStore, JobStore,
    RepositoryError, UserStore,
};

/// Process-memory store. A single mutex guards every collection so each call observes and
/// mutates one consistent snapshot; readers get clones.
#[derive(Debug, Default)]
pub struct MemoryMarketplace {
    state: Mutex<MarketState>,
}

#[derive(Debug, Default)]
struct MarketState {
    users: Vec<UserProfile>,
    jobs: Vec<JobPosting>,
    applications: Vec<JobApplication>,
    history: Vec<WorkHistoryRecord>,
    ratings: Vec<RatingRecord>,
    issues: Vec<IssueReport>,
}

impl MemoryMarketplace {
    fn lock(&self) -> Result<MutexGuard<'_, MarketState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("marketplace mutex poisoned".to_string()))
    }

    pub fn ratings(&self) -> Result<Vec<RatingRecord>, RepositoryError> {
        Ok(self.lock()?.ratings.clone())
    }

    pub fn issues(&self) -> Result<Vec<IssueReport>, RepositoryError> {
        Ok(self.lock()?.issues.clone())
    }
}

impl UserStore for MemoryMarketplace {
    fn users(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        Ok(self.lock()?.users.clone())
    }

    fn user(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.users.iter().find(|user| &user.id == id).cloned())
    }

    fn insert_user(&self, user: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut guard = self.lock()?;
        let duplicate = guard.users.iter().any(|existing| {
            existing.id == user.id
                || existing.email == user.email
                || (user.is_worker()
                    && user.adhithi_id.is_some()
                    && existing.adhithi_id == user.adhithi_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.users.push(user.clone());
        Ok(user)
    }

    fn modify_user(
        &self,
        id: &UserId,
        change: &dyn Fn(&mut UserProfile),
    ) -> Result<UserProfile, RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard
            .users
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        change(slot);
        Ok(slot.clone())
    }
}

impl JobStore for MemoryMarketplace {
    fn jobs(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        Ok(self.lock()?.jobs.clone())
    }

    fn job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.jobs.iter().find(|job| &job.id == id).cloned())
    }

    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.jobs.iter().any(|existing| existing.id == job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.jobs.push(job.clone());
        Ok(job)
    }

    fn update_job(&self, job: JobPosting) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard
            .jobs
            .iter_mut()
            .find(|existing| existing.id == job.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = job;
        Ok(())
    }
}

impl ApplicationStore for MemoryMarketplace {
    fn applications_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applications
            .iter()
            .filter(|application| &application.worker_id == worker_id)
            .cloned()
            .collect())
    }

    fn applications_for_jobs(
        &self,
        job_ids: &[JobId],
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applications
            .iter()
            .filter(|application| job_ids.contains(&application.job_id))
            .cloned()
            .collect())
    }

    fn find_application(
        &self,
        worker_id: &UserId,
        job_id: &JobId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applications
            .iter()
            .find(|application| {
                &application.worker_id == worker_id && &application.job_id == job_id
            })
            .cloned())
    }

    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.lock()?;
        let duplicate = guard.applications.iter().any(|existing| {
            existing.id == application.id
                || (existing.worker_id == application.worker_id
                    && existing.job_id == application.job_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.applications.push(application.clone());
        Ok(application)
    }
}

impl HistoryStore for MemoryMarketplace {
    fn history_for_worker(
        &self,
        worker_id: &UserId,
    ) -> Result<Vec<WorkHistoryRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .history
            .iter()
            .filter(|record| &record.worker_id == worker_id)
            .cloned()
            .collect())
    }

    fn insert_history(&self, record: WorkHistoryRecord) -> Result<(), RepositoryError> {
        self.lock()?.history.push(record);
        Ok(())
    }
}

impl FeedbackStore for MemoryMarketplace {
    fn insert_issue(&self, issue: IssueReport) -> Result<(), RepositoryError> {
        self.lock()?.issues.push(issue);
        Ok(())
    }
}

impl CompletionStore for MemoryMarketplace {
    fn record_completion(&self, work: CompletedWork) -> Result<(), RepositoryError> {
        let CompletedWork { record, rating } = work;
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let job = state
            .jobs
            .iter_mut()
            .find(|job| job.id == record.job_id)
            .ok_or(RepositoryError::NotFound)?;
        if job.status == JobStatus::Completed {
            return Err(RepositoryError::Conflict);
        }
        job.status = JobStatus::Completed;

        if let Some(application) = state.applications.iter_mut().find(|application| {
            application.worker_id == record.worker_id && application.job_id == record.job_id
        }) {
            application.status = ApplicationStatus::Accepted;
        }
        state.ratings.extend(rating);
        state.history.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::domain::{ApplicationId, HistoryId, UserRole};
    use chrono::Utc;

    fn worker(id: &str, email: &str, adhithi: Option<&str>) -> UserProfile {
        let mut worker = UserProfile::new(UserId(id.into()), id, email, UserRole::Worker);
        worker.adhithi_id = adhithi.map(str::to_string);
        worker
    }

    #[test]
    fn rejects_duplicate_email_and_adhithi_id() {
        let store = MemoryMarketplace::default();
        store
            .insert_user(worker("w1", "raju@test.com", Some("user123")))
            .expect("first insert");

        assert!(matches!(
            store.insert_user(worker("w2", "raju@test.com", None)),
            Err(RepositoryError::Conflict)
        ));
        assert!(matches!(
            store.insert_user(worker("w3", "other@test.com", Some("user123"))),
            Err(RepositoryError::Conflict)
        ));
        store
            .insert_user(worker("w4", "fresh@test.com", None))
            .expect("distinct worker");
        assert_eq!(store.users().expect("users").len(), 2);
    }

    #[test]
    fn one_application_per_worker_and_job() {
        let store = MemoryMarketplace::default();
        let application = JobApplication {
            id: ApplicationId("a1".into()),
            job_id: JobId("j1".into()),
            worker_id: UserId("w1".into()),
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        };
        store
            .insert_application(application.clone())
            .expect("first application");

        let mut again = application;
        again.id = ApplicationId("a2".into());
        assert!(matches!(
            store.insert_application(again),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn modify_missing_user_is_not_found() {
        let store = MemoryMarketplace::default();
        assert!(matches!(
            store.modify_user(&UserId("ghost".into()), &|user| user.stability_score = 1),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn score_write_leaves_other_fields_alone() {
        let store = MemoryMarketplace::default();
        store
            .insert_user(worker("w1", "raju@test.com", None))
            .expect("insert");
        store
            .modify_user(&UserId("w1".into()), &|user| {
                user.availability_status = Some(false)
            })
            .expect("availability written");

        store
            .set_stability_score(&UserId("w1".into()), 42)
            .expect("score written");

        let stored = store
            .user(&UserId("w1".into()))
            .expect("fetch")
            .expect("present");
        assert_eq!(stored.stability_score, 42);
        assert_eq!(stored.availability_status, Some(false));
    }

    fn open_job(id: &str) -> JobPosting {
        JobPosting {
            id: JobId(id.into()),
            title: "Roof Repair".into(),
            required_skill: "Carpenter".into(),
            wage: 700,
            duration: "1 day".into(),
            location: "Kochi".into(),
            employer_id: UserId("e1".into()),
            status: JobStatus::Open,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    fn completion(job_id: &str) -> CompletedWork {
        CompletedWork {
            record: WorkHistoryRecord {
                id: HistoryId(format!("h-{job_id}")),
                worker_id: UserId("w1".into()),
                job_id: JobId(job_id.into()),
                wage_paid: 700,
                completed_on: Utc::now(),
            },
            rating: Some(RatingRecord {
                worker_id: UserId("w1".into()),
                employer_id: UserId("e1".into()),
                score: 4.0,
            }),
        }
    }

    #[test]
    fn completion_is_recorded_once() {
        let store = MemoryMarketplace::default();
        store.insert_job(open_job("j1")).expect("job");
        store
            .insert_application(JobApplication {
                id: ApplicationId("a1".into()),
                job_id: JobId("j1".into()),
                worker_id: UserId("w1".into()),
                status: ApplicationStatus::Pending,
                applied_at: Utc::now(),
            })
            .expect("application");

        store.record_completion(completion("j1")).expect("first completion");
        assert!(matches!(
            store.record_completion(completion("j1")),
            Err(RepositoryError::Conflict)
        ));

        let history = store
            .history_for_worker(&UserId("w1".into()))
            .expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(store.ratings().expect("ratings").len(), 1);
        let application = store
            .find_application(&UserId("w1".into()), &JobId("j1".into()))
            .expect("fetch")
            .expect("present");
        assert_eq!(application.status, ApplicationStatus::Accepted);
    }

    #[test]
    fn completion_of_unknown_job_writes_nothing() {
        let store = MemoryMarketplace::default();
        assert!(matches!(
            store.record_completion(completion("missing")),
            Err(RepositoryError::NotFound)
        ));
        assert!(store
            .history_for_worker(&UserId("w1".into()))
            .expect("history")
            .is_empty());
        assert!(store.ratings().expect("ratings").is_empty());
    }
}

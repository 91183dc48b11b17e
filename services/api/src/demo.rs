use crate::infra::build_marketplace;
use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Args;
use gig_market::config::MarketplaceConfig;
use gig_market::error::AppError;
use gig_market::marketplace::{
    ApplicationId, ApplicationStatus, ApplicationStore, HistoryId, HistoryStore, JobApplication,
    JobId, JobPosting, JobStatus, JobStore, MemoryMarketplace, RepositoryError, ScoreResult,
    UserId, UserProfile, UserRole, UserStore, WorkHistoryRecord, WorkerSummary,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Skill to search for on behalf of the demo employer
    #[arg(long, default_value = "Construction")]
    pub(crate) skill: String,
    /// Worker whose stability score breakdown is printed
    #[arg(long, default_value = "worker1")]
    pub(crate) worker: String,
    /// Maximum number of ranked workers to show
    #[arg(long, default_value_t = MarketplaceConfig::DEFAULT_SEARCH_LIMIT)]
    pub(crate) limit: usize,
}

const DEMO_EMPLOYER: &str = "employer1";

/// (id, name, phone, skill, cached score, average rating, health status)
const DEMO_WORKERS: [(&str, &str, &str, &str, u32, f32, &str); 12] = [
    ("c1", "Babu", "994586562", "Carpenter", 80, 4.8, "Done"),
    ("c2", "Anu", "456542642", "Carpenter", 75, 4.6, "Fine"),
    ("c3", "Sanal", "856252354", "Carpenter", 70, 4.5, "Pending"),
    ("co1", "Mithun", "896531452", "Construction", 85, 4.9, "Done"),
    ("co2", "Sharu", "8974651652", "Construction", 80, 4.7, "Unsatisfactory"),
    ("co3", "Tintu", "79562641251", "Construction", 78, 4.6, "Fine"),
    ("a1", "Lara", "9586546563", "Agriculture", 82, 4.8, "Pending"),
    ("a2", "Arif", "8756522545", "Agriculture", 76, 4.5, "Done"),
    ("a3", "Somu", "875622545", "Agriculture", 72, 4.3, "Unsatisfactory"),
    ("p1", "Anas", "7656556556", "Plumber", 88, 4.9, "Done"),
    ("p2", "Kari", "8656264553", "Plumber", 84, 4.7, "Fine"),
    ("p3", "Lolu", "78564356235", "Plumber", 81, 4.6, "Pending"),
];

/// Load the sample population: one worker with history, twelve skilled workers, one employer,
/// three completed jobs and two open jobs with a pending application each.
pub(crate) fn seed_demo_data(
    store: &MemoryMarketplace,
    now: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    let mut raju = UserProfile::new(
        UserId("worker1".to_string()),
        "Raju",
        "raju@test.com",
        UserRole::Worker,
    );
    raju.adhithi_id = Some("user123".to_string());
    raju.skills = vec!["Construction".to_string(), "Agriculture".to_string()];
    raju.stability_score = 65;
    raju.avg_rating = Some(4.7);
    raju.health_status = Some("Fine".to_string());
    raju.location = Some("Perumbavoor".to_string());
    raju.phone = Some("9876543210".to_string());
    raju.availability_status = Some(true);
    store.insert_user(raju)?;

    for (id, name, phone, skill, score, rating, health) in DEMO_WORKERS {
        let mut worker = UserProfile::new(
            UserId(id.to_string()),
            name,
            format!("{}@test.com", name.to_lowercase()),
            UserRole::Worker,
        );
        worker.adhithi_id = Some(id.to_string());
        worker.phone = Some(phone.to_string());
        worker.skills = vec![skill.to_string()];
        worker.stability_score = score;
        worker.avg_rating = Some(rating);
        worker.health_status = Some(health.to_string());
        store.insert_user(worker)?;
    }

    let mut employer = UserProfile::new(
        UserId(DEMO_EMPLOYER.to_string()),
        "Aravind",
        "emp@test.com",
        UserRole::Employer,
    );
    employer.location = Some("Malappuram".to_string());
    store.insert_user(employer)?;

    for (id, title, wage) in [
        ("j1", "Construction", 1200),
        ("j2", "Agriculture", 1300),
        ("j3", "Construction", 1200),
    ] {
        store.insert_job(demo_job(id, title, title, wage, JobStatus::Completed, now))?;
    }
    store.insert_job(demo_job(
        "job_raju_1",
        "House Renovation",
        "Construction",
        500,
        JobStatus::Open,
        now,
    ))?;
    store.insert_job(demo_job(
        "job_somu_1",
        "Farm Assistance",
        "Agriculture",
        400,
        JobStatus::Open,
        now,
    ))?;

    for (id, job_id, wage, (year, month, day)) in [
        ("h1", "j1", 1200, (2025, 10, 15)),
        ("h2", "j2", 1300, (2025, 11, 20)),
        ("h3", "j1", 1200, (2025, 12, 5)),
    ] {
        store.insert_history(WorkHistoryRecord {
            id: HistoryId(id.to_string()),
            worker_id: UserId("worker1".to_string()),
            job_id: JobId(job_id.to_string()),
            wage_paid: wage,
            completed_on: Utc
                .with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .unwrap_or(now),
        })?;
    }

    for (id, job_id, worker_id) in [
        ("app_raju_1", "job_raju_1", "worker1"),
        ("app_somu_1", "job_somu_1", "a3"),
    ] {
        store.insert_application(JobApplication {
            id: ApplicationId(id.to_string()),
            job_id: JobId(job_id.to_string()),
            worker_id: UserId(worker_id.to_string()),
            status: ApplicationStatus::Pending,
            applied_at: now,
        })?;
    }

    Ok(())
}

fn demo_job(
    id: &str,
    title: &str,
    skill: &str,
    wage: u32,
    status: JobStatus,
    now: DateTime<Utc>,
) -> JobPosting {
    JobPosting {
        id: JobId(id.to_string()),
        title: title.to_string(),
        required_skill: skill.to_string(),
        wage,
        duration: "2 days".to_string(),
        location: "Malappuram".to_string(),
        employer_id: UserId(DEMO_EMPLOYER.to_string()),
        status,
        created_at: now,
        expires_at: Some(now + Duration::days(MarketplaceConfig::DEFAULT_JOB_EXPIRY_DAYS)),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skill,
        worker,
        limit,
    } = args;

    let config = MarketplaceConfig {
        search_limit: limit.max(1),
        seed_demo_data: true,
        ..MarketplaceConfig::default()
    };
    let service = build_marketplace(config, Utc::now())?;

    let score = service.score_details(&UserId(worker.clone()))?;
    let ranked = service.search_workers(&UserId(DEMO_EMPLOYER.to_string()), Some(&skill))?;

    render_score(&worker, &score);
    render_search(&skill, &ranked);
    Ok(())
}

fn render_score(worker: &str, score: &ScoreResult) {
    println!("Stability score for {worker}: {}", score.total);
    for entry in &score.breakdown {
        println!(
            "- {}: {} ({})",
            entry.label, entry.points, entry.description
        );
    }
}

fn render_search(skill: &str, ranked: &[WorkerSummary]) {
    if ranked.is_empty() {
        println!("\nNo available worker found for '{skill}'");
        return;
    }

    println!("\nTop workers for '{skill}'");
    for (position, summary) in ranked.iter().enumerate() {
        println!(
            "{}. {} [{}] rating {:.1}, health {}, phone {}",
            position + 1,
            summary.name,
            summary.id,
            summary.avg_rating,
            summary.health_status,
            summary.phone.as_deref().unwrap_or("n/a")
        );
    }
}

use serde::Serialize;

use super::domain::{JobApplication, JobPosting, UserProfile, WorkHistoryRecord};

pub const UNKNOWN_EMPLOYER: &str = "Unknown";
pub const UNKNOWN_JOB: &str = "Unknown";
pub const UNKNOWN_APPLIED_JOB: &str = "Unknown Job";

/// Open job as listed to workers, with the posting employer resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenJobView {
    #[serde(flatten)]
    pub job: JobPosting,
    pub employer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    #[serde(flatten)]
    pub record: WorkHistoryRecord,
    pub job_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: JobApplication,
    pub job_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerDashboard {
    pub worker: UserProfile,
    pub jobs: Vec<OpenJobView>,
    pub history: Vec<HistoryView>,
    pub applications: Vec<ApplicationView>,
    pub stability_score: u32,
    #[serde(flatten)]
    pub welfare: WelfareCatalog,
}

/// Application to one of the employer's jobs with the applicant attached when still on file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantView {
    #[serde(flatten)]
    pub application: JobApplication,
    pub worker: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerDashboard {
    pub employer: UserProfile,
    pub jobs: Vec<JobPosting>,
    pub applications: Vec<ApplicantView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WelfareScheme {
    pub title: &'static str,
    #[serde(rename = "desc")]
    pub description: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckup {
    pub date: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: &'static str,
    pub doctor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCamp {
    pub title: &'static str,
    pub location: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    #[serde(rename = "desc")]
    pub description: &'static str,
}

/// Fixed welfare content shown on every worker dashboard: state schemes for migrant workers,
/// recent checkups and upcoming medical camps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WelfareCatalog {
    pub welfare_schemes: Vec<WelfareScheme>,
    pub health_checkups: Vec<HealthCheckup>,
    pub upcoming_camps: Vec<HealthCamp>,
}

impl WelfareCatalog {
    pub fn standard() -> Self {
        Self {
            welfare_schemes: WELFARE_SCHEMES.to_vec(),
            health_checkups: HEALTH_CHECKUPS.to_vec(),
            upcoming_camps: UPCOMING_CAMPS.to_vec(),
        }
    }
}

const WELFARE_SCHEMES: [WelfareScheme; 4] = [
    WelfareScheme {
        title: "Healthcare: AAWAZ Insurance Scheme",
        description: "Health insurance for migrant workers.",
        link: "http://61.0.248.124/login",
    },
    WelfareScheme {
        title: "The Welfare Board: KBOCWWB",
        description: "Kerala Building & Other Construction Workers Welfare Board.",
        link: "http://kbuildingworkers.kerala.gov.in",
    },
    WelfareScheme {
        title: "Education: ROSHNI Project",
        description: "Educational support for children of migrant workers.",
        link: "https://ernakulam.nic.in/en/roshini/",
    },
    WelfareScheme {
        title: "Skill Development: KASE",
        description: "Kerala Academy for Skills Excellence.",
        link: "http://kase.in",
    },
];

const HEALTH_CHECKUPS: [HealthCheckup; 2] = [
    HealthCheckup {
        date: "2025-12-10",
        kind: "General Checkup",
        status: "Healthy",
        doctor: "Dr. A. Kumar",
    },
    HealthCheckup {
        date: "2025-06-15",
        kind: "Eye Test",
        status: "Corrective Lens Req.",
        doctor: "Dr. S. Priya",
    },
];

const UPCOMING_CAMPS: [HealthCamp; 1] = [HealthCamp {
    title: "Mega Medical Camp",
    location: "Perumbavoor Town Hall",
    date: "2026-02-15",
    time: "9:00 AM - 4:00 PM",
    description: "Free full body checkup and medicine distribution.",
}];

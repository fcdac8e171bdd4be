//! Fire-and-forget background-job list. The editor core never reads it;
//! the shell surfaces it as a bounded, newest-first activity feed in place
//! of an ambient shared toast list.

use std::collections::VecDeque;

use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "queued" => Some(JobStatus::Queued),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: JobStatus,
    pub progress: u8,
    pub created_at: String,
}

/// Bounded job list, newest first. Exceeding the cap evicts the oldest
/// entry; jobs are session-scoped and never persisted.
#[derive(Debug)]
pub struct JobBus {
    jobs: VecDeque<Job>,
    cap: usize,
}

pub const DEFAULT_JOB_CAP: usize = 32;

impl Default for JobBus {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_CAP)
    }
}

impl JobBus {
    pub fn new(cap: usize) -> Self {
        JobBus {
            jobs: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Queue a job and hand back its id.
    pub fn start_job(&mut self, title: impl Into<String>, description: impl Into<String>) -> String {
        let id = format!("job-{}", Uuid::now_v7());
        let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let created_at = OffsetDateTime::now_utc()
            .format(&fmt)
            .unwrap_or_else(|_| String::new());
        let job = Job {
            id: id.clone(),
            title: title.into(),
            description: description.into(),
            status: JobStatus::Queued,
            progress: 0,
            created_at,
        };
        log::info!("job queued: {} ({})", job.title, id);
        self.jobs.push_front(job);
        while self.jobs.len() > self.cap {
            self.jobs.pop_back();
        }
        id
    }

    pub fn update_status(&mut self, id: &str, status: JobStatus, progress: Option<u8>) -> bool {
        if let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) {
            job.status = status;
            if let Some(p) = progress {
                job.progress = p.min(100);
            }
            true
        } else {
            false
        }
    }

    /// Newest first.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

//! Session and job history persisted in the client's key-value storage.
//!
//! Layout (key → JSON value):
//! - `user`         → the current [`User`], absent when signed out
//! - `humanizeJobs` → `[Job]`, newest first, at most [`MAX_STORED_JOBS`]
//! - `userApiKey`   → the saved API key string
//!
//! Job records that do not parse (older client shapes, unknown statuses) are
//! skipped on read but carried through every rewrite of the list, so one bad
//! record never costs the rest of the history.

pub mod auth;
pub mod handlers;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::job::{Job, JobStatus};
use crate::models::user::User;
use crate::storage::{KeyValueStore, StorageError};

pub const USER_KEY: &str = "user";
pub const JOBS_KEY: &str = "humanizeJobs";
pub const API_KEY_KEY: &str = "userApiKey";

/// Oldest jobs beyond this count are evicted on append.
pub const MAX_STORED_JOBS: usize = 50;

/// Dashboard counters over the stored job history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub words_processed: usize,
}

#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write of the job list within this process.
    jobs_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            jobs_lock: Arc::new(Mutex::new(())),
        }
    }

    // ── session ────────────────────────────────────────────────────────────

    pub fn current_user(&self) -> Result<Option<User>, StorageError> {
        self.read_json(USER_KEY)
    }

    pub fn set_current_user(&self, user: &User) -> Result<(), StorageError> {
        self.write_json(USER_KEY, user)
    }

    pub fn clear_current_user(&self) -> Result<(), StorageError> {
        self.kv.remove(USER_KEY)
    }

    // ── jobs ───────────────────────────────────────────────────────────────

    /// Stored jobs, newest first, with word counts recomputed. Records that
    /// do not parse are skipped; an unreadable list reads as empty.
    pub fn list_jobs(&self) -> Result<Vec<Job>, StorageError> {
        let records = match self.read_job_records() {
            Ok(records) => records,
            Err(StorageError::Corrupt { key, reason }) => {
                warn!("Ignoring unreadable value under '{key}': {reason}");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        Ok(records.into_iter().filter_map(parse_job).collect())
    }

    pub fn find_job(&self, id: Uuid) -> Result<Option<Job>, StorageError> {
        Ok(self.list_jobs()?.into_iter().find(|j| j.id == id))
    }

    /// Puts `job` at the head of the list and evicts beyond the cap.
    /// An older record with the same id is replaced. Fails without writing
    /// when the stored list cannot be read.
    pub fn append_job(&self, job: &Job) -> Result<(), StorageError> {
        let _guard = self.lock_jobs();
        let mut records = self.read_job_records()?;
        let id = job.id.to_string();
        records.retain(|r| record_id(r) != Some(id.as_str()));
        records.insert(0, serde_json::to_value(job)?);
        records.truncate(MAX_STORED_JOBS);
        self.write_json(JOBS_KEY, &records)?;
        debug!("Stored job {} ({} jobs in history)", job.id, records.len());
        Ok(())
    }

    /// Removes exactly the job with `id`. Returns false if it was not stored.
    /// Fails without writing when the stored list cannot be read.
    pub fn delete_job(&self, id: Uuid) -> Result<bool, StorageError> {
        let _guard = self.lock_jobs();
        let mut records = self.read_job_records()?;
        let id = id.to_string();
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id.as_str()));
        if records.len() == before {
            return Ok(false);
        }
        self.write_json(JOBS_KEY, &records)?;
        Ok(true)
    }

    pub fn job_stats(&self) -> Result<JobStats, StorageError> {
        let jobs = self.list_jobs()?;
        Ok(JobStats {
            total_jobs: jobs.len(),
            completed_jobs: jobs
                .iter()
                .filter(|j| j.status() == JobStatus::Completed)
                .count(),
            words_processed: jobs.iter().map(Job::word_count).sum(),
        })
    }

    // ── API key ────────────────────────────────────────────────────────────

    pub fn api_key(&self) -> Result<Option<String>, StorageError> {
        self.read_json(API_KEY_KEY)
    }

    pub fn set_api_key(&self, key: &str) -> Result<(), StorageError> {
        self.write_json(API_KEY_KEY, &key)
    }

    pub fn clear_api_key(&self) -> Result<(), StorageError> {
        self.kv.remove(API_KEY_KEY)
    }

    /// Whether a key is saved. A read failure counts as no key.
    pub fn has_api_key(&self) -> bool {
        match self.api_key() {
            Ok(key) => key.is_some(),
            Err(err) => {
                warn!("Could not read saved API key: {err}");
                false
            }
        }
    }

    // ── helpers ────────────────────────────────────────────────────────────

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, ()> {
        self.jobs_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The raw job list. A present but unparseable list is `Corrupt`.
    fn read_job_records(&self) -> Result<Vec<Value>, StorageError> {
        let Some(raw) = self.kv.get(JOBS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt {
            key: JOBS_KEY.to_string(),
            reason: err.to_string(),
        })
    }

    /// Unparseable values are treated as absent, the same as a missing key.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!("Ignoring unreadable value under '{key}': {err}");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn parse_job(record: Value) -> Option<Job> {
    let id = record_id(&record).unwrap_or("<none>").to_string();
    match serde_json::from_value::<Job>(record) {
        Ok(job) => Some(job.with_recounted_words()),
        Err(err) => {
            warn!("Skipping unreadable job record {id}: {err}");
            None
        }
    }
}

//! Job orchestration: validates a submission, runs it through the
//! transformer and records the outcome.
//!
//! Flow: validate → create job (processing) → notify → simulated delay →
//!       transform → completed | failed → persist → notify → toast.
//!
//! Each job runs in its own spawned task, so a caller that stops waiting
//! (dropped HTTP request) does not cancel it. Jobs submitted concurrently may
//! finish in any order; the stored history puts whichever finished last first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::humanize::transformer::Transformer;
use crate::models::job::{HumanizeOptions, Job, JobStatus, SourceFile};
use crate::models::toast::NewToast;
use crate::notifications::ToastBus;
use crate::session::SessionStore;
use crate::validation::count_words;

/// Submissions longer than this are rejected before any job is created.
pub const MAX_INPUT_WORDS: usize = 10_000;

/// Owner recorded on jobs submitted without a signed-in user.
pub const GUEST_USER_ID: &str = "guest";

const EVENT_CAPACITY: usize = 64;

pub struct JobOrchestrator {
    session: SessionStore,
    toasts: ToastBus,
    transformer: Arc<dyn Transformer>,
    processing_delay: Duration,
    events: broadcast::Sender<Job>,
}

impl JobOrchestrator {
    pub fn new(
        session: SessionStore,
        toasts: ToastBus,
        transformer: Arc<dyn Transformer>,
        processing_delay: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session,
            toasts,
            transformer,
            processing_delay,
            events,
        }
    }

    /// Every job state change, in order per job: processing, then
    /// completed or failed.
    pub fn subscribe(&self) -> broadcast::Receiver<Job> {
        self.events.subscribe()
    }

    /// Runs one submission to completion and returns the finished job.
    ///
    /// A transformer failure is not an `Err`: the job comes back with status
    /// `failed` and is kept in history. `Err` means the input was rejected
    /// or the outcome could not be stored.
    pub async fn submit(
        self: &Arc<Self>,
        input_text: &str,
        options: HumanizeOptions,
        source: Option<SourceFile>,
    ) -> Result<Job, AppError> {
        self.validate_input(input_text)?;

        let owner = self
            .session
            .current_user()?
            .map(|user| user.id.to_string())
            .unwrap_or_else(|| GUEST_USER_ID.to_string());

        let mut job = Job::new(owner, input_text, &options, source);
        job.advance(JobStatus::Processing)?;
        info!(
            "Job {} processing: {} words, tone={}, degree={}",
            job.id,
            job.word_count(),
            options.tone.as_str(),
            options.degree.as_str()
        );
        self.notify(&job);

        let this = Arc::clone(self);
        tokio::spawn(async move { this.process(job, options).await })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Job task aborted: {e}")))?
    }

    /// Submits a fresh job with `job`'s input and settings. `job` itself is
    /// left untouched; the result has a new id and sends the saved API key
    /// when one exists.
    pub async fn rerun(self: &Arc<Self>, job: &Job) -> Result<Job, AppError> {
        let use_api_key = self.session.has_api_key();
        self.submit(
            job.input_text(),
            job.options(use_api_key),
            job.source_file(),
        )
        .await
    }

    pub async fn rerun_by_id(self: &Arc<Self>, id: Uuid) -> Result<Job, AppError> {
        let job = self
            .session
            .find_job(id)?
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
        self.rerun(&job).await
    }

    fn validate_input(&self, input_text: &str) -> Result<(), AppError> {
        if input_text.trim().is_empty() {
            self.toasts.publish(
                NewToast::warning("Input required").with_message("Please enter text to humanize"),
            );
            return Err(AppError::Validation("Input text cannot be empty".to_string()));
        }

        let words = count_words(input_text);
        if words > MAX_INPUT_WORDS {
            self.toasts.publish(
                NewToast::warning("Text too long")
                    .with_message("Please keep text under 10,000 words"),
            );
            return Err(AppError::Validation(format!(
                "Input has {words} words; the limit is {MAX_INPUT_WORDS}"
            )));
        }
        Ok(())
    }

    async fn process(&self, mut job: Job, options: HumanizeOptions) -> Result<Job, AppError> {
        tokio::time::sleep(self.processing_delay).await;

        match self
            .transformer
            .transform(job.id, job.input_text(), &options)
            .await
        {
            Ok(output) => {
                job.complete(output)?;
                info!("Job {} completed", job.id);
            }
            Err(err) => {
                job.fail()?;
                warn!("Job {} failed: {err}", job.id);
            }
        }

        let stored = self.session.append_job(&job);
        self.notify(&job);

        if let Err(err) = stored {
            error!("Job {} finished but could not be stored: {err}", job.id);
            self.toasts.publish(
                NewToast::error("Could not save job").with_message("Your result was not saved"),
            );
            return Err(err.into());
        }

        match job.status() {
            JobStatus::Completed => self.toasts.publish(
                NewToast::success("Humanization complete!")
                    .with_message("Your text has been successfully humanized"),
            ),
            _ => self.toasts.publish(
                NewToast::error("Humanization failed")
                    .with_message("Please try again or contact support"),
            ),
        };

        Ok(job)
    }

    fn notify(&self, job: &Job) {
        // No receivers is fine; nobody is watching.
        let _ = self.events.send(job.clone());
    }
}

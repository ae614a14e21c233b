//! Humanization jobs and their forward-only lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::validation::count_words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// pending → processing → {completed, failed}. Nothing else.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Casual,
    Formal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    Low,
    #[default]
    Medium,
    High,
}

impl Tone {
    #[cfg(test)]
    pub const ALL: [Tone; 2] = [Tone::Casual, Tone::Formal];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Casual => "casual",
            Tone::Formal => "formal",
        }
    }
}

impl Degree {
    #[cfg(test)]
    pub const ALL: [Degree; 3] = [Degree::Low, Degree::Medium, Degree::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Degree::Low => "low",
            Degree::Medium => "medium",
            Degree::High => "high",
        }
    }
}

/// Settings chosen in the editor for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeOptions {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub degree: Degree,
    /// Send the saved API key along with the remote humanize call.
    #[serde(default)]
    pub use_api_key: bool,
}

/// Name and type of the uploaded file the input text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("Invalid job status transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub user_id: String,
    status: JobStatus,
    input_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_text: Option<String>,
    pub tone: Tone,
    pub degree: Degree,
    #[serde(default)]
    word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        user_id: impl Into<String>,
        input_text: impl Into<String>,
        options: &HumanizeOptions,
        source: Option<SourceFile>,
    ) -> Self {
        let input_text = input_text.into();
        let now = Utc::now();
        let (file_name, file_type) = match source {
            Some(file) => (Some(file.file_name), file.file_type),
            None => (None, None),
        };

        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            status: JobStatus::Pending,
            word_count: count_words(&input_text),
            input_text,
            output_text: None,
            tone: options.tone,
            degree: options.degree,
            file_name,
            file_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn output_text(&self) -> Option<&str> {
        self.output_text.as_deref()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn source_file(&self) -> Option<SourceFile> {
        self.file_name.as_ref().map(|name| SourceFile {
            file_name: name.clone(),
            file_type: self.file_type.clone(),
        })
    }

    /// The options a re-run of this job submits with.
    pub fn options(&self, use_api_key: bool) -> HumanizeOptions {
        HumanizeOptions {
            tone: self.tone,
            degree: self.degree,
            use_api_key,
        }
    }

    /// Moves the job forward. Backward moves and moves out of a terminal
    /// status are rejected and leave the job untouched.
    pub fn advance(&mut self, next: JobStatus) -> Result<(), JobError> {
        if !self.status.can_transition_to(next) {
            return Err(JobError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn complete(&mut self, output_text: String) -> Result<(), JobError> {
        self.advance(JobStatus::Completed)?;
        self.output_text = Some(output_text);
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), JobError> {
        self.advance(JobStatus::Failed)
    }

    /// Recomputes the word count from the stored input. Applied to every job
    /// read back from storage, since persisted counts are not trusted.
    pub fn with_recounted_words(mut self) -> Self {
        self.word_count = count_words(&self.input_text);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    fn job(text: &str) -> Job {
        Job::new("guest", text, &HumanizeOptions::default(), None)
    }

    #[test]
    fn test_new_job_is_pending_with_counted_words() {
        let j = job("  The cat   can't run.  ");
        assert_eq!(j.status(), JobStatus::Pending);
        assert_eq!(j.word_count(), 4);
        assert!(j.output_text().is_none());
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut j = job("hello");
        j.advance(JobStatus::Processing).unwrap();
        j.complete("hi".to_string()).unwrap();
        assert_eq!(j.status(), JobStatus::Completed);
        assert_eq!(j.output_text(), Some("hi"));
    }

    #[test]
    fn test_terminal_statuses_reject_every_transition() {
        for terminal in [JobStatus::Completed, JobStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in ALL_STATUSES {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be rejected"
                );
            }
        }
    }

    #[test]
    fn test_only_forward_transitions_are_allowed() {
        let allowed: Vec<(JobStatus, JobStatus)> = ALL_STATUSES
            .iter()
            .flat_map(|&from| ALL_STATUSES.iter().map(move |&to| (from, to)))
            .filter(|&(from, to)| from.can_transition_to(to))
            .collect();

        assert_eq!(
            allowed,
            vec![
                (JobStatus::Pending, JobStatus::Processing),
                (JobStatus::Processing, JobStatus::Completed),
                (JobStatus::Processing, JobStatus::Failed),
            ]
        );
    }

    #[test]
    fn test_rejected_transition_leaves_job_unchanged() {
        let mut j = job("hello");
        j.advance(JobStatus::Processing).unwrap();
        j.fail().unwrap();
        let before = j.clone();

        let err = j.complete("late".to_string()).unwrap_err();
        assert_eq!(
            err,
            JobError::InvalidTransition {
                from: JobStatus::Failed,
                to: JobStatus::Completed
            }
        );
        assert_eq!(j, before);
    }

    #[test]
    fn test_pending_cannot_skip_processing() {
        let mut j = job("hello");
        assert!(j.complete("x".to_string()).is_err());
        assert_eq!(j.status(), JobStatus::Pending);
    }

    #[test]
    fn test_persisted_word_count_is_not_trusted() {
        let mut value = serde_json::to_value(job("one two three")).unwrap();
        value["wordCount"] = serde_json::json!(9999);

        let restored: Job = serde_json::from_value(value).unwrap();
        assert_eq!(restored.with_recounted_words().word_count(), 3);
    }

    #[test]
    fn test_source_file_round_trips_through_job() {
        let source = SourceFile {
            file_name: "essay.txt".to_string(),
            file_type: Some("text/plain".to_string()),
        };
        let j = Job::new("guest", "text", &HumanizeOptions::default(), Some(source.clone()));
        assert_eq!(j.source_file(), Some(source));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: HumanizeOptions = serde_json::from_str(r#"{"tone":"formal"}"#).unwrap();
        assert_eq!(options.tone, Tone::Formal);
        assert_eq!(options.degree, Degree::Medium);
        assert!(!options.use_api_key);
    }
}

//! Submission controller: turns a filled-in form into exactly one
//! [`SubmissionResult`] per attempt.
//!
//! Every attempt gets a fresh [`Ticket`]. Attempts are independent: nothing is
//! retried and overlapping attempts are not blocked here. Ordering between
//! overlapping attempts is settled by the display side, which drops results
//! whose ticket is older than one it already showed.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{info, warn};

use crate::{
    backend::WeatherBackend,
    error::{SubmitError, ValidationError},
    model::{FormState, WeatherRecord},
};

/// Status text shown after a successful lookup.
pub const SUCCESS_MESSAGE: &str = "Weather data retrieved successfully!";

/// Identity of one submit attempt. Later attempts compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn new(seq: u64) -> Self {
        Ticket(seq)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Success(WeatherRecord),
    Failure(SubmitError),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }

    pub fn record(&self) -> Option<&WeatherRecord> {
        match self {
            SubmissionResult::Success(record) => Some(record),
            SubmissionResult::Failure(_) => None,
        }
    }

    /// Text for the inline status area under the form.
    pub fn status_line(&self) -> String {
        match self {
            SubmissionResult::Success(_) => SUCCESS_MESSAGE.to_string(),
            SubmissionResult::Failure(err) => err.message(),
        }
    }
}

impl From<Result<WeatherRecord, SubmitError>> for SubmissionResult {
    fn from(value: Result<WeatherRecord, SubmitError>) -> Self {
        match value {
            Ok(record) => SubmissionResult::Success(record),
            Err(err) => SubmissionResult::Failure(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: Ticket,
    pub result: SubmissionResult,
}

/// Receives the "result available" notification for successful submissions.
pub trait ResultListener: Send + Sync {
    fn result_available(&self, ticket: Ticket, record: &WeatherRecord);
}

impl<F> ResultListener for F
where
    F: Fn(Ticket, &WeatherRecord) + Send + Sync,
{
    fn result_available(&self, ticket: Ticket, record: &WeatherRecord) {
        self(ticket, record)
    }
}

pub struct SubmissionController {
    backend: Box<dyn WeatherBackend>,
    listener: Option<Box<dyn ResultListener>>,
    last_ticket: AtomicU64,
}

impl fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionController")
            .field("backend", &self.backend)
            .field("listener", &self.listener.is_some())
            .field("last_ticket", &self.last_ticket.load(Ordering::Relaxed))
            .finish()
    }
}

impl SubmissionController {
    pub fn new(backend: Box<dyn WeatherBackend>) -> Self {
        Self { backend, listener: None, last_ticket: AtomicU64::new(0) }
    }

    pub fn with_listener(mut self, listener: impl ResultListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    fn next_ticket(&self) -> Ticket {
        Ticket(self.last_ticket.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Submit the form. An invalid form is refused before anything is sent.
    pub async fn submit(&self, form: &FormState) -> Result<Submission, ValidationError> {
        form.validate()?;

        let ticket = self.next_ticket();
        let body = form.request_body();
        info!(%ticket, location = %body.location, date = %body.date, "submitting");

        let result: SubmissionResult = self
            .backend
            .submit(&body)
            .await
            .map(|payload| WeatherRecord::from_submission(form, payload))
            .into();

        self.report(ticket, &result);
        Ok(Submission { ticket, result })
    }

    /// Fetch a stored record by id. Gets a ticket like any other submission.
    pub async fn recall(&self, id: &str) -> Submission {
        let ticket = self.next_ticket();
        info!(%ticket, id, "recalling");

        let result: SubmissionResult =
            self.backend.recall(id).await.map(WeatherRecord::from_stored).into();

        self.report(ticket, &result);
        Submission { ticket, result }
    }

    fn report(&self, ticket: Ticket, result: &SubmissionResult) {
        match result {
            SubmissionResult::Success(record) => {
                if let Some(listener) = &self.listener {
                    listener.result_available(ticket, record);
                }
            }
            SubmissionResult::Failure(SubmitError::TransportFailure { cause }) => {
                warn!(%ticket, %cause, "no response from backend");
            }
            SubmissionResult::Failure(SubmitError::BackendRejection { status, message }) => {
                warn!(%ticket, status, %message, "backend rejected request");
            }
        }
    }
}

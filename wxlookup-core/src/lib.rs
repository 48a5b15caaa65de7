//! Core library for the `wxlookup` weather client.
//!
//! This crate defines:
//! - The lookup form and the wire/display models
//! - The submission controller (one result per submit attempt)
//! - The display reconciler (empty / loading / populated panel)
//! - The HTTP backend client and on-disk configuration
//!
//! It is used by `wxlookup-cli`, but can also be driven by other front ends.

pub mod backend;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod submit;

pub use backend::{HttpBackend, WeatherBackend};
pub use config::Config;
pub use display::{CommitOutcome, DisplayReconciler, DisplayState, Panel};
pub use error::{SubmitError, ValidationError};
pub use model::{FormState, Reading, WeatherRecord};
pub use submit::{ResultListener, Submission, SubmissionController, SubmissionResult, Ticket};

//! Interactive lookup form.

use anyhow::Result;
use inquire::{
    Confirm, CustomUserError, InquireError, Text,
    validator::Validation,
};
use tokio::sync::mpsc;
use wxlookup_core::{
    Config, DisplayReconciler, FormState, HttpBackend, SubmissionController, Ticket,
    ValidationError, WeatherRecord, model::parse_date,
};

use crate::cli::{print_status, reveal};

pub async fn run(config: &Config) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ticket, WeatherRecord)>();
    let controller = SubmissionController::new(Box::new(HttpBackend::from_config(config)?))
        .with_listener(move |ticket: Ticket, record: &WeatherRecord| {
            let _ = tx.send((ticket, record.clone()));
        });
    let mut reconciler = DisplayReconciler::new(config.loading_delay());

    println!("{}\n", reconciler.state());

    let mut form = FormState::new();
    loop {
        let Some(filled) = answered(fill(&form))? else {
            return Ok(());
        };
        form = filled;

        println!("Fetching weather...");
        match controller.submit(&form).await {
            Ok(submission) => print_status(&submission.result),
            Err(err) => println!("[error] {err}"),
        }

        while let Ok((ticket, record)) = rx.try_recv() {
            reveal(&mut reconciler, ticket, record).await;
        }

        let again = Confirm::new("Look up another location?").with_default(true).prompt();
        if !answered(again)?.unwrap_or(false) {
            return Ok(());
        }
    }
}

/// Prompt for every field, starting from the previous answers.
fn fill(previous: &FormState) -> Result<FormState, InquireError> {
    let mut form = previous.clone();

    let date = Text::new("Date (YYYY-MM-DD):")
        .with_default(&previous.date_string())
        .with_validator(validate_date)
        .prompt()?;
    form.date = parse_date(&date).map_err(|err| InquireError::Custom(err.into()))?;

    let location = Text::new("Location:")
        .with_placeholder("e.g., New York, London, Tokyo")
        .with_initial_value(&previous.location)
        .with_validator(validate_location)
        .prompt()?;
    form.set_location(location);

    let notes = Text::new("Notes (optional):")
        .with_placeholder("Paste any notes you may have here!")
        .with_initial_value(&previous.notes)
        .prompt()?;
    form.set_notes(notes);

    Ok(form)
}

/// Escape and Ctrl-C end the form instead of failing it.
fn answered<T>(res: Result<T, InquireError>) -> Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn validate_date(input: &str) -> Result<Validation, CustomUserError> {
    Ok(match parse_date(input) {
        Ok(_) => Validation::Valid,
        Err(err) => Validation::Invalid(err.to_string().into()),
    })
}

fn validate_location(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        return Ok(Validation::Invalid(ValidationError::EmptyLocation.to_string().into()));
    }
    Ok(Validation::Valid)
}

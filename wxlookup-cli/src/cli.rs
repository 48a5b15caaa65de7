use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{CustomType, Text};
use wxlookup_core::{
    CommitOutcome, Config, DisplayReconciler, DisplayState, FormState, HttpBackend,
    SubmissionController, SubmissionResult, Ticket, WeatherRecord, config::Overrides,
    submit::SUCCESS_MESSAGE,
};

use crate::form;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxlookup", version, about = "Weather lookup client")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Weather endpoint, overriding the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Pause before showing a result, in milliseconds.
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the lookup form interactively.
    Form,

    /// Look up the weather for a location once.
    Show {
        /// Location name, e.g. "London".
        location: String,

        /// Date as YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes sent along with the request.
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Show a record the backend stored earlier.
    Recall {
        /// Record id returned by a previous lookup.
        id: String,
    },

    /// Save endpoint, delay and timeout. Prompts when no flags are given.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli { verbose: _, endpoint, delay_ms, timeout_secs, command } = self;

        let overrides =
            Overrides { endpoint, loading_delay_ms: delay_ms, request_timeout_secs: timeout_secs };
        let overridden = !overrides.is_empty();

        let mut config = Config::load()?;
        overrides.apply(&mut config);

        match command {
            Command::Form => form::run(&config).await,
            Command::Show { location, date, notes } => {
                let mut form = FormState::new();
                if let Some(date) = date {
                    form.set_date_str(&date)?;
                }
                form.set_location(location);
                form.set_notes(notes);

                let controller = controller(&config)?;
                let submission = controller.submit(&form).await?;
                finish(&config, submission.ticket, submission.result).await
            }
            Command::Recall { id } => {
                let controller = controller(&config)?;
                let submission = controller.recall(&id).await;
                finish(&config, submission.ticket, submission.result).await
            }
            Command::Configure => configure(config, overridden),
        }
    }
}

fn controller(config: &Config) -> Result<SubmissionController> {
    Ok(SubmissionController::new(Box::new(HttpBackend::from_config(config)?)))
}

/// One-shot commands: print the outcome or fail with the status message.
async fn finish(config: &Config, ticket: Ticket, result: SubmissionResult) -> Result<()> {
    match result {
        SubmissionResult::Success(record) => {
            println!("[ok] {SUCCESS_MESSAGE}");
            let mut reconciler = DisplayReconciler::new(config.loading_delay());
            reveal(&mut reconciler, ticket, record).await;
            Ok(())
        }
        SubmissionResult::Failure(err) => bail!("{}", err.message()),
    }
}

/// Inline status area under the form.
pub fn print_status(result: &SubmissionResult) {
    let mark = if result.is_success() { "[ok]" } else { "[error]" };
    println!("{mark} {}", result.status_line());
}

/// Walk the panel through loading into the populated view.
pub async fn reveal(reconciler: &mut DisplayReconciler, ticket: Ticket, record: WeatherRecord) {
    if !reconciler.delay().is_zero() {
        println!("{}", DisplayState::Loading);
    }
    if reconciler.present(ticket, record).await == CommitOutcome::Committed {
        if let DisplayState::Populated(WeatherRecord { id: Some(id), .. }) = reconciler.state() {
            println!("\nRecord id: {id}");
        }
        println!("\n{}\n", reconciler.state());
    }
}

fn configure(mut config: Config, overridden: bool) -> Result<()> {
    if !overridden {
        let endpoint = Text::new("Weather endpoint:").with_default(&config.endpoint).prompt()?;
        config.endpoint = endpoint;

        config.loading_delay_ms = CustomType::<u64>::new("Loading delay (ms):")
            .with_default(config.loading_delay_ms)
            .with_error_message("Please enter a whole number of milliseconds")
            .prompt()?;

        let timeout = CustomType::<u64>::new("Request timeout in seconds (0 for none):")
            .with_default(config.request_timeout_secs.unwrap_or(0))
            .with_error_message("Please enter a whole number of seconds")
            .prompt()?;
        config.request_timeout_secs = (timeout > 0).then_some(timeout);
    }

    config.endpoint_url()?;
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

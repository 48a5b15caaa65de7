//! Display reconciler: the results panel next to the form.
//!
//! The panel is always in exactly one of three states. A result passes through
//! `Loading` for a configurable pacing delay before it is shown, and a result
//! whose ticket is older than the latest one seen is dropped instead of
//! overwriting newer data.

use std::{fmt, time::Duration};
use tracing::debug;

use crate::{model::WeatherRecord, submit::Ticket};

pub const EMPTY_TITLE: &str = "No Weather Data";
pub const EMPTY_PROMPT: &str = "Submit a weather request to see detailed information.";
pub const LOADING_TEXT: &str = "Loading weather data...";

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Empty,
    Loading,
    Populated(WeatherRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// A newer ticket was already seen; the record was dropped.
    Stale,
}

#[derive(Debug)]
pub struct DisplayReconciler {
    state: DisplayState,
    delay: Duration,
    latest: Option<Ticket>,
}

impl DisplayReconciler {
    pub fn new(delay: Duration) -> Self {
        Self { state: DisplayState::Empty, delay, latest: None }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        self.latest.is_some_and(|latest| ticket < latest)
    }

    /// Enter `Loading` for `ticket`. Returns false, leaving the state alone, if
    /// a newer ticket has already been seen.
    pub fn begin(&mut self, ticket: Ticket) -> bool {
        if self.is_stale(ticket) {
            debug!(%ticket, "ignoring stale result");
            return false;
        }
        self.latest = Some(ticket);
        self.state = DisplayState::Loading;
        true
    }

    /// Show `record` unless a newer ticket has been seen since.
    pub fn commit(&mut self, ticket: Ticket, record: WeatherRecord) -> CommitOutcome {
        if self.is_stale(ticket) {
            debug!(%ticket, latest = ?self.latest, "dropping stale record");
            return CommitOutcome::Stale;
        }
        self.latest = Some(ticket);
        self.state = DisplayState::Populated(record);
        CommitOutcome::Committed
    }

    /// `begin`, wait out the pacing delay, then `commit`.
    pub async fn present(&mut self, ticket: Ticket, record: WeatherRecord) -> CommitOutcome {
        if !self.begin(ticket) {
            return CommitOutcome::Stale;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.commit(ticket, record)
    }
}

/// Pre-rendered text of a populated panel. Every reading carries its unit,
/// including the `N/A` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub location: String,
    pub date: String,
    pub temperature: String,
    pub condition: String,
    pub notes: Option<String>,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub cloud_cover: String,
}

impl From<&WeatherRecord> for Panel {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            location: record.location.clone(),
            date: record.date.clone(),
            temperature: format!("{}°C", record.temperature),
            condition: record.condition_text.to_string(),
            notes: (!record.notes.is_empty()).then(|| record.notes.clone()),
            humidity: format!("{}%", record.humidity),
            wind_speed: format!("{} km/h", record.wind_speed),
            pressure: format!("{} mb", record.pressure),
            cloud_cover: format!("{}%", record.cloud_cover),
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location)?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "{}  {}", self.temperature, self.condition)?;
        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "Notes")?;
            for line in notes.lines() {
                writeln!(f, "  {line}")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "{:<12} {}", "Humidity", self.humidity)?;
        writeln!(f, "{:<12} {}", "Wind Speed", self.wind_speed)?;
        writeln!(f, "{:<12} {}", "Pressure", self.pressure)?;
        write!(f, "{:<12} {}", "Cloud Cover", self.cloud_cover)
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Empty => write!(f, "{EMPTY_TITLE}\n{EMPTY_PROMPT}"),
            DisplayState::Loading => f.write_str(LOADING_TEXT),
            DisplayState::Populated(record) => fmt::Display::fmt(&Panel::from(record), f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reading;

    fn record(location: &str, temperature: Reading<f64>) -> WeatherRecord {
        WeatherRecord {
            id: None,
            location: location.to_string(),
            date: "2024-05-01".to_string(),
            notes: String::new(),
            temperature,
            condition_text: Reading::Known("Sunny".to_string()),
            humidity: Reading::Known(50.0),
            wind_speed: Reading::Known(10.0),
            pressure: Reading::Known(1012.0),
            cloud_cover: Reading::Known(5.0),
        }
    }

    fn unknown(location: &str) -> WeatherRecord {
        WeatherRecord {
            condition_text: Reading::Unknown,
            humidity: Reading::Unknown,
            wind_speed: Reading::Unknown,
            pressure: Reading::Unknown,
            cloud_cover: Reading::Unknown,
            ..record(location, Reading::Unknown)
        }
    }

    #[test]
    fn starts_empty_with_prompt() {
        let reconciler = DisplayReconciler::new(Duration::ZERO);
        assert_eq!(reconciler.state(), &DisplayState::Empty);
        assert!(reconciler.state().to_string().contains(EMPTY_PROMPT));
    }

    #[test]
    fn loading_replaces_previous_record() {
        let mut reconciler = DisplayReconciler::new(Duration::ZERO);
        reconciler.commit(Ticket::new(1), record("Paris", Reading::Known(21.0)));

        assert!(reconciler.begin(Ticket::new(2)));
        assert_eq!(reconciler.state(), &DisplayState::Loading);
        assert_eq!(reconciler.state().to_string(), LOADING_TEXT);
    }

    #[test]
    fn panel_renders_units() {
        let panel = Panel::from(&record("Paris", Reading::Known(21.0)));
        assert_eq!(panel.temperature, "21°C");
        assert_eq!(panel.condition, "Sunny");
        assert_eq!(panel.humidity, "50%");
        assert_eq!(panel.wind_speed, "10 km/h");
        assert_eq!(panel.pressure, "1012 mb");
        assert_eq!(panel.cloud_cover, "5%");
        assert_eq!(panel.notes, None);
    }

    #[test]
    fn panel_renders_placeholder_with_units() {
        let panel = Panel::from(&unknown("Nowhere"));
        assert_eq!(panel.temperature, "N/A°C");
        assert_eq!(panel.condition, "N/A");
        assert_eq!(panel.humidity, "N/A%");
        assert_eq!(panel.wind_speed, "N/A km/h");
        assert_eq!(panel.pressure, "N/A mb");
        assert_eq!(panel.cloud_cover, "N/A%");
    }

    #[test]
    fn notes_block_only_when_present() {
        let mut with_notes = record("Paris", Reading::Known(21.0));
        with_notes.notes = "pack sunscreen".to_string();

        let text = DisplayState::Populated(with_notes).to_string();
        assert!(text.contains("Notes\n  pack sunscreen"));

        let text = DisplayState::Populated(record("Paris", Reading::Known(21.0))).to_string();
        assert!(!text.contains("Notes"));
        assert!(text.starts_with("Paris\nDate: 2024-05-01\n21°C  Sunny"));
        assert!(text.ends_with("Cloud Cover  5%"));
    }

    #[test]
    fn stale_commit_never_overwrites_newer_record() {
        let mut reconciler = DisplayReconciler::new(Duration::ZERO);

        assert!(reconciler.begin(Ticket::new(1)));
        assert!(reconciler.begin(Ticket::new(2)));
        assert_eq!(
            reconciler.commit(Ticket::new(1), record("Old", Reading::Known(1.0))),
            CommitOutcome::Stale
        );
        assert_eq!(reconciler.state(), &DisplayState::Loading);

        assert_eq!(
            reconciler.commit(Ticket::new(2), record("New", Reading::Known(2.0))),
            CommitOutcome::Committed
        );
        assert!(!reconciler.begin(Ticket::new(1)));
        assert!(
            matches!(reconciler.state(), DisplayState::Populated(r) if r.location == "New")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn present_waits_out_pacing_delay() {
        let mut reconciler = DisplayReconciler::new(Duration::from_millis(800));
        let started = tokio::time::Instant::now();

        let outcome = reconciler.present(Ticket::new(1), record("Paris", Reading::Known(21.0))).await;

        assert_eq!(outcome, CommitOutcome::Committed);
        assert!(started.elapsed() >= Duration::from_millis(800));
        assert!(matches!(reconciler.state(), DisplayState::Populated(_)));
    }

    #[tokio::test]
    async fn present_skips_stale_ticket_without_waiting() {
        let mut reconciler = DisplayReconciler::new(Duration::from_secs(3600));
        reconciler.commit(Ticket::new(5), record("Newest", Reading::Known(3.0)));

        let outcome = reconciler.present(Ticket::new(4), record("Older", Reading::Known(2.0))).await;

        assert_eq!(outcome, CommitOutcome::Stale);
        assert!(
            matches!(reconciler.state(), DisplayState::Populated(r) if r.location == "Newest")
        );
    }
}

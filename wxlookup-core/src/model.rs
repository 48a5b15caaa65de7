use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::fmt;

use crate::error::ValidationError;

/// Wire and display format of calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value reported by the backend, or the explicit "unknown" sentinel when the
/// backend left it out. Never collapse `Unknown` into zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Known(T),
    Unknown,
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reading::Unknown, Reading::Known)
    }
}

/// Fields of the lookup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub date: NaiveDate,
    pub location: String,
    pub notes: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            location: String::new(),
            notes: String::new(),
        }
    }
}

impl FormState {
    /// Empty form dated today.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Set the date from its `YYYY-MM-DD` form.
    pub fn set_date_str(&mut self, value: &str) -> Result<(), ValidationError> {
        self.date = parse_date(value)?;
        Ok(())
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Location is the only required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.location.trim().is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        Ok(())
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn request_body(&self) -> WeatherRequestBody {
        WeatherRequestBody {
            date: self.date_string(),
            location: self.location.clone(),
            notes: self.notes.clone(),
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// JSON body of `POST /weather`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRequestBody {
    pub date: String,
    pub location: String,
    pub notes: String,
}

/// Success body of the backend. Every field decodes on its own: missing, null or
/// mistyped values come out as `None` without failing their siblings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BackendPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Conditions>,
}

/// Nested `weather` object of the success body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Conditions {
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cloudcover: Option<f64>,
}

impl BackendPayload {
    /// Decode a success body. Only text that is not JSON at all is an error; any
    /// JSON value that is not an object yields an all-unknown payload.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if value.is_object() {
            Self::deserialize(value)
        } else {
            Ok(Self::default())
        }
    }
}

/// Failure body of the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectionBody {
    #[serde(default, deserialize_with = "lenient")]
    pub detail: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Display-ready weather data.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub id: Option<String>,
    pub location: String,
    pub date: String,
    pub notes: String,
    pub temperature: Reading<f64>,
    pub condition_text: Reading<String>,
    pub humidity: Reading<f64>,
    pub wind_speed: Reading<f64>,
    pub pressure: Reading<f64>,
    pub cloud_cover: Reading<f64>,
}

impl WeatherRecord {
    /// Normalize the answer to a form submission. Location, date and notes echo
    /// what was submitted.
    pub fn from_submission(form: &FormState, payload: BackendPayload) -> Self {
        Self::build(
            form.location.clone(),
            form.date_string(),
            form.notes.clone(),
            payload,
        )
    }

    /// Normalize a stored record fetched by id; the echoed fields come from the
    /// backend.
    pub fn from_stored(mut payload: BackendPayload) -> Self {
        let location = payload.location.take().unwrap_or_default();
        let date = payload.date.take().unwrap_or_default();
        let notes = payload.notes.take().unwrap_or_default();
        Self::build(location, date, notes, payload)
    }

    fn build(location: String, date: String, notes: String, payload: BackendPayload) -> Self {
        let conditions = payload.weather.unwrap_or_default();
        Self {
            id: payload.id,
            location,
            date,
            notes,
            temperature: payload.temperature.into(),
            condition_text: payload.description.into(),
            humidity: conditions.humidity.into(),
            wind_speed: conditions.wind_speed.into(),
            pressure: conditions.pressure.into(),
            cloud_cover: conditions.cloudcover.into(),
        }
    }
}

/// Placeholder rendered for `Reading::Unknown`.
pub const PLACEHOLDER: &str = "N/A";

impl fmt::Display for Reading<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Known(value) => write!(f, "{value}"),
            Reading::Unknown => f.write_str(PLACEHOLDER),
        }
    }
}

impl fmt::Display for Reading<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Known(value) => f.write_str(value),
            Reading::Unknown => f.write_str(PLACEHOLDER),
        }
    }
}

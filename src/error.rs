use thiserror::Error;

/// Failure while retrieving or normalizing the weather forecast.
///
/// The forecast window is atomic: any of these aborts the whole run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid forecast payload: {0}")]
    Payload(String),
}

impl FetchError {
    /// Transport-level failures that a caller may reasonably retry.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            FetchError::Status { status, .. } => (500..600).contains(status),
            FetchError::Payload(_) => false,
        }
    }
}

/// An observation reached the model in a state the fetcher never produces.
#[derive(Error, Debug, PartialEq)]
pub enum ModelInputError {
    #[error("{date}: field '{field}' is not a finite number")]
    NonFinite { date: chrono::NaiveDate, field: &'static str },

    #[error("{date}: weekday {weekday} is outside 1-7")]
    Weekday { date: chrono::NaiveDate, weekday: u32 },

    #[error("{date}: month {month} is outside 1-12")]
    Month { date: chrono::NaiveDate, month: u32 },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Forecast fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Model input error: {0}")]
    ModelInput(#[from] ModelInputError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

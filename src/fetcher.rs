use crate::error::FetchError;
use crate::models::DailyObservation;
use chrono::NaiveDate;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_LATITUDE: f64 = 55.6761;
pub const DEFAULT_LONGITUDE: f64 = 12.5683;
pub const DEFAULT_HORIZON_DAYS: u32 = 10;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Copenhagen;

const DAILY_METRICS: &str =
    "temperature_2m_max,precipitation_sum,wind_speed_10m_max,sunshine_duration";

/// Longest error body kept in a `FetchError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Point and window to forecast for.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub horizon_days: u32,
    pub timezone: Tz,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            horizon_days: DEFAULT_HORIZON_DAYS,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailySeries>,
}

/// Parallel daily arrays as returned by the provider. Entries may be null.
#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Option<Vec<String>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    precipitation_sum: Option<Vec<Option<f64>>>,
    wind_speed_10m_max: Option<Vec<Option<f64>>>,
    sunshine_duration: Option<Vec<Option<f64>>>,
}

pub struct Fetcher {
    client: Client,
    base_url: String,
}

impl Fetcher {
    /// Fetcher relying on the transport's default timeout behaviour.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent("cafe-forecast/0.1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the daily forecast for `request` and normalize it into observations.
    ///
    /// Exactly one request is made. The result holds one observation per day,
    /// ascending and contiguous, or the call fails as a whole.
    pub async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<Vec<DailyObservation>, FetchError> {
        let url = format!("{}/v1/forecast", self.base_url);
        debug!(
            "Requesting {}-day forecast for ({}, {}) from {}",
            request.horizon_days, request.latitude, request.longitude, url
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", request.latitude.to_string()),
                ("longitude", request.longitude.to_string()),
                ("daily", DAILY_METRICS.to_string()),
                ("forecast_days", request.horizon_days.to_string()),
                ("timezone", request.timezone.name().to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let observations = parse_forecast(&body, request.horizon_days)?;
        info!(
            "Fetched {} forecast days ({} to {})",
            observations.len(),
            observations.first().map(|o| o.date.to_string()).unwrap_or_default(),
            observations.last().map(|o| o.date.to_string()).unwrap_or_default()
        );
        Ok(observations)
    }
}

/// Parse and validate a provider payload into observations.
fn parse_forecast(body: &str, horizon_days: u32) -> Result<Vec<DailyObservation>, FetchError> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Payload(format!("Malformed JSON: {}", e)))?;

    let daily = response
        .daily
        .ok_or_else(|| FetchError::Payload("Missing 'daily' object".to_string()))?;

    let time = daily
        .time
        .ok_or_else(|| FetchError::Payload("Missing 'daily.time' series".to_string()))?;
    let temp = require_series(daily.temperature_2m_max, "temperature_2m_max", time.len())?;
    let precip = require_series(daily.precipitation_sum, "precipitation_sum", time.len())?;
    let wind = require_series(daily.wind_speed_10m_max, "wind_speed_10m_max", time.len())?;
    let sunshine = require_series(daily.sunshine_duration, "sunshine_duration", time.len())?;

    if time.len() != horizon_days as usize {
        return Err(FetchError::Payload(format!(
            "Expected {} forecast days, got {}",
            horizon_days,
            time.len()
        )));
    }

    let mut observations = Vec::with_capacity(time.len());
    let mut previous: Option<NaiveDate> = None;

    for (i, raw_date) in time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| FetchError::Payload(format!("Invalid date '{}': {}", raw_date, e)))?;

        if let Some(prev) = previous {
            if prev.succ_opt() != Some(date) {
                return Err(FetchError::Payload(format!(
                    "Dates are not contiguous: {} follows {}",
                    date, prev
                )));
            }
        }
        previous = Some(date);

        observations.push(DailyObservation::from_raw(
            date,
            value_at(&temp, i, "temperature_2m_max", date)?,
            value_at(&precip, i, "precipitation_sum", date)?,
            value_at(&wind, i, "wind_speed_10m_max", date)?,
            value_at(&sunshine, i, "sunshine_duration", date)?,
        ));
    }

    Ok(observations)
}

fn require_series(
    series: Option<Vec<Option<f64>>>,
    name: &str,
    expected_len: usize,
) -> Result<Vec<Option<f64>>, FetchError> {
    let series = series
        .ok_or_else(|| FetchError::Payload(format!("Missing 'daily.{}' series", name)))?;

    if series.len() != expected_len {
        return Err(FetchError::Payload(format!(
            "Series '{}' has {} values but 'time' has {}",
            name,
            series.len(),
            expected_len
        )));
    }

    Ok(series)
}

fn value_at(
    series: &[Option<f64>],
    index: usize,
    name: &str,
    date: NaiveDate,
) -> Result<f64, FetchError> {
    series[index].ok_or_else(|| FetchError::Payload(format!("Null '{}' value for {}", name, date)))
}

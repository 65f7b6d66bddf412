use crate::error::{FetchError, Result};
use crate::fetcher::{Fetcher, ForecastRequest};
use crate::models::{DailyObservation, PredictedDay};
use crate::predictor::Predictor;
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

/// Run one forecast: fetch the weather window, then predict every day.
///
/// A fetch failure ends the run before the predictor is invoked.
pub async fn run_forecast(fetcher: &Fetcher, request: &ForecastRequest) -> Result<Vec<PredictedDay>> {
    run_forecast_with_retries(fetcher, request, 0).await
}

/// Same as [`run_forecast`], retrying transient fetch failures up to `max_retries` times.
pub async fn run_forecast_with_retries(
    fetcher: &Fetcher,
    request: &ForecastRequest,
    max_retries: u32,
) -> Result<Vec<PredictedDay>> {
    info!(
        "Starting forecast run: {} days for ({}, {}) in {}",
        request.horizon_days,
        request.latitude,
        request.longitude,
        request.timezone.name()
    );

    let observations =
        retry_with_backoff(max_retries, || fetcher.fetch_forecast(request)).await?;
    check_window_start(&observations, request);

    let predictions = Predictor::predict(&observations)?;
    info!("Predicted {} days", predictions.len());
    Ok(predictions)
}

/// The provider decides the window start; note when it is not today in the request timezone.
fn check_window_start(observations: &[DailyObservation], request: &ForecastRequest) {
    let today = Utc::now().with_timezone(&request.timezone).date_naive();
    if let Some(first) = observations.first() {
        if first.date != today {
            warn!(
                "Forecast window starts {} but today in {} is {}",
                first.date,
                request.timezone.name(),
                today
            );
        }
    }
}

/// Retry a fetch with exponential backoff. Only transient failures are retried.
pub async fn retry_with_backoff<F, Fut, T>(max_retries: u32, mut f: F) -> std::result::Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, FetchError>>,
{
    let mut retries = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                retries += 1;

                if retries > max_retries || !e.is_transient() {
                    return Err(e);
                }

                let delay = Duration::from_secs(2u64.pow(retries.saturating_sub(1)));
                warn!(
                    "Forecast request failed (attempt {}/{}): {}. Retrying in {:?}...",
                    retries,
                    max_retries + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

use crate::error::ModelInputError;
use crate::models::{DailyObservation, PredictedDay};
use crate::rain::RainGroup;
use tracing::{debug, warn};

// Continuous base terms
const INTERCEPT: f64 = -6091.86;
const TEMP_MAX_COEF: f64 = 1091.45;
const WIND_MAX_COEF: f64 = -161.57;
const SUNSHINE_HOURS_COEF: f64 = 1050.98;

/// Month offsets. January is the baseline and has no entry.
const MONTH_OFFSETS: [(u32, f64); 11] = [
    (2, 0.0),
    (3, 1921.83),
    (4, 3218.33),
    (5, 4395.99),
    (6, 3272.20),
    (7, -635.25),
    (8, 1713.98),
    (9, -524.20),
    (10, -218.02),
    (11, 5332.89),
    (12, 7911.60),
];

/// Weekday offsets indexed by ISO weekday - 1 (Monday baseline).
const WEEKDAY_OFFSETS: [f64; 7] = [0.0, -675.05, 507.61, 3441.95, 3488.52, 3736.35, 2099.48];

/// Year offsets. Years outside the table contribute nothing.
const YEAR_OFFSETS: [(i32, f64); 3] = [(2023, 6727.87), (2024, 10734.00), (2025, 16610.22)];

/// Share of revenue allocated to labor.
const LABOR_SHARE: f64 = 0.2;
/// Hourly labor cost in kr.
const HOURLY_RATE: f64 = 155.0;

/// The five additive terms of a single day's revenue prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueBreakdown {
    pub base: f64,
    pub month: f64,
    pub weekday: f64,
    pub rain: f64,
    pub year: f64,
}

impl RevenueBreakdown {
    pub fn total(&self) -> f64 {
        self.base + self.month + self.weekday + self.rain + self.year
    }
}

pub fn month_offset(month: u32) -> f64 {
    MONTH_OFFSETS
        .iter()
        .find(|(m, _)| *m == month)
        .map(|(_, offset)| *offset)
        .unwrap_or(0.0)
}

/// Defined for 1..=7 only; `Predictor::predict` rejects anything else.
fn weekday_offset(weekday: u32) -> f64 {
    weekday
        .checked_sub(1)
        .and_then(|i| WEEKDAY_OFFSETS.get(i as usize))
        .copied()
        .unwrap_or(0.0)
}

pub fn rain_offset(group: RainGroup) -> f64 {
    match group {
        RainGroup::Dry => 0.0,
        RainGroup::Light => -2542.21,
        RainGroup::Moderate => -4584.56,
        RainGroup::Heavy => -5169.57,
        RainGroup::VeryHeavy => -7182.38,
        RainGroup::Extreme => -7340.26,
    }
}

pub fn year_offset(year: i32) -> f64 {
    YEAR_OFFSETS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, offset)| *offset)
        .unwrap_or(0.0)
}

/// Latest year the model carries an offset for.
pub fn latest_model_year() -> i32 {
    YEAR_OFFSETS.iter().map(|(y, _)| *y).max().unwrap_or(i32::MIN)
}

pub fn staff_hours(revenue: f64) -> f64 {
    revenue * LABOR_SHARE / HOURLY_RATE
}

/// Fixed additive linear revenue model. Stateless; every call is independent.
pub struct Predictor;

impl Predictor {
    /// Predict revenue and staffing for every day, preserving order and count.
    ///
    /// Fails only if an observation could not have come from the fetcher
    /// (non-finite values, weekday or month out of range).
    pub fn predict(observations: &[DailyObservation]) -> Result<Vec<PredictedDay>, ModelInputError> {
        for obs in observations {
            validate(obs)?;
        }

        let latest = latest_model_year();
        if let Some(stale) = observations.iter().find(|o| o.year > latest) {
            warn!(
                "Forecast year {} is newer than the model's latest year {}; year offset defaults to 0",
                stale.year, latest
            );
        }

        let predictions = observations
            .iter()
            .map(|obs| {
                let breakdown = Self::contributions(obs);
                let revenue = breakdown.total();
                debug!("{}: {:?} -> {:.2}", obs.date, breakdown, revenue);

                PredictedDay {
                    date: obs.date,
                    temp_max: obs.temp_max,
                    wind_max: obs.wind_max,
                    precip_sum: obs.precip_sum,
                    sunshine_hours: obs.sunshine_hours,
                    predicted_revenue: revenue,
                    predicted_staff_hours: staff_hours(revenue),
                }
            })
            .collect();

        Ok(predictions)
    }

    /// Per-term contributions for one observation. The observation must be valid.
    pub fn contributions(obs: &DailyObservation) -> RevenueBreakdown {
        RevenueBreakdown {
            base: INTERCEPT
                + TEMP_MAX_COEF * obs.temp_max
                + WIND_MAX_COEF * obs.wind_max
                + SUNSHINE_HOURS_COEF * obs.sunshine_hours,
            month: month_offset(obs.month),
            weekday: weekday_offset(obs.weekday),
            rain: rain_offset(obs.rain_group),
            year: year_offset(obs.year),
        }
    }
}

fn validate(obs: &DailyObservation) -> Result<(), ModelInputError> {
    let numeric = [
        ("temp_max", obs.temp_max),
        ("precip_sum", obs.precip_sum),
        ("wind_max", obs.wind_max),
        ("sunshine_hours", obs.sunshine_hours),
    ];
    for (field, value) in numeric {
        if !value.is_finite() {
            return Err(ModelInputError::NonFinite {
                date: obs.date,
                field,
            });
        }
    }

    if !(1..=7).contains(&obs.weekday) {
        return Err(ModelInputError::Weekday {
            date: obs.date,
            weekday: obs.weekday,
        });
    }

    if !(1..=12).contains(&obs.month) {
        return Err(ModelInputError::Month {
            date: obs.date,
            month: obs.month,
        });
    }

    Ok(())
}

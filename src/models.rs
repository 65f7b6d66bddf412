use crate::rain::RainGroup;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// One forecast day, normalized to the internal schema with derived calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub precip_sum: f64,
    pub wind_max: f64,
    pub sunshine_hours: f64,
    pub month: u32,
    /// ISO weekday, Monday=1 .. Sunday=7
    pub weekday: u32,
    pub year: i32,
    pub rain_group: RainGroup,
}

impl DailyObservation {
    /// Build an observation from the provider's raw daily aggregates.
    pub fn from_raw(
        date: NaiveDate,
        temp_max: f64,
        precip_sum: f64,
        wind_max: f64,
        sunshine_seconds: f64,
    ) -> Self {
        Self {
            date,
            temp_max,
            precip_sum,
            wind_max,
            sunshine_hours: sunshine_seconds / SECONDS_PER_HOUR,
            month: date.month(),
            weekday: date.weekday().number_from_monday(),
            year: date.year(),
            rain_group: RainGroup::from_precipitation(precip_sum),
        }
    }
}

/// Prediction output handed to the presentation layer. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedDay {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub wind_max: f64,
    pub precip_sum: f64,
    pub sunshine_hours: f64,
    pub predicted_revenue: f64,
    pub predicted_staff_hours: f64,
}

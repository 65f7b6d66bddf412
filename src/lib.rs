//! Café revenue and staffing forecast.
//!
//! Fetches a daily weather forecast from Open-Meteo, derives calendar and
//! rain-bucket features, and applies a fixed additive linear model.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod rain;
pub mod report;

use crate::error::{AppError, Result};
use crate::fetcher::{
    ForecastRequest, DEFAULT_BASE_URL, DEFAULT_HORIZON_DAYS, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Open-Meteo accepts at most 16 forecast days.
const MAX_HORIZON_DAYS: u32 = 16;
const MAX_RETRIES: u32 = 5;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude", deserialize_with = "deserialize_coordinate")]
    pub latitude: f64,
    #[serde(default = "default_longitude", deserialize_with = "deserialize_coordinate")]
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

fn default_location_name() -> String {
    "Copenhagen".to_string()
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

/// Custom deserializer that handles coordinates as both number and string
///
/// Accepts:
/// - `latitude: 55.6761` (number)
/// - `latitude: "55.6761"` (string that parses to number)
/// - `latitude: ${CAFE_LATITUDE}` (env var substituted to either)
fn deserialize_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CoordinateValue {
        Number(f64),
        String(String),
    }

    match CoordinateValue::deserialize(deserializer)? {
        CoordinateValue::Number(n) => Ok(n),
        CoordinateValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("Invalid coordinate: '{}'", s))),
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// No timeout beyond the transport default when unset.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            horizon_days: default_horizon_days(),
            timezone: default_timezone(),
            request_timeout_seconds: None,
            max_retries: 0,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_timezone() -> String {
    "Europe/Copenhagen".to_string()
}

impl ForecastConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let expanded = expand_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&expanded)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Build the fetch request described by this configuration.
    pub fn forecast_request(&self) -> Result<ForecastRequest> {
        Ok(ForecastRequest {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            horizon_days: self.forecast.horizon_days,
            timezone: parse_timezone(&self.forecast.timezone)?,
        })
    }

    /// Validate configuration values
    ///
    /// Checks for:
    /// - Coordinates within range
    /// - Forecast horizon accepted by the provider
    /// - A known IANA timezone
    /// - Valid HTTPS base URL
    fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(AppError::Config(format!(
                "Latitude {} must be between -90 and 90",
                self.location.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(AppError::Config(format!(
                "Longitude {} must be between -180 and 180",
                self.location.longitude
            )));
        }

        if self.forecast.horizon_days == 0 || self.forecast.horizon_days > MAX_HORIZON_DAYS {
            return Err(AppError::Config(format!(
                "Forecast horizon_days must be between 1 and {}, got {}",
                MAX_HORIZON_DAYS, self.forecast.horizon_days
            )));
        }

        parse_timezone(&self.forecast.timezone)?;

        if self.forecast.request_timeout_seconds == Some(0) {
            return Err(AppError::Config(
                "Forecast request_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.forecast.max_retries > MAX_RETRIES {
            return Err(AppError::Config(format!(
                "Forecast max_retries {} is too high, maximum is {}",
                self.forecast.max_retries, MAX_RETRIES
            )));
        }

        let parsed = url::Url::parse(&self.forecast.base_url).map_err(|e| {
            AppError::Config(format!(
                "Invalid forecast base_url '{}': {}",
                self.forecast.base_url, e
            ))
        })?;

        if parsed.scheme() != "https" {
            return Err(AppError::Config(format!(
                "Forecast base_url must use HTTPS, got: {}",
                parsed.scheme()
            )));
        }

        Ok(())
    }
}

fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AppError::Config(format!("Unknown timezone '{}'", name)))
}

fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| AppError::Config(format!("Invalid substitution pattern: {}", e)))?;

    let mut missing_vars = Vec::new();

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(value) => {
                result = result.replace(&cap[0], &value);
            }
            Err(_) => {
                missing_vars.push(var_name.to_string());
            }
        }
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Config(format!(
            "Missing required environment variable{}: {}\n\n\
             To fix this:\n\
             1. Create a .env file in the project root (copy .env.example)\n\
             2. Set the missing variable{}: export {}=<value>\n\
             3. Or set {} in your environment before running",
            if missing_vars.len() > 1 { "s" } else { "" },
            missing_vars.join(", "),
            if missing_vars.len() > 1 { "s" } else { "" },
            missing_vars[0],
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

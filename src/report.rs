//! Plain-text and JSON renderings of a forecast for terminal and downstream consumers.

use crate::error::Result;
use crate::models::PredictedDay;
use std::fmt::Write;

fn sorted_by_date(days: &[PredictedDay]) -> Vec<&PredictedDay> {
    let mut sorted: Vec<&PredictedDay> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);
    sorted
}

/// Expected revenue and staffing per day.
pub fn render_forecast_table(days: &[PredictedDay]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10}  {:>14}  {:>12}", "Date", "Revenue", "Staff hours");

    for day in sorted_by_date(days) {
        let revenue = format!("{:.0} kr", day.predicted_revenue);
        let hours = format!("{:.1} h", day.predicted_staff_hours);
        let _ = writeln!(out, "{:<10}  {:>14}  {:>12}", day.date.format("%Y-%m-%d"), revenue, hours);
    }

    out
}

/// Weather inputs per day.
pub fn render_weather_table(days: &[PredictedDay]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:>12}  {:>13}  {:>11}  {:>14}",
        "Date", "Temp max °C", "Wind max m/s", "Precip mm", "Sunshine hours"
    );

    for day in sorted_by_date(days) {
        let _ = writeln!(
            out,
            "{:<10}  {:>12.1}  {:>13.1}  {:>11.1}  {:>14.1}",
            day.date.format("%Y-%m-%d"),
            day.temp_max,
            day.wind_max,
            day.precip_sum,
            day.sunshine_hours
        );
    }

    out
}

pub fn to_json(days: &[PredictedDay]) -> Result<String> {
    Ok(serde_json::to_string_pretty(days)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(date: &str, revenue: f64) -> PredictedDay {
        PredictedDay {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            temp_max: 18.3,
            wind_max: 5.0,
            precip_sum: 0.4,
            sunshine_hours: 8.0,
            predicted_revenue: revenue,
            predicted_staff_hours: revenue * 0.2 / 155.0,
        }
    }

    #[test]
    fn test_forecast_table_sorted_and_rounded() {
        let days = vec![day("2025-06-02", 1000.4), day("2025-06-01", 37172.23)];
        let table = render_forecast_table(&days);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2025-06-01"));
        assert!(lines[1].contains("37172 kr"));
        assert!(lines[1].contains("48.0 h"));
        assert!(lines[2].contains("1000 kr"));
    }

    #[test]
    fn test_negative_revenue_is_shown() {
        let table = render_forecast_table(&[day("2025-01-06", -2500.0)]);
        assert!(table.contains("-2500 kr"));
        assert!(table.contains("-3.2 h"));
    }

    #[test]
    fn test_weather_table() {
        let table = render_weather_table(&[day("2025-06-01", 0.0)]);
        let row = table.lines().nth(1).unwrap();
        let cells: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(cells, vec!["2025-06-01", "18.3", "5.0", "0.4", "8.0"]);
    }

    #[test]
    fn test_json_keeps_full_precision() {
        let json = to_json(&[day("2025-06-01", 37172.23)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["date"], "2025-06-01");
        assert_eq!(value[0]["predicted_revenue"], 37172.23);
        assert!(value[0]["predicted_staff_hours"].is_number());
    }
}

//! Condenses raw hourly forecast arrays into a [`WeatherSnapshot`].

use chrono::{DateTime, Utc};

use crate::error::ForecastError;
use crate::types::{
    CloudSummary, CloudTrend, HourlySeries, PrecipitationSummary, TemperatureSummary,
    TemperatureTrend, WeatherSnapshot, WindConditions, WindSummary,
};

/// Number of hourly samples summarised
pub const WINDOW_HOURS: usize = 24;

const PERIOD_LABEL: &str = "next 24 hours";
const LIKELY_RAIN_CHANCE: f64 = 60.0;
const WINDY_SPEED: f64 = 12.0;
const SUNNY_CLOUD_COVER: f64 = 30.0;

/// Finite samples from the first [`WINDOW_HOURS`] entries
fn window(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .take(WINDOW_HOURS)
        .filter_map(|v| v.filter(|x| x.is_finite()))
        .collect()
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn rounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round()
}

/// Change between the last and first sample of the window
fn delta(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}

/// First hour reaching the maximum precipitation probability
fn peak_hour(series: &HourlySeries, max_chance: f64) -> Option<DateTime<Utc>> {
    series
        .times
        .iter()
        .zip(series.precipitation_probability.iter())
        .take(WINDOW_HOURS)
        .find(|(_, p)| matches!(p, Some(p) if p.is_finite() && *p == max_chance))
        .map(|(t, _)| *t)
}

pub fn process_hourly(series: &HourlySeries) -> Result<WeatherSnapshot, ForecastError> {
    let temps = window(&series.temperature);
    let chances = window(&series.precipitation_probability);
    let rain = window(&series.precipitation);
    let clouds = window(&series.cloud_cover);
    let winds = window(&series.wind_speed);

    let (Some(&now), Some(high), Some(low)) = (temps.first(), max_of(&temps), min_of(&temps))
    else {
        return Err(ForecastError::EmptySeries);
    };

    let trend = if delta(&temps) > 0.0 {
        TemperatureTrend::Warming
    } else {
        TemperatureTrend::Cooling
    };

    let max_chance = max_of(&chances).unwrap_or(0.0);
    let peak_hour = if chances.is_empty() {
        None
    } else {
        peak_hour(series, max_chance)
    };

    let cloud_delta = delta(&clouds);
    let cloud_trend = if cloud_delta > 0.0 {
        CloudTrend::Increasing
    } else if cloud_delta < 0.0 {
        CloudTrend::Clearing
    } else {
        CloudTrend::Steady
    };
    let max_cloud = max_of(&clouds).unwrap_or(0.0);

    let max_wind = max_of(&winds).unwrap_or(0.0);

    let summary_hints = vec![
        if max_chance > LIKELY_RAIN_CHANCE { "likely rain" } else { "mostly dry" }.to_string(),
        if max_wind > WINDY_SPEED { "windy" } else { "not very windy" }.to_string(),
        if max_cloud < SUNNY_CLOUD_COVER { "sunny periods" } else { "cloudy" }.to_string(),
    ];

    Ok(WeatherSnapshot {
        period: PERIOD_LABEL.to_string(),
        temperature: TemperatureSummary {
            now,
            high,
            low,
            trend,
        },
        precipitation: PrecipitationSummary {
            max_chance,
            peak_hour,
            total_rain: rain.iter().sum(),
        },
        clouds: CloudSummary {
            avg: rounded_mean(&clouds),
            trend: cloud_trend,
        },
        wind: WindSummary {
            max: max_wind,
            avg: rounded_mean(&winds),
            conditions: WindConditions::from_max_speed(max_wind),
        },
        summary_hints,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap()
    }

    fn series(hours: usize, f: impl Fn(usize) -> [f64; 5]) -> HourlySeries {
        let mut s = HourlySeries::default();
        for h in 0..hours {
            let [t, p, r, c, w] = f(h);
            s.times.push(start() + Duration::hours(h as i64));
            s.temperature.push(Some(t));
            s.precipitation_probability.push(Some(p));
            s.precipitation.push(Some(r));
            s.cloud_cover.push(Some(c));
            s.wind_speed.push(Some(w));
            s.relative_humidity.push(Some(70.0));
        }
        s
    }

    #[test]
    fn test_warm_wet_windy_day() {
        let s = series(48, |h| {
            let h = h as f64;
            [8.0 + h * 0.5, if h == 15.0 { 80.0 } else { 20.0 }, 0.5, 40.0 + h, 5.0 + h]
        });
        let snap = process_hourly(&s).unwrap();

        assert_eq!(snap.period, "next 24 hours");
        assert_eq!(snap.temperature.now, 8.0);
        assert_eq!(snap.temperature.high, 8.0 + 23.0 * 0.5);
        assert_eq!(snap.temperature.low, 8.0);
        assert_eq!(snap.temperature.trend, TemperatureTrend::Warming);
        assert_eq!(snap.precipitation.max_chance, 80.0);
        assert_eq!(snap.precipitation.peak_hour, Some(start() + Duration::hours(15)));
        assert!((snap.precipitation.total_rain - 12.0).abs() < 1e-9);
        assert_eq!(snap.clouds.trend, CloudTrend::Increasing);
        assert_eq!(snap.clouds.avg, 52.0);
        assert_eq!(snap.wind.max, 28.0);
        assert_eq!(snap.wind.conditions, WindConditions::Strong);
        assert_eq!(snap.summary_hints, vec!["likely rain", "windy", "cloudy"]);
    }

    #[test]
    fn test_calm_clear_day() {
        let s = series(24, |h| [15.0 - h as f64 * 0.1, 10.0, 0.0, 20.0, 4.0]);
        let snap = process_hourly(&s).unwrap();

        assert_eq!(snap.temperature.trend, TemperatureTrend::Cooling);
        assert_eq!(snap.clouds.trend, CloudTrend::Steady);
        assert_eq!(snap.wind.conditions, WindConditions::Light);
        // equal maxima: the first hour wins
        assert_eq!(snap.precipitation.peak_hour, Some(start()));
        assert_eq!(snap.summary_hints, vec!["mostly dry", "not very windy", "sunny periods"]);
    }

    #[test]
    fn test_missing_samples_are_dropped() {
        let mut s = series(24, |h| [10.0, 5.0 * h as f64, 0.1, 50.0 - h as f64, 8.0]);
        s.temperature[0] = None;
        s.temperature[1] = Some(f64::NAN);
        s.precipitation_probability[23] = None;
        let snap = process_hourly(&s).unwrap();

        assert_eq!(snap.temperature.now, 10.0);
        assert_eq!(snap.precipitation.max_chance, 110.0);
        assert_eq!(snap.precipitation.peak_hour, Some(start() + Duration::hours(22)));
        assert_eq!(snap.clouds.trend, CloudTrend::Clearing);
        assert_eq!(snap.wind.conditions, WindConditions::Breezy);
    }

    #[test]
    fn test_no_precipitation_data() {
        let mut s = series(24, |_| [10.0, 0.0, 0.0, 50.0, 3.0]);
        s.precipitation_probability = vec![None; 24];
        let snap = process_hourly(&s).unwrap();
        assert_eq!(snap.precipitation.max_chance, 0.0);
        assert!(snap.precipitation.peak_hour.is_none());
    }

    #[test]
    fn test_empty_temperature_is_error() {
        let mut s = series(24, |_| [10.0, 0.0, 0.0, 50.0, 3.0]);
        s.temperature = vec![None; 24];
        assert!(matches!(process_hourly(&s), Err(ForecastError::EmptySeries)));
        assert!(matches!(
            process_hourly(&HourlySeries::default()),
            Err(ForecastError::EmptySeries)
        ));
    }
}

//! Normalized weather input and the capability interface every provider
//! adapter implements. Provider-specific response parsing lives in the
//! adapters, never in the scoring core.

use crate::error::{LandslideError, Result};
use crate::rainfall::RainfallSample;
use crate::site;
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// One hourly precipitation point as providers report it, in site-local time.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct HistoryPoint {
    pub time: NaiveDateTime,
    pub precipitation: f64,
}

impl HistoryPoint {
    pub fn to_sample(self) -> Result<RainfallSample> {
        RainfallSample::from_local(self.time, site::utc_offset(), self.precipitation)
    }
}

/// A fresh weather read in fixed units: mm, %, km/h.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Observation {
    pub observed_at: DateTime<Utc>,
    pub rainfall_hourly: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    /// Trailing hourly series when the provider ships its own history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_history: Option<Vec<HistoryPoint>>,
}

impl Observation {
    /// Calendar month at the site, used for the seasonal multiplier.
    pub fn month(&self) -> u32 {
        self.observed_at.with_timezone(&site::utc_offset()).month()
    }

    pub fn history_samples(&self) -> Option<Result<Vec<RainfallSample>>> {
        self.hourly_history
            .as_ref()
            .map(|series| series.iter().map(|point| point.to_sample()).collect())
    }
}

pub trait WeatherSource {
    /// `Ok(None)` means the provider had nothing usable this cycle.
    fn fetch(&mut self) -> Result<Option<Observation>>;
}

/// Replays recorded observations from a JSON array; `null` entries stand in
/// for failed provider reads.
#[derive(Debug, Clone, Default)]
pub struct ObservationFile {
    queue: VecDeque<Option<Observation>>,
}

impl ObservationFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LandslideError::PathNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<Option<Observation>> = serde_json::from_str(&content)?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<Option<Observation>>) -> Self {
        Self {
            queue: entries.into(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}

impl WeatherSource for ObservationFile {
    fn fetch(&mut self) -> Result<Option<Observation>> {
        Ok(self.queue.pop_front().flatten())
    }
}

pub fn load_history(path: &Path) -> Result<Vec<RainfallSample>> {
    if !path.exists() {
        return Err(LandslideError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let points: Vec<HistoryPoint> = serde_json::from_str(&content)?;
    points.into_iter().map(HistoryPoint::to_sample).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn observation_month_uses_site_local_time() {
        let observation = Observation {
            observed_at: Utc
                .with_ymd_and_hms(2025, 4, 30, 18, 30, 0)
                .single()
                .expect("valid time"),
            rainfall_hourly: 0.0,
            humidity: 70.0,
            wind_speed: 5.0,
            hourly_history: None,
        };
        assert_eq!(observation.month(), 5);
    }

    #[test]
    fn observation_file_yields_none_for_null_entries() {
        let json = r#"[
            {"observed_at": "2025-01-10T08:00:00+07:00", "rainfall_hourly": 2.5, "humidity": 80, "wind_speed": 12},
            null
        ]"#;
        let entries: Vec<Option<Observation>> = serde_json::from_str(json).expect("json should parse");
        let mut source = ObservationFile::from_entries(entries);

        let first = source.fetch().expect("fetch").expect("first observation");
        assert_eq!(first.observed_at.hour(), 1);
        assert!(source.fetch().expect("fetch").is_none());
        assert!(source.is_exhausted());
    }

    #[test]
    fn history_points_are_converted_from_site_time() {
        let json = r#"[{"time": "2025-01-10T07:00:00", "precipitation": 1.2}]"#;
        let points: Vec<HistoryPoint> = serde_json::from_str(json).expect("json should parse");
        let sample = points[0].to_sample().expect("convert");
        assert_eq!(
            sample.timestamp,
            Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0)
                .single()
                .expect("valid time")
        );
    }
}

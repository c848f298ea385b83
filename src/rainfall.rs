//! Rolling rainfall history and the sliding-window sums fed to the engine
//! as `cumulative_3day` / `cumulative_7day`.
//!
//! Every timestamp is stored as `DateTime<Utc>`. Naive provider times are
//! converted through the site offset on ingestion, so window comparisons
//! never mix local and zoned values.

use crate::error::{LandslideError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

pub const THREE_DAY_HOURS: i64 = 72;
pub const SEVEN_DAY_HOURS: i64 = 168;
/// Hourly entries kept by the capped retention policy (7 days).
pub const CAPPED_HOURLY_ENTRIES: usize = 168;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainfallSample {
    pub timestamp: DateTime<Utc>,
    pub millimeters: f64,
}

impl RainfallSample {
    pub fn new(timestamp: DateTime<Utc>, millimeters: f64) -> Self {
        Self {
            timestamp,
            millimeters,
        }
    }

    /// Builds a sample from a provider's naive local timestamp.
    pub fn from_local(local: NaiveDateTime, offset: FixedOffset, millimeters: f64) -> Result<Self> {
        let timestamp = offset
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| LandslideError::InputValidation {
                field: "timestamp".to_string(),
                reason: format!("ambiguous local time: {local}"),
            })?
            .with_timezone(&Utc);
        Ok(Self::new(timestamp, millimeters))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Retention {
    /// Keep samples no older than the window, measured from the prune time.
    Window(Duration),
    /// Keep only the most recent N samples.
    Capped(usize),
}

impl Default for Retention {
    fn default() -> Self {
        Retention::Window(Duration::hours(SEVEN_DAY_HOURS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativeRainfall {
    pub three_day: f64,
    pub seven_day: f64,
}

/// Exclusive owner of the rainfall sample buffer.
#[derive(Debug, Clone, Default)]
pub struct RainfallTracker {
    samples: VecDeque<RainfallSample>,
    retention: Retention,
}

impl RainfallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Retention) -> Self {
        Self {
            samples: VecDeque::new(),
            retention,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&RainfallSample> {
        self.samples.back()
    }

    pub fn samples(&self) -> impl Iterator<Item = &RainfallSample> {
        self.samples.iter()
    }

    /// Appends one sample and prunes. Late samples are kept in timestamp order.
    pub fn record(&mut self, sample: RainfallSample) -> Result<()> {
        let sample = sanitize(sample)?;
        match self.samples.back() {
            Some(last) if sample.timestamp < last.timestamp => {
                warn!(
                    sample = %sample.timestamp,
                    latest = %last.timestamp,
                    "out-of-order rainfall sample"
                );
                let index = self
                    .samples
                    .partition_point(|existing| existing.timestamp <= sample.timestamp);
                self.samples.insert(index, sample);
            }
            _ => self.samples.push_back(sample),
        }

        if let Some(newest) = self.latest().map(|latest| latest.timestamp) {
            self.prune(newest);
        }
        Ok(())
    }

    /// Replaces the buffer with a provider's own historical series, as seen
    /// at `now`. Forecast hours past `now` are not retained.
    pub fn replace_with<I>(&mut self, series: I, now: DateTime<Utc>) -> Result<()>
    where
        I: IntoIterator<Item = RainfallSample>,
    {
        let mut samples = series
            .into_iter()
            .map(sanitize)
            .filter(|sample| {
                sample
                    .as_ref()
                    .map_or(true, |sample| sample.timestamp <= now)
            })
            .collect::<Result<Vec<_>>>()?;
        samples.sort_by_key(|sample| sample.timestamp);
        self.samples = samples.into();
        self.prune(now);
        Ok(())
    }

    pub fn prune(&mut self, now: DateTime<Utc>) {
        let before = self.samples.len();
        match self.retention {
            Retention::Window(window) => {
                let cutoff = now - window;
                while self
                    .samples
                    .front()
                    .is_some_and(|sample| sample.timestamp < cutoff)
                {
                    self.samples.pop_front();
                }
            }
            Retention::Capped(limit) => {
                while self.samples.len() > limit {
                    self.samples.pop_front();
                }
            }
        }
        let dropped = before - self.samples.len();
        if dropped > 0 {
            tracing::debug!(dropped, retained = self.samples.len(), "rainfall history pruned");
        }
    }

    /// Sum of every retained sample in `[now - window, now]`.
    pub fn sum_over(&self, window: Duration, now: DateTime<Utc>) -> f64 {
        let cutoff = now - window;
        self.samples
            .iter()
            .filter(|sample| sample.timestamp >= cutoff && sample.timestamp <= now)
            .map(|sample| sample.millimeters)
            .sum()
    }

    pub fn cumulative(&self, now: DateTime<Utc>) -> CumulativeRainfall {
        CumulativeRainfall {
            three_day: self.sum_over(Duration::hours(THREE_DAY_HOURS), now),
            seven_day: self.sum_over(Duration::hours(SEVEN_DAY_HOURS), now),
        }
    }
}

fn sanitize(sample: RainfallSample) -> Result<RainfallSample> {
    if !sample.millimeters.is_finite() {
        return Err(LandslideError::InputValidation {
            field: "rainfall sample".to_string(),
            reason: format!("millimeters must be finite, found {}", sample.millimeters),
        });
    }
    Ok(RainfallSample {
        millimeters: sample.millimeters.max(0.0),
        ..sample
    })
}

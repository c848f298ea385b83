use crate::alert::{AlertDecision, AlertPolicy};
use crate::error::{LandslideError, Result};
use crate::rainfall::{CumulativeRainfall, RainfallSample, RainfallTracker, Retention};
use crate::scoring::RiskEngine;
use crate::types::risk::{Readings, RiskLevel, RiskResult};
use crate::weather::{Observation, WeatherSource};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct CycleOutcome {
    pub result: RiskResult,
    pub cumulative: CumulativeRainfall,
    pub alert: AlertDecision,
}

/// Session state for one monitored site. Owns the rainfall history and the
/// last notified level; callers pass it explicitly into every cycle.
#[derive(Debug, Clone, Default)]
pub struct SiteMonitor {
    tracker: RainfallTracker,
    alerts: AlertPolicy,
}

impl SiteMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Retention) -> Self {
        Self {
            tracker: RainfallTracker::with_retention(retention),
            alerts: AlertPolicy::new(),
        }
    }

    pub fn tracker(&self) -> &RainfallTracker {
        &self.tracker
    }

    pub fn last_notified(&self) -> Option<RiskLevel> {
        self.alerts.last_notified()
    }

    /// Pulls one observation and assesses it. A missing read is reported as
    /// `NoReading` and leaves the session untouched.
    pub fn cycle(
        &mut self,
        engine: &RiskEngine,
        source: &mut dyn WeatherSource,
    ) -> Result<CycleOutcome> {
        match source.fetch()? {
            Some(observation) => self.observe(engine, &observation),
            None => {
                warn!("weather source returned no reading; skipping assessment");
                Err(LandslideError::NoReading)
            }
        }
    }

    pub fn observe(&mut self, engine: &RiskEngine, observation: &Observation) -> Result<CycleOutcome> {
        match observation.history_samples() {
            Some(series) => self.tracker.replace_with(series?, observation.observed_at)?,
            None => self.tracker.record(RainfallSample::new(
                observation.observed_at,
                observation.rainfall_hourly,
            ))?,
        }

        let cumulative = self.tracker.cumulative(observation.observed_at);
        let readings = Readings {
            rainfall_hourly: observation.rainfall_hourly,
            cumulative_3day: cumulative.three_day,
            cumulative_7day: cumulative.seven_day,
            humidity: observation.humidity,
            wind_speed: observation.wind_speed,
        };
        let result = engine.assess(&readings, Some(observation.month()))?;
        let alert = self.alerts.evaluate(&result);

        Ok(CycleOutcome {
            result,
            cumulative,
            alert,
        })
    }
}

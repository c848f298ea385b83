use crate::error::{LandslideError, Result};
use crate::scoring::parameter::score;
use crate::types::config::RiskModel;
use crate::types::risk::{LevelDisplay, Parameter, ParameterDetail, Readings, RiskLevel, RiskResult};
use chrono::Utc;
use tracing::{debug, info};

/// Aggregate risk engine. Holds the validated model; every call is pure
/// apart from the result timestamp.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    model: RiskModel,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskModel::reference())
    }
}

impl RiskEngine {
    pub fn new(model: RiskModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &RiskModel {
        &self.model
    }

    pub fn assess(&self, readings: &Readings, month: Option<u32>) -> Result<RiskResult> {
        validate_readings(readings)?;
        if let Some(month) = month {
            if !(1..=12).contains(&month) {
                return Err(LandslideError::InputValidation {
                    field: "month".to_string(),
                    reason: format!("expected 1..=12, found {month}"),
                });
            }
        }

        let mut details = Vec::with_capacity(Parameter::ALL.len());
        for parameter in Parameter::ALL {
            let thresholds = self.model.parameter(parameter)?;
            let value = readings.value(parameter);
            if value < 0.0 {
                debug!(%parameter, value, "negative reading clamped to zero");
            }
            let raw_score = score(value, thresholds);
            let weighted_score = raw_score * thresholds.weight;
            debug!(%parameter, value, raw_score, weighted_score, "parameter scored");
            details.push(ParameterDetail {
                parameter,
                value,
                raw_score,
                weight: thresholds.weight,
                weighted_score,
            });
        }

        let total_score: f64 = details.iter().map(|detail| detail.weighted_score).sum();
        let seasonal_multiplier = self.model.seasonal.multiplier(month);
        let adjusted_score = (total_score * seasonal_multiplier).min(100.0);
        let (risk_level, display) = self.classify(adjusted_score);

        info!(
            total_score,
            seasonal_multiplier,
            adjusted_score,
            level = %risk_level,
            "risk assessed"
        );

        Ok(RiskResult {
            parameters: details,
            total_score,
            seasonal_multiplier,
            adjusted_score,
            risk_level,
            display,
            timestamp: Utc::now(),
        })
    }

    /// Scans levels in declaration order. A score that falls between one
    /// level's upper bound and the next level's lower bound stays with the
    /// lower level; anything outside every range is DANGER.
    pub fn classify(&self, score: f64) -> (RiskLevel, LevelDisplay) {
        let levels = self.model.levels();
        for (index, band) in levels.iter().enumerate() {
            let below_next = levels
                .get(index + 1)
                .map(|next| score < next.lo)
                .unwrap_or(false);
            if score >= band.lo && (score <= band.hi || below_next) {
                return (band.level, band.display.clone());
            }
        }

        let display = self.model.level(RiskLevel::Danger).display.clone();
        (RiskLevel::Danger, display)
    }
}

fn validate_readings(readings: &Readings) -> Result<()> {
    for parameter in Parameter::ALL {
        let value = readings.value(parameter);
        if !value.is_finite() {
            return Err(LandslideError::InputValidation {
                field: parameter.to_string(),
                reason: format!("reading must be a finite number, found {value}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(values: [f64; 5]) -> Readings {
        Readings {
            rainfall_hourly: values[0],
            cumulative_3day: values[1],
            cumulative_7day: values[2],
            humidity: values[3],
            wind_speed: values[4],
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn normal_conditions_in_dry_season_are_safe() {
        let engine = RiskEngine::default();
        let result = engine
            .assess(&readings([3.0, 15.0, 45.0, 65.0, 10.0]), Some(7))
            .expect("assessment should succeed");

        let expected_total = 0.30 * 18.0 + 0.25 * 6.25 + 0.15 * 7.5 + 0.20 * (65.0 / 70.0 * 20.0) + 0.10 * 5.0;
        assert_close(result.total_score, expected_total, 1e-9);
        assert_close(result.total_score, 12.30, 0.01);
        assert_eq!(result.seasonal_multiplier, 0.8);
        assert_close(result.adjusted_score, expected_total * 0.8, 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Safe);
        assert_eq!(result.display.color, "green");
    }

    #[test]
    fn wet_season_moderate_conditions_are_watch() {
        let engine = RiskEngine::default();
        let result = engine
            .assess(&readings([12.0, 80.0, 180.0, 82.0, 25.0]), Some(11))
            .expect("assessment should succeed");

        assert_eq!(result.seasonal_multiplier, 1.2);
        assert_close(result.total_score, 41.365, 1e-6);
        assert_close(result.adjusted_score, 49.638, 1e-6);
        assert_eq!(result.risk_level, RiskLevel::Watch);
    }

    #[test]
    fn heavy_rain_in_december_is_danger() {
        let engine = RiskEngine::default();
        let result = engine
            .assess(&readings([28.0, 150.0, 280.0, 93.0, 45.0]), Some(12))
            .expect("assessment should succeed");

        assert_eq!(result.seasonal_multiplier, 1.2);
        assert!(result.adjusted_score <= 100.0);
        assert_close(result.adjusted_score, 72.14, 0.01);
        assert_eq!(result.risk_level, RiskLevel::Danger);
        assert_eq!(result.display.emoji, "🔴");
    }

    #[test]
    fn adjusted_score_is_capped_at_one_hundred() {
        let engine = RiskEngine::default();
        let result = engine
            .assess(&readings([900.0, 900.0, 900.0, 100.0, 900.0]), Some(1))
            .expect("assessment should succeed");
        assert!(result.total_score > 83.0);
        assert_eq!(result.adjusted_score, 100.0);
        assert_eq!(result.risk_level, RiskLevel::Danger);
    }

    #[test]
    fn missing_month_uses_neutral_multiplier() {
        let engine = RiskEngine::default();
        let result = engine
            .assess(&readings([3.0, 15.0, 45.0, 65.0, 10.0]), None)
            .expect("assessment should succeed");
        assert_eq!(result.seasonal_multiplier, 1.0);
        assert_eq!(result.adjusted_score, result.total_score);
    }

    #[test]
    fn adjusted_score_respects_multiplier_bound() {
        let engine = RiskEngine::default();
        let max_multiplier = engine.model().seasonal.max_multiplier();
        for month in 1..=12 {
            let result = engine
                .assess(&readings([12.0, 80.0, 180.0, 82.0, 25.0]), Some(month))
                .expect("assessment should succeed");
            assert!(result.adjusted_score <= result.total_score * max_multiplier + 1e-9);
            assert!(result.adjusted_score <= 100.0);
        }
    }

    #[test]
    fn assess_is_idempotent_apart_from_timestamp() {
        let engine = RiskEngine::default();
        let input = readings([12.0, 80.0, 180.0, 82.0, 25.0]);
        let first = engine.assess(&input, Some(3)).expect("first assessment");
        let mut second = engine.assess(&input, Some(3)).expect("second assessment");
        second.timestamp = first.timestamp;
        assert_eq!(first, second);
    }

    #[test]
    fn detail_records_weight_and_contribution() {
        let engine = RiskEngine::default();
        let result = engine
            .assess(&readings([3.0, 15.0, 45.0, 65.0, 10.0]), Some(7))
            .expect("assessment should succeed");
        let rainfall = result
            .detail(Parameter::RainfallHourly)
            .expect("rainfall detail");
        assert_eq!(rainfall.value, 3.0);
        assert_eq!(rainfall.weight, 0.30);
        assert_close(rainfall.raw_score, 18.0, 1e-9);
        assert_close(rainfall.weighted_score, 5.4, 1e-9);
    }

    #[test]
    fn out_of_range_score_uses_configured_danger_display() {
        let mut raw = crate::types::config::RawModelConfig::reference();
        if let Some(crate::types::config::RawRiskLevels::Ordered(levels)) = raw.risk_levels.as_mut() {
            levels[2].description = "Risiko tinggi, evakuasi segera".to_string();
        }
        let engine = RiskEngine::new(raw.validate().expect("model should validate"));

        let (level, display) = engine.classify(-1.0);
        assert_eq!(level, RiskLevel::Danger);
        assert_eq!(display.description, "Risiko tinggi, evakuasi segera");
    }

    #[test]
    fn nan_reading_is_rejected() {
        let engine = RiskEngine::default();
        let err = engine
            .assess(&readings([f64::NAN, 0.0, 0.0, 0.0, 0.0]), None)
            .expect_err("NaN should be rejected");
        assert!(matches!(err, LandslideError::InputValidation { ref field, .. } if field == "rainfall_hourly"));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let engine = RiskEngine::default();
        assert!(engine.assess(&Readings::default(), Some(13)).is_err());
        assert!(engine.assess(&Readings::default(), Some(0)).is_err());
    }

    #[test]
    fn every_integer_score_maps_to_one_level() {
        let engine = RiskEngine::default();
        for score in 0..=100 {
            let (level, _) = engine.classify(f64::from(score));
            let expected = match score {
                0..=40 => RiskLevel::Safe,
                41..=70 => RiskLevel::Watch,
                _ => RiskLevel::Danger,
            };
            assert_eq!(level, expected, "score {score}");
        }
    }

    #[test]
    fn fractional_seam_scores_stay_with_lower_level() {
        let engine = RiskEngine::default();
        assert_eq!(engine.classify(40.5).0, RiskLevel::Safe);
        assert_eq!(engine.classify(70.99).0, RiskLevel::Watch);
        assert_eq!(engine.classify(-1.0).0, RiskLevel::Danger);
    }
}

use crate::error::LandslideError;
use crate::types::risk::{LevelDisplay, Parameter, RiskLevel, SeasonTier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Legacy upper bound that marks a danger band as open-ended.
pub const UNBOUNDED_SENTINEL: f64 = 999.0;

const WEIGHT_SUM_TOLERANCE: f64 = 0.001;
const BOUND_EPSILON: f64 = 1e-9;

/// Configuration payload as it appears on disk, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawModelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub thresholds: Option<BTreeMap<String, RawParameter>>,
    pub weights: Option<BTreeMap<String, f64>>,
    pub risk_levels: Option<RawRiskLevels>,
    pub seasonal_factors: Option<RawSeasonalFactors>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawParameter {
    #[serde(default)]
    pub description: String,
    #[serde(alias = "aman")]
    pub safe: RawBand,
    #[serde(alias = "waspada")]
    pub watch: RawBand,
    #[serde(alias = "bahaya")]
    pub danger: RawBand,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub score_range: [f64; 2],
}

/// Risk levels either as an ordered list or as a table keyed by level name
/// (`AMAN = { ... }`), the shape older deployments export.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawRiskLevels {
    Ordered(Vec<RawRiskLevel>),
    Named(BTreeMap<String, RawLevelBody>),
}

impl RawRiskLevels {
    /// Levels in classification order. Named tables are ordered by the lower
    /// bound of their score range.
    pub fn ordered(&self) -> Vec<RawRiskLevel> {
        match self {
            RawRiskLevels::Ordered(levels) => levels.clone(),
            RawRiskLevels::Named(table) => {
                let mut levels = table
                    .iter()
                    .map(|(name, body)| RawRiskLevel {
                        level: name.clone(),
                        score_range: body.score_range,
                        color: body.color.clone(),
                        emoji: body.emoji.clone(),
                        description: body.description.clone(),
                    })
                    .collect::<Vec<_>>();
                levels.sort_by(|a, b| a.score_range[0].total_cmp(&b.score_range[0]));
                levels
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRiskLevel {
    pub level: String,
    pub score_range: [f64; 2],
    pub color: String,
    #[serde(default)]
    pub emoji: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLevelBody {
    pub score_range: [f64; 2],
    pub color: String,
    #[serde(default)]
    pub emoji: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSeasonalFactors {
    pub high_risk_months: Vec<u32>,
    pub moderate_risk_months: Vec<u32>,
    #[serde(default)]
    pub low_risk_months: Vec<u32>,
    pub multipliers: RawMultipliers,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RawMultipliers {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

/// One domain sub-range of a parameter and the score sub-range it maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    pub min: f64,
    /// `None` means the band is open-ended.
    pub max: Option<f64>,
    pub score_lo: f64,
    pub score_hi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterThresholds {
    pub parameter: Parameter,
    pub description: String,
    pub safe: ThresholdBand,
    pub watch: ThresholdBand,
    pub danger: ThresholdBand,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelBand {
    pub level: RiskLevel,
    pub lo: f64,
    pub hi: f64,
    pub display: LevelDisplay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalTable {
    tiers: [Option<SeasonTier>; 12],
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

impl SeasonalTable {
    /// Months absent from the table fall into the low tier.
    pub fn tier(&self, month: u32) -> SeasonTier {
        month
            .checked_sub(1)
            .and_then(|index| self.tiers.get(index as usize).copied().flatten())
            .unwrap_or(SeasonTier::Low)
    }

    pub fn multiplier_for_tier(&self, tier: SeasonTier) -> f64 {
        match tier {
            SeasonTier::High => self.high,
            SeasonTier::Moderate => self.moderate,
            SeasonTier::Low => self.low,
        }
    }

    pub fn multiplier(&self, month: Option<u32>) -> f64 {
        month
            .map(|month| self.multiplier_for_tier(self.tier(month)))
            .unwrap_or(1.0)
    }

    pub fn max_multiplier(&self) -> f64 {
        self.high.max(self.moderate).max(self.low).max(1.0)
    }
}

/// Validated, strongly-typed scoring model shared read-only by every assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskModel {
    parameters: Vec<ParameterThresholds>,
    levels: Vec<LevelBand>,
    pub seasonal: SeasonalTable,
    pub location: Option<String>,
}

impl RiskModel {
    pub fn reference() -> Self {
        match RawModelConfig::reference().validate() {
            Ok(model) => model,
            Err(err) => unreachable!("reference configuration must validate: {err}"),
        }
    }

    pub fn parameters(&self) -> &[ParameterThresholds] {
        &self.parameters
    }

    pub fn parameter(&self, parameter: Parameter) -> Result<&ParameterThresholds, LandslideError> {
        self.parameters
            .iter()
            .find(|thresholds| thresholds.parameter == parameter)
            .ok_or_else(|| {
                LandslideError::Configuration(format!("thresholds.{} is missing", parameter))
            })
    }

    /// Levels in classification order.
    pub fn levels(&self) -> &[LevelBand] {
        &self.levels
    }

    /// Validation rejects a model that leaves any level undefined.
    pub fn level(&self, level: RiskLevel) -> &LevelBand {
        match self.levels.iter().find(|band| band.level == level) {
            Some(band) => band,
            None => unreachable!("validated model defines every risk level"),
        }
    }
}

impl RawModelConfig {
    /// Hand-set reference values for the monitored hillside.
    pub fn reference() -> Self {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(
            Parameter::RainfallHourly.key().to_string(),
            reference_parameter(
                "Hourly rainfall (mm/h)",
                [5.0, 15.0, UNBOUNDED_SENTINEL],
                [[0.0, 30.0], [31.0, 60.0], [61.0, 100.0]],
            ),
        );
        thresholds.insert(
            Parameter::Cumulative3Day.key().to_string(),
            reference_parameter(
                "3-day cumulative rainfall (mm)",
                [60.0, 100.0, UNBOUNDED_SENTINEL],
                [[0.0, 25.0], [26.0, 50.0], [51.0, 100.0]],
            ),
        );
        thresholds.insert(
            Parameter::Cumulative7Day.key().to_string(),
            reference_parameter(
                "7-day cumulative rainfall (mm)",
                [150.0, 200.0, UNBOUNDED_SENTINEL],
                [[0.0, 25.0], [26.0, 50.0], [51.0, 100.0]],
            ),
        );
        thresholds.insert(
            Parameter::Humidity.key().to_string(),
            reference_parameter(
                "Relative humidity (%)",
                [70.0, 85.0, 100.0],
                [[0.0, 20.0], [21.0, 50.0], [51.0, 100.0]],
            ),
        );
        thresholds.insert(
            Parameter::WindSpeed.key().to_string(),
            reference_parameter(
                "Wind speed (km/h)",
                [20.0, 40.0, UNBOUNDED_SENTINEL],
                [[0.0, 10.0], [11.0, 30.0], [31.0, 50.0]],
            ),
        );

        let weights = [
            (Parameter::RainfallHourly, 0.30),
            (Parameter::Cumulative3Day, 0.25),
            (Parameter::Cumulative7Day, 0.15),
            (Parameter::Humidity, 0.20),
            (Parameter::WindSpeed, 0.10),
        ]
        .into_iter()
        .map(|(parameter, weight)| (parameter.key().to_string(), weight))
        .collect();

        let risk_levels = vec![
            RawRiskLevel {
                level: RiskLevel::Safe.to_string(),
                score_range: [0.0, 40.0],
                color: "green".to_string(),
                emoji: "🟢".to_string(),
                description: "Normal conditions, low landslide risk".to_string(),
            },
            RawRiskLevel {
                level: RiskLevel::Watch.to_string(),
                score_range: [41.0, 70.0],
                color: "yellow".to_string(),
                emoji: "🟡".to_string(),
                description: "Elevated risk, stay alert".to_string(),
            },
            RawRiskLevel {
                level: RiskLevel::Danger.to_string(),
                score_range: [71.0, 100.0],
                color: "red".to_string(),
                emoji: "🔴".to_string(),
                description: "High risk, evacuate immediately".to_string(),
            },
        ];

        Self {
            version: Some("2.0".to_string()),
            data_source: Some("CHIRPS 2005-2025 (20.5 years)".to_string()),
            location: Some(crate::site::SITE_NAME.to_string()),
            thresholds: Some(thresholds),
            weights: Some(weights),
            risk_levels: Some(RawRiskLevels::Ordered(risk_levels)),
            seasonal_factors: Some(RawSeasonalFactors {
                high_risk_months: vec![11, 12, 1, 2, 3, 4],
                moderate_risk_months: vec![5, 10],
                low_risk_months: vec![6, 7, 8, 9],
                multipliers: RawMultipliers {
                    high: 1.2,
                    moderate: 1.0,
                    low: 0.8,
                },
            }),
        }
    }

    pub fn validate(&self) -> Result<RiskModel, LandslideError> {
        let thresholds = self
            .thresholds
            .as_ref()
            .ok_or_else(|| missing_key("thresholds"))?;
        let weights = self.weights.as_ref().ok_or_else(|| missing_key("weights"))?;
        let risk_levels = self
            .risk_levels
            .as_ref()
            .ok_or_else(|| missing_key("risk_levels"))?;
        let seasonal = self
            .seasonal_factors
            .as_ref()
            .ok_or_else(|| missing_key("seasonal_factors"))?;

        reject_unknown_keys("thresholds", thresholds.keys())?;
        reject_unknown_keys("weights", weights.keys())?;

        let mut parameters = Vec::with_capacity(Parameter::ALL.len());
        for parameter in Parameter::ALL {
            let raw = thresholds
                .get(parameter.key())
                .ok_or_else(|| missing_key(&format!("thresholds.{parameter}")))?;
            let weight = *weights
                .get(parameter.key())
                .ok_or_else(|| missing_key(&format!("weights.{parameter}")))?;
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(LandslideError::Configuration(format!(
                    "weights.{parameter} must be between 0.0 and 1.0 (found {weight})"
                )));
            }
            parameters.push(validate_parameter(parameter, raw, weight)?);
        }

        let weight_sum: f64 = parameters.iter().map(|thresholds| thresholds.weight).sum();
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(LandslideError::Configuration(format!(
                "weights must sum to 1.0 (found {:.3})",
                weight_sum
            )));
        }

        Ok(RiskModel {
            parameters,
            levels: validate_levels(&risk_levels.ordered())?,
            seasonal: validate_seasonal(seasonal)?,
            location: self.location.clone(),
        })
    }
}

fn reference_parameter(description: &str, maxima: [f64; 3], scores: [[f64; 2]; 3]) -> RawParameter {
    let danger_max = if maxima[2] == UNBOUNDED_SENTINEL {
        None
    } else {
        Some(maxima[2])
    };
    RawParameter {
        description: description.to_string(),
        safe: RawBand {
            min: None,
            max: Some(maxima[0]),
            score_range: scores[0],
        },
        watch: RawBand {
            min: Some(maxima[0]),
            max: Some(maxima[1]),
            score_range: scores[1],
        },
        danger: RawBand {
            min: Some(maxima[1]),
            max: danger_max,
            score_range: scores[2],
        },
    }
}

fn missing_key(key: &str) -> LandslideError {
    LandslideError::Configuration(format!("required key {key} is missing"))
}

fn reject_unknown_keys<'a>(
    section: &str,
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), LandslideError> {
    let unknown = keys
        .filter(|key| key.parse::<Parameter>().is_err())
        .cloned()
        .collect::<Vec<_>>();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(LandslideError::Configuration(format!(
        "{section} contains unknown key(s): {}",
        unknown.join(", ")
    )))
}

fn validate_parameter(
    parameter: Parameter,
    raw: &RawParameter,
    weight: f64,
) -> Result<ParameterThresholds, LandslideError> {
    let degenerate = |band: &str| LandslideError::DegenerateBand {
        parameter: parameter.to_string(),
        band: band.to_string(),
    };

    for (name, band) in [("safe", &raw.safe), ("watch", &raw.watch), ("danger", &raw.danger)] {
        if band.min.into_iter().chain(band.max).any(|bound| !bound.is_finite()) {
            return Err(LandslideError::Configuration(format!(
                "thresholds.{parameter}.{name} bounds must be finite numbers"
            )));
        }
    }

    let safe_max = raw
        .safe
        .max
        .ok_or_else(|| missing_key(&format!("thresholds.{parameter}.safe.max")))?;
    if raw.safe.min.is_some_and(|min| min != 0.0) {
        return Err(LandslideError::Configuration(format!(
            "thresholds.{parameter}.safe.min must be 0 when set"
        )));
    }
    if safe_max < 0.0 {
        return Err(degenerate("safe"));
    }

    let watch_min = raw.watch.min.unwrap_or(safe_max);
    let watch_max = raw
        .watch
        .max
        .ok_or_else(|| missing_key(&format!("thresholds.{parameter}.watch.max")))?;
    if (watch_min - safe_max).abs() > BOUND_EPSILON {
        return Err(LandslideError::Configuration(format!(
            "thresholds.{parameter}.watch.min ({watch_min}) must equal safe.max ({safe_max})"
        )));
    }
    if watch_max < watch_min {
        return Err(degenerate("watch"));
    }

    let danger_min = raw.danger.min.unwrap_or(watch_max);
    if (danger_min - watch_max).abs() > BOUND_EPSILON {
        return Err(LandslideError::Configuration(format!(
            "thresholds.{parameter}.danger.min ({danger_min}) must equal watch.max ({watch_max})"
        )));
    }
    let danger_max = raw.danger.max.filter(|max| *max != UNBOUNDED_SENTINEL);
    if let Some(max) = danger_max {
        if max <= danger_min {
            return Err(degenerate("danger"));
        }
    }

    let bands = [
        ("safe", &raw.safe.score_range),
        ("watch", &raw.watch.score_range),
        ("danger", &raw.danger.score_range),
    ];
    let mut previous_hi = 0.0;
    for (name, [lo, hi]) in bands {
        if !(0.0..=100.0).contains(lo) || !(0.0..=100.0).contains(hi) || lo > hi {
            return Err(LandslideError::Configuration(format!(
                "thresholds.{parameter}.{name}.score_range must be ascending within 0..=100"
            )));
        }
        if *lo < previous_hi {
            return Err(LandslideError::Configuration(format!(
                "thresholds.{parameter}.{name}.score_range overlaps the band below it"
            )));
        }
        previous_hi = *hi;
    }

    let band = |min: f64, max: Option<f64>, [lo, hi]: [f64; 2]| ThresholdBand {
        min,
        max,
        score_lo: lo,
        score_hi: hi,
    };

    Ok(ParameterThresholds {
        parameter,
        description: raw.description.clone(),
        safe: band(0.0, Some(safe_max), raw.safe.score_range),
        watch: band(watch_min, Some(watch_max), raw.watch.score_range),
        danger: band(danger_min, danger_max, raw.danger.score_range),
        weight,
    })
}

fn validate_levels(raw_levels: &[RawRiskLevel]) -> Result<Vec<LevelBand>, LandslideError> {
    let mut levels = Vec::with_capacity(raw_levels.len());
    let mut seen = HashSet::new();
    for raw in raw_levels {
        let level = raw.level.parse::<RiskLevel>().map_err(|_| {
            LandslideError::Configuration(format!("risk_levels contains unknown level: {}", raw.level))
        })?;
        if !seen.insert(level) {
            return Err(LandslideError::Configuration(format!(
                "risk_levels contains duplicate level: {level}"
            )));
        }
        let [lo, hi] = raw.score_range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(LandslideError::Configuration(format!(
                "risk_levels.{level}.score_range must be ascending"
            )));
        }
        levels.push(LevelBand {
            level,
            lo,
            hi,
            display: LevelDisplay {
                color: raw.color.clone(),
                emoji: raw.emoji.clone(),
                description: raw.description.clone(),
            },
        });
    }

    let missing = RiskLevel::ALL
        .iter()
        .filter(|level| !seen.contains(level))
        .map(|level| level.to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(LandslideError::Configuration(format!(
            "risk_levels is missing level(s): {}",
            missing.join(", ")
        )));
    }

    let first = &levels[0];
    let last = &levels[levels.len() - 1];
    if first.lo > 0.0 || last.hi < 100.0 {
        return Err(LandslideError::Configuration(
            "risk_levels must cover the full 0..=100 score range".to_string(),
        ));
    }
    for pair in levels.windows(2) {
        let gap = pair[1].lo - pair[0].hi;
        if !(0.0..=1.0).contains(&gap) {
            return Err(LandslideError::Configuration(format!(
                "risk_levels {} and {} must be contiguous and declared in ascending order",
                pair[0].level, pair[1].level
            )));
        }
    }

    Ok(levels)
}

fn validate_seasonal(raw: &RawSeasonalFactors) -> Result<SeasonalTable, LandslideError> {
    let multipliers = [
        ("high", raw.multipliers.high),
        ("moderate", raw.multipliers.moderate),
        ("low", raw.multipliers.low),
    ];
    for (name, value) in multipliers {
        if !value.is_finite() || value <= 0.0 {
            return Err(LandslideError::Configuration(format!(
                "seasonal_factors.multipliers.{name} must be a positive number"
            )));
        }
    }

    let mut tiers = [None; 12];
    for (name, tier, months) in [
        ("high_risk_months", SeasonTier::High, &raw.high_risk_months),
        ("moderate_risk_months", SeasonTier::Moderate, &raw.moderate_risk_months),
        ("low_risk_months", SeasonTier::Low, &raw.low_risk_months),
    ] {
        for month in months {
            if !(1..=12).contains(month) {
                return Err(LandslideError::Configuration(format!(
                    "seasonal_factors.{name} contains invalid month: {month}"
                )));
            }
            let slot = &mut tiers[(*month - 1) as usize];
            if slot.is_some() {
                return Err(LandslideError::Configuration(format!(
                    "month {month} appears in more than one seasonal tier"
                )));
            }
            *slot = Some(tier);
        }
    }

    Ok(SeasonalTable {
        tiers,
        high: raw.multipliers.high,
        moderate: raw.multipliers.moderate,
        low: raw.multipliers.low,
    })
}

use crate::types::config::{ParameterThresholds, ThresholdBand};

/// Score points gained per domain unit past the floor of an open-ended danger band.
const OPEN_DANGER_POINTS_PER_UNIT: f64 = 0.1;
const MAX_SCORE: f64 = 100.0;

/// Maps one raw measurement to a 0..=100 sub-score.
///
/// Bands are tested in order (safe, watch, danger). The danger band catches
/// everything the first two do not. Negative inputs are clamped to 0 first.
pub fn score(value: f64, thresholds: &ParameterThresholds) -> f64 {
    let value = value.max(0.0);
    let safe = &thresholds.safe;
    let watch = &thresholds.watch;
    let danger = &thresholds.danger;

    let raw = match (safe.max, watch.max) {
        (Some(safe_max), _) if value <= safe_max => {
            let ratio = if safe_max > 0.0 { value / safe_max } else { 0.0 };
            ratio * safe.score_hi
        }
        (_, Some(watch_max)) if value <= watch_max => interpolate(value, watch, watch_max),
        _ => danger_score(value, danger),
    };
    raw.clamp(0.0, MAX_SCORE)
}

fn danger_score(value: f64, danger: &ThresholdBand) -> f64 {
    match danger.max {
        None => danger.score_lo + (value - danger.min) * OPEN_DANGER_POINTS_PER_UNIT,
        Some(max) if value <= max => interpolate(value, danger, max),
        Some(_) => danger.score_hi,
    }
}

fn interpolate(value: f64, band: &ThresholdBand, max: f64) -> f64 {
    let width = max - band.min;
    if width <= 0.0 {
        return band.score_lo;
    }
    let ratio = (value - band.min) / width;
    band.score_lo + ratio * (band.score_hi - band.score_lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::RiskModel;
    use crate::types::risk::Parameter;
    use proptest::prelude::*;

    fn thresholds(parameter: Parameter) -> ParameterThresholds {
        RiskModel::reference()
            .parameter(parameter)
            .cloned()
            .expect("reference parameter should exist")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn safe_band_scales_from_zero() {
        let rainfall = thresholds(Parameter::RainfallHourly);
        assert_close(score(0.0, &rainfall), 0.0);
        assert_close(score(3.0, &rainfall), 18.0);
        assert_close(score(5.0, &rainfall), 30.0);
    }

    #[test]
    fn watch_band_interpolates_between_edges() {
        let rainfall = thresholds(Parameter::RainfallHourly);
        assert_close(score(12.0, &rainfall), 51.3);
        assert_close(score(15.0, &rainfall), 60.0);

        let humidity = thresholds(Parameter::Humidity);
        assert_close(score(82.0, &humidity), 44.2);
    }

    #[test]
    fn open_danger_band_grows_one_point_per_ten_units() {
        let rainfall = thresholds(Parameter::RainfallHourly);
        assert_close(score(28.0, &rainfall), 62.3);
        assert_close(score(415.0, &rainfall), 100.0);
        assert_close(score(10_000.0, &rainfall), 100.0);

        let wind = thresholds(Parameter::WindSpeed);
        assert_close(score(45.0, &wind), 31.5);
    }

    #[test]
    fn bounded_danger_band_interpolates_and_caps_at_band_top() {
        let humidity = thresholds(Parameter::Humidity);
        assert_close(score(93.0, &humidity), 51.0 + 8.0 / 15.0 * 49.0);
        assert_close(score(100.0, &humidity), 100.0);
        assert_close(score(120.0, &humidity), 100.0);
    }

    #[test]
    fn zero_safe_max_disables_safe_ratio() {
        let mut rainfall = thresholds(Parameter::RainfallHourly);
        rainfall.safe.max = Some(0.0);
        rainfall.watch.min = 0.0;
        assert_close(score(0.0, &rainfall), 0.0);
    }

    #[test]
    fn zero_width_interval_returns_its_lower_score() {
        let wind = thresholds(Parameter::WindSpeed);
        let collapsed = ThresholdBand {
            min: 20.0,
            max: Some(20.0),
            ..wind.watch
        };
        assert_close(interpolate(20.0, &collapsed, 20.0), 11.0);
    }

    #[test]
    fn collapsed_watch_band_hands_off_to_danger() {
        let mut wind = thresholds(Parameter::WindSpeed);
        wind.watch.max = Some(20.0);
        wind.danger.min = 20.0;
        assert_close(score(20.0, &wind), 10.0);
        assert_close(score(20.5, &wind), 31.05);
    }

    #[test]
    fn negative_input_is_clamped_to_zero() {
        let humidity = thresholds(Parameter::Humidity);
        assert_close(score(-15.0, &humidity), 0.0);
    }

    proptest! {
        #[test]
        fn score_stays_within_bounds(value in 0.0f64..5_000.0, index in 0usize..5) {
            let thresholds = thresholds(Parameter::ALL[index]);
            let result = score(value, &thresholds);
            prop_assert!((0.0..=100.0).contains(&result));
        }

        #[test]
        fn score_is_non_decreasing(a in 0.0f64..2_000.0, b in 0.0f64..2_000.0, index in 0usize..5) {
            let thresholds = thresholds(Parameter::ALL[index]);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(score(low, &thresholds) <= score(high, &thresholds) + 1e-9);
        }
    }
}

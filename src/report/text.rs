use crate::rainfall::CumulativeRainfall;
use crate::types::risk::{Parameter, RiskLevel, RiskResult};

/// Number of recommendations carried in a push alert.
const ALERT_RECOMMENDATIONS: usize = 4;

pub fn to_summary(result: &RiskResult) -> String {
    format!(
        "{} {} score={:.2} (total {:.2} x{:.2})",
        result.display.emoji,
        result.risk_level,
        result.adjusted_score,
        result.total_score,
        result.seasonal_multiplier
    )
}

/// Plain-text alert body handed to an external notifier.
pub fn alert_message(
    result: &RiskResult,
    cumulative: &CumulativeRainfall,
    recommendations: &[&str],
) -> String {
    let mut message = format!(
        "LANDSLIDE EARLY WARNING\n{} STATUS: {}\nRisk score: {:.1}/100\n",
        result.display.emoji, result.risk_level, result.adjusted_score
    );
    for parameter in [Parameter::RainfallHourly, Parameter::Humidity, Parameter::WindSpeed] {
        if let Some(detail) = result.detail(parameter) {
            message.push_str(&format!(
                "{}: {:.1} {} (score {:.1})\n",
                parameter,
                detail.value,
                parameter.unit(),
                detail.raw_score
            ));
        }
    }
    message.push_str(&format!(
        "Rainfall 3 days: {:.1} mm\nRainfall 7 days: {:.1} mm\n",
        cumulative.three_day, cumulative.seven_day
    ));

    let heading = match result.risk_level {
        RiskLevel::Danger => "IMMEDIATE ACTIONS:",
        RiskLevel::Watch | RiskLevel::Safe => "ACTIONS:",
    };
    message.push_str(heading);
    message.push('\n');
    for recommendation in recommendations.iter().take(ALERT_RECOMMENDATIONS) {
        message.push_str(&format!("- {}\n", recommendation));
    }
    message
}

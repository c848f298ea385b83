use crate::site;
use crate::types::risk::RiskResult;

pub fn to_markdown(result: &RiskResult, recommendations: &[&str]) -> String {
    let mut output = String::new();
    output.push_str("# Landslide Risk Assessment\n\n");
    output.push_str(&format!(
        "Site: {} ({:.6}, {:.6})\n\n",
        site::SITE_NAME,
        site::LATITUDE,
        site::LONGITUDE
    ));
    output.push_str(&format!(
        "Status: {} {} ({})\n\n",
        result.display.emoji, result.risk_level, result.display.description
    ));
    output.push_str(&format!(
        "Total score: {:.2}\nSeasonal multiplier: {:.2}\nAdjusted score: {:.2}/100\n\n",
        result.total_score, result.seasonal_multiplier, result.adjusted_score
    ));

    output.push_str("## Parameters\n\n");
    output.push_str("| parameter | value | raw score | weight | weighted |\n");
    output.push_str("|---|---|---|---|---|\n");
    for detail in &result.parameters {
        output.push_str(&format!(
            "| {} | {:.1} {} | {:.2} | {:.2} | {:.2} |\n",
            detail.parameter,
            detail.value,
            detail.parameter.unit(),
            detail.raw_score,
            detail.weight,
            detail.weighted_score
        ));
    }
    output.push('\n');

    output.push_str("## Recommendations\n\n");
    if recommendations.is_empty() {
        output.push_str("- none\n");
    } else {
        for recommendation in recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }
    }

    output.push_str(&format!(
        "\nAssessed at {}\n",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskEngine;
    use crate::types::risk::Readings;

    #[test]
    fn markdown_report_contains_sections() {
        let result = RiskEngine::default()
            .assess(&Readings::default(), None)
            .expect("assessment should succeed");

        let rendered = to_markdown(&result, &["Inspect drainage"]);
        assert!(rendered.contains("# Landslide Risk Assessment"));
        assert!(rendered.contains("## Parameters"));
        assert!(rendered.contains("| wind_speed |"));
        assert!(rendered.contains("- Inspect drainage"));
        assert!(rendered.contains("Status: 🟢 SAFE"));
    }
}

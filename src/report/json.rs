use crate::types::risk::RiskResult;
use serde::Serialize;

#[derive(Serialize)]
struct Assessment<'a> {
    #[serde(flatten)]
    result: &'a RiskResult,
    recommendations: &'a [&'a str],
}

pub fn to_json(result: &RiskResult, recommendations: &[&str]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Assessment {
        result,
        recommendations,
    })
}

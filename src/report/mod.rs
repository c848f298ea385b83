pub mod json;
pub mod md;
pub mod text;

use crate::error::LandslideError;
use crate::types::risk::RiskResult;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
    Text,
}

pub fn render(
    result: &RiskResult,
    recommendations: &[&str],
    format: OutputFormat,
) -> Result<String, LandslideError> {
    match format {
        OutputFormat::Json => json::to_json(result, recommendations).map_err(LandslideError::Json),
        OutputFormat::Md => Ok(md::to_markdown(result, recommendations)),
        OutputFormat::Text => Ok(text::to_summary(result)),
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandslideError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("degenerate band: {parameter}.{band} has an empty or inverted domain")]
    DegenerateBand { parameter: String, band: String },

    #[error("invalid input for {field}: {reason}")]
    InputValidation { field: String, reason: String },

    #[error("no weather reading available; assessment skipped")]
    NoReading,

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LandslideError>;

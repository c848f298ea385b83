use crate::error::{LandslideError, Result};
use crate::types::config::{RawModelConfig, RiskModel};
use std::path::{Path, PathBuf};
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "landslide.toml";

/// Explicit path wins; otherwise `landslide.toml` in the working directory
/// is picked up when present.
pub fn resolve_base(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        }
    }
}

/// Loads and validates a model. No base path means the built-in reference
/// configuration; the override, if any, is deep-merged over the base first.
pub fn load_model(base: Option<&Path>, overlay: Option<&Path>) -> Result<RiskModel> {
    let raw = match (base, overlay) {
        (None, None) => RawModelConfig::reference(),
        (base, overlay) => load_raw(base, overlay)?,
    };
    let model = raw.validate()?;
    tracing::debug!(
        location = model.location.as_deref().unwrap_or("unknown"),
        "risk model loaded"
    );
    Ok(model)
}

fn load_raw(base: Option<&Path>, overlay: Option<&Path>) -> Result<RawModelConfig> {
    let mut merged = match base {
        Some(path) => read_value(path)?,
        None => Value::try_from(RawModelConfig::reference())?,
    };
    if let Some(path) = overlay {
        merge_toml(&mut merged, read_value(path)?);
    }
    Ok(merged.try_into()?)
}

/// Writes the built-in reference configuration; `.json` paths get JSON.
pub fn export_reference(path: &Path) -> Result<()> {
    let raw = RawModelConfig::reference();
    let rendered = if is_json(path) {
        serde_json::to_string_pretty(&raw)?
    } else {
        toml::to_string_pretty(&raw)?
    };
    std::fs::write(path, rendered)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

fn read_value(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(LandslideError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    if is_json(path) {
        serde_json::from_str(&content)
            .map_err(|e| LandslideError::Configuration(format!("{}: {}", path.display(), e)))
    } else {
        toml::from_str(&content)
            .map_err(|e| LandslideError::Configuration(format!("{}: {}", path.display(), e)))
    }
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::params::FitParams;
use crate::profile::StepProfile;

/// Runtime configuration: fit constants plus the step-profile levels.
#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    pub fit: FitParams,
    pub profile: StepProfile,
}

/// Load a JSON runtime configuration.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config.fit.validate()?;
    Ok(config)
}

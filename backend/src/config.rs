use serde::{Deserialize, Serialize};

use crate::screening::GateMode;

/// Screening behavior switches shipped in `config/screening.yaml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub version: f32,
    pub gate: GateConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GateConfig {
    pub mode: GateMode,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            version: 1.0,
            gate: GateConfig {
                mode: GateMode::Permissive,
            },
        }
    }
}

impl ScreeningConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let manifest_dir =
            std::env::var("CARGO_MANIFEST_DIR").map_err(|_| "Failed to get manifest directory")?;
        let config_path = format!("{}/../config/screening.yaml", manifest_dir);
        let config_str = std::fs::read_to_string(config_path)?;
        let config: ScreeningConfig = serde_yaml::from_str(&config_str)?;
        Ok(config)
    }

    /// An absent or malformed config file falls back to the permissive
    /// default rather than keeping the service from starting.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Screening config not loaded ({e}); using permissive defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_file_parses() {
        let config = ScreeningConfig::load().unwrap();
        assert_eq!(config.version, 1.0);
    }

    #[test]
    fn strict_mode_config_parses() {
        let config: ScreeningConfig =
            serde_yaml::from_str("version: 1.0\ngate:\n  mode: strict\n").unwrap();
        assert_eq!(config.gate.mode, GateMode::Strict);
    }

    #[test]
    fn default_gate_mode_is_permissive() {
        assert_eq!(ScreeningConfig::default().gate.mode, GateMode::Permissive);
    }
}

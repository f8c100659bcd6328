use crate::particle::MovementType;
use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration for export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// All engine settings
    pub settings: EngineSettings,
    /// Active motion pattern
    pub movement_type: MovementType,
    /// Number of particles
    pub num_particles: usize,
    /// Simulation steps per rendered frame
    pub steps_per_frame: usize,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            settings: EngineSettings::default(),
            movement_type: MovementType::default(),
            num_particles: 800,
            steps_per_frame: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig {
            version: 1,
            settings: EngineSettings {
                max_speed: 4.5,
                attraction_strength: 2.0,
                field_scale: 16.0,
                field_noise_scale: 0.05,
                field_time_scale: 0.02,
                field_strength: 1.2,
                field_seed: 1234,
                trail_fade: 0.95,
                hue_offset: 120.0,
                invert_colors: true,
            },
            movement_type: MovementType::PerlinFlow,
            num_particles: 2500,
            steps_per_frame: 4,
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.version, config.version);
        assert_eq!(parsed.settings, config.settings);
        assert_eq!(parsed.movement_type, config.movement_type);
        assert_eq!(parsed.num_particles, config.num_particles);
        assert_eq!(parsed.steps_per_frame, config.steps_per_frame);
    }

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.num_particles, config.num_particles);
        assert_eq!(loaded.movement_type, config.movement_type);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(result.is_err());
    }
}

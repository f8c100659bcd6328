use crate::particle::MovementType;
use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named preset: a motion pattern plus the settings that flatter it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: EngineSettings,
    pub movement_type: MovementType,
    pub num_particles: usize,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: EngineSettings,
        movement_type: MovementType,
        num_particles: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
            movement_type,
            num_particles,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        manager.load_user_presets();
        manager
    }

    /// One tuned preset per motion pattern
    fn load_builtin_presets(&mut self) {
        self.builtin = vec![
            Preset::new(
                "Orbit",
                "Rings circling a wandering center",
                EngineSettings {
                    trail_fade: 0.96,
                    ..Default::default()
                },
                MovementType::Circle,
                600,
            ),
            Preset::new(
                "Streamlines",
                "Steering particles tracing the flow field",
                EngineSettings {
                    field_strength: 0.8,
                    field_scale: 12.0,
                    trail_fade: 0.94,
                    ..Default::default()
                },
                MovementType::Noise,
                1500,
            ),
            Preset::new(
                "Ripples",
                "Concentric wave interference around the center",
                EngineSettings {
                    trail_fade: 0.88,
                    ..Default::default()
                },
                MovementType::Sin1,
                800,
            ),
            Preset::new(
                "Dunes",
                "Traveling waves drifting rightward",
                EngineSettings {
                    max_speed: 3.0,
                    trail_fade: 0.90,
                    ..Default::default()
                },
                MovementType::Sin2,
                800,
            ),
            Preset::new(
                "Whirl",
                "Tight spirals near the center, calm at the edges",
                EngineSettings {
                    max_speed: 1.5,
                    trail_fade: 0.97,
                    ..Default::default()
                },
                MovementType::Tau,
                1000,
            ),
            Preset::new(
                "Drift",
                "Slow wander over two noise octaves",
                EngineSettings {
                    trail_fade: 0.96,
                    hue_offset: 200.0,
                    ..Default::default()
                },
                MovementType::PerlinFlow,
                1200,
            ),
            Preset::new(
                "Moire",
                "Three interfering sine waves",
                EngineSettings {
                    trail_fade: 0.85,
                    ..Default::default()
                },
                MovementType::WaveInterference,
                600,
            ),
        ];
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-flow").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        if let Some(dir) = Self::presets_dir() {
            if dir.exists() {
                if let Ok(entries) = fs::read_dir(&dir) {
                    for entry in entries.flatten() {
                        if entry.path().extension().is_some_and(|e| e == "json") {
                            if let Ok(content) = fs::read_to_string(entry.path()) {
                                if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                                    self.user.push(preset);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Save a preset to disk
    #[allow(dead_code)]
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let filename = sanitize_name(&preset.name);
        let path = dir.join(format!("{}.json", filename));

        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        if !self.user.iter().any(|p| p.name == preset.name) {
            self.user.push(preset);
        }

        Ok(())
    }

    /// Delete a user preset
    #[allow(dead_code)]
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", sanitize_name(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }

        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get preset names for display
    #[allow(dead_code)]
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

#[allow(dead_code)]
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_presets_cover_every_movement_type() {
        let mut manager = PresetManager {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();

        let mut movement_type = MovementType::Circle;
        for _ in 0..7 {
            assert!(
                manager
                    .builtin
                    .iter()
                    .any(|p| p.movement_type == movement_type),
                "no builtin preset for {:?}",
                movement_type
            );
            movement_type = movement_type.next();
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let mut manager = PresetManager {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        assert!(manager.find("orbit").is_some());
        assert!(manager.find("DRIFT").is_some());
        assert!(manager.find("nope").is_none());
    }

    #[test]
    fn preset_serialization_roundtrip() {
        let preset = Preset::new(
            "Custom",
            "test preset",
            EngineSettings {
                max_speed: 5.0,
                ..Default::default()
            },
            MovementType::Tau,
            333,
        );
        let json = serde_json::to_string(&preset).unwrap();
        let restored: Preset = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.name, "Custom");
        assert_eq!(restored.movement_type, MovementType::Tau);
        assert_eq!(restored.num_particles, 333);
        assert_eq!(restored.settings.max_speed, 5.0);
    }

    #[test]
    fn sanitize_replaces_awkward_characters() {
        assert_eq!(sanitize_name("My Preset!"), "My_Preset_");
        assert_eq!(sanitize_name("plain-name_1"), "plain-name_1");
    }
}

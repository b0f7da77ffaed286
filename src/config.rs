use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

/// Filter envelope. The cutoff rises to `max_value` over `attack`, falls to
/// `sustain * max_value` over `decay` and shares the amp envelope's release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    /// Hz
    pub max_value: f32,
    /// Seconds
    pub attack: f32,
    /// Seconds
    pub decay: f32,
    /// 0.0 -> 1.0
    pub sustain: f32,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            max_value: 7500.0,
            attack: 0.2,
            decay: 0.2,
            sustain: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub waveform: Waveform,
    pub max_gain: f32,
    /// Seconds
    pub attack: f32,
    /// Seconds
    pub decay: f32,
    /// 0.0 -> 1.0
    pub sustain: f32,
    /// Seconds
    pub release: f32,
    /// 0.0 -> 1.0
    pub stereo_width: f32,
    pub num_voices: usize,
    pub cutoff: CutoffConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sawtooth,
            max_gain: 0.1,
            attack: 0.1,
            decay: 0.0,
            sustain: 1.0,
            release: 0.2,
            stereo_width: 0.5,
            num_voices: 18,
            cutoff: CutoffConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub display_char: String,
    pub physical_code: u32,
}

impl KeyDescriptor {
    pub fn new(display_char: &str, physical_code: u32) -> Self {
        Self {
            display_char: display_char.to_string(),
            physical_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Piano key number (1 = A0, 49 = A4) of the leftmost slot.
    pub base_key: i32,
    pub keys: Vec<KeyDescriptor>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        let keys = [
            ("a", 65),
            ("w", 87),
            ("s", 83),
            ("e", 69),
            ("d", 68),
            ("f", 70),
            ("t", 84),
            ("g", 71),
            ("y", 89),
            ("h", 72),
            ("u", 85),
            ("j", 74),
            ("k", 75),
            ("o", 79),
            ("l", 76),
            ("p", 80),
            (";", 186),
            ("'", 222),
        ]
        .into_iter()
        .map(|(c, code)| KeyDescriptor::new(c, code))
        .collect();

        Self { base_key: 40, keys }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub synth: SynthConfig,
    pub keyboard: KeyboardConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let ron_string = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&ron_string).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron_string).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_instrument() {
        let config = AppConfig::default();
        assert_eq!(config.synth.num_voices, 18);
        assert_eq!(config.keyboard.keys.len(), config.synth.num_voices);
        assert_eq!(config.keyboard.base_key, 40);
        assert_eq!(config.synth.waveform, Waveform::Sawtooth);
        assert_eq!(config.keyboard.keys[0], KeyDescriptor::new("a", 65));
        assert_eq!(config.keyboard.keys[17], KeyDescriptor::new("'", 222));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: AppConfig =
            ron::from_str("(keyboard: (base_key: 28, keys: [(display_char: \"z\", physical_code: 90)]))")
                .unwrap();
        assert_eq!(config.synth, SynthConfig::default());
        assert_eq!(config.keyboard.base_key, 28);
        assert_eq!(config.keyboard.keys.len(), 1);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: AppConfig =
            ron::from_str("(synth: (attack: 0.5, cutoff: (max_value: 3000.0)), keyboard: (base_key: 28))")
                .unwrap();

        let defaults = SynthConfig::default();
        assert_eq!(config.synth.attack, 0.5);
        assert_eq!(config.synth.waveform, defaults.waveform);
        assert_eq!(config.synth.release, defaults.release);
        assert_eq!(config.synth.num_voices, defaults.num_voices);
        assert_eq!(config.synth.cutoff.max_value, 3000.0);
        assert_eq!(config.synth.cutoff.sustain, defaults.cutoff.sustain);

        assert_eq!(config.keyboard.base_key, 28);
        assert_eq!(config.keyboard.keys, KeyboardConfig::default().keys);
    }

    #[test]
    fn save_then_load_preserves_config() {
        let path = std::env::temp_dir().join(format!("polykeys-{}.ron", std::process::id()));
        let mut config = AppConfig::default();
        config.synth.waveform = Waveform::Triangle;
        config.synth.cutoff.max_value = 3000.0;

        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = AppConfig::load(Path::new("/nonexistent/polykeys.ron")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo { .. }));
    }
}

pub mod audio;
pub mod config;
pub mod error;
pub mod events;
pub mod keyboard;
pub mod terminal;
pub mod ui;

pub use audio::{AudioContext, Polysynth, key_frequency};
pub use config::{AppConfig, KeyDescriptor, KeyboardConfig, SynthConfig, Waveform};
pub use error::{Error, Result};
pub use events::{KeyAction, PhysicalKeyEvent, PointerEvent};
pub use keyboard::{KeyLayout, KeyState, KeyboardEngine, Voice, VoiceEngine};
pub use ui::{ControlPanel, PolykeysApp};

mod engine;
mod envelope;
mod voice;

pub use engine::{AudioContext, ParamSetters, Polysynth, SynthParams, SynthRenderer, SynthVoice, VoiceCommand};
pub use envelope::{Adsr, Envelope, EnvelopeState};
pub use voice::VoiceRenderer;

/// Piano key number of A4.
pub const A4_KEY: i32 = 49;
pub const A4_HZ: f64 = 440.0;

/// Frequency of a piano key under 12-tone equal temperament (1 = A0, 49 = A4).
pub fn key_frequency(key_number: i32) -> f64 {
    A4_HZ * 2.0_f64.powf((f64::from(key_number) - f64::from(A4_KEY)) / 12.0)
}

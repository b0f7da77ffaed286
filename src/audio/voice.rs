use std::f32::consts::{PI, TAU};

use super::engine::SynthParams;
use super::envelope::Envelope;
use crate::config::Waveform;

const MIN_CUTOFF_HZ: f32 = 20.0;
const FILTER_DAMPING: f32 = std::f32::consts::SQRT_2;

/// Audio-thread side of one voice: oscillator, low-pass filter and the two
/// envelopes driving gain and cutoff.
#[derive(Debug, Clone)]
pub struct VoiceRenderer {
    pitch: f32,
    phase: f32,
    amp: Envelope,
    cutoff: Envelope,
    ic1eq: f32,
    ic2eq: f32,
}

impl VoiceRenderer {
    pub fn new() -> Self {
        Self {
            pitch: 0.0,
            phase: 0.0,
            amp: Envelope::new(),
            cutoff: Envelope::new(),
            ic1eq: 0.0,
            ic2eq: 0.0,
        }
    }

    pub fn start(&mut self) {
        if self.amp.is_idle() {
            self.phase = 0.0;
            self.ic1eq = 0.0;
            self.ic2eq = 0.0;
        }
        self.amp.trigger();
        self.cutoff.trigger();
    }

    pub fn stop(&mut self) {
        self.amp.release();
        self.cutoff.release();
    }

    pub fn set_pitch(&mut self, hz: f64) {
        self.pitch = hz as f32;
    }

    pub fn is_active(&self) -> bool {
        !self.amp.is_idle()
    }

    /// Renders one mono sample.
    pub fn render_sample(&mut self, params: &SynthParams, sample_rate: f32) -> f32 {
        if self.amp.is_idle() {
            return 0.0;
        }

        let dt = 1.0 / sample_rate;
        let gain = self.amp.next(&params.amp, dt) * params.max_gain;
        let cutoff_level = self.cutoff.next(&params.cutoff, dt);

        let raw = oscillate(params.waveform, self.phase);
        self.phase += self.pitch / sample_rate;
        self.phase -= self.phase.floor();

        let cutoff_hz = (params.cutoff_max * cutoff_level).clamp(MIN_CUTOFF_HZ, sample_rate * 0.45);
        self.lowpass(raw, cutoff_hz, sample_rate) * gain
    }

    fn lowpass(&mut self, sample: f32, cutoff_hz: f32, sample_rate: f32) -> f32 {
        let g = (PI * cutoff_hz / sample_rate).tan();
        let h = 1.0 / (1.0 + g * (g + FILTER_DAMPING));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        v2
    }
}

impl Default for VoiceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn oscillate(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => phase * 2.0 - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

/// Equal-power gains for a pan position in -1.0 (left) ..= 1.0 (right).
pub fn pan_to_gains(pan: f32) -> (f32, f32) {
    let pan = pan.clamp(-1.0, 1.0);
    let angle = (pan + 1.0) * std::f32::consts::FRAC_PI_4;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn params() -> SynthParams {
        SynthParams::from(&SynthConfig::default())
    }

    fn peak(voice: &mut VoiceRenderer, params: &SynthParams, seconds: f32) -> f32 {
        let samples = (seconds * SAMPLE_RATE) as usize;
        (0..samples)
            .map(|_| voice.render_sample(params, SAMPLE_RATE).abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn idle_voice_is_silent() {
        let mut voice = VoiceRenderer::new();
        voice.set_pitch(440.0);
        assert_eq!(peak(&mut voice, &params(), 0.1), 0.0);
        assert!(!voice.is_active());
    }

    #[test]
    fn started_voice_sounds_within_max_gain() {
        let params = params();
        let mut voice = VoiceRenderer::new();
        voice.set_pitch(261.63);
        voice.start();
        let level = peak(&mut voice, &params, 0.3);
        assert!(level > 0.0);
        assert!(level <= params.max_gain * 1.5, "{level}");
    }

    #[test]
    fn stopped_voice_goes_quiet_after_release() {
        let params = params();
        let mut voice = VoiceRenderer::new();
        voice.set_pitch(440.0);
        voice.start();
        peak(&mut voice, &params, 0.3);
        voice.stop();
        peak(&mut voice, &params, params.amp.release + 0.05);
        assert!(!voice.is_active());
        assert_eq!(voice.render_sample(&params, SAMPLE_RATE), 0.0);
    }

    #[test]
    fn waveforms_stay_in_unit_range() {
        for waveform in Waveform::ALL {
            for i in 0..100 {
                let value = oscillate(waveform, i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&value), "{waveform:?} at {i}: {value}");
            }
        }
    }

    #[test]
    fn center_pan_splits_power_evenly() {
        let (l, r) = pan_to_gains(0.0);
        assert!((l - r).abs() < 1e-6);
        assert!((l * l + r * r - 1.0).abs() < 1e-6);
        assert!(pan_to_gains(-1.0).1.abs() < 1e-6);
    }
}

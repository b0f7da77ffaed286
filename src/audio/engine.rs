use arc_swap::ArcSwap;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam::channel::{Receiver, Sender};
use std::sync::Arc;
use tracing::{error, info};

use super::envelope::Adsr;
use super::voice::{VoiceRenderer, pan_to_gains};
use crate::config::{SynthConfig, Waveform};
use crate::error::{Error, Result};
use crate::keyboard::{Voice, VoiceEngine};

/// Handle on the default output device. Constructing it is the point where a
/// missing audio backend becomes a startup failure.
pub struct AudioContext {
    device: cpal::Device,
    config: cpal::StreamConfig,
}

impl AudioContext {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;
        let config: cpal::StreamConfig = device.default_output_config()?.into();

        info!(
            "Audio output: {} channels, {} Hz",
            config.channels, config.sample_rate
        );

        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate as f32
    }

    pub fn channels(&self) -> usize {
        self.config.channels as usize
    }
}

/// Timbre shared by every voice, hot-swapped into the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthParams {
    pub waveform: Waveform,
    pub max_gain: f32,
    pub amp: Adsr,
    /// Hz
    pub cutoff_max: f32,
    pub cutoff: Adsr,
    pub stereo_width: f32,
}

impl From<&SynthConfig> for SynthParams {
    fn from(config: &SynthConfig) -> Self {
        Self {
            waveform: config.waveform,
            max_gain: config.max_gain,
            amp: Adsr {
                attack: config.attack,
                decay: config.decay,
                sustain: config.sustain,
                release: config.release,
            },
            cutoff_max: config.cutoff.max_value,
            cutoff: Adsr {
                attack: config.cutoff.attack,
                decay: config.cutoff.decay,
                sustain: config.cutoff.sustain,
                release: config.release,
            },
            stereo_width: config.stereo_width.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceCommand {
    Start { voice: usize },
    Stop { voice: usize },
    SetPitch { voice: usize, hz: f64 },
}

/// UI-side voice handle. The pitch is cached here so reads never touch the
/// audio thread.
#[derive(Debug, Clone)]
pub struct SynthVoice {
    index: usize,
    pitch: f64,
    commands: Sender<VoiceCommand>,
}

impl SynthVoice {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Voice for SynthVoice {
    fn start(&mut self) {
        let _ = self.commands.send(VoiceCommand::Start { voice: self.index });
    }

    fn stop(&mut self) {
        let _ = self.commands.send(VoiceCommand::Stop { voice: self.index });
    }

    fn pitch(&self) -> f64 {
        self.pitch
    }

    fn set_pitch(&mut self, hz: f64) {
        self.pitch = hz;
        let _ = self.commands.send(VoiceCommand::SetPitch {
            voice: self.index,
            hz,
        });
    }
}

/// Audio-thread half of the synth. Owned by the output stream callback, or
/// driven directly when rendering offline.
pub struct SynthRenderer {
    voices: Vec<VoiceRenderer>,
    gains: Vec<(f32, f32)>,
    gains_width: f32,
    commands: Receiver<VoiceCommand>,
    params: Arc<ArcSwap<SynthParams>>,
    sample_rate: f32,
}

impl SynthRenderer {
    /// Fills an interleaved buffer with `channels` channels.
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }

        let params = self.params.load();
        if params.stereo_width != self.gains_width {
            self.update_gains(params.stereo_width);
        }

        for frame in data.chunks_mut(channels.max(1)) {
            frame.fill(0.0);
            for (voice, &(l_gain, r_gain)) in self.voices.iter_mut().zip(&self.gains) {
                if !voice.is_active() {
                    continue;
                }
                let sample = voice.render_sample(&params, self.sample_rate);
                if frame.len() >= 2 {
                    frame[0] += sample * l_gain;
                    frame[1] += sample * r_gain;
                } else if let Some(out) = frame.first_mut() {
                    *out += sample;
                }
            }
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    fn apply(&mut self, command: VoiceCommand) {
        match command {
            VoiceCommand::Start { voice } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.start();
                }
            }
            VoiceCommand::Stop { voice } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.stop();
                }
            }
            VoiceCommand::SetPitch { voice, hz } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.set_pitch(hz);
                }
            }
        }
    }

    fn update_gains(&mut self, width: f32) {
        let count = self.voices.len();
        self.gains = (0..count)
            .map(|i| pan_to_gains(voice_pan(i, count, width)))
            .collect();
        self.gains_width = width;
    }
}

/// Spreads voices evenly from `-width` (first) to `+width` (last).
fn voice_pan(index: usize, count: usize, width: f32) -> f32 {
    if count < 2 {
        return 0.0;
    }
    width * (2.0 * index as f32 / (count - 1) as f32 - 1.0)
}

/// Parameter entry points for the timbre controls. Changes reach the audio
/// thread on its next block.
#[derive(Clone)]
pub struct ParamSetters {
    params: Arc<ArcSwap<SynthParams>>,
}

impl ParamSetters {
    fn update(&self, f: impl Fn(&mut SynthParams)) {
        self.params.rcu(|current| {
            let mut next = SynthParams::clone(current);
            f(&mut next);
            next
        });
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.update(|p| p.waveform = waveform);
    }

    pub fn set_max_gain(&self, gain: f32) {
        self.update(|p| p.max_gain = gain.max(0.0));
    }

    pub fn set_attack(&self, seconds: f32) {
        self.update(|p| p.amp.attack = seconds.max(0.0));
    }

    pub fn set_decay(&self, seconds: f32) {
        self.update(|p| p.amp.decay = seconds.max(0.0));
    }

    pub fn set_sustain(&self, level: f32) {
        self.update(|p| p.amp.sustain = level.clamp(0.0, 1.0));
    }

    pub fn set_release(&self, seconds: f32) {
        self.update(|p| {
            p.amp.release = seconds.max(0.0);
            p.cutoff.release = p.amp.release;
        });
    }

    pub fn set_stereo_width(&self, width: f32) {
        self.update(|p| p.stereo_width = width.clamp(0.0, 1.0));
    }

    pub fn set_cutoff_max(&self, hz: f32) {
        self.update(|p| p.cutoff_max = hz.max(0.0));
    }

    pub fn set_cutoff_attack(&self, seconds: f32) {
        self.update(|p| p.cutoff.attack = seconds.max(0.0));
    }

    pub fn set_cutoff_decay(&self, seconds: f32) {
        self.update(|p| p.cutoff.decay = seconds.max(0.0));
    }

    pub fn set_cutoff_sustain(&self, level: f32) {
        self.update(|p| p.cutoff.sustain = level.clamp(0.0, 1.0));
    }
}

/// Fixed bank of voices. The UI thread holds the handles, the audio thread
/// holds the matching [`SynthRenderer`].
pub struct Polysynth {
    voices: Vec<SynthVoice>,
    params: Arc<ArcSwap<SynthParams>>,
    stream: Option<cpal::Stream>,
}

impl Polysynth {
    /// Builds the voices and starts an output stream on `context`.
    pub fn new(context: &AudioContext, config: &SynthConfig) -> Result<Self> {
        let (mut synth, mut renderer) = Self::offline(config, context.sample_rate());
        let channels = context.channels();

        let stream = context.device.build_output_stream(
            &context.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                renderer.render(data, channels);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        info!("Polysynth running with {} voices", synth.voices.len());
        synth.stream = Some(stream);
        Ok(synth)
    }

    /// Builds the voices without opening a device; the caller drives the
    /// returned renderer.
    pub fn offline(config: &SynthConfig, sample_rate: f32) -> (Self, SynthRenderer) {
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        let params = Arc::new(ArcSwap::from_pointee(SynthParams::from(config)));

        let voices = (0..config.num_voices)
            .map(|index| SynthVoice {
                index,
                pitch: 0.0,
                commands: command_tx.clone(),
            })
            .collect();

        let renderer = SynthRenderer {
            voices: vec![VoiceRenderer::new(); config.num_voices],
            gains: Vec::new(),
            gains_width: f32::NAN,
            commands: command_rx,
            params: params.clone(),
            sample_rate,
        };

        let synth = Self {
            voices,
            params,
            stream: None,
        };
        (synth, renderer)
    }

    /// Current timbre, identical for every voice.
    pub fn params(&self) -> SynthParams {
        SynthParams::clone(&self.params.load())
    }

    pub fn create_setters(&self) -> ParamSetters {
        ParamSetters {
            params: self.params.clone(),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }
}

impl VoiceEngine for Polysynth {
    type Voice = SynthVoice;

    fn voices(&self) -> &[SynthVoice] {
        &self.voices
    }

    fn voices_mut(&mut self) -> &mut [SynthVoice] {
        &mut self.voices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn offline_synth_has_configured_voice_count() {
        let (synth, renderer) = Polysynth::offline(&SynthConfig::default(), SAMPLE_RATE);
        assert_eq!(synth.voices().len(), 18);
        assert!(!synth.is_streaming());
        assert_eq!(renderer.active_voices(), 0);
    }

    #[test]
    fn started_voice_is_rendered() {
        let (mut synth, mut renderer) = Polysynth::offline(&SynthConfig::default(), SAMPLE_RATE);
        let voice = &mut synth.voices_mut()[0];
        voice.set_pitch(261.63);
        voice.start();

        let mut buffer = vec![0.0; 4800 * 2];
        renderer.render(&mut buffer, 2);

        assert_eq!(renderer.active_voices(), 1);
        assert!(peak(&buffer) > 0.0);
    }

    #[test]
    fn silent_until_started() {
        let (_synth, mut renderer) = Polysynth::offline(&SynthConfig::default(), SAMPLE_RATE);
        let mut buffer = vec![1.0; 512];
        renderer.render(&mut buffer, 2);
        assert_eq!(peak(&buffer), 0.0);
    }

    #[test]
    fn first_voice_leans_left() {
        let (mut synth, mut renderer) = Polysynth::offline(&SynthConfig::default(), SAMPLE_RATE);
        let voice = &mut synth.voices_mut()[0];
        voice.set_pitch(220.0);
        voice.start();

        let mut buffer = vec![0.0; 4800 * 2];
        renderer.render(&mut buffer, 2);

        let left: f32 = buffer.iter().step_by(2).map(|s| s.abs()).sum();
        let right: f32 = buffer.iter().skip(1).step_by(2).map(|s| s.abs()).sum();
        assert!(left > right);
    }

    #[test]
    fn pitch_is_cached_on_the_handle() {
        let (mut synth, _renderer) = Polysynth::offline(&SynthConfig::default(), SAMPLE_RATE);
        synth.voices_mut()[3].set_pitch(330.0);
        assert_eq!(synth.voices()[3].pitch(), 330.0);
        assert_eq!(synth.voices()[3].index(), 3);
    }

    #[test]
    fn setters_are_visible_through_params() {
        let (synth, _renderer) = Polysynth::offline(&SynthConfig::default(), SAMPLE_RATE);
        let setters = synth.create_setters();
        setters.set_waveform(Waveform::Square);
        setters.set_release(0.5);
        setters.set_sustain(3.0);
        setters.set_cutoff_max(1200.0);

        let params = synth.params();
        assert_eq!(params.waveform, Waveform::Square);
        assert_eq!(params.amp.release, 0.5);
        assert_eq!(params.cutoff.release, 0.5);
        assert_eq!(params.amp.sustain, 1.0);
        assert_eq!(params.cutoff_max, 1200.0);
    }

    #[test]
    fn pan_spreads_across_stereo_width() {
        assert_eq!(voice_pan(0, 18, 0.5), -0.5);
        assert_eq!(voice_pan(17, 18, 0.5), 0.5);
        assert_eq!(voice_pan(0, 1, 0.5), 0.0);
    }
}

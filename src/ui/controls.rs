use crate::audio::{ParamSetters, Polysynth, SynthParams};
use crate::config::Waveform;

/// Slider positions. Filled once from the synth at startup; afterwards the
/// sliders only write.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValues {
    pub waveform: Waveform,
    pub volume: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub cutoff_frequency: f32,
    pub cutoff_attack: f32,
    pub cutoff_decay: f32,
    pub cutoff_sustain: f32,
}

impl From<&SynthParams> for ControlValues {
    fn from(params: &SynthParams) -> Self {
        Self {
            waveform: params.waveform,
            volume: params.max_gain,
            attack: params.amp.attack,
            decay: params.amp.decay,
            sustain: params.amp.sustain,
            release: params.amp.release,
            cutoff_frequency: params.cutoff_max,
            cutoff_attack: params.cutoff.attack,
            cutoff_decay: params.cutoff.decay,
            cutoff_sustain: params.cutoff.sustain,
        }
    }
}

pub struct ControlPanel {
    values: ControlValues,
    setters: ParamSetters,
}

impl ControlPanel {
    pub fn mirror(synth: &Polysynth) -> Self {
        Self {
            values: ControlValues::from(&synth.params()),
            setters: synth.create_setters(),
        }
    }

    pub fn values(&self) -> &ControlValues {
        &self.values
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let values = &mut self.values;
        let setters = &self.setters;

        ui.heading("Voice");
        egui::ComboBox::from_label("Waveform")
            .selected_text(values.waveform.name())
            .show_ui(ui, |ui| {
                for waveform in Waveform::ALL {
                    if ui
                        .selectable_value(&mut values.waveform, waveform, waveform.name())
                        .changed()
                    {
                        setters.set_waveform(waveform);
                    }
                }
            });

        if slider(ui, &mut values.volume, 0.0..=0.5, "Volume") {
            setters.set_max_gain(values.volume);
        }
        if slider(ui, &mut values.attack, 0.0..=2.0, "Attack") {
            setters.set_attack(values.attack);
        }
        if slider(ui, &mut values.decay, 0.0..=2.0, "Decay") {
            setters.set_decay(values.decay);
        }
        if slider(ui, &mut values.sustain, 0.0..=1.0, "Sustain") {
            setters.set_sustain(values.sustain);
        }
        if slider(ui, &mut values.release, 0.0..=2.0, "Release") {
            setters.set_release(values.release);
        }

        ui.separator();
        ui.heading("Filter");
        if slider(ui, &mut values.cutoff_frequency, 20.0..=20_000.0, "Cutoff") {
            setters.set_cutoff_max(values.cutoff_frequency);
        }
        if slider(ui, &mut values.cutoff_attack, 0.0..=2.0, "Cutoff attack") {
            setters.set_cutoff_attack(values.cutoff_attack);
        }
        if slider(ui, &mut values.cutoff_decay, 0.0..=2.0, "Cutoff decay") {
            setters.set_cutoff_decay(values.cutoff_decay);
        }
        if slider(ui, &mut values.cutoff_sustain, 0.0..=1.0, "Cutoff sustain") {
            setters.set_cutoff_sustain(values.cutoff_sustain);
        }
    }
}

fn slider(
    ui: &mut egui::Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    label: &str,
) -> bool {
    ui.add(egui::Slider::new(value, range).text(label)).changed()
}

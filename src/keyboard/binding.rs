use tracing::{debug, trace};

use super::layout::KeyLayout;
use super::{Voice, VoiceEngine};
use crate::error::{Error, Result};
use crate::events::{KeyAction, PhysicalKeyEvent, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Idle,
    Sounding,
}

/// Fixed pairing of a slot with the voice of the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding {
    pub index: usize,
    pub physical_code: u32,
}

/// Drives a [`VoiceEngine`] from key presses. Pointer and physical-key input
/// both funnel into [`KeyboardEngine::key_on`] / [`KeyboardEngine::key_off`],
/// so a voice is started once per press and stopped once per release no
/// matter which source delivered the event.
pub struct KeyboardEngine<E: VoiceEngine> {
    layout: KeyLayout,
    bindings: Vec<SlotBinding>,
    states: Vec<KeyState>,
    engine: E,
}

impl<E: VoiceEngine> KeyboardEngine<E> {
    /// Binds every slot to its voice and tunes the voices to the layout.
    pub fn new(layout: KeyLayout, mut engine: E) -> Result<Self> {
        let voices = engine.voices().len();
        if layout.len() != voices {
            return Err(Error::VoiceCountMismatch {
                keys: layout.len(),
                voices,
            });
        }

        for (slot, voice) in layout.slots().iter().zip(engine.voices_mut()) {
            voice.set_pitch(slot.assigned_frequency_hz);
        }

        let bindings = layout
            .slots()
            .iter()
            .map(|slot| SlotBinding {
                index: slot.index,
                physical_code: slot.physical_code,
            })
            .collect();

        Ok(Self {
            states: vec![KeyState::Idle; layout.len()],
            layout,
            bindings,
            engine,
        })
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn bindings(&self) -> &[SlotBinding] {
        &self.bindings
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self, index: usize) -> Option<KeyState> {
        self.states.get(index).copied()
    }

    pub fn is_sounding(&self, index: usize) -> bool {
        self.state(index) == Some(KeyState::Sounding)
    }

    pub fn sounding_count(&self) -> usize {
        self.states
            .iter()
            .filter(|&&s| s == KeyState::Sounding)
            .count()
    }

    /// Starts the slot's voice. Returns `false` if it was already sounding.
    pub fn key_on(&mut self, index: usize) -> bool {
        self.transition(index, KeyAction::Press)
    }

    /// Stops the slot's voice. Returns `false` if it was already idle.
    pub fn key_off(&mut self, index: usize) -> bool {
        self.transition(index, KeyAction::Release)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.transition(event.slot, event.action)
    }

    /// Auto-repeat presses and codes outside the key map are ignored.
    pub fn handle_physical_key(&mut self, event: PhysicalKeyEvent) -> bool {
        if event.repeat {
            trace!(code = event.code, "ignoring auto-repeat");
            return false;
        }

        let Some(binding) = self
            .bindings
            .iter()
            .find(|b| b.physical_code == event.code)
            .copied()
        else {
            trace!(code = event.code, "unmapped key");
            return false;
        };

        self.transition(binding.index, event.action)
    }

    /// Stops every sounding slot and returns how many were stopped.
    pub fn release_all(&mut self) -> usize {
        (0..self.states.len())
            .filter(|&index| self.key_off(index))
            .count()
    }

    /// Halves every voice's current pitch. Unbounded: repeated shifts keep
    /// compounding.
    pub fn decrease_octave(&mut self) {
        self.scale_pitch(0.5);
    }

    /// Doubles every voice's current pitch.
    pub fn increase_octave(&mut self) {
        self.scale_pitch(2.0);
    }

    fn scale_pitch(&mut self, factor: f64) {
        for voice in self.engine.voices_mut() {
            let pitch = voice.pitch();
            voice.set_pitch(pitch * factor);
        }
        debug!(factor, "octave shift");
    }

    fn transition(&mut self, index: usize, action: KeyAction) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        let Some(voice) = self.engine.voices_mut().get_mut(index) else {
            return false;
        };

        match (action, *state) {
            (KeyAction::Press, KeyState::Idle) => {
                *state = KeyState::Sounding;
                voice.start();
                debug!(slot = index, "key on");
                true
            }
            (KeyAction::Release, KeyState::Sounding) => {
                *state = KeyState::Idle;
                voice.stop();
                debug!(slot = index, "key off");
                true
            }
            _ => false,
        }
    }
}

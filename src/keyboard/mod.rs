mod binding;
pub mod keycode;
mod layout;

pub use binding::{KeyState, KeyboardEngine, SlotBinding};
pub use layout::{
    BLACK_KEY_HEIGHT, BLACK_KEY_WIDTH, BLACK_STEP, KeyColor, KeyLayout, KeySlot, WHITE_AFTER_BLACK,
    WHITE_AFTER_WHITE, WHITE_KEY_HEIGHT, WHITE_KEY_WIDTH,
};

/// One sound-generation unit, addressed by index within its [`VoiceEngine`].
pub trait Voice {
    fn start(&mut self);
    fn stop(&mut self);
    /// Hz
    fn pitch(&self) -> f64;
    fn set_pitch(&mut self, hz: f64);
}

/// A fixed-size, ordered bank of voices.
pub trait VoiceEngine {
    type Voice: Voice;

    fn voices(&self) -> &[Self::Voice];
    fn voices_mut(&mut self) -> &mut [Self::Voice];
}

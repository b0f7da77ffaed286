#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    /// Seconds
    pub attack: f32,
    /// Seconds
    pub decay: f32,
    /// 0.0 -> 1.0
    pub sustain: f32,
    /// Seconds
    pub release: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeState {
    Idle,
    Attack { time: f32, from: f32 },
    Decay { time: f32 },
    Sustain,
    Release { time: f32, from: f32 },
}

/// Per-sample ADSR generator. Retriggering during release ramps up from the
/// current level instead of jumping to zero.
#[derive(Debug, Clone)]
pub struct Envelope {
    state: EnvelopeState,
    level: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            state: EnvelopeState::Idle,
            level: 0.0,
        }
    }

    pub fn trigger(&mut self) {
        self.state = EnvelopeState::Attack {
            time: 0.0,
            from: self.level,
        };
    }

    pub fn release(&mut self) {
        if matches!(self.state, EnvelopeState::Idle | EnvelopeState::Release { .. }) {
            return;
        }
        self.state = EnvelopeState::Release {
            time: 0.0,
            from: self.level,
        };
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_idle(&self) -> bool {
        self.state == EnvelopeState::Idle
    }

    /// Advances by `dt` seconds and returns the new level.
    pub fn next(&mut self, adsr: &Adsr, dt: f32) -> f32 {
        match &mut self.state {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack { time, from } => {
                *time += dt;
                if *time >= adsr.attack {
                    self.state = EnvelopeState::Decay { time: 0.0 };
                    self.level = 1.0;
                } else {
                    self.level = *from + (1.0 - *from) * progress(*time, adsr.attack);
                }
            }
            EnvelopeState::Decay { time } => {
                *time += dt;
                if *time >= adsr.decay {
                    self.state = EnvelopeState::Sustain;
                    self.level = adsr.sustain;
                } else {
                    self.level = 1.0 - (1.0 - adsr.sustain) * progress(*time, adsr.decay);
                }
            }
            EnvelopeState::Sustain => {
                self.level = adsr.sustain;
            }
            EnvelopeState::Release { time, from } => {
                *time += dt;
                if *time >= adsr.release {
                    self.state = EnvelopeState::Idle;
                    self.level = 0.0;
                } else {
                    self.level = *from * (1.0 - progress(*time, adsr.release));
                }
            }
        }
        self.level
    }
}

fn progress(time: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (time / duration).min(1.0)
    }
}

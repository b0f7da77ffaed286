#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// A key event from the host, identified by its legacy key code
/// (65 = `A`, 186 = `;`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalKeyEvent {
    pub code: u32,
    pub action: KeyAction,
    /// Set on auto-repeat presses generated while the key is held.
    pub repeat: bool,
}

impl PhysicalKeyEvent {
    pub fn press(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Press,
            repeat: false,
        }
    }

    pub fn repeat(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Press,
            repeat: true,
        }
    }

    pub fn release(code: u32) -> Self {
        Self {
            code,
            action: KeyAction::Release,
            repeat: false,
        }
    }
}

/// Pointer press or release on a rendered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub slot: usize,
    pub action: KeyAction,
}

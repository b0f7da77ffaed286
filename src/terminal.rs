//! Windowless front-end: plays the key map from a raw-mode terminal.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use std::io::{self, Write};
use tracing::{info, warn};

use crate::error::Result;
use crate::events::{KeyAction, PhysicalKeyEvent};
use crate::keyboard::{KeyboardEngine, VoiceEngine, keycode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    Key(PhysicalKeyEvent),
    OctaveDown,
    OctaveUp,
    ReleaseAll,
    Quit,
}

/// Translates a crossterm key event. Release and repeat kinds only arrive
/// when the terminal supports keyboard enhancement.
pub fn translate(key: &KeyEvent) -> Option<TerminalInput> {
    let pressed = key.kind != KeyEventKind::Release;
    let fresh_press = key.kind == KeyEventKind::Press;

    match key.code {
        KeyCode::Esc if fresh_press => Some(TerminalInput::Quit),
        KeyCode::Char('c') if fresh_press && key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TerminalInput::Quit)
        }
        KeyCode::Left if fresh_press => Some(TerminalInput::OctaveDown),
        KeyCode::Right if fresh_press => Some(TerminalInput::OctaveUp),
        KeyCode::Char(' ') if fresh_press => Some(TerminalInput::ReleaseAll),
        KeyCode::Char(c) => keycode::from_char(c).map(|code| {
            TerminalInput::Key(PhysicalKeyEvent {
                code,
                action: if pressed {
                    KeyAction::Press
                } else {
                    KeyAction::Release
                },
                repeat: key.kind == KeyEventKind::Repeat,
            })
        }),
        _ => None,
    }
}

/// Restores the terminal when dropped, including on early returns.
struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { enhanced: false })
    }

    fn push_release_reporting(&mut self) -> Result<()> {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        self.enhanced = true;
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", err);
        }
    }
}

pub fn run<E: VoiceEngine>(mut keyboard: KeyboardEngine<E>) -> Result<()> {
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    let mut stdout = io::stdout();

    let mut guard = RawModeGuard::enable()?;
    if enhanced {
        guard.push_release_reporting()?;
    } else {
        warn!("Terminal does not report key releases; press space to silence held notes");
    }

    let keys: String = keyboard
        .layout()
        .slots()
        .iter()
        .map(|s| s.display_char.as_str())
        .collect();
    write!(
        stdout,
        "Playing keys [{}]. Left/Right: octave, Space: release all, Esc: quit\r\n",
        keys
    )?;
    stdout.flush()?;

    let result = play(&mut keyboard, event::read);
    drop(guard);
    result
}

/// Runs the event loop, then silences every key however the loop ended.
fn play<E, R>(keyboard: &mut KeyboardEngine<E>, read: R) -> Result<()>
where
    E: VoiceEngine,
    R: FnMut() -> io::Result<Event>,
{
    let result = event_loop(keyboard, read);
    let released = keyboard.release_all();
    if released > 0 {
        info!("Released {} held keys", released);
    }
    result
}

fn event_loop<E, R>(keyboard: &mut KeyboardEngine<E>, mut read: R) -> Result<()>
where
    E: VoiceEngine,
    R: FnMut() -> io::Result<Event>,
{
    loop {
        let Event::Key(key) = read()? else {
            continue;
        };

        match translate(&key) {
            Some(TerminalInput::Key(event)) => {
                keyboard.handle_physical_key(event);
            }
            Some(TerminalInput::OctaveDown) => keyboard.decrease_octave(),
            Some(TerminalInput::OctaveUp) => keyboard.increase_octave(),
            Some(TerminalInput::ReleaseAll) => {
                keyboard.release_all();
            }
            Some(TerminalInput::Quit) => {
                info!("Quitting");
                return Ok(());
            }
            None => {}
        }
    }
}

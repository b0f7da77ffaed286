mod controls;
mod keyboard_view;

use tracing::info;

use crate::audio::Polysynth;
use crate::error::Result;
use crate::events::{KeyAction, PhysicalKeyEvent};
use crate::keyboard::{KeyboardEngine, keycode};
pub use controls::{ControlPanel, ControlValues};
use keyboard_view::{KeyboardView, PointerRouter};

pub struct PolykeysApp {
    keyboard: KeyboardEngine<Polysynth>,
    controls: ControlPanel,
    pointer: PointerRouter,
    octave: i32,
    was_focused: bool,
}

impl PolykeysApp {
    pub fn new(keyboard: KeyboardEngine<Polysynth>, controls: ControlPanel) -> Self {
        Self {
            keyboard,
            controls,
            pointer: PointerRouter::default(),
            octave: 0,
            was_focused: true,
        }
    }

    fn process_key_events(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            let egui::Event::Key {
                key,
                physical_key,
                pressed,
                repeat,
                ..
            } = event
            else {
                continue;
            };

            match physical_key.unwrap_or(key) {
                egui::Key::ArrowLeft => {
                    if pressed && !repeat {
                        self.octave_down();
                    }
                }
                egui::Key::ArrowRight => {
                    if pressed && !repeat {
                        self.octave_up();
                    }
                }
                key => {
                    if let Some(code) = key_code(key) {
                        self.keyboard.handle_physical_key(PhysicalKeyEvent {
                            code,
                            action: if pressed {
                                KeyAction::Press
                            } else {
                                KeyAction::Release
                            },
                            repeat,
                        });
                    }
                }
            }
        }
    }

    fn octave_down(&mut self) {
        self.keyboard.decrease_octave();
        self.octave -= 1;
    }

    fn octave_up(&mut self) {
        self.keyboard.increase_octave();
        self.octave += 1;
    }

    fn release_on_focus_loss(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| i.focused);
        if self.was_focused && !focused {
            self.pointer.clear();
            let released = self.keyboard.release_all();
            if released > 0 {
                info!("Window lost focus, released {} keys", released);
            }
        }
        self.was_focused = focused;
    }

    fn octave_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("◀ Octave").clicked() {
                self.octave_down();
            }
            ui.label(format!("{:+}", self.octave));
            if ui.button("Octave ▶").clicked() {
                self.octave_up();
            }
        });
    }
}

/// Legacy key code of an egui key on a US layout.
fn key_code(key: egui::Key) -> Option<u32> {
    use egui::Key;

    let code = match key {
        Key::A => 65,
        Key::B => 66,
        Key::C => 67,
        Key::D => 68,
        Key::E => 69,
        Key::F => 70,
        Key::G => 71,
        Key::H => 72,
        Key::I => 73,
        Key::J => 74,
        Key::K => 75,
        Key::L => 76,
        Key::M => 77,
        Key::N => 78,
        Key::O => 79,
        Key::P => 80,
        Key::Q => 81,
        Key::R => 82,
        Key::S => 83,
        Key::T => 84,
        Key::U => 85,
        Key::V => 86,
        Key::W => 87,
        Key::X => 88,
        Key::Y => 89,
        Key::Z => 90,
        Key::Num0 => 48,
        Key::Num1 => 49,
        Key::Num2 => 50,
        Key::Num3 => 51,
        Key::Num4 => 52,
        Key::Num5 => 53,
        Key::Num6 => 54,
        Key::Num7 => 55,
        Key::Num8 => 56,
        Key::Num9 => 57,
        Key::Space => keycode::SPACE,
        Key::Semicolon | Key::Colon => keycode::SEMICOLON,
        Key::Equals | Key::Plus => keycode::EQUALS,
        Key::Comma => keycode::COMMA,
        Key::Minus => keycode::MINUS,
        Key::Period => keycode::PERIOD,
        Key::Slash | Key::Questionmark => keycode::SLASH,
        Key::Backtick => keycode::BACKTICK,
        Key::OpenBracket | Key::OpenCurlyBracket => keycode::OPEN_BRACKET,
        Key::Backslash | Key::Pipe => keycode::BACKSLASH,
        Key::CloseBracket | Key::CloseCurlyBracket => keycode::CLOSE_BRACKET,
        Key::Quote => keycode::QUOTE,
        _ => return None,
    };
    Some(code)
}

impl eframe::App for PolykeysApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_key_events(ctx);
        self.release_on_focus_loss(ctx);

        egui::TopBottomPanel::top("octave").show(ctx, |ui| {
            self.octave_controls(ui);
        });

        egui::SidePanel::right("controls")
            .min_width(220.0)
            .show(ctx, |ui| {
                self.controls.show(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Play with the mouse or the a–' row of your keyboard. ←/→ shift octaves.");
            ui.separator();
            KeyboardView::new(&mut self.keyboard, &mut self.pointer).show(ui);
        });
    }
}

pub fn run(keyboard: KeyboardEngine<Polysynth>, controls: ControlPanel) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 420.0])
            .with_title("Polykeys"),
        ..Default::default()
    };

    eframe::run_native(
        "Polykeys",
        options,
        Box::new(|_cc| Ok(Box::new(PolykeysApp::new(keyboard, controls)))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_and_punctuation_keys_have_codes() {
        assert_eq!(key_code(egui::Key::A), Some(65));
        assert_eq!(key_code(egui::Key::Semicolon), Some(186));
        assert_eq!(key_code(egui::Key::Num0), Some(48));
        assert_eq!(key_code(egui::Key::Quote), Some(222));
        assert_eq!(key_code(egui::Key::Minus), Some(189));
    }

    #[test]
    fn every_reference_key_is_reachable() {
        let keys = [
            egui::Key::A,
            egui::Key::W,
            egui::Key::S,
            egui::Key::E,
            egui::Key::D,
            egui::Key::F,
            egui::Key::T,
            egui::Key::G,
            egui::Key::Y,
            egui::Key::H,
            egui::Key::U,
            egui::Key::J,
            egui::Key::K,
            egui::Key::O,
            egui::Key::L,
            egui::Key::P,
            egui::Key::Semicolon,
            egui::Key::Quote,
        ];
        let config = crate::config::KeyboardConfig::default();
        for (key, descriptor) in keys.into_iter().zip(&config.keys) {
            assert_eq!(key_code(key), Some(descriptor.physical_code), "{key:?}");
        }
    }

    #[test]
    fn named_keys_have_no_code() {
        assert_eq!(key_code(egui::Key::Escape), None);
        assert_eq!(key_code(egui::Key::F1), None);
    }
}

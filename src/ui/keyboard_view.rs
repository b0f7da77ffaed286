use crate::events::{KeyAction, PointerEvent};
use crate::keyboard::{KeyColor, KeyboardEngine, VoiceEngine, WHITE_KEY_HEIGHT};

const ACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(235, 0, 141);
const WHITE_COLOR: egui::Color32 = egui::Color32::from_rgb(235, 235, 235);
const BLACK_COLOR: egui::Color32 = egui::Color32::from_rgb(20, 20, 20);
const MARGIN: f32 = 20.0;

/// Turns primary-button presses and releases into pointer events. The slot
/// that took the press keeps it until the button comes up, wherever the
/// pointer ends up.
#[derive(Debug, Default)]
pub struct PointerRouter {
    held: Option<usize>,
}

impl PointerRouter {
    /// `hit` is the slot under the pointer when the button went down this
    /// frame, `released` whether it came up. Events are returned in order.
    pub fn route(&mut self, hit: Option<usize>, released: bool) -> [Option<PointerEvent>; 2] {
        let mut events = [None, None];

        if self.held.is_none() {
            if let Some(slot) = hit {
                self.held = Some(slot);
                events[0] = Some(PointerEvent {
                    slot,
                    action: KeyAction::Press,
                });
            }
        }

        if released {
            if let Some(slot) = self.held.take() {
                events[1] = Some(PointerEvent {
                    slot,
                    action: KeyAction::Release,
                });
            }
        }

        events
    }

    /// Forgets the held slot without emitting a release.
    pub fn clear(&mut self) {
        self.held = None;
    }
}

/// Paints the key layout and feeds pointer input on it through a
/// [`PointerRouter`].
pub struct KeyboardView<'a, E: VoiceEngine> {
    keyboard: &'a mut KeyboardEngine<E>,
    pointer: &'a mut PointerRouter,
}

impl<'a, E: VoiceEngine> KeyboardView<'a, E> {
    pub fn new(keyboard: &'a mut KeyboardEngine<E>, pointer: &'a mut PointerRouter) -> Self {
        Self { keyboard, pointer }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let size = egui::Vec2::new(self.keyboard.layout().width() + MARGIN, WHITE_KEY_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        self.handle_pointer(ui, &response, origin);
        self.draw_keys(&painter, origin);
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, origin: egui::Pos2) {
        let (pressed, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        let hit = if pressed && response.hovered() {
            pos.and_then(|pos| {
                let local = pos - origin;
                self.keyboard.layout().slot_at(local.x, local.y)
            })
        } else {
            None
        };

        for event in self.pointer.route(hit, released).into_iter().flatten() {
            self.keyboard.handle_pointer(event);
        }
    }

    fn draw_keys(&self, painter: &egui::Painter, origin: egui::Pos2) {
        // Black keys overlap their neighbours, so they go last.
        for color in [KeyColor::White, KeyColor::Black] {
            for slot in self.keyboard.layout().slots().iter().filter(|s| s.color == color) {
                let (width, height) = color.size();
                let rect = egui::Rect::from_min_size(
                    origin + egui::Vec2::new(slot.pixel_offset, 0.0),
                    egui::Vec2::new(width, height),
                );

                let (fill, text_color) = match (self.keyboard.is_sounding(slot.index), color) {
                    (true, _) => (ACTIVE_COLOR, egui::Color32::WHITE),
                    (false, KeyColor::White) => (WHITE_COLOR, egui::Color32::BLACK),
                    (false, KeyColor::Black) => (BLACK_COLOR, egui::Color32::WHITE),
                };

                painter.rect_filled(rect, 3.0, fill);
                painter.rect_stroke(
                    rect,
                    3.0,
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(100, 100, 100)),
                    egui::StrokeKind::Inside,
                );
                painter.text(
                    rect.center_bottom() - egui::Vec2::new(0.0, 15.0),
                    egui::Align2::CENTER_CENTER,
                    &slot.display_char,
                    egui::FontId::proportional(16.0),
                    text_color,
                );
            }
        }
    }
}

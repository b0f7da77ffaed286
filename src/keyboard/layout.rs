use std::collections::HashMap;

use crate::audio::key_frequency;
use crate::config::{KeyDescriptor, KeyboardConfig};
use crate::error::{Error, Result};

/// Offset advance for a white key that follows a white key (or starts the row).
pub const WHITE_AFTER_WHITE: f32 = 50.0;
/// Offset advance for a white key that follows a black key.
pub const WHITE_AFTER_BLACK: f32 = 20.0;
/// Offset advance for a black key.
pub const BLACK_STEP: f32 = 30.0;

pub const WHITE_KEY_WIDTH: f32 = 50.0;
pub const WHITE_KEY_HEIGHT: f32 = 200.0;
pub const BLACK_KEY_WIDTH: f32 = 40.0;
pub const BLACK_KEY_HEIGHT: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

impl KeyColor {
    /// Piano key color, where key 4 (C1) is the first C.
    pub fn of(key_number: i32) -> Self {
        match (i64::from(key_number) - 4).rem_euclid(12) {
            1 | 3 | 6 | 8 | 10 => KeyColor::Black,
            _ => KeyColor::White,
        }
    }

    fn advance_after(self, previous: KeyColor) -> f32 {
        match (self, previous) {
            (KeyColor::Black, _) => BLACK_STEP,
            (KeyColor::White, KeyColor::Black) => WHITE_AFTER_BLACK,
            (KeyColor::White, KeyColor::White) => WHITE_AFTER_WHITE,
        }
    }

    pub fn size(self) -> (f32, f32) {
        match self {
            KeyColor::White => (WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT),
            KeyColor::Black => (BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeySlot {
    pub index: usize,
    pub physical_code: u32,
    pub display_char: String,
    pub key_number: i32,
    pub color: KeyColor,
    /// Left edge in pixels.
    pub pixel_offset: f32,
    pub assigned_frequency_hz: f64,
}

impl KeySlot {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (width, height) = self.color.size();
        x >= self.pixel_offset && x < self.pixel_offset + width && (0.0..height).contains(&y)
    }
}

/// Immutable table of key slots, computed once in a single left-to-right pass.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    base_key: i32,
    slots: Vec<KeySlot>,
    by_code: HashMap<u32, usize>,
}

impl KeyLayout {
    pub fn new(descriptors: &[KeyDescriptor], base_key: i32) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(Error::EmptyKeyMap);
        }

        let mut slots = Vec::with_capacity(descriptors.len());
        let mut by_code = HashMap::with_capacity(descriptors.len());
        let mut offset = 0.0;
        let mut last_color = KeyColor::White;

        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_code.insert(descriptor.physical_code, index).is_some() {
                return Err(Error::DuplicatePhysicalCode {
                    code: descriptor.physical_code,
                });
            }

            let key_number = i32::try_from(index)
                .ok()
                .and_then(|step| base_key.checked_add(step))
                .ok_or(Error::KeyNumberOverflow { base_key, index })?;
            let color = KeyColor::of(key_number);
            offset += color.advance_after(last_color);
            last_color = color;

            slots.push(KeySlot {
                index,
                physical_code: descriptor.physical_code,
                display_char: descriptor.display_char.clone(),
                key_number,
                color,
                pixel_offset: offset,
                assigned_frequency_hz: key_frequency(key_number),
            });
        }

        Ok(Self {
            base_key,
            slots,
            by_code,
        })
    }

    pub fn from_config(config: &KeyboardConfig) -> Result<Self> {
        Self::new(&config.keys, config.base_key)
    }

    pub fn base_key(&self) -> i32 {
        self.base_key
    }

    pub fn slots(&self) -> &[KeySlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_by_code(&self, code: u32) -> Option<&KeySlot> {
        self.by_code.get(&code).map(|&index| &self.slots[index])
    }

    /// Right edge of the rightmost key.
    pub fn width(&self) -> f32 {
        self.slots
            .iter()
            .map(|s| s.pixel_offset + s.color.size().0)
            .fold(0.0, f32::max)
    }

    /// Slot under a point relative to the keyboard's top-left corner. Black
    /// keys sit on top of white keys and win.
    pub fn slot_at(&self, x: f32, y: f32) -> Option<usize> {
        let hit = |color: KeyColor| {
            self.slots
                .iter()
                .find(|s| s.color == color && s.contains(x, y))
                .map(|s| s.index)
        };
        hit(KeyColor::Black).or_else(|| hit(KeyColor::White))
    }
}

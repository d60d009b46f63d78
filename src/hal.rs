//! Hardware capabilities the game is driven through.
//!
//! The core never talks to a device directly: the display, the tilt sensor,
//! the buttons and the sleep primitive are owned values implementing these
//! traits, handed in at construction time.

use serde::Deserialize;

use crate::{Coords, HEIGHT};

/// Pixels per grid cell along both axes.
pub const CELL_PX: i16 = 10;
/// Painted size of a cell; the remaining pixel is the grid gap.
pub const CELL_FILL_PX: i16 = 9;
/// The bottom row is cut short to fit the physical panel.
pub const LAST_ROW_FILL_PX: i16 = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Font {
    /// Large bold face used for the title.
    Title,
    Regular,
    /// Tiny face used for the score line.
    Small,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Start,
    Select,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Background,
    Snake,
    Apple,
    Text,
}

/// The four fixed colors, chosen once at startup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Color,
    pub snake: Color,
    pub apple: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Color::rgb(0, 0, 0),
            snake: Color::rgb(0, 200, 0),
            apple: Color::rgb(255, 0, 0),
            text: Color::rgb(255, 255, 255),
        }
    }
}

impl Palette {
    pub fn get(&self, slot: Slot) -> Color {
        match slot {
            Slot::Background => self.background,
            Slot::Snake => self.snake,
            Slot::Apple => self.apple,
            Slot::Text => self.text,
        }
    }
}

pub trait Display {
    fn fill_screen(&mut self, color: Color);
    fn fill_rectangle(&mut self, x: i16, y: i16, width: i16, height: i16, color: Color);
    fn write_text(&mut self, font: Font, x: i16, y: i16, text: &[u8], color: Color);
}

pub trait MotionSensor {
    /// Raw acceleration on (x, y, z), in sensor units.
    fn read_raw_acceleration(&mut self) -> (i16, i16, i16);
}

pub trait Buttons {
    /// Latch the state of every button.
    fn read_inputs(&mut self);
    /// State of `button` as of the last `read_inputs`.
    fn is_pressed(&self, button: Button) -> bool;
}

pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Paint one grid cell.
pub fn paint_cell<D: Display>(display: &mut D, (x, y): Coords, color: Color) {
    let height = if y == HEIGHT - 1 { LAST_ROW_FILL_PX } else { CELL_FILL_PX };
    display.fill_rectangle(CELL_PX * x, CELL_PX * y, CELL_FILL_PX, height, color);
}

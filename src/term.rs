//! Terminal stand-ins for the handheld's hardware.
//!
//! The panel is drawn with two terminal columns per grid cell inside a
//! border. Arrow keys (or WASD) tilt the board, Enter/Space is START and
//! Esc/Backspace is SELECT. Ctrl+C restores the terminal and exits.

use std::{
    cell::RefCell,
    io::{stdout, Stdout, Write},
    process::exit,
    rc::Rc,
    thread::sleep,
    time::Duration,
};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{self, Attribute};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use log::{info, warn};

use crate::hal::{Button, Buttons, Color, Delay, Display, Font, MotionSensor, CELL_PX};
use crate::snake::Direction::{self, *};
use crate::{HEIGHT, WIDTH};

const COLS_PER_CELL: u16 = 2;
const CELL_CHARS: &str = "██";
/// Raw reading reported for a pressed arrow key; 8 once scaled by 500.
const TILT_RAW: i16 = 4000;

pub struct TermDisplay {
    stdout: Stdout,
    origin: (u16, u16),
}

impl TermDisplay {
    pub fn new() -> Self {
        TermDisplay { stdout: stdout(), origin: (1, 1) }
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    fn board_size(&self) -> (u16, u16) {
        (WIDTH as u16 * COLS_PER_CELL, HEIGHT as u16)
    }

    fn draw_borders(&mut self) -> crossterm::Result<()> {
        let (width, height) = self.board_size();
        let (width, height) = (width + 2, height + 2);
        let (left, top) = (self.origin.0 - 1, self.origin.1 - 1);

        queue!(self.stdout, style::ResetColor)?;
        for x in 0..width {
            let ch = if x == 0 || x == width - 1 { '+' } else { '-' };
            queue!(self.stdout, cursor::MoveTo(left + x, top), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(left + x, top + height - 1), style::Print(ch))?;
        }

        for y in 1..height - 1 {
            queue!(self.stdout, cursor::MoveTo(left, top + y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(left + width - 1, top + y), style::Print('|'))?;
        }

        Ok(())
    }

    fn try_fill_screen(&mut self, color: Color) -> crossterm::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.draw_borders()?;

        let (width, height) = self.board_size();
        let blank = " ".repeat(width as usize);
        queue!(self.stdout, style::SetBackgroundColor(term_color(color)))?;
        for row in 0..height {
            let (col, row) = screen_pos(self.origin, 0, row);
            queue!(self.stdout, cursor::MoveTo(col, row), style::Print(&blank))?;
        }
        queue!(self.stdout, style::ResetColor)?;

        self.stdout.flush()?;
        Ok(())
    }

    fn try_fill_rectangle(
        &mut self,
        x: i16,
        y: i16,
        width: i16,
        height: i16,
        color: Color,
    ) -> crossterm::Result<()> {
        if width <= 0 || height <= 0 {
            return Ok(());
        }

        let cols = clamp_cell(x, WIDTH)..=clamp_cell(x + width - 1, WIDTH);
        let rows = clamp_cell(y, HEIGHT)..=clamp_cell(y + height - 1, HEIGHT);

        queue!(self.stdout, style::SetForegroundColor(term_color(color)))?;
        for row in rows {
            for col in cols.clone() {
                let pos = screen_pos(self.origin, col * COLS_PER_CELL, row);
                queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(CELL_CHARS))?;
            }
        }
        queue!(self.stdout, style::ResetColor)?;

        self.stdout.flush()?;
        Ok(())
    }

    fn try_write_text(
        &mut self,
        font: Font,
        x: i16,
        y: i16,
        text: &[u8],
        color: Color,
    ) -> crossterm::Result<()> {
        let col = clamp_cell(x, WIDTH) * COLS_PER_CELL;
        let pos = screen_pos(self.origin, col, clamp_cell(y, HEIGHT));
        let line = String::from_utf8_lossy(text);

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(term_color(color))
        )?;
        if font == Font::Title {
            queue!(self.stdout, style::SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.stdout,
            style::Print(line),
            style::SetAttribute(Attribute::Reset),
            style::ResetColor
        )?;

        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TermDisplay {
    fn default() -> Self {
        TermDisplay::new()
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            warn!("Error restoring terminal: {}", e);
        }
    }
}

impl Display for TermDisplay {
    fn fill_screen(&mut self, color: Color) {
        report(self.try_fill_screen(color));
    }

    fn fill_rectangle(&mut self, x: i16, y: i16, width: i16, height: i16, color: Color) {
        report(self.try_fill_rectangle(x, y, width, height, color));
    }

    fn write_text(&mut self, font: Font, x: i16, y: i16, text: &[u8], color: Color) {
        report(self.try_write_text(font, x, y, text, color));
    }
}

/// Leave raw mode and the alternate screen.
pub fn restore() -> crossterm::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(stdout(), cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
}

#[derive(Default)]
struct KeyState {
    tilt: Option<Direction>,
    start: bool,
    select: bool,
}

impl KeyState {
    /// Drain every pending key event.
    fn pump(&mut self) {
        loop {
            match poll(Duration::from_millis(0)) {
                Ok(true) => {}
                Ok(false) => return,
                Err(e) => {
                    warn!("Error polling keyboard: {}", e);
                    return;
                }
            }

            match read() {
                Ok(Event::Key(ev)) => self.handle(ev),
                Ok(_) => {}
                Err(e) => {
                    warn!("Error reading keyboard: {}", e);
                    return;
                }
            }
        }
    }

    fn handle(&mut self, ev: KeyEvent) {
        if is_ctrl_c(&ev) {
            clean_exit();
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => self.tilt = Some(Up),
            KeyCode::Char('a') | KeyCode::Left => self.tilt = Some(Left),
            KeyCode::Char('s') | KeyCode::Down => self.tilt = Some(Down),
            KeyCode::Char('d') | KeyCode::Right => self.tilt = Some(Right),
            KeyCode::Enter | KeyCode::Char(' ') => self.start = true,
            KeyCode::Esc | KeyCode::Backspace => self.select = true,
            _ => {}
        }
    }
}

/// The keyboard, shared by the tilt and button handles it hands out.
#[derive(Clone, Default)]
pub struct Keypad {
    state: Rc<RefCell<KeyState>>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    pub fn tilt(&self) -> KeyTilt {
        KeyTilt { state: Rc::clone(&self.state) }
    }

    pub fn buttons(&self) -> KeyButtons {
        KeyButtons { state: Rc::clone(&self.state), start: false, select: false }
    }
}

/// Each arrow key press tilts the board once, for the next reading.
pub struct KeyTilt {
    state: Rc<RefCell<KeyState>>,
}

impl MotionSensor for KeyTilt {
    fn read_raw_acceleration(&mut self) -> (i16, i16, i16) {
        let mut state = self.state.borrow_mut();
        state.pump();

        match state.tilt.take() {
            Some(Left) => (-TILT_RAW, 0, 0),
            Some(Right) => (TILT_RAW, 0, 0),
            Some(Up) => (0, -TILT_RAW, 0),
            Some(Down) => (0, TILT_RAW, 0),
            None => (0, 0, 0),
        }
    }
}

/// A button reads as pressed if it was hit since the previous sample.
pub struct KeyButtons {
    state: Rc<RefCell<KeyState>>,
    start: bool,
    select: bool,
}

impl Buttons for KeyButtons {
    fn read_inputs(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pump();

        self.start = std::mem::take(&mut state.start);
        self.select = std::mem::take(&mut state.select);
    }

    fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Start => self.start,
            Button::Select => self.select,
        }
    }
}

pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        sleep(Duration::from_millis(ms as u64));
    }
}

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb { r: color.r, g: color.g, b: color.b }
}

/// Board-relative column and row to an absolute terminal position.
fn screen_pos(origin: (u16, u16), col: u16, row: u16) -> (u16, u16) {
    (origin.0 + col, origin.1 + row)
}

/// Pixel coordinate to the grid cell containing it, kept on the board.
fn clamp_cell(px: i16, extent: i16) -> u16 {
    (px / CELL_PX).clamp(0, extent - 1) as u16
}

fn report(res: crossterm::Result<()>) {
    if let Err(e) = res {
        warn!("Error drawing to terminal: {}", e);
    }
}

fn clean_exit() -> ! {
    info!("Ctrl+C, exiting");
    if let Err(e) = restore() {
        warn!("Error restoring terminal: {}", e);
    }
    exit(0);
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

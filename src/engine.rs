//! Grid simulation: the snake, the apple, and the incremental drawing that
//! keeps the display in sync with them.

use log::{debug, info};
use rand::Rng;

use crate::hal::{paint_cell, Display, Palette, Slot};
use crate::snake::{step, Direction, Snake};
use crate::{Coords, HEIGHT, WIDTH};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub moved: bool,
    pub ate_apple: bool,
    pub collided: bool,
    /// The snake covers every cell, so no apple could be placed.
    pub board_full: bool,
}

pub struct SnakeEngine<D, R> {
    display: D,
    rng: R,
    palette: Palette,
    snake: Snake,
    apple: Option<Coords>,
}

impl<D: Display, R: Rng> SnakeEngine<D, R> {
    pub fn new(display: D, rng: R, palette: Palette) -> Self {
        SnakeEngine { display, rng, palette, snake: Snake::new(), apple: None }
    }

    /// Put the snake back in its starting shape. Nothing is drawn.
    pub fn reset(&mut self) {
        self.snake = Snake::new();
        self.apple = None;
        debug!("snake reset to {:?}", self.snake.body());
    }

    /// Replace the snake wholesale. Nothing is drawn.
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Put the apple on `pos` and paint it.
    pub fn put_apple(&mut self, pos: Coords) {
        self.apple = Some(pos);
        self.paint(pos, Slot::Apple);
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apple(&self) -> Option<Coords> {
        self.apple
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Segments gained since the start of the run.
    pub fn score(&self) -> usize {
        self.snake.len().saturating_sub(Snake::INITIAL_LENGTH)
    }

    pub fn draw_snake(&mut self) {
        for i in 0..self.snake.len() {
            let pos = self.snake.body()[i];
            self.paint(pos, Slot::Snake);
        }
    }

    /// Drop the apple on a random free cell and paint it. Returns `None`
    /// only when the snake fills the whole board.
    pub fn place_apple(&mut self) -> Option<Coords> {
        if self.snake.is_full() {
            self.apple = None;
            return None;
        }

        let mut apple = self.random_cell();
        while self.snake.occupies(apple) {
            apple = self.random_cell();
        }

        debug!("apple placed at {:?}", apple);
        self.put_apple(apple);
        Some(apple)
    }

    /// Move the snake one cell in `direction`.
    ///
    /// The target is tested against the whole body as it stands before the
    /// move, tail included, so stepping onto the tail cell is a collision.
    /// A collision leaves the body and the display untouched.
    pub fn advance(&mut self, direction: Direction) -> StepOutcome {
        self.snake.set_direction(direction);
        let new_head = step(self.snake.head(), direction);

        if self.snake.occupies(new_head) {
            info!("collision at {:?}, length {}", new_head, self.snake.len());
            return StepOutcome { collided: true, ..StepOutcome::default() };
        }

        self.paint(new_head, Slot::Snake);

        let ate_apple = self.apple == Some(new_head);
        let mut board_full = false;

        if ate_apple {
            self.snake.shift(new_head, true);
            debug!("apple eaten, length {}", self.snake.len());
            board_full = self.place_apple().is_none();
        } else {
            let tail = self.snake.tail();
            self.paint(tail, Slot::Background);
            self.snake.shift(new_head, false);
        }

        StepOutcome { moved: true, ate_apple, collided: false, board_full }
    }

    fn random_cell(&mut self) -> Coords {
        (self.rng.gen_range(0..WIDTH), self.rng.gen_range(0..HEIGHT))
    }

    fn paint(&mut self, pos: Coords, slot: Slot) {
        let color = self.palette.get(slot);
        paint_cell(&mut self.display, pos, color);
    }
}

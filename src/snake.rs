use crate::{Coords, GridInt, CAPACITY, HEIGHT, WIDTH};
use Direction::*;

/// Ordinals pair up so that `opposite == 3 - ordinal`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Up = 1,
    Down = 2,
    Right = 3,
}

impl Direction {
    pub fn from_ordinal(ordinal: u8) -> Option<Direction> {
        match ordinal {
            0 => Some(Left),
            1 => Some(Up),
            2 => Some(Down),
            3 => Some(Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match Direction::from_ordinal(3 - self as u8) {
            Some(dir) => dir,
            None => unreachable!("direction ordinals are 0..=3"),
        }
    }

    fn delta(self) -> (GridInt, GridInt) {
        match self {
            Left => (-1, 0),
            Up => (0, -1),
            Down => (0, 1),
            Right => (1, 0),
        }
    }
}

/// Shift `pos` one cell in `dir`, re-entering from the far edge when leaving
/// the board.
pub fn step(pos: Coords, dir: Direction) -> Coords {
    let (dx, dy) = dir.delta();
    (wrap(pos.0 + dx, WIDTH), wrap(pos.1 + dy, HEIGHT))
}

pub fn on_board((x, y): Coords) -> bool {
    (0..WIDTH).contains(&x) && (0..HEIGHT).contains(&y)
}

fn wrap(v: GridInt, extent: GridInt) -> GridInt {
    if v >= extent {
        0
    } else if v < 0 {
        extent - 1
    } else {
        v
    }
}

/// Fixed-capacity body, head at index 0.
#[derive(Clone, Debug)]
pub struct Snake {
    body: [Coords; CAPACITY],
    length: usize,
    direction: Direction,
}

impl Snake {
    pub const INITIAL_LENGTH: usize = 4;

    /// The canonical starting shape: a vertical bar in the top-left corner,
    /// head lowest, heading right.
    pub fn new() -> Self {
        Snake::from_cells(&[(0, 3), (0, 2), (0, 1), (0, 0)], Right)
    }

    /// Build a snake from explicit cells, head first. Cells must be on the
    /// board and distinct.
    pub fn from_cells(cells: &[Coords], direction: Direction) -> Self {
        assert!(!cells.is_empty() && cells.len() <= CAPACITY, "snake length out of range");
        debug_assert!(cells.iter().all(|c| on_board(*c)), "snake cell off the board");
        debug_assert!(
            cells.iter().enumerate().all(|(i, c)| !cells[..i].contains(c)),
            "snake cells overlap"
        );

        let mut body = [(0, 0); CAPACITY];
        body[..cells.len()].copy_from_slice(cells);
        Snake { body, length: cells.len(), direction }
    }

    pub fn body(&self) -> &[Coords] {
        &self.body[..self.length]
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn is_full(&self) -> bool {
        self.length == CAPACITY
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.length - 1]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.body().contains(&pos)
    }

    /// Move every segment one slot toward the tail and put `new_head` in
    /// front. With `grow` the old tail stays as the new last segment.
    pub fn shift(&mut self, new_head: Coords, grow: bool) {
        if grow {
            assert!(self.length < CAPACITY, "snake outgrew the board");
            self.length += 1;
        }

        self.body.copy_within(0..self.length - 1, 1);
        self.body[0] = new_head;
    }
}

impl Default for Snake {
    fn default() -> Self {
        Snake::new()
    }
}

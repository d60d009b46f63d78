pub mod config;
pub mod engine;
pub mod game;
pub mod hal;
pub mod snake;
pub mod term;

pub type GridInt = i16;
pub type Coords = (GridInt, GridInt);

/// Logical board width, in cells.
pub const WIDTH: GridInt = 16;
/// Logical board height, in cells.
pub const HEIGHT: GridInt = 13;
/// One body slot per board cell.
pub const CAPACITY: usize = (WIDTH as usize) * (HEIGHT as usize);

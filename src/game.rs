use log::{debug, info, trace};
use rand::Rng;

use crate::config::GameConfig;
use crate::engine::SnakeEngine;
use crate::hal::{Button, Buttons, Delay, Display, Font, MotionSensor, Slot};
use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    BeginPlay,
    Play,
    GameOver,
    /// Ends `run`. No state hands over to it yet.
    Quit,
}

/// Turn a scaled tilt reading into a heading.
///
/// The horizontal axis is looked at first and the vertical one second, each
/// refusing to turn the snake straight back on itself. Since the vertical
/// check sees the heading the horizontal one may have just set, a tilt past
/// the threshold on both axes ends up vertical.
pub fn steer(current: Direction, x: i16, y: i16, threshold: i16) -> Direction {
    let threshold = threshold.max(0);
    let mut dir = current;

    if x < -threshold {
        dir = turn(dir, Left);
    } else if x > threshold {
        dir = turn(dir, Right);
    }

    if y < -threshold {
        dir = turn(dir, Up);
    } else if y > threshold {
        dir = turn(dir, Down);
    }

    dir
}

fn turn(current: Direction, wanted: Direction) -> Direction {
    if wanted.opposite() == current {
        current
    } else {
        wanted
    }
}

/// Three zero-padded digits; anything past 999 shows as 999.
pub fn score_digits(score: usize) -> String {
    format!("{:03}", score.min(999))
}

pub struct GameStateMachine<D, R, M, B, T> {
    engine: SnakeEngine<D, R>,
    motion: M,
    buttons: B,
    delay: T,
    config: GameConfig,
    status: GameStatus,
    won: bool,
}

impl<D, R, M, B, T> GameStateMachine<D, R, M, B, T>
where
    D: Display,
    R: Rng,
    M: MotionSensor,
    B: Buttons,
    T: Delay,
{
    pub fn new(display: D, rng: R, motion: M, buttons: B, delay: T, config: GameConfig) -> Self {
        let config = config.sanitized();
        let engine = SnakeEngine::new(display, rng, config.palette);
        GameStateMachine {
            engine,
            motion,
            buttons,
            delay,
            config,
            status: GameStatus::Start,
            won: false,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn engine(&self) -> &SnakeEngine<D, R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SnakeEngine<D, R> {
        &mut self.engine
    }

    /// Whether the last run ended with the snake covering the board.
    pub fn won(&self) -> bool {
        self.won
    }

    pub fn run(&mut self) {
        let background = self.engine.palette().get(Slot::Background);
        self.engine.display_mut().fill_screen(background);

        while self.status != GameStatus::Quit {
            self.step_state();
        }
    }

    /// Run the handler of the current state until it hands over, and return
    /// the state it handed over to.
    pub fn step_state(&mut self) -> GameStatus {
        let next = match self.status {
            GameStatus::Start => self.state_start(),
            GameStatus::BeginPlay => self.state_begin_play(),
            GameStatus::Play => self.state_play(),
            GameStatus::GameOver => self.state_game_over(),
            GameStatus::Quit => GameStatus::Quit,
        };

        info!("{:?} -> {:?}", self.status, next);
        self.status = next;
        next
    }

    /// One Play tick without the trailing sleep.
    pub fn play_tick(&mut self) -> GameStatus {
        let (raw_x, raw_y, _) = self.motion.read_raw_acceleration();
        let x = raw_x / self.config.tilt_scale;
        let y = raw_y / self.config.tilt_scale;
        let direction = steer(self.engine.direction(), x, y, self.config.tilt_threshold);
        trace!("tilt ({}, {}) -> {:?}", x, y, direction);

        self.buttons.read_inputs();
        if self.buttons.is_pressed(Button::Select) {
            info!("run abandoned at score {}", self.engine.score());
            return GameStatus::Start;
        }

        let outcome = self.engine.advance(direction);
        if outcome.collided {
            return GameStatus::GameOver;
        }
        if outcome.board_full {
            self.won = true;
            return GameStatus::GameOver;
        }

        GameStatus::Play
    }

    fn state_start(&mut self) -> GameStatus {
        self.clear();
        self.write(Font::Title, 0, 50, b"SNAKE");
        self.write(Font::Regular, 8, 100, b"Press START");

        self.delay.delay_ms(self.config.transition_pause_ms);
        self.wait_for_start();
        GameStatus::BeginPlay
    }

    fn state_begin_play(&mut self) -> GameStatus {
        self.clear();
        self.won = false;
        self.engine.reset();
        self.engine.draw_snake();
        self.engine.place_apple();

        self.delay.delay_ms(self.config.transition_pause_ms);
        GameStatus::Play
    }

    fn state_play(&mut self) -> GameStatus {
        loop {
            let next = self.play_tick();
            self.delay.delay_ms(self.config.tick_ms);

            if next != GameStatus::Play {
                return next;
            }
        }
    }

    fn state_game_over(&mut self) -> GameStatus {
        let score = self.engine.score();
        info!("game over, score {}{}", score, if self.won { " (board cleared)" } else { "" });

        self.clear();
        let headline: &[u8] = if self.won { b"YOU WIN" } else { b"GAME OVER" };
        self.write(Font::Regular, 8, 50, headline);
        self.write(Font::Regular, 8, 100, b"Press START");
        let line = format!("SCORE: {}", score_digits(score));
        self.write(Font::Small, 50, 120, line.as_bytes());

        self.delay.delay_ms(self.config.transition_pause_ms);
        self.wait_for_start();
        GameStatus::BeginPlay
    }

    fn wait_for_start(&mut self) {
        loop {
            self.buttons.read_inputs();
            if self.buttons.is_pressed(Button::Start) {
                debug!("start pressed");
                return;
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    fn clear(&mut self) {
        let background = self.engine.palette().get(Slot::Background);
        self.engine.display_mut().fill_screen(background);
    }

    fn write(&mut self, font: Font, x: i16, y: i16, text: &[u8]) {
        let color = self.engine.palette().get(Slot::Text);
        self.engine.display_mut().write_text(font, x, y, text, color);
    }
}

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use accelesnake::config::GameConfig;
use accelesnake::game::{GameStateMachine, GameStatus};
use accelesnake::hal::{Button, Buttons, Color, Delay, Display, Font, MotionSensor, Palette};
use accelesnake::snake::{Direction, Snake};
use accelesnake::{Coords, HEIGHT, WIDTH};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq)]
enum Cmd {
    Screen(Color),
    Rect(i16, i16, i16, i16, Color),
    Text(Font, i16, i16, String, Color),
}

#[derive(Default)]
struct RecordingDisplay {
    cmds: Vec<Cmd>,
}

impl RecordingDisplay {
    fn texts(&self) -> Vec<String> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Text(_, _, _, s, _) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Display for RecordingDisplay {
    fn fill_screen(&mut self, color: Color) {
        self.cmds.push(Cmd::Screen(color));
    }

    fn fill_rectangle(&mut self, x: i16, y: i16, width: i16, height: i16, color: Color) {
        self.cmds.push(Cmd::Rect(x, y, width, height, color));
    }

    fn write_text(&mut self, font: Font, x: i16, y: i16, text: &[u8], color: Color) {
        self.cmds.push(Cmd::Text(font, x, y, String::from_utf8_lossy(text).into_owned(), color));
    }
}

/// Replays readings, then reports a level board.
#[derive(Default)]
struct ScriptedTilt(VecDeque<(i16, i16, i16)>);

impl MotionSensor for ScriptedTilt {
    fn read_raw_acceleration(&mut self) -> (i16, i16, i16) {
        self.0.pop_front().unwrap_or((0, 0, 0))
    }
}

/// One entry per `read_inputs`; nothing pressed once the script runs out.
#[derive(Default)]
struct ScriptedButtons {
    script: VecDeque<Option<Button>>,
    current: Option<Button>,
}

impl Buttons for ScriptedButtons {
    fn read_inputs(&mut self) {
        self.current = self.script.pop_front().flatten();
    }

    fn is_pressed(&self, button: Button) -> bool {
        self.current == Some(button)
    }
}

#[derive(Clone, Default)]
struct RecordingDelay(Rc<RefCell<Vec<u32>>>);

impl Delay for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
    }
}

type Machine =
    GameStateMachine<RecordingDisplay, StdRng, ScriptedTilt, ScriptedButtons, RecordingDelay>;

fn machine(
    tilts: &[(i16, i16, i16)],
    presses: &[Option<Button>],
) -> (Machine, Rc<RefCell<Vec<u32>>>) {
    let delay = RecordingDelay::default();
    let log = Rc::clone(&delay.0);
    let buttons = ScriptedButtons { script: presses.iter().copied().collect(), current: None };

    let machine = GameStateMachine::new(
        RecordingDisplay::default(),
        StdRng::seed_from_u64(7),
        ScriptedTilt(tilts.iter().copied().collect()),
        buttons,
        delay,
        GameConfig::default(),
    );
    (machine, log)
}

/// Drive a fresh machine from the title screen into Play.
fn into_play(machine: &mut Machine) {
    assert_eq!(machine.step_state(), GameStatus::BeginPlay);
    assert_eq!(machine.step_state(), GameStatus::Play);
}

fn all_cells() -> Vec<Coords> {
    (0..HEIGHT).flat_map(|y| (0..WIDTH).map(move |x| (x, y))).collect()
}

#[test]
fn title_screen_polls_until_start() {
    let (mut machine, delays) = machine(&[], &[None, None, Some(Button::Start)]);

    assert_eq!(machine.step_state(), GameStatus::BeginPlay);
    assert_eq!(machine.status(), GameStatus::BeginPlay);
    assert_eq!(*delays.borrow(), vec![2000, 10, 10]);

    let display = machine.engine().display();
    assert_eq!(display.texts(), vec!["SNAKE", "Press START"]);
    assert!(matches!(display.cmds[1], Cmd::Text(Font::Title, 0, 50, _, _)));
}

#[test]
fn begin_play_draws_start_shape_and_apple() {
    let (mut machine, delays) = machine(&[], &[Some(Button::Start)]);
    into_play(&mut machine);

    let engine = machine.engine();
    assert_eq!(engine.snake().body(), &[(0, 3), (0, 2), (0, 1), (0, 0)]);
    assert_eq!(engine.direction(), Direction::Right);
    assert_eq!(delays.borrow().last(), Some(&2000));

    let apple = engine.apple().unwrap();
    assert!(!engine.snake().occupies(apple));

    let palette = Palette::default();
    let rects: Vec<&Cmd> =
        engine.display().cmds.iter().filter(|c| matches!(c, Cmd::Rect(..))).collect();
    assert_eq!(rects.len(), 5);
    assert_eq!(*rects[0], Cmd::Rect(0, 30, 9, 9, palette.snake));
    assert_eq!(*rects[3], Cmd::Rect(0, 0, 9, 9, palette.snake));
    let apple_height = if apple.1 == 12 { 8 } else { 9 };
    assert_eq!(*rects[4], Cmd::Rect(apple.0 * 10, apple.1 * 10, 9, apple_height, palette.apple));
}

#[test]
fn first_tick_moves_right_and_erases_tail() {
    let (mut machine, _) = machine(&[], &[Some(Button::Start)]);
    into_play(&mut machine);
    machine.engine_mut().put_apple((10, 10));

    assert_eq!(machine.play_tick(), GameStatus::Play);

    let engine = machine.engine();
    assert_eq!(engine.snake().body(), &[(1, 3), (0, 3), (0, 2), (0, 1)]);
    assert_eq!(engine.snake().len(), 4);

    let palette = Palette::default();
    let cmds = &engine.display().cmds;
    assert_eq!(
        cmds[cmds.len() - 2..],
        [Cmd::Rect(10, 30, 9, 9, palette.snake), Cmd::Rect(0, 0, 9, 9, palette.background)]
    );
}

#[test]
fn tilt_back_against_heading_is_ignored() {
    let (mut machine, _) = machine(&[(-4000, 0, 0)], &[Some(Button::Start)]);
    into_play(&mut machine);
    machine.engine_mut().put_apple((10, 10));

    machine.play_tick();
    assert_eq!(machine.engine().direction(), Direction::Right);
    assert_eq!(machine.engine().snake().head(), (1, 3));
}

#[test]
fn tilt_turns_the_snake() {
    let (mut machine, _) = machine(&[(0, 4000, 0)], &[Some(Button::Start)]);
    into_play(&mut machine);
    machine.engine_mut().put_apple((10, 10));

    machine.play_tick();
    assert_eq!(machine.engine().direction(), Direction::Down);
    assert_eq!(machine.engine().snake().head(), (0, 4));
}

#[test]
fn weak_tilt_does_not_steer() {
    // -3000 / 500 == -6, which is not past the threshold
    let (mut machine, _) = machine(&[(0, -3000, 0)], &[Some(Button::Start)]);
    into_play(&mut machine);
    machine.engine_mut().put_apple((10, 10));

    machine.play_tick();
    assert_eq!(machine.engine().direction(), Direction::Right);
}

#[test]
fn select_abandons_the_run() {
    let (mut machine, delays) = machine(&[], &[Some(Button::Start), Some(Button::Select)]);
    into_play(&mut machine);
    let before = machine.engine().snake().body().to_vec();

    assert_eq!(machine.step_state(), GameStatus::Start);
    assert_eq!(machine.engine().snake().body(), &before[..]);
    assert_eq!(delays.borrow().last(), Some(&150));
}

#[test]
fn collision_ends_in_game_over_with_score() {
    let presses = [Some(Button::Start), None, Some(Button::Start)];
    let (mut machine, delays) = machine(&[(-4000, 0, 0)], &presses);
    into_play(&mut machine);
    let cells = [(2, 2), (2, 3), (1, 3), (1, 2), (1, 1), (1, 0), (0, 0)];
    machine.engine_mut().set_snake(Snake::from_cells(&cells, Direction::Up));
    let before = machine.engine().snake().body().to_vec();

    assert_eq!(machine.step_state(), GameStatus::GameOver);
    assert_eq!(machine.engine().snake().body(), &before[..]);
    assert_eq!(machine.engine().score(), 3);

    assert_eq!(machine.step_state(), GameStatus::BeginPlay);
    assert!(!machine.won());

    let texts = machine.engine().display().texts();
    assert_eq!(texts[texts.len() - 3..], ["GAME OVER", "Press START", "SCORE: 003"]);
    assert_eq!(delays.borrow()[delays.borrow().len() - 2..], [150, 2000]);
}

#[test]
fn eating_grows_over_several_ticks() {
    let (mut machine, _) = machine(&[], &[Some(Button::Start)]);
    into_play(&mut machine);

    for x in 1..=3 {
        machine.engine_mut().put_apple((x, 3));
        assert_eq!(machine.play_tick(), GameStatus::Play);
    }

    let engine = machine.engine();
    assert_eq!(engine.snake().len(), 7);
    assert_eq!(engine.score(), 3);
    assert_eq!(engine.snake().head(), (3, 3));
    assert_eq!(engine.snake().tail(), (0, 0));
}

#[test]
fn filling_the_board_is_a_win() {
    let (mut machine, _) = machine(&[], &[Some(Button::Start), None, Some(Button::Start)]);
    into_play(&mut machine);

    let mut cells = all_cells();
    cells.retain(|c| *c != (1, 0));
    machine.engine_mut().set_snake(Snake::from_cells(&cells, Direction::Right));
    machine.engine_mut().put_apple((1, 0));

    assert_eq!(machine.step_state(), GameStatus::GameOver);
    assert!(machine.won());
    assert_eq!(machine.engine().apple(), None);

    assert_eq!(machine.step_state(), GameStatus::BeginPlay);
    let texts = machine.engine().display().texts();
    assert_eq!(texts[texts.len() - 3..], ["YOU WIN", "Press START", "SCORE: 204"]);

    assert_eq!(machine.step_state(), GameStatus::Play);
    assert!(!machine.won());
    assert_eq!(machine.engine().snake().len(), 4);
}

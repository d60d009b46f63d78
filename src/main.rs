mod logger;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;

use accelesnake::config::GameConfig;
use accelesnake::game::GameStateMachine;
use accelesnake::term::{Keypad, TermDisplay, ThreadDelay};

fn main() -> anyhow::Result<()> {
    let log_file = logger::init()?;
    log::info!("Logging to {}", log_file.display());

    let config = GameConfig::load();

    let mut display = TermDisplay::new();
    display.setup().context("Failed to set up terminal")?;

    let keypad = Keypad::new();
    let mut game = GameStateMachine::new(
        display,
        StdRng::from_entropy(),
        keypad.tilt(),
        keypad.buttons(),
        ThreadDelay,
        config,
    );

    // Only returns on Quit; Ctrl+C exits from inside the keyboard driver
    game.run();
    Ok(())
}

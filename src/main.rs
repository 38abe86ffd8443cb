//! Terminal FlappyBox.
//!
//! Logging is off by default. With `RUST_LOG` set (for example `RUST_LOG=debug`),
//! records go to `flappybox.log` in the working directory, never to the screen.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use crossterm::terminal;
    use flappybox::config::TICK;
    use flappybox::{CliRenderer, Game, Input, Renderer, TapOutcome};
    use std::thread;

    flappybox::logging::init()?;

    let (cols, rows) = terminal::size()?;
    let mut renderer = CliRenderer::new(cols.max(20), rows.max(10));
    let (width, height) = renderer.screen_size();
    log::info!("Starting on a {}x{} terminal ({}x{} px)", cols, rows, width, height);

    let mut game = Game::new(width, height);

    renderer.init()?;

    'running: loop {
        // Input is drained in the same iteration as the tick, so the loop is the only writer
        while let Some(input) = renderer.poll_input()? {
            let outcome = match input {
                Input::Tap { x, y } => game.tap(x, y),
                Input::Flap => game.flap(),
                Input::Quit => TapOutcome::Quit,
            };
            if outcome == TapOutcome::Quit {
                break 'running;
            }
        }

        let events = game.tick();
        if events.scored > 0 {
            log::debug!("Score is now {}", game.score);
        }

        renderer.render(&game)?;

        // Fixed pause, not a frame-locked scheduler
        thread::sleep(TICK);
    }

    renderer.cleanup()?;
    log::info!("Exited with score {}", game.score);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

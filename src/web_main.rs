use crate::config::TICK;
use crate::{Game, Input, Renderer, TapOutcome, WebRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn io_to_js(e: std::io::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
    last_tick: f64,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let mut renderer = WebRenderer::new("gameCanvas")?;
        renderer.init().map_err(io_to_js)?;

        let (width, height) = renderer.screen_size();
        log::info!("Canvas is {}x{} px", width, height);
        let game = Game::new(width, height);

        let window = web_sys::window().ok_or("no window")?;
        let performance = window.performance().ok_or("no performance")?;
        let last_tick = performance.now();

        Ok(Self {
            game,
            renderer,
            last_tick,
        })
    }

    fn update_frame(&mut self, current_time: f64) -> Result<(), JsValue> {
        // rAF runs faster than the tick on high refresh displays
        if current_time - self.last_tick < TICK.as_millis() as f64 {
            return Ok(());
        }
        self.last_tick = current_time;

        while let Some(input) = self.renderer.poll_input().map_err(io_to_js)? {
            let outcome = match input {
                Input::Tap { x, y } => self.game.tap(x, y),
                Input::Flap => self.game.flap(),
                Input::Quit => TapOutcome::Quit,
            };
            match outcome {
                TapOutcome::Jumped => self.renderer.vibrate(),
                // A page cannot close itself, so quitting is only logged
                TapOutcome::Quit => log::info!("Quit requested"),
                _ => {}
            }
        }

        self.game.tick();

        self.renderer.render(&self.game).map_err(io_to_js)?;

        Ok(())
    }
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

    log::info!("Starting FlappyBox");

    let game_loop = match GameLoop::new() {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            log::error!("Failed to create game loop: {:?}", e);
            return Err(e);
        }
    };

    let window = web_sys::window().ok_or("no window")?;
    let performance = window.performance().ok_or("no performance")?;

    // Closure reschedules itself each frame
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let current_time = performance.now();

        if let Err(e) = game_loop.borrow_mut().update_frame(current_time) {
            log::error!("Frame failed: {:?}", e);
            return; // Stop loop on error
        }

        let scheduled = web_sys::window().and_then(|window| {
            let callback = f.borrow();
            let callback = callback.as_ref()?;
            window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok()
        });
        if scheduled.is_none() {
            log::error!("Could not schedule the next frame");
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }

    log::info!("Game loop started");

    Ok(())
}

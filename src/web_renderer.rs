use crate::game::{Game, MenuLayout, Mode, TITLE};
use crate::renderer::{Input, Renderer};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

const HAPTIC_MS: f64 = 30.0;

const COLOR_BACKGROUND: &str = "#FFFFFF";
const COLOR_FOREGROUND: &str = "#000000";

const FONT_TITLE: &str = "bold 115px sans-serif";
const FONT_MESSAGE: &str = "33px sans-serif";
const FONT_BUTTON: &str = "55px sans-serif";
const FONT_SCORE: &str = "bold 45px sans-serif";

fn js_error(value: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?}", value))
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,
    width: f64,
    height: f64,

    // Events arrive on the JS event loop; the frame loop drains them
    pending_input: Rc<RefCell<Vec<Input>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let width = window.inner_width()?.as_f64().unwrap_or(360.0);
        let height = window.inner_height()?.as_f64().unwrap_or(640.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        Ok(Self {
            canvas,
            context,
            window,
            width,
            height,
            pending_input: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Pixel size of the playfield, fixed when the canvas is created.
    pub fn screen_size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Input {
        let bounds = canvas.get_bounding_client_rect();
        Input::Tap {
            x: (client_x as f64 - bounds.left()) as f32,
            y: (client_y as f64 - bounds.top()) as f32,
        }
    }

    fn setup_keyboard_listener(&self) -> Result<(), JsValue> {
        let pending_input = self.pending_input.clone();

        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let input = match event.key().as_str() {
                " " | "ArrowUp" | "Enter" => Some(Input::Flap),
                "Escape" | "q" | "Q" => Some(Input::Quit),
                _ => None,
            };

            if let Some(input) = input {
                pending_input.borrow_mut().push(input);
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;

        closure.forget(); // Keep listener alive
        Ok(())
    }

    fn setup_pointer_listeners(&self) -> Result<(), JsValue> {
        let pending_input = self.pending_input.clone();
        let canvas = self.canvas.clone();
        let touchstart_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default(); // Prevent zooming, scrolling and the synthetic mousedown

            if let Some(touch) = event.changed_touches().item(0) {
                let input = Self::canvas_point(&canvas, touch.client_x(), touch.client_y());
                pending_input.borrow_mut().push(input);
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas
            .add_event_listener_with_callback("touchstart", touchstart_closure.as_ref().unchecked_ref())?;
        touchstart_closure.forget();

        let pending_input = self.pending_input.clone();
        let canvas = self.canvas.clone();
        let mousedown_closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let input = Self::canvas_point(&canvas, event.client_x(), event.client_y());
            pending_input.borrow_mut().push(input);
        }) as Box<dyn FnMut(MouseEvent)>);

        self.canvas
            .add_event_listener_with_callback("mousedown", mousedown_closure.as_ref().unchecked_ref())?;
        mousedown_closure.forget();

        Ok(())
    }

    /// Short buzz on jump. Fails silently where the Vibration API is missing.
    pub fn vibrate(&self) {
        let navigator = self.window.navigator();
        let _ = js_sys::Reflect::get(&navigator, &JsValue::from_str("vibrate"))
            .ok()
            .and_then(|vibrate_fn| {
                let vibrate = vibrate_fn.dyn_ref::<js_sys::Function>()?;
                vibrate.call1(&navigator, &JsValue::from_f64(HAPTIC_MS)).ok()
            });
    }

    fn draw_scene(&self, game: &Game) {
        self.context.set_fill_style_str(COLOR_FOREGROUND);

        let bird = game.bird.rect();
        self.context.fill_rect(
            bird.left as f64,
            bird.top as f64,
            bird.width() as f64,
            bird.height() as f64,
        );

        for rect in game.obstacles() {
            self.context.fill_rect(
                rect.left as f64,
                rect.top as f64,
                rect.width() as f64,
                rect.height() as f64,
            );
        }
    }

    fn draw_menu(&self, game: &Game) -> Result<(), JsValue> {
        let center_x = self.width / 2.0;
        self.context.set_fill_style_str(COLOR_FOREGROUND);
        self.context.set_text_align("center");
        self.context.set_text_baseline("alphabetic");

        self.context.set_font(FONT_TITLE);
        self.context.fill_text(TITLE, center_x, game.menu.title_y as f64)?;

        self.context.set_font(FONT_MESSAGE);
        self.context.fill_text(game.message, center_x, game.menu.message_y as f64)?;

        self.context.set_font(FONT_BUTTON);
        for (label, button) in [("Play", &game.menu.play_button), ("Quit", &game.menu.quit_button)] {
            self.context.fill_text(label, button.center_x() as f64, MenuLayout::baseline(button) as f64)?;
        }

        Ok(())
    }

    fn draw_score(&self, game: &Game) -> Result<(), JsValue> {
        self.context.set_fill_style_str(COLOR_FOREGROUND);
        self.context.set_text_align("left");
        self.context.set_text_baseline("alphabetic");
        self.context.set_font(FONT_SCORE);
        self.context.fill_text(&format!("Score: {}", game.score), 20.0, 50.0)
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listener().map_err(js_error)?;
        self.setup_pointer_listeners().map_err(js_error)?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        self.context.set_fill_style_str(COLOR_BACKGROUND);
        self.context.fill_rect(0.0, 0.0, self.width, self.height);

        match game.mode {
            Mode::Playing => self.draw_scene(game),
            Mode::Menu => self.draw_menu(game).map_err(js_error)?,
        }
        self.draw_score(game).map_err(js_error)?;

        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        let mut pending = self.pending_input.borrow_mut();
        if pending.is_empty() {
            return Ok(None);
        }
        Ok(Some(pending.remove(0)))
    }
}

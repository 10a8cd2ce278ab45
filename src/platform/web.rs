//! Browser host: canvas mount, `requestAnimationFrame` clock and DOM input

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::{FrameCallback, FrameClock};
use crate::config::GameConfig;
use crate::consts::TIMER_PUMP_INTERVAL_MS;
use crate::error::{EngineError, Result};
use crate::game::{Game, Host, WeakGame};
use crate::input::codes;
use crate::renderer::{CanvasSurface, PointerKind};
use crate::scenes::arcade_dash;

/// Frame clock backed by `performance.now()` and `requestAnimationFrame`
pub struct RafClock {
    window: Window,
    pending: Cell<Option<i32>>,
}

impl RafClock {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            pending: Cell::new(None),
        }
    }
}

impl FrameClock for RafClock {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.cancel_frame();
        let closure = Closure::once_into_js(move |time: f64| callback(time));
        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => self.pending.set(Some(id)),
            Err(err) => log::warn!("requestAnimationFrame failed: {:?}", err),
        }
    }

    fn cancel_frame(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// Create the canvas inside `config.mount_target`.
///
/// Every lookup happens before the page is touched, so a failure leaves the
/// DOM as it was.
pub fn mount(config: &GameConfig) -> Result<(Window, HtmlCanvasElement, CanvasRenderingContext2d)> {
    let window = web_sys::window().ok_or(EngineError::NoHost)?;
    let document = window.document().ok_or(EngineError::NoHost)?;
    let parent = document
        .get_element_by_id(&config.mount_target)
        .ok_or_else(|| EngineError::MountTargetMissing(config.mount_target.clone()))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| EngineError::NoDisplaySurface(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|_| EngineError::NoDisplaySurface("created element is not a canvas".into()))?;
    canvas.set_width(config.output_width);
    canvas.set_height(config.output_height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .ok_or_else(|| EngineError::NoDisplaySurface("2d context unavailable".into()))?
        .dyn_into()
        .map_err(|_| EngineError::NoDisplaySurface("unexpected 2d context type".into()))?;

    let _ = canvas.style().set_property("background", &config.background_color);
    parent.set_inner_html("");
    parent
        .append_child(&canvas)
        .map_err(|e| EngineError::NoDisplaySurface(format!("{:?}", e)))?;

    log::info!(
        "canvas {}x{} mounted into #{}",
        config.output_width,
        config.output_height,
        config.mount_target
    );
    Ok((window, canvas, ctx))
}

/// DOM listener kept alive until teardown
struct Binding {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Binding {
    fn attach(target: &EventTarget, event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) -> Self {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Keys whose default browser action (scrolling) is suppressed
fn captured(code: &str) -> bool {
    matches!(
        code,
        codes::UP | codes::DOWN | codes::LEFT | codes::RIGHT | codes::SPACE
    )
}

fn bind_input(window: &Window, canvas: &HtmlCanvasElement, game: WeakGame) -> Vec<Binding> {
    let mut bindings = Vec::new();

    // Keyboard
    for (event, down) in [("keydown", true), ("keyup", false)] {
        let game = game.clone();
        bindings.push(Binding::attach(window, event, move |event| {
            let (Some(key), Some(game)) = (event.dyn_ref::<KeyboardEvent>(), game.upgrade()) else {
                return;
            };
            let code = key.code();
            if captured(&code) {
                event.prevent_default();
            }
            if down {
                game.key_down(&code);
            } else {
                game.key_up(&code);
            }
        }));
    }

    // Focus loss
    {
        let game = game.clone();
        bindings.push(Binding::attach(window, "blur", move |_| {
            if let Some(game) = game.upgrade() {
                game.release_keys();
            }
        }));
    }

    // Pointer
    for (event, kind) in [
        ("mousemove", PointerKind::Move),
        ("mouseout", PointerKind::Leave),
        ("click", PointerKind::Down),
    ] {
        let game = game.clone();
        let surface = canvas.clone();
        bindings.push(Binding::attach(canvas, event, move |event| {
            let (Some(mouse), Some(game)) = (event.dyn_ref::<MouseEvent>(), game.upgrade()) else {
                return;
            };
            let rect = surface.get_bounding_client_rect();
            let x = mouse.client_x() as f64 - rect.left();
            let y = mouse.client_y() as f64 - rect.top();
            game.pointer(kind, x as f32, y as f32);
        }));
    }

    bindings
}

/// Arcade Dash running in a page
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    window: Window,
    canvas: HtmlCanvasElement,
    bindings: Vec<Binding>,
    pump: Option<(i32, Closure<dyn FnMut()>)>,
}

#[wasm_bindgen]
impl WebGame {
    /// Mount into the element with id `mount_target` and show the menu
    #[wasm_bindgen(constructor)]
    pub fn new(mount_target: &str) -> std::result::Result<WebGame, JsValue> {
        Self::start(GameConfig::default().with_mount_target(mount_target)).map_err(to_js)
    }

    /// Start from a JSON config (camelCase keys, all optional)
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> std::result::Result<WebGame, JsValue> {
        GameConfig::from_json(json).and_then(Self::start).map_err(to_js)
    }

    /// Stop the loop, detach listeners and remove the canvas
    pub fn destroy(&mut self) {
        self.game.destroy();
        for binding in self.bindings.drain(..) {
            binding.detach();
        }
        if let Some((id, _closure)) = self.pump.take() {
            self.window.clear_interval_with_handle(id);
        }
        self.canvas.remove();
    }
}

impl WebGame {
    fn start(config: GameConfig) -> Result<WebGame> {
        config.validate()?;
        let config = match config.seed {
            Some(_) => config,
            None => config.with_seed(js_sys::Date::now() as u64),
        };
        let (window, canvas, ctx) = mount(&config)?;

        let host = Host {
            clock: Rc::new(RafClock::new(window.clone())),
            surface: Box::new(CanvasSurface::new(canvas.clone(), ctx)),
        };
        let game = Game::new(config, arcade_dash(), host)?;
        let bindings = bind_input(&window, &canvas, game.downgrade());

        let weak = game.downgrade();
        let pump = Closure::<dyn FnMut()>::new(move || {
            if let Some(game) = weak.upgrade() {
                game.advance_timers();
            }
        });
        let pump = match window.set_interval_with_callback_and_timeout_and_arguments_0(
            pump.as_ref().unchecked_ref(),
            TIMER_PUMP_INTERVAL_MS,
        ) {
            Ok(id) => Some((id, pump)),
            Err(err) => {
                log::warn!("timer pump unavailable, timers will only fire on frames: {:?}", err);
                None
            }
        };

        Ok(WebGame {
            game,
            window,
            canvas,
            bindings,
            pump,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

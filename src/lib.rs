//! Diploma Dash core crate.
//!
//! A browser runner / chase game: the player flees a pursuing professor
//! toward a drifting diploma, threading the gaps between pillar obstacles.
//! `start_game()` wires the canvas, scenes, persistence and input listeners
//! and starts the frame loop. All simulation logic lives in plain modules so
//! it also compiles and tests natively as an rlib.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, window};

pub mod entity;
pub mod game;
pub mod overlay;
pub mod rng;
pub mod scene;
pub mod skin;
pub mod sprite;
pub mod store;

use game::{Game, GameError, InputEvent, Services};
use rng::Lcg;
use scene::{GameOverScene, GameplayScene, MenuScene, RankingScene};
use sprite::SpriteCache;
use store::{BrowserStorage, RankingStore, ScoreStore};

const CANVAS_ID: &str = "game-canvas";

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

thread_local! {
    static GAME: RefCell<Option<Game>> = RefCell::new(None);
}

fn with_game(f: impl FnOnce(&mut Game)) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            f(game);
        }
    });
}

/// Feed a normalized input event to the active scene.
pub(crate) fn dispatch(event: InputEvent) {
    with_game(|game| game.dispatch_input(&event));
}

/// Build the game against the page canvas, register every scene and start
/// the frame loop on the menu.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(CANVAS_ID)
        .ok_or(GameError::MissingCanvas(CANVAS_ID))?
        .dyn_into()
        .map_err(|_| GameError::MissingCanvas(CANVAS_ID))?;

    let services = Services::new(
        ScoreStore::new(Box::new(BrowserStorage::open()?)),
        RankingStore::new(Box::new(BrowserStorage::open()?)),
        SpriteCache::new(),
    );

    let mut game = Game::new(canvas, services)?;
    let config = game.config();
    game.register(Box::new(MenuScene::new()));
    game.register(Box::new(GameplayScene::new(config, Lcg::from_clock())));
    game.register(Box::new(GameOverScene::new()));
    game.register(Box::new(RankingScene::new()));
    game.start("menu")?;

    GAME.with(|cell| cell.replace(Some(game)));
    attach_input_listeners(&win)?;
    start_frame_loop();
    Ok(())
}

/// Cancel the pending animation frame. Idempotent.
#[wasm_bindgen]
pub fn stop_game() {
    with_game(|game| game.stop());
}

fn attach_input_listeners(win: &web_sys::Window) -> Result<(), JsValue> {
    let keydown = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        let code = evt.code();
        // Keep Space / ArrowUp from scrolling the page.
        if code == "Space" || code == "ArrowUp" {
            evt.prevent_default();
        }
        dispatch(InputEvent::Key(code));
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    let mousedown = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        dispatch(InputEvent::Pointer);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
    mousedown.forget();

    let touchstart = Closure::wrap(Box::new(move |_evt: web_sys::TouchEvent| {
        dispatch(InputEvent::Pointer);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("touchstart", touchstart.as_ref().unchecked_ref())?;
    touchstart.forget();

    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| game.tick(ts));
        if let Some(win) = window() {
            if let Ok(id) =
                win.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            {
                with_game(|game| game.set_raf_id(Some(id)));
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(win) = window() {
        if let Ok(id) =
            win.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        {
            with_game(|game| game.set_raf_id(Some(id)));
        }
    }
}

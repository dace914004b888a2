//! Scene state machine and frame loop driver.
//!
//! [`SceneRouter`] owns every registered scene and keeps exactly one active
//! between `start` and any later transition; the exit hook of the outgoing
//! scene always completes before the enter hook of the incoming one runs.
//! [`Game`] wraps the router with the canvas, the service bundle and the
//! delta-time bookkeeping for the `requestAnimationFrame` chain.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sprite::SpriteCache;
use crate::store::{RankingStore, ScoreStore};

/// Height of the ground band at the bottom of the playfield.
pub const GROUND_HEIGHT: f64 = 80.0;

#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
}

impl GameConfig {
    /// Top of the ground band; entities clamp their bottom edge to this.
    pub fn ground_y(&self) -> f64 {
        self.height - GROUND_HEIGHT
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("scene '{0}' is not registered")]
    UnknownScene(String),
    #[error("canvas element '{0}' not found")]
    MissingCanvas(&'static str),
    #[error("canvas 2D context not available")]
    NoContext,
    #[error("browser storage unavailable")]
    StorageUnavailable,
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Normalized input, fed to the active scene only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Raw `KeyboardEvent.code` of a key press.
    Key(String),
    /// Any pointer or touch press on the page.
    Pointer,
    /// An overlay button press, routed through the same dispatch path as keys.
    Action(&'static str),
}

pub struct Services {
    pub score: ScoreStore,
    pub ranking: RankingStore,
    pub sprites: SpriteCache,
}

impl Services {
    pub fn new(score: ScoreStore, ranking: RankingStore, sprites: SpriteCache) -> Self {
        Self {
            score,
            ranking,
            sprites,
        }
    }

    /// Memory-backed bundle for native tests and headless runs.
    pub fn in_memory() -> Self {
        use crate::store::MemoryStorage;
        Self::new(
            ScoreStore::new(Box::new(MemoryStorage::default())),
            RankingStore::new(Box::new(MemoryStorage::default())),
            SpriteCache::new(),
        )
    }
}

/// Per-call environment handed to scene hooks: configuration, services and a
/// slot for requesting a scene transition. Requests are applied by the router
/// after the hook returns, never mid-call.
pub struct Env<'a> {
    pub config: &'a GameConfig,
    pub score: &'a mut ScoreStore,
    pub ranking: &'a mut RankingStore,
    pub sprites: &'a mut SpriteCache,
    next: &'a mut Option<&'static str>,
}

impl<'a> Env<'a> {
    pub fn new(
        config: &'a GameConfig,
        services: &'a mut Services,
        next: &'a mut Option<&'static str>,
    ) -> Self {
        Self {
            config,
            score: &mut services.score,
            ranking: &mut services.ranking,
            sprites: &mut services.sprites,
            next,
        }
    }

    /// Request a transition to the scene registered under `id`.
    pub fn go_to(&mut self, id: &'static str) {
        *self.next = Some(id);
    }
}

pub trait Scene {
    fn id(&self) -> &'static str;
    fn on_enter(&mut self, _env: &mut Env, _from: Option<&'static str>) {}
    fn on_exit(&mut self, _env: &mut Env, _to: &'static str) {}
    fn update(&mut self, _env: &mut Env, _dt: f64) {}
    fn render(&mut self, _env: &mut Env, _ctx: &CanvasRenderingContext2d) {}
    fn handle_input(&mut self, _env: &mut Env, _event: &InputEvent) {}
}

#[derive(Default)]
pub struct SceneRouter {
    scenes: Vec<Box<dyn Scene>>,
    current: Option<usize>,
}

impl SceneRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene to the registry. A later registration under the same id
    /// replaces the earlier one.
    pub fn register(&mut self, scene: Box<dyn Scene>) {
        if let Some(slot) = self.scenes.iter_mut().find(|s| s.id() == scene.id()) {
            *slot = scene;
        } else {
            self.scenes.push(scene);
        }
    }

    pub fn current_id(&self) -> Option<&'static str> {
        self.current.map(|i| self.scenes[i].id())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id() == id)
    }

    /// Activate the initial scene; its enter hook sees no previous scene.
    pub fn start(&mut self, id: &str, env: &mut Env) -> Result<(), GameError> {
        self.change_to(id, env)
    }

    /// Switch scenes: exit hook on the outgoing scene (if any), swap, enter
    /// hook on the incoming one. An unknown id fails without touching the
    /// active scene.
    pub fn change_to(&mut self, id: &str, env: &mut Env) -> Result<(), GameError> {
        let next = self
            .index_of(id)
            .ok_or_else(|| GameError::UnknownScene(id.to_owned()))?;
        let prev_id = self.current_id();
        if let Some(prev) = self.current {
            let next_id = self.scenes[next].id();
            self.scenes[prev].on_exit(env, next_id);
        }
        self.current = Some(next);
        self.scenes[next].on_enter(env, prev_id);
        Ok(())
    }

    pub fn update(&mut self, env: &mut Env, dt: f64) {
        if let Some(i) = self.current {
            self.scenes[i].update(env, dt);
        }
    }

    pub fn render(&mut self, env: &mut Env, ctx: &CanvasRenderingContext2d) {
        if let Some(i) = self.current {
            self.scenes[i].render(env, ctx);
        }
    }

    /// Forward an input event to the active scene only.
    pub fn dispatch(&mut self, env: &mut Env, event: &InputEvent) {
        if let Some(i) = self.current {
            self.scenes[i].handle_input(env, event);
        }
    }
}

pub struct Game {
    ctx: CanvasRenderingContext2d,
    config: GameConfig,
    router: SceneRouter,
    services: Services,
    last_time: f64,
    raf_id: Option<i32>,
}

impl Game {
    pub fn new(canvas: HtmlCanvasElement, services: Services) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GameError::NoContext)?
            .ok_or(GameError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::NoContext)?;
        let config = GameConfig {
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        };
        Ok(Self {
            ctx,
            config,
            router: SceneRouter::new(),
            services,
            last_time: 0.0,
            raf_id: None,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn register(&mut self, scene: Box<dyn Scene>) {
        self.router.register(scene);
    }

    /// Activate the initial scene and capture the frame clock immediately
    /// before the first tick is scheduled, so the first dt is near zero.
    pub fn start(&mut self, initial: &str) -> Result<(), GameError> {
        let mut pending = None;
        {
            let mut env = Env::new(&self.config, &mut self.services, &mut pending);
            self.router.start(initial, &mut env)?;
        }
        self.apply_transition(pending);
        self.last_time = now_ms();
        Ok(())
    }

    /// One frame: dt in seconds (unclamped), update, transition, render.
    pub fn tick(&mut self, now: f64) {
        let dt = (now - self.last_time) / 1000.0;
        self.last_time = now;

        let mut pending = None;
        {
            let mut env = Env::new(&self.config, &mut self.services, &mut pending);
            self.router.update(&mut env, dt);
        }
        self.apply_transition(pending);

        self.ctx
            .clear_rect(0.0, 0.0, self.config.width, self.config.height);
        let mut unused = None;
        let mut env = Env::new(&self.config, &mut self.services, &mut unused);
        self.router.render(&mut env, &self.ctx);
    }

    pub fn dispatch_input(&mut self, event: &InputEvent) {
        let mut pending = None;
        {
            let mut env = Env::new(&self.config, &mut self.services, &mut pending);
            self.router.dispatch(&mut env, event);
        }
        self.apply_transition(pending);
    }

    fn apply_transition(&mut self, pending: Option<&'static str>) {
        if let Some(id) = pending {
            let mut unused = None;
            let mut env = Env::new(&self.config, &mut self.services, &mut unused);
            if let Err(err) = self.router.change_to(id, &mut env) {
                web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
            }
        }
    }

    pub fn set_raf_id(&mut self, id: Option<i32>) {
        self.raf_id = id;
    }

    /// Cancel the pending frame, if any. Idempotent; an in-flight tick always
    /// runs to completion.
    pub fn stop(&mut self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(win) = web_sys::window() {
                let _ = win.cancel_animation_frame(id);
            }
        }
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

//! The run itself: spawn scheduling, difficulty ramp, collision detection
//! and the stuck/chase endgame.
//!
//! The chase has two phases. While the run is free the professor trails the
//! player at a fixed distance and threads obstacle gaps on its own. The
//! first obstacle hit freezes the player against the pillar; from then on
//! the professor closes the remaining distance until it grabs the player
//! and the run ends.

use std::collections::VecDeque;

use web_sys::CanvasRenderingContext2d;

use crate::entity::{Follower, Obstacle, Player};
use crate::game::{Env, GameConfig, InputEvent, Scene};
use crate::rng::Lcg;
use crate::skin;

const START_SPEED: f64 = 250.0;
const SPEED_RAMP: f64 = 5.0;
const DISTANCE_SCALE: f64 = 0.1;

const SPAWN_INTERVAL: f64 = 1.8;
const SPAWN_FLOOR: f64 = 0.9;
const SPAWN_RAMP_DIVISOR: f64 = 500.0;

const DIPLOMA_WIDTH: f64 = 60.0;
const DIPLOMA_HEIGHT: f64 = 30.0;
const DIPLOMA_OFFSET_X: f64 = 280.0;
const DIPLOMA_FLAP: f64 = -580.0;

const PROFESSOR_WIDTH: f64 = 38.0;
const PROFESSOR_HEIGHT: f64 = 55.0;
const PROFESSOR_FLAP: f64 = -600.0;

/// Trailing distance while the run is free.
const PURSUIT_GAP_MAX: f64 = 80.0;
const PURSUIT_GAP_MIN: f64 = 12.0;
/// How fast the professor closes in once the player is stuck.
const CHASE_CLOSE_RATE: f64 = 45.0;
/// How fast the professor falls back to max distance while free.
const FREE_DRIFT_RATE: f64 = 25.0;

/// Scroll speed decays toward this floor while the player is stuck.
const STUCK_SPEED_FLOOR: f64 = 140.0;
const STUCK_SPEED_DECAY: f64 = 60.0;
/// The grab test forgives this many pixels around the professor's body.
const CATCH_TOLERANCE: f64 = 6.0;

const CLOUD_COUNT: usize = 5;

struct Cloud {
    x: f64,
    y: f64,
    speed: f64,
    size: f64,
}

#[derive(Clone, Copy)]
enum ChasePhase {
    Free,
    Stuck { pin_offset: f64 },
}

pub struct GameplayScene {
    player: Player,
    obstacles: VecDeque<Obstacle>,
    clouds: Vec<Cloud>,
    diploma: Follower,
    professor: Follower,
    phase: ChasePhase,
    pursuit_gap: f64,
    distance: f64,
    speed: f64,
    spawn_timer: f64,
    rng: Lcg,
    config: GameConfig,
}

impl GameplayScene {
    pub fn new(config: GameConfig, rng: Lcg) -> Self {
        let ground_y = config.ground_y();
        let mut scene = Self {
            player: Player::new(ground_y, skin::by_id(skin::DEFAULT_SKIN_ID)),
            obstacles: VecDeque::new(),
            clouds: Vec::new(),
            diploma: Follower::new(DIPLOMA_WIDTH, DIPLOMA_HEIGHT, DIPLOMA_FLAP, ground_y),
            professor: Follower::new(PROFESSOR_WIDTH, PROFESSOR_HEIGHT, PROFESSOR_FLAP, ground_y),
            phase: ChasePhase::Free,
            pursuit_gap: PURSUIT_GAP_MAX,
            distance: 0.0,
            speed: START_SPEED,
            spawn_timer: SPAWN_INTERVAL,
            rng,
            config,
        };
        scene.seed_clouds();
        scene
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    fn is_stuck(&self) -> bool {
        matches!(self.phase, ChasePhase::Stuck { .. })
    }

    fn reset(&mut self, env: &mut Env) {
        self.player.set_skin(skin::by_id(env.ranking.skin_id()));
        self.player.reset();
        self.obstacles.clear();
        self.diploma.reset();
        self.professor.reset();
        self.phase = ChasePhase::Free;
        self.pursuit_gap = PURSUIT_GAP_MAX;
        self.distance = 0.0;
        self.speed = START_SPEED;
        self.spawn_timer = SPAWN_INTERVAL;
        self.seed_clouds();
    }

    fn seed_clouds(&mut self) {
        self.clouds.clear();
        for _ in 0..CLOUD_COUNT {
            let cloud = Cloud {
                x: self.rng.range(0.0, self.config.width),
                y: self.rng.range(40.0, 190.0),
                speed: self.rng.range(40.0, 80.0),
                size: self.rng.range(80.0, 140.0),
            };
            self.clouds.push(cloud);
        }
    }

    fn update_clouds(&mut self, dt: f64) {
        let field_width = self.config.width;
        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed * dt;
            if cloud.x + cloud.size < 0.0 {
                cloud.x = field_width + self.rng.range(0.0, 200.0);
                cloud.y = self.rng.range(40.0, 190.0);
                cloud.speed = self.rng.range(40.0, 80.0);
                cloud.size = self.rng.range(80.0, 140.0);
            }
        }
    }

    fn spawn_interval_after(distance: f64) -> f64 {
        (SPAWN_INTERVAL - distance / SPAWN_RAMP_DIVISOR).max(SPAWN_FLOOR)
    }

    fn spawn_obstacle(&mut self) {
        self.spawn_timer = Self::spawn_interval_after(self.distance);
        let obstacle = Obstacle::spawn(self.config.width, self.config.ground_y(), &mut self.rng);
        self.obstacles.push_back(obstacle);
    }

    /// Drop off-screen obstacles oldest-first; an engaged obstacle blocks the
    /// scan until the chase resolves.
    fn cull_obstacles(&mut self) {
        while let Some(front) = self.obstacles.front() {
            if front.is_off_screen() && !front.is_engaged() {
                self.obstacles.pop_front();
            } else {
                break;
            }
        }
    }

    fn professor_x(&self) -> f64 {
        self.player.x - self.pursuit_gap
    }

    fn diploma_x(&self) -> f64 {
        self.player.x + DIPLOMA_OFFSET_X
    }

    fn engaged_x(&self) -> Option<f64> {
        self.obstacles.iter().find(|o| o.is_engaged()).map(|o| o.x)
    }

    fn find_collision(&self) -> Option<usize> {
        let hitbox = self.player.hitbox();
        self.obstacles
            .iter()
            .position(|o| o.bounds().iter().any(|pillar| hitbox.overlaps(pillar)))
    }

    /// Freeze the player against the obstacle's leading edge and hand the
    /// run over to the chase.
    fn enter_stuck(&mut self, index: usize) {
        self.player.freeze();
        let hb = &self.player.skin().hitbox;
        let pin_offset = -(hb.offset_x + hb.width);
        if let Some(obstacle) = self.obstacles.get_mut(index) {
            obstacle.engage();
            self.player.x = obstacle.x + pin_offset;
        }
        self.phase = ChasePhase::Stuck { pin_offset };
    }

    fn professor_caught(&self) -> bool {
        let professor = self.professor.bounds_at(self.professor_x());
        professor
            .inflate(CATCH_TOLERANCE)
            .overlaps(&self.player.hitbox())
    }

    fn finish_run(&mut self, env: &mut Env) {
        let score = self.distance.floor() as i64;
        env.ranking.set_last_score(score);
        env.score.save_best_score(score);
        if let Some(nickname) = env.ranking.current_player().map(str::to_owned) {
            env.ranking.save_score(&nickname, score);
        }
        env.go_to("game-over");
    }
}

impl Scene for GameplayScene {
    fn id(&self) -> &'static str {
        "game"
    }

    fn on_enter(&mut self, env: &mut Env, _from: Option<&'static str>) {
        self.reset(env);
    }

    fn update(&mut self, env: &mut Env, dt: f64) {
        match self.phase {
            ChasePhase::Free => {
                self.distance += self.speed * dt * DISTANCE_SCALE;
                self.speed += SPEED_RAMP * dt;
                self.pursuit_gap = (self.pursuit_gap + FREE_DRIFT_RATE * dt).min(PURSUIT_GAP_MAX);
                self.spawn_timer -= dt;
                if self.spawn_timer <= 0.0 {
                    self.spawn_obstacle();
                }
            }
            ChasePhase::Stuck { .. } => {
                self.speed = (self.speed - STUCK_SPEED_DECAY * dt).max(STUCK_SPEED_FLOOR);
                self.pursuit_gap = (self.pursuit_gap - CHASE_CLOSE_RATE * dt).max(PURSUIT_GAP_MIN);
            }
        }

        self.player.update(dt);
        for obstacle in &mut self.obstacles {
            obstacle.update(dt, self.speed);
        }
        self.cull_obstacles();
        self.update_clouds(dt);

        self.diploma.update(dt);
        let target = if self.is_stuck() {
            // Pursuit flapping tracks the pinned player directly.
            self.player.hitbox().center_y()
        } else {
            self.professor
                .gap_target(self.obstacles.iter(), self.professor_x())
        };
        self.professor.steer_toward(target);
        self.professor.update(dt);

        match self.phase {
            ChasePhase::Free => {
                if let Some(index) = self.find_collision() {
                    self.enter_stuck(index);
                }
            }
            ChasePhase::Stuck { pin_offset } => {
                if let Some(obstacle_x) = self.engaged_x() {
                    self.player.x = obstacle_x + pin_offset;
                }
                if self.professor_caught() {
                    self.finish_run(env);
                }
            }
        }
    }

    fn render(&mut self, env: &mut Env, ctx: &CanvasRenderingContext2d) {
        let (width, height) = (self.config.width, self.config.height);
        let ground_y = self.config.ground_y();

        ctx.set_fill_style_str("#1c2541");
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
        for cloud in &self.clouds {
            ctx.begin_path();
            ctx.ellipse(
                cloud.x,
                cloud.y,
                cloud.size,
                cloud.size * 0.6,
                0.0,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
            ctx.fill();
        }

        ctx.set_fill_style_str("#3a506b");
        ctx.fill_rect(0.0, ground_y, width, height - ground_y);

        for obstacle in &self.obstacles {
            obstacle.render(ctx);
        }

        self.render_diploma(ctx);
        self.render_professor(ctx);
        self.player.render(ctx, env.sprites);

        ctx.set_fill_style_str("#f8ffe5");
        ctx.set_font("24px 'Segoe UI', sans-serif");
        ctx.fill_text(&format!("Distance: {} m", self.distance.floor()), 32.0, 48.0)
            .ok();
        ctx.fill_text(&format!("Best: {} m", env.score.best_score()), 32.0, 80.0)
            .ok();
        if let Some(nickname) = env.ranking.current_player() {
            ctx.fill_text(&format!("Runner: {nickname}"), width - 220.0, 48.0)
                .ok();
        }
    }

    fn handle_input(&mut self, _env: &mut Env, event: &InputEvent) {
        let jump = match event {
            InputEvent::Pointer => true,
            InputEvent::Key(code) => code == "Space" || code == "ArrowUp",
            InputEvent::Action(_) => false,
        };
        if jump && !self.player.is_frozen() {
            self.player.jump();
            // The diploma mirrors the player's timing instead of pathfinding.
            self.diploma.flap();
        }
    }
}

impl GameplayScene {
    fn render_diploma(&self, ctx: &CanvasRenderingContext2d) {
        let x = self.diploma_x();
        let y = self.diploma.y;
        let (w, h) = (self.diploma.width(), self.diploma.height());

        ctx.set_fill_style_str("#ffe066");
        ctx.fill_rect(x, y, w, h);
        ctx.set_stroke_style_str("#d4a418");
        ctx.set_line_width(4.0);
        ctx.stroke_rect(x, y, w, h);

        // Wax seal on the scroll.
        ctx.set_fill_style_str("#ef476f");
        ctx.begin_path();
        ctx.arc(x + w - 10.0, y + h / 2.0, 8.0, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.fill();

        ctx.set_fill_style_str("#f8ffe5");
        ctx.set_font("14px 'Segoe UI', sans-serif");
        ctx.fill_text("Diploma", x - 10.0, y + h + 20.0).ok();
    }

    fn render_professor(&self, ctx: &CanvasRenderingContext2d) {
        let x = self.professor_x();
        let y = self.professor.y;
        let (w, h) = (self.professor.width(), self.professor.height());

        ctx.set_fill_style_str("#ef476f");
        ctx.fill_rect(x, y, w, h);

        // Gown band.
        ctx.set_fill_style_str("#1c2541");
        ctx.fill_rect(x + 6.0, y + 10.0, w - 12.0, 20.0);

        // Mortarboard.
        ctx.set_fill_style_str("#ffd166");
        ctx.fill_rect(x + (w - 18.0) / 2.0, y - 8.0, 18.0, 18.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Services;

    const DT: f64 = 1.0 / 60.0;

    fn config() -> GameConfig {
        GameConfig {
            width: 960.0,
            height: 540.0,
        }
    }

    fn scene() -> GameplayScene {
        GameplayScene::new(config(), Lcg::seeded(1))
    }

    fn step(scene: &mut GameplayScene, services: &mut Services) -> Option<&'static str> {
        let cfg = config();
        let mut pending = None;
        let mut env = Env::new(&cfg, services, &mut pending);
        scene.update(&mut env, DT);
        pending
    }

    /// Drive a fresh run (grounded player, no jumping) until the first
    /// obstacle pins it.
    fn run_until_stuck(scene: &mut GameplayScene, services: &mut Services) {
        for _ in 0..2000 {
            assert_eq!(step(scene, services), None);
            if scene.is_stuck() {
                return;
            }
        }
        panic!("player never got stuck");
    }

    #[test]
    fn spawn_interval_shrinks_with_distance_down_to_floor() {
        let mut last = GameplayScene::spawn_interval_after(0.0);
        assert_eq!(last, SPAWN_INTERVAL);
        for d in (0..=3000).step_by(50) {
            let interval = GameplayScene::spawn_interval_after(d as f64);
            assert!(interval <= last);
            assert!(interval >= SPAWN_FLOOR);
            last = interval;
        }
        assert_eq!(GameplayScene::spawn_interval_after(3000.0), SPAWN_FLOOR);
    }

    #[test]
    fn ten_second_clean_run_ramps_distance_and_speed() {
        let mut scene = scene();
        let mut services = Services::in_memory();

        let mut last_distance = scene.distance();
        for _ in 0..600 {
            // Keep the lane clear so the run stays collision-free and the
            // ramp is observed in isolation.
            scene.obstacles.clear();
            assert_eq!(step(&mut scene, &mut services), None);
            assert!(scene.distance() > last_distance);
            last_distance = scene.distance();
        }

        assert!(scene.distance() > 0.0);
        assert!(scene.speed() > START_SPEED);
    }

    #[test]
    fn cull_removes_fifo_but_retains_engaged() {
        let mut scene = scene();
        let mut rng = Lcg::seeded(3);
        let ceiling = config().ground_y();

        let mut oldest = Obstacle::spawn(960.0, ceiling, &mut rng);
        oldest.x = -200.0;
        let mut engaged = Obstacle::spawn(960.0, ceiling, &mut rng);
        engaged.x = -200.0;
        engaged.engage();
        let mut behind_engaged = Obstacle::spawn(960.0, ceiling, &mut rng);
        behind_engaged.x = -200.0;
        let visible = Obstacle::spawn(960.0, ceiling, &mut rng);
        scene
            .obstacles
            .extend([oldest, engaged, behind_engaged, visible]);

        scene.cull_obstacles();

        // The free off-screen leader goes; the engaged one stays and blocks
        // the scan for everything behind it.
        assert_eq!(scene.obstacle_count(), 3);
        assert!(scene.obstacles[0].is_engaged());
    }

    #[test]
    fn collision_freezes_and_pins_the_player() {
        let mut scene = scene();
        let mut services = Services::in_memory();
        run_until_stuck(&mut scene, &mut services);

        assert!(scene.player.is_frozen());
        let engaged_x = scene.engaged_x().expect("an obstacle is engaged");
        let pin = scene.player.x - engaged_x;

        // The pin offset holds while the obstacle keeps moving.
        for _ in 0..10 {
            if step(&mut scene, &mut services).is_some() {
                break;
            }
            let engaged_x = scene.engaged_x().expect("engaged obstacle retained");
            assert!((scene.player.x - engaged_x - pin).abs() < 1e-9);
        }
    }

    #[test]
    fn chase_closes_monotonically_until_game_over() {
        let mut scene = scene();
        let mut services = Services::in_memory();
        services.ranking.set_current_player("Rafa");
        run_until_stuck(&mut scene, &mut services);

        let mut last_gap = scene.pursuit_gap;
        let mut over = false;
        for _ in 0..2000 {
            let pending = step(&mut scene, &mut services);
            if pending == Some("game-over") {
                over = true;
                break;
            }
            assert!(scene.pursuit_gap <= last_gap);
            assert!(scene.pursuit_gap >= PURSUIT_GAP_MIN);
            last_gap = scene.pursuit_gap;
        }
        assert!(over, "professor never caught the player");

        let score = services.ranking.last_score();
        assert!(score >= 1);
        assert_eq!(services.score.best_score(), score);
        let entries = services.ranking.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].nickname, "Rafa");
        assert_eq!(entries[0].score, score);
    }

    #[test]
    fn speed_decays_to_floor_while_stuck() {
        let mut scene = scene();
        let mut services = Services::in_memory();
        run_until_stuck(&mut scene, &mut services);

        let mut last_speed = scene.speed();
        for _ in 0..600 {
            if step(&mut scene, &mut services).is_some() {
                break;
            }
            assert!(scene.speed() <= last_speed);
            assert!(scene.speed() >= STUCK_SPEED_FLOOR);
            last_speed = scene.speed();
        }
    }

    #[test]
    fn distance_stops_accruing_while_stuck() {
        let mut scene = scene();
        let mut services = Services::in_memory();
        run_until_stuck(&mut scene, &mut services);

        let distance = scene.distance();
        if step(&mut scene, &mut services).is_none() {
            assert_eq!(scene.distance(), distance);
        }
    }

    #[test]
    fn reentry_resets_the_run() {
        let cfg = config();
        let mut scene = scene();
        let mut services = Services::in_memory();
        run_until_stuck(&mut scene, &mut services);

        let mut pending = None;
        let mut env = Env::new(&cfg, &mut services, &mut pending);
        scene.on_enter(&mut env, Some("game-over"));

        assert!(!scene.player.is_frozen());
        assert!(!scene.is_stuck());
        assert_eq!(scene.distance(), 0.0);
        assert_eq!(scene.speed(), START_SPEED);
        assert_eq!(scene.obstacle_count(), 0);
    }
}

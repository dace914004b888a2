// Native end-to-end tests for the gameplay scene driven through its public
// surface: the difficulty ramp on a clean run, and a full run ending in the
// professor's grab with the score persisted.

use diploma_dash::game::{Env, GameConfig, Scene, Services};
use diploma_dash::rng::Lcg;
use diploma_dash::scene::GameplayScene;

const DT: f64 = 1.0 / 60.0;

fn config() -> GameConfig {
    GameConfig {
        width: 960.0,
        height: 540.0,
    }
}

#[test]
fn distance_and_speed_grow_on_a_clean_run() {
    let cfg = config();
    let mut services = Services::in_memory();
    let mut scene = GameplayScene::new(cfg, Lcg::seeded(42));
    assert_eq!(scene.distance(), 0.0);
    assert_eq!(scene.speed(), 250.0);

    // Two simulated seconds: obstacles have spawned but none has scrolled
    // far enough to reach the player yet, so the run stays collision-free.
    let mut last_distance = scene.distance();
    for _ in 0..120 {
        let mut pending = None;
        let mut env = Env::new(&cfg, &mut services, &mut pending);
        scene.update(&mut env, DT);
        assert_eq!(pending, None);
        assert!(scene.distance() > last_distance);
        last_distance = scene.distance();
    }

    assert!(scene.distance() > 0.0);
    assert!(scene.speed() > 250.0);
    assert!(scene.obstacle_count() >= 1);
}

#[test]
fn full_run_ends_in_game_over_and_persists_the_score() {
    let cfg = config();
    let mut services = Services::in_memory();
    services.ranking.set_current_player("Nina");
    let mut scene = GameplayScene::new(cfg, Lcg::seeded(7));

    // A grounded player runs straight into the first pillar and the chase
    // plays out to the grab.
    let mut outcome = None;
    for _ in 0..4000 {
        let mut pending = None;
        let mut env = Env::new(&cfg, &mut services, &mut pending);
        scene.update(&mut env, DT);
        if pending.is_some() {
            outcome = pending;
            break;
        }
    }

    assert_eq!(outcome, Some("game-over"));
    let score = services.ranking.last_score();
    assert!(score >= 1);
    assert_eq!(services.score.best_score(), score);
    let entries = services.ranking.load();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].nickname, "Nina");
    assert_eq!(entries[0].score, score);
}

#[test]
fn jump_input_lifts_the_player_off_the_ground() {
    use diploma_dash::game::InputEvent;

    let cfg = config();
    let mut services = Services::in_memory();
    let mut scene = GameplayScene::new(cfg, Lcg::seeded(3));

    let grounded_y = scene.player().y;
    let mut pending = None;
    {
        let mut env = Env::new(&cfg, &mut services, &mut pending);
        scene.handle_input(&mut env, &InputEvent::Pointer);
        scene.update(&mut env, DT);
    }
    assert!(scene.player().y < grounded_y);
    assert!(scene.player().velocity_y() < 0.0);
}

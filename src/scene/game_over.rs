//! End-of-run summary: last score, current best, and the way back in.

use web_sys::CanvasRenderingContext2d;

use crate::game::{Env, InputEvent, Scene};
use crate::overlay;

const SUMMARY_STYLE: &str = "margin:0; font-size:18px; line-height:1.6;";
const RECORD_STYLE: &str = "margin:0; font-size:15px; opacity:0.85;";
const BUTTON_ROW_STYLE: &str = "display:flex; gap:16px;";

#[derive(Default)]
pub struct GameOverScene;

impl GameOverScene {
    pub fn new() -> Self {
        Self
    }
}

impl Scene for GameOverScene {
    fn id(&self) -> &'static str {
        "game-over"
    }

    fn on_enter(&mut self, env: &mut Env, _from: Option<&'static str>) {
        let score = env.ranking.last_score();
        let best = env.score.best_score();
        let nickname = env.ranking.current_player().unwrap_or("Runner").to_owned();

        let Some(doc) = overlay::document() else {
            return;
        };
        let Some(root) = overlay::create_overlay(&doc, "game-over-overlay") else {
            return;
        };

        if let Some(title) = overlay::create_title(&doc, "Game Over") {
            root.append_child(&title).ok();
        }
        if let Some(summary) = overlay::create_text(
            &doc,
            &format!("Nice try, {nickname}! You ran {score} m."),
            SUMMARY_STYLE,
        ) {
            root.append_child(&summary).ok();
        }
        if let Some(record) =
            overlay::create_text(&doc, &format!("Current best: {best} m"), RECORD_STYLE)
        {
            root.append_child(&record).ok();
        }

        if let Ok(buttons) = doc.create_element("div") {
            buttons.set_attribute("style", BUTTON_ROW_STYLE).ok();
            if let Some(retry) = overlay::create_button(&doc, "Run again", "retry") {
                buttons.append_child(&retry).ok();
            }
            if let Some(menu) = overlay::create_button(&doc, "Back to menu", "menu") {
                buttons.append_child(&menu).ok();
            }
            if let Some(ranking) = overlay::create_button(&doc, "Ranking", "ranking") {
                buttons.append_child(&ranking).ok();
            }
            root.append_child(&buttons).ok();
        }

        if let Some(body) = doc.body() {
            body.append_child(&root).ok();
        }
    }

    fn on_exit(&mut self, _env: &mut Env, _to: &'static str) {
        overlay::remove_overlay("game-over-overlay");
    }

    fn render(&mut self, env: &mut Env, ctx: &CanvasRenderingContext2d) {
        let (width, height) = (env.config.width, env.config.height);
        ctx.set_fill_style_str("#1c2541");
        ctx.fill_rect(0.0, 0.0, width, height);
        ctx.set_fill_style_str("#ef476f");
        ctx.set_font("42px 'Segoe UI', sans-serif");
        ctx.fill_text("The professor caught you!", 220.0, height / 2.0)
            .ok();
    }

    fn handle_input(&mut self, env: &mut Env, event: &InputEvent) {
        match event {
            InputEvent::Action("retry") => env.go_to("game"),
            InputEvent::Action("menu") => env.go_to("menu"),
            InputEvent::Action("ranking") => env.go_to("ranking"),
            InputEvent::Key(code) if code == "Space" => env.go_to("game"),
            _ => {}
        }
    }
}

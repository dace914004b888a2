//! Local ranking screen: best distances recorded in this browser.

use web_sys::CanvasRenderingContext2d;

use crate::game::{Env, InputEvent, Scene};
use crate::overlay;

const SUBTITLE_STYLE: &str = "margin:0; font-size:15px; opacity:0.85;";
const EMPTY_STYLE: &str = "margin:0; max-width:320px; font-size:15px; line-height:1.4; opacity:0.85;";
const LIST_STYLE: &str = "list-style:none; padding:0; margin:0; display:flex; \
    flex-direction:column; gap:12px; width:320px;";
const ROW_STYLE: &str = "display:flex; justify-content:space-between; padding:12px 16px; \
    border-radius:12px; background:rgba(91,192,190,0.15);";
const ROW_HIGHLIGHT_STYLE: &str = "display:flex; justify-content:space-between; padding:12px 16px; \
    border-radius:12px; background:rgba(239,71,111,0.35); border:2px solid #ef476f;";
const SCORE_STYLE: &str = "font-weight:bold;";

#[derive(Default)]
pub struct RankingScene;

impl RankingScene {
    pub fn new() -> Self {
        Self
    }
}

impl Scene for RankingScene {
    fn id(&self) -> &'static str {
        "ranking"
    }

    fn on_enter(&mut self, env: &mut Env, _from: Option<&'static str>) {
        let Some(doc) = overlay::document() else {
            return;
        };
        let Some(root) = overlay::create_overlay(&doc, "ranking-overlay") else {
            return;
        };

        if let Some(title) = overlay::create_title(&doc, "Local Ranking") {
            root.append_child(&title).ok();
        }
        if let Some(subtitle) = overlay::create_text(
            &doc,
            "Highest distances recorded in this browser.",
            SUBTITLE_STYLE,
        ) {
            root.append_child(&subtitle).ok();
        }

        let entries = env.ranking.load();
        if entries.is_empty() {
            if let Some(empty) = overlay::create_text(
                &doc,
                "Nobody has finished a run yet. Be the first to leave a mark!",
                EMPTY_STYLE,
            ) {
                root.append_child(&empty).ok();
            }
        } else if let Ok(list) = doc.create_element("ol") {
            list.set_attribute("style", LIST_STYLE).ok();
            let current = env.ranking.current_player().map(str::to_lowercase);
            for (index, entry) in entries.iter().enumerate() {
                let Ok(row) = doc.create_element("li") else {
                    continue;
                };
                let highlighted = current
                    .as_deref()
                    .is_some_and(|c| c == entry.nickname.to_lowercase());
                let style = if highlighted { ROW_HIGHLIGHT_STYLE } else { ROW_STYLE };
                row.set_attribute("style", style).ok();
                row.set_text_content(Some(&format!("{}. {}", index + 1, entry.nickname)));
                if let Ok(badge) = doc.create_element("span") {
                    badge.set_attribute("style", SCORE_STYLE).ok();
                    badge.set_text_content(Some(&format!("{} m", entry.score)));
                    row.append_child(&badge).ok();
                }
                list.append_child(&row).ok();
            }
            root.append_child(&list).ok();
        }

        if let Some(back) = overlay::create_button(&doc, "Back", "menu") {
            root.append_child(&back).ok();
        }

        if let Some(body) = doc.body() {
            body.append_child(&root).ok();
        }
    }

    fn on_exit(&mut self, _env: &mut Env, _to: &'static str) {
        overlay::remove_overlay("ranking-overlay");
    }

    fn render(&mut self, env: &mut Env, ctx: &CanvasRenderingContext2d) {
        let (width, height) = (env.config.width, env.config.height);
        ctx.set_fill_style_str("#1c2541");
        ctx.fill_rect(0.0, 0.0, width, height);
        ctx.set_fill_style_str("#5bc0be");
        ctx.set_font("32px 'Segoe UI', sans-serif");
        ctx.fill_text("Who leads the chase?", 260.0, height / 2.0).ok();
    }

    fn handle_input(&mut self, env: &mut Env, event: &InputEvent) {
        match event {
            InputEvent::Action("menu") => env.go_to("menu"),
            InputEvent::Key(code) if code == "Escape" => env.go_to("menu"),
            _ => {}
        }
    }
}

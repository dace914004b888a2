//! Title screen: nickname entry and navigation into the run or the ranking.

use web_sys::{CanvasRenderingContext2d, Element, HtmlInputElement};

use wasm_bindgen::JsCast;

use crate::game::{Env, InputEvent, Scene};
use crate::overlay;

const SUBTITLE_STYLE: &str = "margin:0; font-size:17px; opacity:0.9; line-height:1.5;";
const INPUT_STYLE: &str = "font-size:18px; padding:10px 14px; border-radius:10px; \
    border:2px solid #5bc0be; background:rgba(11,19,43,0.85); color:#f8ffe5; \
    text-align:center; width:240px;";
const ERROR_STYLE: &str = "min-height:20px; font-size:14px; color:#ef476f;";
const HELPER_STYLE: &str = "margin:0; font-size:13px; opacity:0.7;";
const BUTTON_ROW_STYLE: &str = "display:flex; gap:16px;";

#[derive(Default)]
pub struct MenuScene {
    input: Option<HtmlInputElement>,
    error: Option<Element>,
}

impl MenuScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn show_error(&self, message: &str) {
        if let Some(error) = &self.error {
            error.set_text_content(Some(message));
        }
    }

    fn try_start(&mut self, env: &mut Env) {
        let Some(input) = &self.input else { return };
        let nickname = input.value().trim().to_owned();
        if nickname.is_empty() {
            self.show_error("Pick a nickname to join the run.");
            return;
        }

        let taken = !env.ranking.is_nickname_available(&nickname);
        let is_current = env
            .ranking
            .current_player()
            .is_some_and(|p| p.to_lowercase() == nickname.to_lowercase());
        if taken && !is_current {
            self.show_error("Nickname already on the local ranking. Try another.");
            return;
        }

        env.ranking.set_current_player(&nickname);
        env.score.save_last_nickname(&nickname);
        env.go_to("game");
    }
}

impl Scene for MenuScene {
    fn id(&self) -> &'static str {
        "menu"
    }

    fn on_enter(&mut self, env: &mut Env, _from: Option<&'static str>) {
        let Some(doc) = overlay::document() else {
            return;
        };
        let Some(root) = overlay::create_overlay(&doc, "menu-overlay") else {
            return;
        };

        if let Some(title) = overlay::create_title(&doc, "Diploma Dash") {
            root.append_child(&title).ok();
        }
        if let Some(subtitle) = overlay::create_text(
            &doc,
            "Outrun the professor and chase the diploma as far as you can.",
            SUBTITLE_STYLE,
        ) {
            root.append_child(&subtitle).ok();
        }

        if let Ok(element) = doc.create_element("input") {
            if let Ok(input) = element.dyn_into::<HtmlInputElement>() {
                input.set_type("text");
                input.set_placeholder("Type your nickname");
                input.set_max_length(16);
                input.set_attribute("style", INPUT_STYLE).ok();
                if let Some(last) = env.score.last_nickname() {
                    input.set_value(&last);
                }
                root.append_child(&input).ok();
                self.input = Some(input);
            }
        }

        if let Ok(error) = doc.create_element("span") {
            error.set_attribute("style", ERROR_STYLE).ok();
            root.append_child(&error).ok();
            self.error = Some(error);
        }

        if let Ok(buttons) = doc.create_element("div") {
            buttons.set_attribute("style", BUTTON_ROW_STYLE).ok();
            if let Some(play) = overlay::create_button(&doc, "Play", "play") {
                buttons.append_child(&play).ok();
            }
            if let Some(ranking) = overlay::create_button(&doc, "Ranking", "ranking") {
                buttons.append_child(&ranking).ok();
            }
            root.append_child(&buttons).ok();
        }

        if let Some(helper) = overlay::create_text(
            &doc,
            "Tip: Space also starts the run.",
            HELPER_STYLE,
        ) {
            root.append_child(&helper).ok();
        }

        if let Some(body) = doc.body() {
            body.append_child(&root).ok();
        }
    }

    fn on_exit(&mut self, env: &mut Env, _to: &'static str) {
        if let Some(input) = &self.input {
            env.score.save_last_nickname(input.value().trim());
        }
        overlay::remove_overlay("menu-overlay");
        self.input = None;
        self.error = None;
    }

    fn render(&mut self, env: &mut Env, ctx: &CanvasRenderingContext2d) {
        let (width, height) = (env.config.width, env.config.height);
        ctx.set_fill_style_str("#130b32");
        ctx.fill_rect(0.0, 0.0, width, height);
        // Faint teal glow over the top band.
        ctx.set_fill_style_str("rgba(72, 209, 204, 0.12)");
        ctx.fill_rect(0.0, 0.0, width, height * 0.4);
    }

    fn handle_input(&mut self, env: &mut Env, event: &InputEvent) {
        match event {
            InputEvent::Action("play") => self.try_start(env),
            InputEvent::Action("ranking") => env.go_to("ranking"),
            InputEvent::Key(code) if code == "Space" => self.try_start(env),
            _ => {}
        }
    }
}

//! DOM overlay helpers for the menu / game-over / ranking screens.
//!
//! Overlays are built in scene enter hooks and torn down in exit hooks;
//! update/render never touch the DOM. Buttons feed back into the game
//! through the normal input dispatch path as [`InputEvent::Action`] values.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element};

use crate::game::InputEvent;

const OVERLAY_STYLE: &str = "position:absolute; top:0; left:0; width:100%; height:100%; \
    display:flex; flex-direction:column; align-items:center; justify-content:center; \
    gap:14px; color:#f8ffe5; font-family:'Segoe UI', sans-serif; text-align:center; z-index:30;";

const TITLE_STYLE: &str = "margin:0; font-size:42px; letter-spacing:1px; text-shadow:0 3px 12px rgba(0,0,0,0.6);";

const BUTTON_STYLE: &str = "cursor:pointer; font-size:17px; padding:10px 22px; border-radius:10px; \
    border:2px solid #5bc0be; background:rgba(11,19,43,0.85); color:#f8ffe5;";

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Create a full-screen overlay container, replacing any stale one with the
/// same id.
pub fn create_overlay(doc: &Document, id: &str) -> Option<Element> {
    if let Some(existing) = doc.get_element_by_id(id) {
        existing.remove();
    }
    let overlay = doc.create_element("div").ok()?;
    overlay.set_id(id);
    overlay.set_attribute("style", OVERLAY_STYLE).ok();
    Some(overlay)
}

pub fn remove_overlay(id: &str) {
    if let Some(doc) = document() {
        if let Some(el) = doc.get_element_by_id(id) {
            el.remove();
        }
    }
}

pub fn create_title(doc: &Document, text: &str) -> Option<Element> {
    let title = doc.create_element("h1").ok()?;
    title.set_text_content(Some(text));
    title.set_attribute("style", TITLE_STYLE).ok();
    Some(title)
}

pub fn create_text(doc: &Document, text: &str, style: &str) -> Option<Element> {
    let p = doc.create_element("p").ok()?;
    p.set_text_content(Some(text));
    p.set_attribute("style", style).ok();
    Some(p)
}

/// Button wired to dispatch `InputEvent::Action(action)` on click.
pub fn create_button(doc: &Document, label: &str, action: &'static str) -> Option<Element> {
    let button = doc.create_element("button").ok()?;
    button.set_text_content(Some(label));
    button.set_attribute("style", BUTTON_STYLE).ok();
    let closure = Closure::wrap(Box::new(move || {
        crate::dispatch(InputEvent::Action(action));
    }) as Box<dyn FnMut()>);
    button
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
    Some(button)
}

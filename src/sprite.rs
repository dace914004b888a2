//! Url-memoized sprite image cache.
//!
//! Handles may not have finished loading; renderers poll [`SpriteCache::ready`]
//! and fall back to a flat accent rectangle until the image is complete.

use std::collections::HashMap;

use web_sys::HtmlImageElement;

#[derive(Default)]
pub struct SpriteCache {
    cache: HashMap<String, HtmlImageElement>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or reuse) a load for `url`. `None` only if the host cannot
    /// create image elements at all.
    pub fn load(&mut self, url: &str) -> Option<HtmlImageElement> {
        if let Some(image) = self.cache.get(url) {
            return Some(image.clone());
        }
        let image = HtmlImageElement::new().ok()?;
        image.set_src(url);
        self.cache.insert(url.to_owned(), image.clone());
        Some(image)
    }

    /// The cached image for `url`, only once it has finished loading.
    pub fn ready(&mut self, url: &str) -> Option<HtmlImageElement> {
        self.load(url).filter(|image| image.complete())
    }
}

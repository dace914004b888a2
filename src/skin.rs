//! Selectable player skins.
//!
//! Each skin carries its render size, a collision hitbox (smaller than the
//! render box, offset inward) and an accent color used whenever the sprite
//! image has not finished loading.

#[derive(Clone, Copy, Debug)]
pub struct Hitbox {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Skin {
    pub id: &'static str,
    pub name: &'static str,
    pub sprite_url: &'static str,
    pub render_width: f64,
    pub render_height: f64,
    pub hitbox: Hitbox,
    pub accent_color: &'static str,
}

pub const DEFAULT_SKIN_ID: &str = "nina";

pub static SKINS: [Skin; 3] = [
    Skin {
        id: "nina",
        name: "Nina",
        sprite_url: "assets/nina.svg",
        render_width: 40.0,
        render_height: 50.0,
        hitbox: Hitbox {
            offset_x: 4.0,
            offset_y: 8.0,
            width: 32.0,
            height: 42.0,
        },
        accent_color: "#ff8fab",
    },
    Skin {
        id: "leo",
        name: "Leo",
        sprite_url: "assets/leo.svg",
        render_width: 44.0,
        render_height: 52.0,
        hitbox: Hitbox {
            offset_x: 5.0,
            offset_y: 8.0,
            width: 34.0,
            height: 44.0,
        },
        accent_color: "#118ab2",
    },
    Skin {
        id: "ada",
        name: "Ada",
        sprite_url: "assets/ada.svg",
        render_width: 38.0,
        render_height: 50.0,
        hitbox: Hitbox {
            offset_x: 4.0,
            offset_y: 8.0,
            width: 30.0,
            height: 42.0,
        },
        accent_color: "#9d4edd",
    },
];

/// Look up a skin by its persisted id, falling back to the default skin.
pub fn by_id(id: &str) -> &'static Skin {
    SKINS.iter().find(|s| s.id == id).unwrap_or(&SKINS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_registered_skin() {
        assert_eq!(by_id("leo").name, "Leo");
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        assert_eq!(by_id("missing").id, DEFAULT_SKIN_ID);
    }

    #[test]
    fn hitboxes_fit_inside_render_boxes() {
        for skin in &SKINS {
            assert!(skin.hitbox.offset_x + skin.hitbox.width <= skin.render_width);
            assert!(skin.hitbox.offset_y + skin.hitbox.height <= skin.render_height);
        }
    }
}

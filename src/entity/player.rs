//! The controllable avatar. Vertical-only physics: gravity, jump impulse,
//! ground/ceiling clamping. The x position stays at the start column — the
//! world scrolls past the player — except while the chase pins the sprite
//! against an obstacle.

use web_sys::CanvasRenderingContext2d;

use crate::entity::Rect;
use crate::skin::Skin;
use crate::sprite::SpriteCache;

pub const GRAVITY: f64 = 1200.0;
pub const PLAYER_START_X: f64 = 120.0;
const JUMP_IMPULSE: f64 = -600.0;

pub struct Player {
    pub x: f64,
    pub y: f64,
    velocity_y: f64,
    frozen: bool,
    skin: &'static Skin,
    ground_y: f64,
}

impl Player {
    pub fn new(ground_y: f64, skin: &'static Skin) -> Self {
        Self {
            x: PLAYER_START_X,
            y: ground_y - skin.render_height,
            velocity_y: 0.0,
            frozen: false,
            skin,
            ground_y,
        }
    }

    pub fn skin(&self) -> &'static Skin {
        self.skin
    }

    /// Swap the active skin and re-seat the avatar on the ground.
    pub fn set_skin(&mut self, skin: &'static Skin) {
        self.skin = skin;
        self.y = self.ground_y - skin.render_height;
    }

    pub fn width(&self) -> f64 {
        self.skin.render_width
    }

    pub fn height(&self) -> f64 {
        self.skin.render_height
    }

    pub fn velocity_y(&self) -> f64 {
        self.velocity_y
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn jump(&mut self) {
        if self.frozen {
            return;
        }
        self.velocity_y = JUMP_IMPULSE;
    }

    /// Suspend physics and jump input; y is left where it is.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.velocity_y = 0.0;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn reset(&mut self) {
        self.x = PLAYER_START_X;
        self.y = self.ground_y - self.skin.render_height;
        self.velocity_y = 0.0;
        self.frozen = false;
    }

    pub fn update(&mut self, dt: f64) {
        if self.frozen {
            return;
        }

        self.velocity_y += GRAVITY * dt;
        self.y += self.velocity_y * dt;

        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity_y = 0.0;
        }

        if self.y + self.skin.render_height >= self.ground_y {
            self.y = self.ground_y - self.skin.render_height;
            self.velocity_y = 0.0;
        }
    }

    /// Collision rectangle: the skin hitbox, independent of the render size.
    pub fn hitbox(&self) -> Rect {
        let hb = &self.skin.hitbox;
        Rect::new(
            self.x + hb.offset_x,
            self.y + hb.offset_y,
            hb.width,
            hb.height,
        )
    }

    pub fn render(&self, ctx: &CanvasRenderingContext2d, sprites: &mut SpriteCache) {
        if let Some(image) = sprites.ready(self.skin.sprite_url) {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &image,
                self.x,
                self.y,
                self.skin.render_width,
                self.skin.render_height,
            )
            .ok();
        } else {
            ctx.set_fill_style_str(self.skin.accent_color);
            ctx.fill_rect(self.x, self.y, self.skin.render_width, self.skin.render_height);
        }
    }
}

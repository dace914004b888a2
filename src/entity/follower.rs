//! Flapping follower NPCs. Both the diploma lure and the pursuing professor
//! integrate the same vertical physics as the player; their horizontal
//! position is always an offset from the player's column. The professor
//! steers itself toward the open gap of the nearest upcoming obstacle; the
//! diploma only mirrors the player's jump timing.

use crate::entity::player::GRAVITY;
use crate::entity::{Obstacle, Rect};

/// Extra slack below the steering target before an autonomous flap fires.
const AUTO_FLAP_SLACK: f64 = 12.0;
/// Keeps the follower's body clear of the pillar edges when threading a gap.
const GAP_MARGIN: f64 = 10.0;
/// Cruising clearance above the ground when no obstacle is ahead.
const GROUND_HOVER: f64 = 30.0;

pub struct Follower {
    pub y: f64,
    velocity_y: f64,
    width: f64,
    height: f64,
    flap_impulse: f64,
    ground_y: f64,
}

impl Follower {
    pub fn new(width: f64, height: f64, flap_impulse: f64, ground_y: f64) -> Self {
        Self {
            y: ground_y - height,
            velocity_y: 0.0,
            width,
            height,
            flap_impulse,
            ground_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn velocity_y(&self) -> f64 {
        self.velocity_y
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn reset(&mut self) {
        self.y = self.ground_y - self.height;
        self.velocity_y = 0.0;
    }

    pub fn flap(&mut self) {
        self.velocity_y = self.flap_impulse;
    }

    /// Flap when the body has sagged below the steering target.
    pub fn steer_toward(&mut self, target_y: f64) {
        if self.center_y() > target_y + AUTO_FLAP_SLACK {
            self.flap();
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.velocity_y += GRAVITY * dt;
        self.y += self.velocity_y * dt;

        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity_y = 0.0;
        }

        if self.y + self.height >= self.ground_y {
            self.y = self.ground_y - self.height;
            self.velocity_y = 0.0;
        }
    }

    /// The body rectangle at the given anchored x.
    pub fn bounds_at(&self, x: f64) -> Rect {
        Rect::new(x, self.y, self.width, self.height)
    }

    /// Steering target (a center-y): the gap center of the nearest obstacle
    /// whose right edge is still ahead of the anchor, clamped so the body
    /// stays fully inside the gap; near-ground cruise when nothing is ahead.
    pub fn gap_target<'a>(
        &self,
        obstacles: impl Iterator<Item = &'a Obstacle>,
        anchor_x: f64,
    ) -> f64 {
        let next = obstacles
            .filter(|o| o.right() > anchor_x)
            .min_by(|a, b| a.x.total_cmp(&b.x));
        match next {
            None => self.ground_y - self.height / 2.0 - GROUND_HOVER,
            Some(o) => {
                let lo = o.gap_top() + self.height / 2.0 + GAP_MARGIN;
                let hi = o.gap_bottom() - self.height / 2.0 - GAP_MARGIN;
                o.gap_center().clamp(lo, hi.max(lo))
            }
        }
    }
}

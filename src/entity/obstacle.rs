//! Gap-pillar obstacles. One spawn produces a top and a bottom pillar
//! sharing the same column, with a randomized gap the player (and the
//! pursuing professor) must thread.

use web_sys::CanvasRenderingContext2d;

use crate::entity::Rect;
use crate::rng::Lcg;

const MIN_WIDTH: f64 = 70.0;
const WIDTH_JITTER: f64 = 24.0;
const MIN_GAP: f64 = 170.0;
const GAP_JITTER: f64 = 26.0;
const MIN_PILLAR: f64 = 30.0;
const MIN_SPEED_BONUS: f64 = 20.0;
const SPEED_BONUS_JITTER: f64 = 60.0;
const SHADING_BAND: f64 = 8.0;

const PALETTE: [&str; 4] = ["#ef476f", "#ffd166", "#06d6a0", "#118ab2"];

pub struct Obstacle {
    pub x: f64,
    width: f64,
    top_height: f64,
    gap_size: f64,
    /// Playable height above the ground band; the bottom pillar ends here.
    ceiling: f64,
    speed_bonus: f64,
    color: &'static str,
    engaged: bool,
}

impl Obstacle {
    /// Spawn just past the right edge of the playfield. Both pillars keep
    /// at least the minimum height and the column always sums exactly to
    /// the playable height.
    pub fn spawn(field_width: f64, ceiling: f64, rng: &mut Lcg) -> Self {
        let width = MIN_WIDTH + rng.next_f64() * WIDTH_JITTER;
        let gap_size = MIN_GAP + rng.next_f64() * GAP_JITTER;
        let max_top = (ceiling - gap_size - MIN_PILLAR).max(MIN_PILLAR);
        let top_height = MIN_PILLAR + rng.next_f64() * (max_top - MIN_PILLAR);
        let speed_bonus = MIN_SPEED_BONUS + rng.next_f64() * SPEED_BONUS_JITTER;
        let color = *rng.pick(&PALETTE);
        Self {
            x: field_width + width,
            width,
            top_height,
            gap_size,
            ceiling,
            speed_bonus,
            color,
            engaged: false,
        }
    }

    pub fn update(&mut self, dt: f64, scroll_speed: f64) {
        self.x -= (scroll_speed + self.speed_bonus) * dt;
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn gap_top(&self) -> f64 {
        self.top_height
    }

    pub fn gap_bottom(&self) -> f64 {
        self.top_height + self.gap_size
    }

    pub fn gap_center(&self) -> f64 {
        self.top_height + self.gap_size / 2.0
    }

    /// Top pillar, then bottom pillar.
    pub fn bounds(&self) -> [Rect; 2] {
        [
            Rect::new(self.x, 0.0, self.width, self.top_height),
            Rect::new(
                self.x,
                self.gap_bottom(),
                self.width,
                self.ceiling - self.gap_bottom(),
            ),
        ]
    }

    /// Pin this obstacle into the stuck/chase interaction; it is exempt from
    /// off-screen removal until the chase resolves.
    pub fn engage(&mut self) {
        self.engaged = true;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        ctx.set_fill_style_str(self.color);
        ctx.fill_rect(self.x, 0.0, self.width, self.top_height);
        let bottom_y = self.gap_bottom();
        ctx.fill_rect(self.x, bottom_y, self.width, self.ceiling - bottom_y);

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.15)");
        ctx.fill_rect(
            self.x,
            self.ceiling - SHADING_BAND,
            self.width,
            SHADING_BAND,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD_WIDTH: f64 = 960.0;
    const CEILING: f64 = 460.0;

    #[test]
    fn spawn_geometry_is_valid() {
        let mut rng = Lcg::seeded(11);
        for _ in 0..200 {
            let o = Obstacle::spawn(FIELD_WIDTH, CEILING, &mut rng);
            assert!(o.width() > 0.0);
            assert!(o.gap_top() >= MIN_PILLAR);
            assert!(o.gap_bottom() <= CEILING - MIN_PILLAR);
            assert!(o.gap_bottom() - o.gap_top() >= MIN_GAP);
            let [top, bottom] = o.bounds();
            // The column sums exactly to the playable height.
            assert!((top.h + (o.gap_bottom() - o.gap_top()) + bottom.h - CEILING).abs() < 1e-9);
        }
    }

    #[test]
    fn spawns_past_right_edge() {
        let mut rng = Lcg::seeded(5);
        let o = Obstacle::spawn(FIELD_WIDTH, CEILING, &mut rng);
        assert!(o.x >= FIELD_WIDTH);
    }

    #[test]
    fn moves_left_by_scroll_plus_bonus() {
        let mut rng = Lcg::seeded(5);
        let mut o = Obstacle::spawn(FIELD_WIDTH, CEILING, &mut rng);
        let before = o.x;
        o.update(1.0, 250.0);
        let travelled = before - o.x;
        assert!(travelled >= 250.0 + MIN_SPEED_BONUS);
        assert!(travelled <= 250.0 + MIN_SPEED_BONUS + SPEED_BONUS_JITTER);
    }

    #[test]
    fn off_screen_once_fully_past_left_edge() {
        let mut rng = Lcg::seeded(5);
        let mut o = Obstacle::spawn(FIELD_WIDTH, CEILING, &mut rng);
        assert!(!o.is_off_screen());
        o.x = -o.width();
        assert!(!o.is_off_screen()); // right edge exactly at zero
        o.x = -o.width() - 1.0;
        assert!(o.is_off_screen());
    }

    #[test]
    fn gap_center_sits_between_pillars() {
        let mut rng = Lcg::seeded(21);
        for _ in 0..50 {
            let o = Obstacle::spawn(FIELD_WIDTH, CEILING, &mut rng);
            assert!(o.gap_center() > o.gap_top());
            assert!(o.gap_center() < o.gap_bottom());
        }
    }
}

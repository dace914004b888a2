//! Deterministic pseudo-random source for obstacle and cloud generation.
//!
//! A small 32-bit linear congruential generator (not crypto secure). The
//! browser build seeds it from the page clock; tests inject a fixed seed so
//! procedural generation is reproducible.

const MULTIPLIER: u64 = 1_664_525;
const INCREMENT: u64 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0; // 2^32

#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn seeded(seed: u64) -> Self {
        Self {
            state: seed & 0xFFFF_FFFF,
        }
    }

    /// Seed from `performance.now()`, the clock the browser loop already runs on.
    pub fn from_clock() -> Self {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        Self::seeded(now as u64)
    }

    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & 0xFFFF_FFFF;
        self.state
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / MODULUS
    }

    /// Uniform draw in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty());
        let idx = (self.next_f64() * items.len() as f64) as usize % items.len();
        &items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Lcg::seeded(42);
        let mut b = Lcg::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Lcg::seeded(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn range_respects_bounds() {
        let mut rng = Lcg::seeded(9);
        for _ in 0..1000 {
            let v = rng.range(70.0, 94.0);
            assert!((70.0..94.0).contains(&v));
        }
    }

    #[test]
    fn pick_returns_slice_member() {
        let mut rng = Lcg::seeded(3);
        let items = ["a", "b", "c", "d"];
        for _ in 0..100 {
            let chosen = rng.pick(&items);
            assert!(items.contains(chosen));
        }
    }
}

//! Deterministic random numbers for wander target selection.
//!
//! PCG-XSH-RR: 64-bit state, 32-bit output. Each agent owns one stream, so
//! two agents with the same seed and the same tree wander identically —
//! replays and tests stay reproducible without threading a world RNG through
//! the interpreter.

use ai_tree::Vec2;

/// Permuted congruential generator (XSH-RR variant).
#[derive(Clone, Debug)]
pub struct Pcg32 {
    state: u64,
}

impl Pcg32 {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        // One warm-up step mixes the seed into the state.
        let mut rng = Self {
            state: seed.wrapping_add(Self::INCREMENT),
        };
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        let state = self.state;
        self.state = state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);

        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform in `[0, 1)` with 24 bits of precision.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniformly distributed point inside the unit disc.
    pub fn in_unit_circle(&mut self) -> Vec2 {
        let radius = self.next_f32().sqrt();
        let angle = self.next_f32() * std::f32::consts::TAU;
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    }
}

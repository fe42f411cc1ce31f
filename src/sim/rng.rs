//! Injectable random source for spawning
//!
//! Runs use a seeded `Pcg32`. Tests drive spawn decisions with a scripted
//! sequence so scenarios are reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples for spawn and pattern decisions
pub trait RandomSource {
    /// Uniform sample in [0, 1)
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..len` (0 when `len` is 0)
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f32) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Uniform value in [0, span)
    fn up_to(&mut self, span: f64) -> f64 {
        f64::from(self.next_unit()) * span
    }
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded generator for a run
pub fn run_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }

    /// Always returns the same sample
    pub fn constant(value: f32) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

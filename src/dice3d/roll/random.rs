//! Random sources for rolls
//!
//! The controller only needs two things from randomness: a face number and a
//! spin direction. Tests and the CLI's `--force` swap in a scripted source.

use std::collections::VecDeque;

use bevy::math::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dice3d::types::FACE_COUNT;

pub trait RollRandom {
    /// Uniform face number in `1..=20`.
    fn roll_face(&mut self) -> u8;

    /// Unit-length direction for the initial angular velocity.
    fn spin_direction(&mut self) -> DVec3;
}

/// Default random source backed by `StdRng`.
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic roller; the same seed yields the same sequence of rolls.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Roller {
    fn default() -> Self {
        Self::new()
    }
}

impl RollRandom for Roller {
    fn roll_face(&mut self) -> u8 {
        self.rng.gen_range(1..=FACE_COUNT)
    }

    fn spin_direction(&mut self) -> DVec3 {
        // Components in -0.5..0.5; reject the (vanishingly rare) near-zero draw.
        loop {
            let v = DVec3::new(
                self.rng.gen::<f64>() - 0.5,
                self.rng.gen::<f64>() - 0.5,
                self.rng.gen::<f64>() - 0.5,
            );
            if v.length_squared() > 1e-12 {
                return v.normalize();
            }
        }
    }
}

/// Scripted source: hands out the given faces in order, then repeats the
/// last one. Spin direction is fixed.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    faces: VecDeque<u8>,
    last: u8,
    spin: DVec3,
}

impl FixedSequence {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        let faces: VecDeque<u8> = faces
            .into_iter()
            .map(|f| f.clamp(1, FACE_COUNT))
            .collect();
        let last = faces.front().copied().unwrap_or(1);
        Self {
            faces,
            last,
            spin: DVec3::new(1.0, 0.5, -0.25).normalize(),
        }
    }

    pub fn with_spin(mut self, direction: DVec3) -> Self {
        self.spin = direction.try_normalize().unwrap_or(DVec3::X);
        self
    }
}

impl RollRandom for FixedSequence {
    fn roll_face(&mut self) -> u8 {
        if let Some(face) = self.faces.pop_front() {
            self.last = face;
        }
        self.last
    }

    fn spin_direction(&mut self) -> DVec3 {
        self.spin
    }
}

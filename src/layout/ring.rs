use std::f64::consts::TAU;

use rand::{Rng, seq::SliceRandom};

use crate::layout::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// Run-scoped memo of candidate rings keyed by integer radius.
///
/// Entries are computed once and never change; shuffling always works on a
/// copy so the cached order stays stable.
#[derive(Debug)]
pub struct RingCache {
    center: (f64, f64),
    ellipticity: f64,
    shape: Shape,
    rings: Vec<Option<Vec<Candidate>>>,
}

impl RingCache {
    #[must_use]
    pub fn new(center: (f64, f64), ellipticity: f64, shape: Shape) -> Self {
        Self {
            center,
            ellipticity,
            shape,
            rings: Vec::new(),
        }
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.rings.iter().filter(|ring| ring.is_some()).count()
    }

    pub fn ring(&mut self, radius: usize) -> &[Candidate] {
        if self.rings.len() <= radius {
            self.rings.resize(radius + 1, None);
        }
        let (center, ellipticity, shape) = (self.center, self.ellipticity, &self.shape);
        self.rings[radius].get_or_insert_with(|| points_at_radius(center, ellipticity, shape, radius))
    }

    pub fn shuffled<R: Rng + ?Sized>(&mut self, radius: usize, rng: &mut R) -> Vec<Candidate> {
        let mut ring = self.ring(radius).to_vec();
        ring.shuffle(rng);
        ring
    }
}

/// `8 * radius` points, walked from `t = T - 1` down to zero.
fn points_at_radius(
    (cx, cy): (f64, f64),
    ellipticity: f64,
    shape: &Shape,
    radius: usize,
) -> Vec<Candidate> {
    if radius == 0 {
        return vec![Candidate {
            x: cx,
            y: cy,
            theta: 0.0,
        }];
    }

    let total = radius * 8;
    let r = radius as f64;
    (0..total)
        .rev()
        .map(|t| {
            let theta = t as f64 / total as f64 * TAU;
            let scale = if shape.is_circle() { 1.0 } else { shape.scale(theta) };
            Candidate {
                x: cx + r * scale * (-theta).cos(),
                y: cy + r * scale * (-theta).sin() * ellipticity,
                theta,
            }
        })
        .collect()
}

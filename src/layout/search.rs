use rand::rngs::StdRng;

use crate::layout::{
    error::Deadline,
    footprint::Footprint,
    grid::OccupancyGrid,
    ring::{Candidate, RingCache},
};

/// Candidates tried between deadline samples inside a ring.
const DEADLINE_STRIDE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top-left grid cell of the oriented footprint.
    pub gx: i64,
    pub gy: i64,
    /// Candidate point the footprint was centered on.
    pub x: f64,
    pub y: f64,
    /// Ring radius the word landed on.
    pub distance: usize,
    pub theta: f64,
    pub rotated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Placed(Placement),
    NoSpace,
    TimedOut,
}

/// Every ink cell must land on a free, in-bounds grid cell.
#[must_use]
pub fn fits(grid: &OccupancyGrid, gx: i64, gy: i64, footprint: &Footprint, rotated: bool) -> bool {
    footprint
        .ink_offsets(rotated)
        .all(|(dx, dy)| grid.is_free(gx + dx as i64, gy + dy as i64))
}

/// Top-left anchor that centers the oriented footprint on `point`.
#[must_use]
pub fn anchor_for(point: &Candidate, footprint: &Footprint, rotated: bool) -> (i64, i64) {
    let (w, h) = footprint.extent(rotated);
    (
        (point.x - w as f64 / 2.0).floor() as i64,
        (point.y - h as f64 / 2.0).floor() as i64,
    )
}

/// Walks rings outward from the center and returns the first candidate the
/// footprint fits at. Leaves the grid untouched.
pub fn find_position(
    grid: &OccupancyGrid,
    rings: &mut RingCache,
    footprint: &Footprint,
    rotated: bool,
    max_radius: usize,
    mut shuffle: Option<&mut StdRng>,
    deadline: &Deadline,
) -> SearchOutcome {
    for r in (0..=max_radius).rev() {
        let distance = max_radius - r;
        let shuffled;
        let ring: &[Candidate] = match shuffle.as_deref_mut() {
            Some(rng) => {
                shuffled = rings.shuffled(distance, rng);
                &shuffled
            }
            None => rings.ring(distance),
        };

        for (tried, point) in ring.iter().enumerate() {
            if tried > 0 && tried % DEADLINE_STRIDE == 0 && deadline.exceeded() {
                return SearchOutcome::TimedOut;
            }
            let (gx, gy) = anchor_for(point, footprint, rotated);
            if fits(grid, gx, gy, footprint, rotated) {
                return SearchOutcome::Placed(Placement {
                    gx,
                    gy,
                    x: point.x,
                    y: point.y,
                    distance,
                    theta: point.theta,
                    rotated,
                });
            }
        }

        if deadline.exceeded() {
            return SearchOutcome::TimedOut;
        }
    }
    SearchOutcome::NoSpace
}

/// [`find_position`] followed by the commit on success.
pub fn place(
    grid: &mut OccupancyGrid,
    rings: &mut RingCache,
    footprint: &Footprint,
    rotated: bool,
    max_radius: usize,
    shuffle: Option<&mut StdRng>,
    deadline: &Deadline,
) -> SearchOutcome {
    let outcome = find_position(grid, rings, footprint, rotated, max_radius, shuffle, deadline);
    if let SearchOutcome::Placed(placement) = &outcome {
        grid.occupy(placement.gx, placement.gy, footprint, rotated);
    }
    outcome
}

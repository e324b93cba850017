#![allow(dead_code)]

use clap::Parser;
use terminal_wordcloud::{
    cli::Cli,
    layout::{
        Deadline, Footprint, OccupancyGrid, Shape,
        options::max_radius,
        ring::RingCache,
        search::{SearchOutcome, find_position, place},
    },
};

/// Empty grid plus a ring cache centered on it.
pub struct Field {
    pub grid: OccupancyGrid,
    pub rings: RingCache,
    pub max_radius: usize,
}

impl Field {
    pub fn new(ngx: usize, ngy: usize, ellipticity: f64) -> Self {
        Self {
            grid: OccupancyGrid::clear(ngx, ngy),
            rings: RingCache::new(
                (ngx as f64 / 2.0, ngy as f64 / 2.0),
                ellipticity,
                Shape::Circle,
            ),
            max_radius: max_radius(ngx, ngy),
        }
    }

    /// Every cell occupied except `free`.
    pub fn blocked_except(ngx: usize, ngy: usize, ellipticity: f64, free: &[(i64, i64)]) -> Self {
        let mut field = Self::new(ngx, ngy, ellipticity);
        for y in 0..ngy as i64 {
            for x in 0..ngx as i64 {
                if !free.contains(&(x, y)) {
                    field.grid.occupy_cell(x, y);
                }
            }
        }
        field
    }

    pub fn find(&mut self, footprint: &Footprint, rotated: bool) -> SearchOutcome {
        find_position(
            &self.grid,
            &mut self.rings,
            footprint,
            rotated,
            self.max_radius,
            None,
            &Deadline::none(),
        )
    }

    pub fn place(&mut self, footprint: &Footprint, rotated: bool) -> SearchOutcome {
        place(
            &mut self.grid,
            &mut self.rings,
            footprint,
            rotated,
            self.max_radius,
            None,
            &Deadline::none(),
        )
    }
}

pub fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["terminal-wordcloud"];
    full.extend_from_slice(args);
    Cli::parse_from(full)
}

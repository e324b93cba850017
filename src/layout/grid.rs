use crate::layout::{
    footprint::Footprint,
    surface::{Rgb, Surface},
};

/// Free/occupied state of every grid cell on the surface. `true` is free.
///
/// Cells only ever go from free to occupied within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    ngx: usize,
    ngy: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Grid dimensions covering a `width x height` pixel surface.
    #[must_use]
    pub fn dimensions(width: u32, height: u32, grid_size: u32) -> (usize, usize) {
        let g = grid_size.max(1);
        (width.div_ceil(g) as usize, height.div_ceil(g) as usize)
    }

    #[must_use]
    pub fn clear(ngx: usize, ngy: usize) -> Self {
        Self {
            ngx,
            ngy,
            cells: vec![true; ngx * ngy],
        }
    }

    /// Seeds the grid from existing content: a cell is occupied if any of
    /// its pixels differs from `background`.
    #[must_use]
    pub fn from_surface(surface: &dyn Surface, grid_size: u32, background: Rgb) -> Self {
        let g = grid_size.max(1);
        let (width, height) = (surface.width(), surface.height());
        let (ngx, ngy) = Self::dimensions(width, height, g);
        let mut grid = Self::clear(ngx, ngy);

        for gy in 0..ngy {
            for gx in 0..ngx {
                let x0 = gx as u32 * g;
                let y0 = gy as u32 * g;
                let x1 = (x0 + g).min(width);
                let y1 = (y0 + g).min(height);
                let inked = (y0..y1)
                    .any(|y| (x0..x1).any(|x| surface.pixel(x, y) != background));
                if inked {
                    grid.cells[gy * ngx + gx] = false;
                }
            }
        }
        grid
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.ngx
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.ngy
    }

    /// Out-of-bounds cells are never free.
    #[must_use]
    pub fn is_free(&self, x: i64, y: i64) -> bool {
        match self.index(x, y) {
            Some(i) => self.cells[i],
            None => false,
        }
    }

    #[must_use]
    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|free| **free).count()
    }

    /// Marks a single cell occupied. Returns whether it was free before.
    pub fn occupy_cell(&mut self, x: i64, y: i64) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        std::mem::replace(&mut self.cells[i], false)
    }

    /// Commits a footprint anchored at `(gx, gy)`: every grid cell under an
    /// ink cell becomes occupied. Returns how many cells changed state.
    pub fn occupy(&mut self, gx: i64, gy: i64, footprint: &Footprint, rotated: bool) -> usize {
        footprint
            .ink_offsets(rotated)
            .filter(|&(dx, dy)| self.occupy_cell(gx + dx as i64, gy + dy as i64))
            .count()
    }

    /// Row-per-line dump, `.` free and `#` occupied.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity((self.ngx + 1) * self.ngy);
        for row in self.cells.chunks(self.ngx.max(1)) {
            out.extend(row.iter().map(|free| if *free { '.' } else { '#' }));
            out.push('\n');
        }
        out
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.ngx && y < self.ngy).then(|| y * self.ngx + x)
    }
}

use crate::layout::error::{Deadline, TimeBudgetExceeded};

/// Per-word ink mask at grid resolution.
///
/// `mask` is row-major, `true` meaning transparent and `false` meaning ink.
/// Only ink cells take part in collision checks, so the mask may carry
/// generous padding around the glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    gw: usize,
    gh: usize,
    mask: Vec<bool>,
    ink: Vec<(usize, usize)>,
    /// Integer upscale used to render below the minimum glyph size.
    pub mu: u32,
    pub font_size: f64,
    /// Text origin relative to the footprint center, in pixels.
    pub text_offset: (f64, f64),
    pub text_width: f64,
    pub text_height: f64,
}

impl Footprint {
    /// # Panics
    /// Panics when `mask.len() != gw * gh`.
    #[must_use]
    pub fn from_mask(gw: usize, gh: usize, mask: Vec<bool>) -> Self {
        assert_eq!(mask.len(), gw * gh, "footprint mask size mismatch");
        let ink = mask
            .iter()
            .enumerate()
            .filter(|(_, transparent)| !**transparent)
            .map(|(i, _)| (i % gw, i / gw))
            .collect();
        Self {
            gw,
            gh,
            mask,
            ink,
            mu: 1,
            font_size: 0.0,
            text_offset: (0.0, 0.0),
            text_width: 0.0,
            text_height: 0.0,
        }
    }

    #[must_use]
    pub fn transparent(gw: usize, gh: usize) -> Self {
        Self::from_mask(gw, gh, vec![true; gw * gh])
    }

    #[must_use]
    pub fn opaque(gw: usize, gh: usize) -> Self {
        Self::from_mask(gw, gh, vec![false; gw * gh])
    }

    /// A square footprint larger than a `ngx x ngy` grid in both orientations,
    /// inked only at its corners, so it never fits.
    #[must_use]
    pub fn unplaceable(ngx: usize, ngy: usize) -> Self {
        let side = ngx.max(ngy) + 1;
        let mut mask = vec![true; side * side];
        for (x, y) in [(0, 0), (side - 1, 0), (0, side - 1), (side - 1, side - 1)] {
            mask[y * side + x] = false;
        }
        Self::from_mask(side, side, mask)
    }

    /// Parses rows of `#` (ink) and `.` (transparent).
    ///
    /// # Panics
    /// Panics on ragged rows.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let gh = rows.len();
        let gw = rows.first().map_or(0, |row| row.chars().count());
        let mask = rows
            .iter()
            .flat_map(|row| {
                assert_eq!(row.chars().count(), gw, "ragged footprint row");
                row.chars().map(|c| c != '#')
            })
            .collect();
        Self::from_mask(gw, gh, mask)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.gw
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.gh
    }

    #[must_use]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        x < self.gw && y < self.gh && !self.mask[y * self.gw + x]
    }

    #[must_use]
    pub fn ink_count(&self) -> usize {
        self.ink.len()
    }

    /// Footprint size in grid cells once oriented.
    #[must_use]
    pub fn extent(&self, rotated: bool) -> (usize, usize) {
        if rotated {
            (self.gh, self.gw)
        } else {
            (self.gw, self.gh)
        }
    }

    /// Grid offsets of every ink cell for the given orientation. Fit test and
    /// commit both go through here so they can never disagree.
    pub fn ink_offsets(&self, rotated: bool) -> impl Iterator<Item = (usize, usize)> + '_ {
        let gw = self.gw;
        self.ink.iter().map(move |&(x, y)| orient(x, y, gw, rotated))
    }
}

/// 90° rotation remap of an unrotated mask cell `(x, y)`.
#[must_use]
pub fn orient(x: usize, y: usize, gw: usize, rotated: bool) -> (usize, usize) {
    if rotated { (y, gw - x - 1) } else { (x, y) }
}

#[derive(Debug, Clone, Copy)]
pub struct RasterRequest<'a> {
    pub text: &'a str,
    pub font_size: f64,
    pub min_size: f64,
    pub grid_size: u32,
    /// Occupancy grid size in cells, when known. Rasterizers may use it to
    /// avoid rendering words that cannot fit anywhere.
    pub grid_cells: Option<(usize, usize)>,
}

/// Turns a word at a font size into a footprint. Returns `Ok(None)` when the
/// word should be skipped because its size is at or below `min_size`.
pub trait Rasterizer: Send {
    fn is_supported(&self) -> bool {
        true
    }

    fn rasterize(
        &mut self,
        request: &RasterRequest<'_>,
        deadline: &Deadline,
    ) -> Result<Option<Footprint>, TimeBudgetExceeded>;
}

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use tracing::debug;

use crate::layout::{
    Deadline, DrawRequest, Footprint, RasterRequest, Rasterizer, Renderer, Surface,
    TimeBudgetExceeded,
};

/// Native edge of a `font8x8` glyph. Smaller sizes are rendered upscaled by
/// `mu` and sampled back down.
pub const NATIVE_GLYPH_PX: f64 = 8.0;

fn glyph_rows(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Smallest even factor lifting `font_size` to the native glyph size.
#[must_use]
pub fn upscale_factor(font_size: f64) -> u32 {
    if font_size >= NATIVE_GLYPH_PX {
        return 1;
    }
    let mu = (NATIVE_GLYPH_PX / font_size).ceil().max(2.0) as u32;
    mu + mu % 2
}

/// Bitmap dimensions of a word, known before rendering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextMetrics {
    mu: u32,
    glyph_px: usize,
    width: usize,
    height: usize,
}

impl TextMetrics {
    fn of(text: &str, font_size: f64) -> Self {
        let mu = upscale_factor(font_size);
        let glyph_px = (font_size * f64::from(mu)).round().max(1.0) as usize;
        let mu_us = mu as usize;
        Self {
            mu,
            glyph_px,
            width: (text.chars().count() * glyph_px).div_ceil(mu_us),
            height: glyph_px.div_ceil(mu_us),
        }
    }

    /// Footprint box in cells: the text padded by one text height per side.
    fn box_cells(self, grid_size: u32) -> (usize, usize) {
        let g = f64::from(grid_size.max(1));
        let fw = self.width as f64;
        let fh = self.height as f64;
        (
            ((fw + fh * 2.0) / g).ceil().max(1.0) as usize,
            ((fh * 3.0) / g).ceil().max(1.0) as usize,
        )
    }
}

/// Ink of a rendered word at final pixel resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBitmap {
    pub width: usize,
    pub height: usize,
    pub mu: u32,
    ink: Vec<bool>,
}

impl TextBitmap {
    /// Renders `text` at `font_size * mu` and folds each `mu x mu` block into
    /// one output pixel. The deadline is sampled once per rendered row.
    pub fn render(text: &str, font_size: f64, deadline: &Deadline) -> Result<Self, TimeBudgetExceeded> {
        let TextMetrics {
            mu,
            glyph_px,
            width,
            height,
        } = TextMetrics::of(text, font_size);
        let glyphs: Vec<[u8; 8]> = text.chars().map(glyph_rows).collect();
        let mu_us = mu as usize;
        let render_w = glyphs.len() * glyph_px;
        let mut ink = vec![false; width * height];

        for ry in 0..glyph_px {
            deadline.check()?;
            let sy = ry * 8 / glyph_px;
            for rx in 0..render_w {
                let glyph = &glyphs[rx / glyph_px];
                let sx = (rx % glyph_px) * 8 / glyph_px;
                if (glyph[sy] >> sx) & 1 == 1 {
                    ink[(ry / mu_us) * width + rx / mu_us] = true;
                }
            }
        }

        Ok(Self {
            width,
            height,
            mu,
            ink,
        })
    }

    pub fn ink_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width.max(1);
        self.ink
            .iter()
            .enumerate()
            .filter(|(_, inked)| **inked)
            .map(move |(i, _)| (i % width, i / width))
    }
}

/// Top-left of the text inside a `box_w x box_h` pixel box, given the text
/// offset from the box center.
fn text_origin(box_w: f64, box_h: f64, offset: (f64, f64)) -> (i64, i64) {
    (
        (box_w / 2.0 + offset.0).floor() as i64,
        (box_h / 2.0 + offset.1).floor() as i64,
    )
}

/// Rasterizer over the built-in 8x8 bitmap font.
///
/// The footprint box pads the text by one text height on every side.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    fn rasterize(
        &mut self,
        request: &RasterRequest<'_>,
        deadline: &Deadline,
    ) -> Result<Option<Footprint>, TimeBudgetExceeded> {
        if request.font_size <= request.min_size || request.font_size <= 0.0 {
            return Ok(None);
        }

        let (gw, gh) = TextMetrics::of(request.text, request.font_size).box_cells(request.grid_size);
        if let Some((ngx, ngy)) = request.grid_cells
            && (gw > ngx || gh > ngy)
            && (gh > ngx || gw > ngy)
        {
            debug!(text = request.text, gw, gh, ngx, ngy, "word larger than the grid");
            let mut footprint = Footprint::unplaceable(ngx, ngy);
            footprint.font_size = request.font_size;
            return Ok(Some(footprint));
        }

        let bitmap = TextBitmap::render(request.text, request.font_size, deadline)?;
        let g = f64::from(request.grid_size.max(1));
        let fw = bitmap.width as f64;
        let fh = bitmap.height as f64;
        let offset = (-fw / 2.0, -fh / 2.0);
        let (ox, oy) = text_origin(gw as f64 * g, gh as f64 * g, offset);

        let g = i64::from(request.grid_size.max(1));
        let mut mask = vec![true; gw * gh];
        for (x, y) in bitmap.ink_pixels() {
            let cx = (ox + x as i64) / g;
            let cy = (oy + y as i64) / g;
            if let (Ok(cx), Ok(cy)) = (usize::try_from(cx), usize::try_from(cy))
                && cx < gw
                && cy < gh
            {
                mask[cy * gw + cx] = false;
            }
        }

        let mut footprint = Footprint::from_mask(gw, gh, mask);
        footprint.mu = bitmap.mu;
        footprint.font_size = request.font_size;
        footprint.text_offset = offset;
        footprint.text_width = fw;
        footprint.text_height = fh;
        Ok(Some(footprint))
    }
}

/// Draws placed words onto the surface with the bitmap font.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasPainter;

impl Renderer for CanvasPainter {
    fn draw(&mut self, surface: &mut dyn Surface, request: &DrawRequest<'_>) {
        let footprint = request.footprint;
        let Ok(bitmap) = TextBitmap::render(&request.word.text, footprint.font_size, &Deadline::none())
        else {
            return;
        };

        let g = i64::from(request.grid_size.max(1));
        let box_w = footprint.width() as i64 * g;
        let box_h = footprint.height() as i64 * g;
        let (ox, oy) = text_origin(box_w as f64, box_h as f64, footprint.text_offset);
        let placement = request.placement;
        let (left, top) = (placement.gx * g, placement.gy * g);

        for (x, y) in bitmap.ink_pixels() {
            let (bx, by) = (ox + x as i64, oy + y as i64);
            let (px, py) = if placement.rotated {
                (by, box_w - 1 - bx)
            } else {
                (bx, by)
            };
            surface.put_pixel(left + px, top + py, request.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::words::WordItem,
        layout::{
            OccupancyGrid, Placement, Rgb, Shape,
            options::max_radius,
            ring::RingCache,
            search::{SearchOutcome, place},
        },
        render::canvas::Canvas,
    };

    fn request(text: &str, font_size: f64) -> RasterRequest<'_> {
        RasterRequest {
            text,
            font_size,
            min_size: 0.0,
            grid_size: 4,
            grid_cells: None,
        }
    }

    #[test]
    fn upscale_factor_is_even_below_native_size() {
        assert_eq!(upscale_factor(8.0), 1);
        assert_eq!(upscale_factor(20.0), 1);
        assert_eq!(upscale_factor(4.0), 2);
        assert_eq!(upscale_factor(3.0), 4);
        assert_eq!(upscale_factor(1.0), 8);
    }

    #[test]
    fn bitmap_size_follows_font_size() {
        let bitmap = TextBitmap::render("abc", 16.0, &Deadline::none()).expect("render");
        assert_eq!((bitmap.width, bitmap.height, bitmap.mu), (48, 16, 1));

        let small = TextBitmap::render("ab", 4.0, &Deadline::none()).expect("render");
        assert_eq!((small.width, small.height, small.mu), (8, 4, 2));
    }

    #[test]
    fn space_has_no_ink() {
        let bitmap = TextBitmap::render("   ", 8.0, &Deadline::none()).expect("render");
        assert_eq!(bitmap.ink_pixels().count(), 0);
    }

    #[test]
    fn footprint_pads_around_text() {
        let mut rasterizer = BitmapRasterizer;
        let fp = rasterizer
            .rasterize(&request("I", 8.0), &Deadline::none())
            .expect("in budget")
            .expect("above min size");
        assert_eq!((fp.width(), fp.height()), (6, 6));
        assert!(fp.ink_count() > 0);
        for (x, y) in fp.ink_offsets(false) {
            assert!((2..=3).contains(&x) && (2..=3).contains(&y), "ink at ({x},{y})");
        }
        assert_eq!(fp.text_offset, (-4.0, -4.0));
    }

    #[test]
    fn words_at_or_below_min_size_are_skipped() {
        let mut rasterizer = BitmapRasterizer;
        let req = RasterRequest {
            min_size: 8.0,
            ..request("word", 8.0)
        };
        assert_eq!(rasterizer.rasterize(&req, &Deadline::none()), Ok(None));
        assert_eq!(
            rasterizer.rasterize(&request("word", 0.0), &Deadline::none()),
            Ok(None)
        );
    }

    #[test]
    fn oversized_word_is_not_rendered() {
        let mut rasterizer = BitmapRasterizer;
        let req = RasterRequest {
            grid_cells: Some((30, 12)),
            ..request("wordcloud", 3000.0)
        };
        // Rendering this at full size would take seconds; the budget proves
        // the bitmap is never built.
        let deadline = Deadline::after(std::time::Duration::from_millis(200));
        let fp = rasterizer
            .rasterize(&req, &deadline)
            .expect("in budget")
            .expect("above min size");
        assert_eq!(fp.extent(false), (31, 31));
        assert_eq!(fp.font_size, 3000.0);

        let mut grid = OccupancyGrid::clear(30, 12);
        let mut rings = RingCache::new((15.0, 6.0), 1.0, Shape::Circle);
        let max_radius = max_radius(30, 12);
        for rotated in [false, true] {
            assert_eq!(
                place(&mut grid, &mut rings, &fp, rotated, max_radius, None, &Deadline::none()),
                SearchOutcome::NoSpace
            );
        }
        assert_eq!(grid.free_count(), 30 * 12);
    }

    #[test]
    fn word_fitting_only_rotated_is_still_rendered() {
        let mut rasterizer = BitmapRasterizer;
        // "II" at 8px boxes to 8x6 cells, which fits a 6x8 grid once rotated.
        let upright = RasterRequest {
            grid_cells: Some((6, 8)),
            ..request("II", 8.0)
        };
        let fp = rasterizer
            .rasterize(&upright, &Deadline::none())
            .expect("in budget")
            .expect("above min size");
        assert_eq!((fp.width(), fp.height()), (8, 6));
        assert_eq!(fp.text_height, 8.0);

        let short = RasterRequest {
            grid_cells: Some((6, 7)),
            ..request("II", 8.0)
        };
        let fp = rasterizer
            .rasterize(&short, &Deadline::none())
            .expect("in budget")
            .expect("above min size");
        assert_eq!(fp.text_height, 0.0);
        assert_eq!(fp.ink_count(), 4);
    }

    #[test]
    fn expired_deadline_interrupts_rasterization() {
        let deadline = Deadline::after(std::time::Duration::from_millis(1));
        std::thread::sleep(std::time::Duration::from_millis(3));
        let mut rasterizer = BitmapRasterizer;
        assert_eq!(
            rasterizer.rasterize(&request("slow", 32.0), &deadline),
            Err(TimeBudgetExceeded)
        );
    }

    fn paint_and_check(rotated: bool) {
        let mut rasterizer = BitmapRasterizer;
        let fp = rasterizer
            .rasterize(&request("Hi", 12.0), &Deadline::none())
            .expect("in budget")
            .expect("above min size");
        let (w, h) = fp.extent(rotated);
        let placement = Placement {
            gx: 2,
            gy: 1,
            x: 0.0,
            y: 0.0,
            distance: 0,
            theta: 0.0,
            rotated,
        };
        let mut canvas = Canvas::new(((w + 4) * 4) as u32, ((h + 4) * 4) as u32, Rgb::WHITE);
        let word = WordItem::new("Hi", 12.0);
        CanvasPainter.draw(
            &mut canvas,
            &DrawRequest {
                word: &word,
                footprint: &fp,
                placement: &placement,
                grid_size: 4,
                color: Rgb::BLACK,
            },
        );
        assert!(canvas.inked() > 0);

        // Every painted pixel sits in a cell the footprint claims as ink.
        let painted = OccupancyGrid::from_surface(&canvas, 4, Rgb::WHITE);
        let mut committed = OccupancyGrid::clear(painted.width(), painted.height());
        committed.occupy(placement.gx, placement.gy, &fp, rotated);
        for y in 0..painted.height() as i64 {
            for x in 0..painted.width() as i64 {
                if !painted.is_free(x, y) {
                    assert!(!committed.is_free(x, y), "paint outside ink at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn painted_pixels_stay_inside_committed_cells() {
        paint_and_check(false);
    }

    #[test]
    fn rotated_paint_stays_inside_committed_cells() {
        paint_and_check(true);
    }
}

use crossterm::style::Stylize;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::{
    layout::{Rgb, Surface},
    render::Canvas,
    ui::palette::{ColorCapability, quantize, to_crossterm},
};

const UPPER_HALF: &str = "▀";
const LOWER_HALF: &str = "▄";
const FULL_BLOCK: &str = "█";

/// Paints a canvas two pixels per terminal cell: the top pixel as the
/// foreground of an upper half block, the bottom pixel as its background.
#[derive(Debug, Clone, Copy)]
pub struct CloudView<'a> {
    canvas: &'a Canvas,
    capability: ColorCapability,
}

impl<'a> CloudView<'a> {
    #[must_use]
    pub fn new(canvas: &'a Canvas, capability: ColorCapability) -> Self {
        Self { canvas, capability }
    }
}

impl Widget for CloudView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = self.canvas.width().min(u32::from(area.width));
        let rows = self.canvas.height().div_ceil(2).min(u32::from(area.height));
        for row in 0..rows {
            for col in 0..columns {
                let (top, bottom) = cell_pixels(self.canvas, col, row);
                let (x, y) = (area.x + col as u16, area.y + row as u16);
                let Some(cell) = buf.cell_mut((x, y)) else {
                    continue;
                };
                if self.capability.is_colored() {
                    cell.set_symbol(UPPER_HALF).set_style(
                        Style::default()
                            .fg(quantize(top.color, self.capability))
                            .bg(quantize(bottom.color, self.capability)),
                    );
                } else {
                    cell.set_symbol(mono_symbol(top.inked, bottom.inked));
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pixel {
    color: Rgb,
    inked: bool,
}

fn cell_pixels(canvas: &Canvas, col: u32, row: u32) -> (Pixel, Pixel) {
    let pixel = |y: u32| {
        if y < canvas.height() {
            Pixel {
                color: canvas.pixel(col, y),
                inked: !canvas.is_blank(col, y),
            }
        } else {
            Pixel {
                color: canvas.background(),
                inked: false,
            }
        }
    };
    (pixel(row * 2), pixel(row * 2 + 1))
}

fn mono_symbol(top: bool, bottom: bool) -> &'static str {
    match (top, bottom) {
        (true, true) => FULL_BLOCK,
        (true, false) => UPPER_HALF,
        (false, true) => LOWER_HALF,
        (false, false) => " ",
    }
}

/// Text rendering of the canvas for stdout, one string per terminal row.
/// Colored capabilities emit ANSI escapes; monochrome uses block shapes only.
#[must_use]
pub fn to_lines(canvas: &Canvas, capability: ColorCapability) -> Vec<String> {
    (0..canvas.height().div_ceil(2))
        .map(|row| {
            (0..canvas.width())
                .map(|col| {
                    let (top, bottom) = cell_pixels(canvas, col, row);
                    if capability.is_colored() {
                        UPPER_HALF
                            .with(to_crossterm(quantize(top.color, capability)))
                            .on(to_crossterm(quantize(bottom.color, capability)))
                            .to_string()
                    } else {
                        mono_symbol(top.inked, bottom.inked).to_string()
                    }
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Ratatui color of the canvas background, for padding around the view.
#[must_use]
pub fn background_color(canvas: &Canvas, capability: ColorCapability) -> Color {
    quantize(canvas.background(), capability)
}

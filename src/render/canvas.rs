use crate::layout::surface::{Rgb, Surface};

/// In-memory RGB pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgb,
    pixels: Vec<Rgb>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Resizes and blanks the canvas.
    pub fn reset(&mut self, width: u32, height: u32, background: Rgb) {
        *self = Self::new(width, height, background);
    }

    #[must_use]
    pub fn is_blank(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y) == self.background
    }

    /// Number of pixels that differ from the background.
    #[must_use]
    pub fn inked(&self) -> usize {
        self.pixels.iter().filter(|p| **p != self.background).count()
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize]
        } else {
            self.background
        }
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }

    fn fill(&mut self, color: Rgb) {
        self.background = color;
        self.pixels.fill(color);
    }
}

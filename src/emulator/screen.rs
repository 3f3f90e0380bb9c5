use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// The monochrome framebuffer, one byte per pixel, row-major (`x + y * 64`).
/// Every cell is either 0 or 1.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    pixels: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],
}

impl Screen {
    pub fn new() -> Screen {
        Screen {
            pixels: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [0; SCREEN_WIDTH * SCREEN_HEIGHT];
    }

    /// The pixel at `(x, y)`, or `None` outside the screen.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            Some(self.pixels[x + y * SCREEN_WIDTH])
        } else {
            None
        }
    }

    /// Toggle the pixel at `(x, y)`, wrapping each axis on its own.
    /// Returns whether the pixel was lit before.
    pub(crate) fn flip(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[x % SCREEN_WIDTH + (y % SCREEN_HEIGHT) * SCREEN_WIDTH];
        let was_lit = *pixel == 1;
        *pixel ^= 1;
        was_lit
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(SCREEN_WIDTH)
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel == 1).count()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row {
                write!(f, "{}", if *c == 1 { "#" } else { "." })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Screen {{")?;
        write!(f, "{}", self)?;
        write!(f, "}}")
    }
}

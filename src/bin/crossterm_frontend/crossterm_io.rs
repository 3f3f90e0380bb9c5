use chip_8_vm::emulator::{Screen, Speaker, SCREEN_HEIGHT, SCREEN_WIDTH};

use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};

/// Draws the framebuffer inside a box on the alternate screen,
/// two terminal columns per pixel.
pub struct CrosstermOutput {
    out: Stdout,
    cells: [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT],
}

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        terminal::enable_raw_mode()?;

        let bottom = SCREEN_HEIGHT as u16 + 1;
        let right = 2 * SCREEN_WIDTH as u16 + 1;
        for y in 0..=bottom {
            for x in 0..=right {
                let c = match (x, y) {
                    (0, 0) => '┏',
                    (x, 0) if x == right => '┓',
                    (0, y) if y == bottom => '┗',
                    (x, y) if x == right && y == bottom => '┛',
                    (_, y) if y == 0 || y == bottom => '━',
                    (x, _) if x == 0 || x == right => '┃',
                    _ => continue,
                };
                queue!(out, cursor::MoveTo(x, y), Print(c))?;
            }
        }
        out.flush()?;

        Ok(CrosstermOutput {
            out,
            cells: [[0; SCREEN_WIDTH]; SCREEN_HEIGHT],
        })
    }

    /// Redraw the pixels that changed since the last render.
    pub fn render(&mut self, screen: &Screen) -> crossterm::Result<()> {
        for (y, row) in screen.rows().enumerate() {
            for (x, pixel) in row.iter().enumerate() {
                if self.cells[y][x] != *pixel {
                    self.cells[y][x] = *pixel;
                    let cell = if *pixel == 1 { "██" } else { "  " };
                    queue!(self.out, cursor::MoveTo(2 * x as u16 + 1, y as u16 + 1), Print(cell))?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Could not leave raw mode: {}", e);
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, cursor::Show) {
            log::error!("Could not restore the terminal: {}", e);
        }
    }
}

/// Rings the terminal bell.
pub struct Bell;

impl Speaker for Bell {
    fn beep(&mut self) {
        let mut out = stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::warn!("Could not ring the bell: {}", e);
        }
    }
}

// Copyright (c) 2026 termrain contributors

use std::collections::VecDeque;

use rand::Rng;

use crate::cell::Cell;
use crate::palette::Palette;
use crate::surface::Surface;

/// How many of the newest trail entries take the bright shade.
const BRIGHT_TRAIL: usize = 3;

/// ASCII printable range, the classic rain glyphs.
fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    rng.random_range(33u8..=126) as char
}

/// One falling trail, bound to a single column. The head row may move
/// past the bottom edge while the trail is still draining off-screen;
/// the droplet dies once the head is `max_trail` rows below the bottom.
#[derive(Clone, Debug)]
pub struct Droplet {
    pub col: u16,
    pub row: u16,
    pub alive: bool,
    speed: u16,
    head_ch: char,
    trail: VecDeque<(u16, char)>,
    max_trail: usize,
    screen_rows: u16,
}

impl Droplet {
    pub fn new<R: Rng + ?Sized>(
        col: u16,
        screen_rows: u16,
        max_trail: usize,
        rng: &mut R,
    ) -> Self {
        let speed = rng.random_range(1u16..=3);
        let head_ch = random_glyph(rng);
        Self::with_speed(col, screen_rows, max_trail, speed, head_ch)
    }

    /// Fixed-speed constructor, used directly by tests.
    pub fn with_speed(
        col: u16,
        screen_rows: u16,
        max_trail: usize,
        speed: u16,
        head_ch: char,
    ) -> Self {
        Self {
            col,
            row: 0,
            alive: true,
            speed: speed.max(1),
            head_ch,
            trail: VecDeque::with_capacity(max_trail.max(1)),
            max_trail: max_trail.max(1),
            screen_rows,
        }
    }

    #[allow(dead_code)]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    #[allow(dead_code)]
    pub fn oldest_row(&self) -> Option<u16> {
        self.trail.front().map(|&(row, _)| row)
    }

    pub fn set_screen_rows(&mut self, rows: u16) {
        self.screen_rows = rows;
    }

    /// Records the current head position into the trail (oldest entry
    /// evicted at capacity), then falls by `speed` rows.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.trail.len() == self.max_trail {
            self.trail.pop_front();
        }
        self.trail.push_back((self.row, random_glyph(rng)));
        self.row = self.row.saturating_add(self.speed);
        let bottom = self.screen_rows as u32 + self.max_trail.min(u16::MAX as usize) as u32;
        if u32::from(self.row) > bottom {
            self.alive = false;
        }
    }

    /// Head first, then history newest-to-oldest. Rows off the screen
    /// are skipped; rendering never fails the frame.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, palette: &Palette) {
        if self.row < self.screen_rows {
            surface.draw(
                self.col,
                self.row,
                Cell {
                    ch: self.head_ch,
                    fg: Some(palette.head),
                    bold: true,
                },
            );
        }
        for (age, &(row, ch)) in self.trail.iter().rev().enumerate() {
            if row >= self.screen_rows {
                continue;
            }
            let (fg, bold) = if age < BRIGHT_TRAIL {
                (palette.bright, true)
            } else {
                (palette.dim, false)
            };
            surface.draw(
                self.col,
                row,
                Cell {
                    ch,
                    fg: Some(fg),
                    bold,
                },
            );
        }
    }
}

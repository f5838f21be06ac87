// Copyright (c) 2026 termrain contributors

use crossterm::style::Color;

/// One styled character on the grid. Background always stays the
/// terminal default, so only foreground and weight are tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub fn blank() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

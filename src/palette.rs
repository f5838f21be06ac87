// Copyright (c) 2026 termrain contributors

use clap::ValueEnum;
use crossterm::style::Color;

/// Rain color accepted by `--color`. Anything else is rejected by clap
/// at parse time.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorName {
    Green,
    Red,
    Blue,
    White,
    Yellow,
    Cyan,
    Magenta,
}

/// The three shades a droplet draws with: the head is always white,
/// the recent trail takes the bright variant, the rest the dark one.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub head: Color,
    pub bright: Color,
    pub dim: Color,
}

pub fn build_palette(name: ColorName) -> Palette {
    let (bright, dim) = match name {
        ColorName::Green => (Color::Green, Color::DarkGreen),
        ColorName::Red => (Color::Red, Color::DarkRed),
        ColorName::Blue => (Color::Blue, Color::DarkBlue),
        ColorName::White => (Color::White, Color::Grey),
        ColorName::Yellow => (Color::Yellow, Color::DarkYellow),
        ColorName::Cyan => (Color::Cyan, Color::DarkCyan),
        ColorName::Magenta => (Color::Magenta, Color::DarkMagenta),
    };
    Palette {
        head: Color::White,
        bright,
        dim,
    }
}

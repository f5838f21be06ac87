// Copyright (c) 2026 termrain contributors

use std::str::FromStr;

use clap::Parser;

use crate::palette::ColorName;

/// Concurrency cap for live trails: a fixed count, or half the
/// terminal width (recomputed whenever the terminal is resized).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaxTrails {
    Auto,
    Fixed(usize),
}

impl FromStr for MaxTrails {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let n: usize = s
            .parse()
            .map_err(|_| "expected a number or 'auto'".to_string())?;
        if n == 0 {
            return Err("must be at least 1".to_string());
        }
        Ok(Self::Fixed(n))
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "termrain",
    version,
    about = "Matrix-style digital rain for the terminal"
)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "color",
        default_value = "green",
        value_enum,
        help_heading = "APPEARANCE",
        help = "Rain color"
    )]
    pub color: ColorName,

    #[arg(
        short = 's',
        long = "speed",
        default_value_t = 0.05,
        help_heading = "TIMING",
        help = "Seconds per frame (lower is faster)"
    )]
    pub speed: f64,

    #[arg(
        short = 'd',
        long = "density",
        default_value_t = 5,
        help_heading = "RAIN",
        help = "Spawn density (min 1 max 10)"
    )]
    pub density: u8,

    #[arg(
        short = 'l',
        long = "max-length",
        default_value_t = 15,
        help_heading = "RAIN",
        help = "Trail history capacity (min 1)"
    )]
    pub max_length: usize,

    #[arg(
        short = 'm',
        long = "max-trails",
        default_value = "auto",
        help_heading = "RAIN",
        help = "Max concurrent trails: a number, or 'auto' = half the width"
    )]
    pub max_trails: MaxTrails,

    #[arg(
        short = 'g',
        long = "gap",
        default_value_t = 2,
        help_heading = "RAIN",
        help = "Minimum column spacing between trails (min 0)"
    )]
    pub gap: u16,

    #[arg(
        long = "duration",
        help_heading = "TIMING",
        help = "Stop after N seconds (<=0 runs until quit)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 'S',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Exit on any key press"
    )]
    pub screensaver: bool,
}

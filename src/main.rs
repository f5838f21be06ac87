// Copyright (c) 2026 termrain contributors

mod cell;
mod config;
mod droplet;
mod frame;
mod palette;
mod rain;
mod sim;
mod surface;
mod terminal;

use std::time::Duration;

#[cfg(unix)]
use std::thread;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::Args;
use crate::palette::build_palette;
use crate::rain::Rain;
use crate::sim::SimOptions;
use crate::surface::Surface;
use crate::terminal::{restore_terminal_best_effort, TerminalSurface};

fn require_positive_f64(name: &str, v: f64) -> f64 {
    if !v.is_finite() || v <= 0.0 {
        eprintln!("failed to apply {} {} (must be a positive number)", name, v);
        std::process::exit(1);
    }
    v
}

fn require_u8_range(name: &str, v: u8, min: u8, max: u8) -> u8 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_usize_min(name: &str, v: usize, min: usize) -> usize {
    if v < min {
        eprintln!("failed to apply {} {} (min {})", name, v, min);
        std::process::exit(1);
    }
    v
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    if sig == SIGINT {
                        eprintln!("termrain terminated.");
                        std::process::exit(0);
                    }
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            eprintln!("termrain terminated.");
            std::process::exit(0);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let args = Args::parse();

    let frame_s = require_positive_f64("--speed", args.speed);
    let density = require_u8_range("--density", args.density, 1, 10);
    let max_length = require_usize_min("--max-length", args.max_length, 1);

    let duration = args.duration.and_then(|s| {
        if !s.is_finite() || s <= 0.0 {
            None
        } else {
            Some(Duration::from_secs_f64(s))
        }
    });

    let palette = build_palette(args.color);

    let mut term = TerminalSurface::new()?;
    let (w, h) = term.size()?;

    let mut rain = Rain::new(
        w,
        h,
        density,
        max_length,
        args.max_trails,
        args.gap,
        StdRng::from_os_rng(),
    );

    let opts = SimOptions {
        frame_interval: Duration::from_secs_f64(frame_s),
        duration,
        screensaver: args.screensaver,
    };

    let result = sim::run(&mut term, &mut rain, &palette, &opts);

    // Restore the terminal before reporting anything.
    drop(term);
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

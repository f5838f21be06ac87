// Copyright (c) 2026 termrain contributors

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::MaxTrails;
use crate::droplet::Droplet;
use crate::palette::Palette;
use crate::surface::Surface;

/// Spawn trials per frame are capped regardless of density.
const MAX_TRIALS_PER_FRAME: u8 = 3;

/// Per-trial spawn chance per density step. Deliberately uncapped:
/// above density ~6.7 the product exceeds 1 and a trial always fires
/// when a slot and a column are free.
const CHANCE_PER_DENSITY: f32 = 0.15;

/// The whole rain state: the active droplet set, the per-frame column
/// occupancy derived from it, and the spawner.
pub struct Rain {
    pub width: u16,
    pub height: u16,
    pub density: u8,
    max_trail: usize,
    max_trails: MaxTrails,
    gap: u16,
    droplets: Vec<Droplet>,
    occupied: Vec<bool>,
    rng: StdRng,
}

impl Rain {
    pub fn new(
        width: u16,
        height: u16,
        density: u8,
        max_trail: usize,
        max_trails: MaxTrails,
        gap: u16,
        rng: StdRng,
    ) -> Self {
        Self {
            width,
            height,
            density,
            max_trail,
            max_trails,
            gap,
            droplets: Vec::new(),
            occupied: vec![false; width as usize],
            rng,
        }
    }

    #[allow(dead_code)]
    pub fn droplets(&self) -> &[Droplet] {
        &self.droplets
    }

    /// Live-trail cap; auto mode tracks half the current width.
    pub fn trail_cap(&self) -> usize {
        match self.max_trails {
            MaxTrails::Auto => (self.width / 2).max(1) as usize,
            MaxTrails::Fixed(n) => n,
        }
    }

    pub fn raise_density(&mut self) {
        self.density = self.density.saturating_add(1).min(10);
    }

    pub fn lower_density(&mut self) {
        self.density = self.density.saturating_sub(1).max(1);
    }

    /// Applies a new terminal size. Droplets whose column fell off the
    /// right edge are discarded; everything else keeps falling, so
    /// growing the screen never loses trails.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.droplets.retain(|d| d.col < width);
        for d in &mut self.droplets {
            d.set_screen_rows(height);
        }
        self.occupied = vec![false; width as usize];
        self.rebuild_occupancy();
    }

    fn rebuild_occupancy(&mut self) {
        self.occupied.fill(false);
        for d in &self.droplets {
            if let Some(slot) = self.occupied.get_mut(d.col as usize) {
                *slot = true;
            }
        }
    }

    /// A column is available when every occupied column is at least
    /// `gap` away. gap 0 never blocks, not even the column itself.
    fn column_available(&self, x: u16) -> bool {
        if self.gap == 0 {
            return true;
        }
        let lo = x.saturating_sub(self.gap - 1);
        let hi = x
            .saturating_add(self.gap - 1)
            .min(self.width.saturating_sub(1));
        (lo..=hi).all(|c| !self.occupied[c as usize])
    }

    fn available_columns(&self) -> Vec<u16> {
        (0..self.width).filter(|&x| self.column_available(x)).collect()
    }

    /// Runs the per-frame spawn trials. A column taken earlier in the
    /// same frame immediately counts as occupied for later trials.
    pub fn spawn(&mut self) {
        let trials = MAX_TRIALS_PER_FRAME.min(self.density);
        let chance = CHANCE_PER_DENSITY * f32::from(self.density);
        for _ in 0..trials {
            if self.rng.random::<f32>() >= chance {
                continue;
            }
            if self.droplets.len() >= self.trail_cap() {
                continue;
            }
            let avail = self.available_columns();
            if avail.is_empty() {
                continue;
            }
            let col = avail[self.rng.random_range(0..avail.len())];
            self.droplets
                .push(Droplet::new(col, self.height, self.max_trail, &mut self.rng));
            self.occupied[col as usize] = true;
        }
    }

    /// One simulation step: erase, retire dead droplets, rebuild the
    /// occupancy set, spawn, then advance and render every survivor.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S, palette: &Palette) {
        surface.erase_all();
        self.droplets.retain(|d| d.alive);
        self.rebuild_occupancy();
        self.spawn();
        for d in &mut self.droplets {
            d.advance(&mut self.rng);
            d.render(surface, palette);
        }
    }
}

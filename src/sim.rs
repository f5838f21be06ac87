// Copyright (c) 2026 termrain contributors

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::palette::Palette;
use crate::rain::Rain;
use crate::surface::{Key, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Running,
    Paused,
    Terminated,
}

pub struct SimOptions {
    pub frame_interval: Duration,
    pub duration: Option<Duration>,
    pub screensaver: bool,
}

/// Drives the animation until quit, end of `duration`, or an io error.
/// The caller owns terminal acquisition and restoration, so an error
/// returned here still leaves the terminal in its original mode.
pub fn run<S: Surface + ?Sized>(
    surface: &mut S,
    rain: &mut Rain,
    palette: &Palette,
    opts: &SimOptions,
) -> io::Result<()> {
    let mut end = opts.duration.map(|d| Instant::now() + d);
    let mut state = State::Running;
    let mut frame_start = Instant::now();

    loop {
        match state {
            State::Terminated => break,
            State::Paused => {
                // Blocks until any key; paused time must not show up
                // as frame lag or eat into the run duration, so both
                // time baselines are shifted past the pause.
                let pause_start = Instant::now();
                surface.wait_key()?;
                state = State::Running;
                frame_start = Instant::now();
                if let Some(e) = end.as_mut() {
                    *e += frame_start.saturating_duration_since(pause_start);
                }
                continue;
            }
            State::Running => {}
        }

        if end.is_some_and(|e| Instant::now() >= e) {
            break;
        }

        // Pace: sleep off whatever is left of the frame interval.
        let elapsed = frame_start.elapsed();
        if elapsed < opts.frame_interval {
            thread::sleep(opts.frame_interval - elapsed);
        }
        frame_start = Instant::now();

        // Resize reconciliation: adopt the new dimensions, hard-clear,
        // and skip drawing this iteration.
        let (w, h) = surface.size()?;
        if (w, h) != (rain.width, rain.height) {
            rain.resize(w, h);
            surface.clear()?;
            continue;
        }

        rain.step(surface, palette);
        surface.flush()?;

        if let Some(key) = surface.poll_key(Duration::ZERO)? {
            if opts.screensaver && key != Key::Resize {
                state = State::Terminated;
                continue;
            }
            match key {
                Key::Char('q') => state = State::Terminated,
                Key::Char('+') | Key::Char('=') => rain.raise_density(),
                Key::Char('-') => rain.lower_density(),
                Key::Char('p') => state = State::Paused,
                // Resize is picked up by the size check next frame.
                Key::Resize | Key::Other | Key::Char(_) => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cell::Cell;
    use crate::config::MaxTrails;
    use crate::palette::{build_palette, ColorName};
    use crate::surface::fake::FakeSurface;

    /// Fake whose `wait_key` actually blocks, so pause timing is
    /// observable from outside the loop.
    struct SlowResume {
        inner: FakeSurface,
        pause: Duration,
        resumed_at: Option<Instant>,
        flush_times: Vec<Instant>,
    }

    impl SlowResume {
        fn new(inner: FakeSurface, pause: Duration) -> Self {
            Self {
                inner,
                pause,
                resumed_at: None,
                flush_times: Vec::new(),
            }
        }
    }

    impl Surface for SlowResume {
        fn size(&mut self) -> io::Result<(u16, u16)> {
            self.inner.size()
        }

        fn erase_all(&mut self) {
            self.inner.erase_all();
        }

        fn clear(&mut self) -> io::Result<()> {
            self.inner.clear()
        }

        fn draw(&mut self, x: u16, y: u16, cell: Cell) {
            self.inner.draw(x, y, cell);
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flush_times.push(Instant::now());
            self.inner.flush()
        }

        fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
            self.inner.poll_key(timeout)
        }

        fn wait_key(&mut self) -> io::Result<Key> {
            thread::sleep(self.pause);
            let key = self.inner.wait_key()?;
            self.resumed_at = Some(Instant::now());
            Ok(key)
        }
    }

    fn opts() -> SimOptions {
        SimOptions {
            frame_interval: Duration::ZERO,
            duration: None,
            screensaver: false,
        }
    }

    fn make_rain(width: u16, height: u16, density: u8) -> Rain {
        Rain::new(
            width,
            height,
            density,
            15,
            MaxTrails::Auto,
            2,
            StdRng::seed_from_u64(99),
        )
    }

    #[test]
    fn q_terminates_the_loop() {
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(20, 10).then_key(Key::Char('q'));
        let mut rain = make_rain(20, 10, 5);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        assert_eq!(surface.flushes, 1);
    }

    #[test]
    fn density_keys_clamp_within_range() {
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(20, 10)
            .then_key(Key::Char('+'))
            .then_key(Key::Char('+'))
            .then_key(Key::Char('='))
            .then_key(Key::Char('q'));
        let mut rain = make_rain(20, 10, 9);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        assert_eq!(rain.density, 10);

        let mut surface = FakeSurface::new(20, 10)
            .then_key(Key::Char('-'))
            .then_key(Key::Char('-'))
            .then_key(Key::Char('-'))
            .then_key(Key::Char('q'));
        let mut rain = make_rain(20, 10, 2);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        assert_eq!(rain.density, 1);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(20, 10)
            .then_key(Key::Char('z'))
            .then_key(Key::Other)
            .then_key(Key::Char('q'));
        let mut rain = make_rain(20, 10, 5);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        assert_eq!(surface.flushes, 3);
    }

    #[test]
    fn density_zero_keeps_the_screen_blank() {
        // Scenario from the drawing contract: width 10, height 5,
        // density 0 -> nothing ever spawns, display stays erased.
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(10, 5).quiet_frames(30);
        let mut rain = make_rain(10, 5, 0);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        assert!(rain.droplets().is_empty());
        assert_eq!(surface.drawn_count(), 0);
        assert_eq!(surface.flushes, 31);
    }

    #[test]
    fn pause_blocks_then_any_key_resumes() {
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(20, 10)
            .then_key(Key::Char('p'))
            .then_key(Key::Char('x')) // consumed by wait_key, resumes
            .quiet_frames(2)
            .then_key(Key::Char('q'));
        let mut rain = make_rain(20, 10, 5);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        // One frame before the pause, two quiet ones and the q frame after.
        assert_eq!(surface.flushes, 4);
    }

    #[test]
    fn resume_paces_a_full_interval_despite_the_pause() {
        let palette = build_palette(ColorName::Green);
        let interval = Duration::from_millis(40);
        let mut surface = SlowResume::new(
            FakeSurface::new(20, 10)
                .then_key(Key::Char('p'))
                .then_key(Key::Char('x'))
                .then_key(Key::Char('q')),
            Duration::from_millis(120),
        );
        let mut rain = make_rain(20, 10, 5);
        let opts = SimOptions {
            frame_interval: interval,
            ..opts()
        };
        run(&mut surface, &mut rain, &palette, &opts).unwrap();
        // The frame after the resume still sleeps a full interval; if
        // the paused span counted as frame lag it would flush at once
        // in a catch-up burst.
        let resumed = surface.resumed_at.unwrap();
        let after = surface
            .flush_times
            .iter()
            .copied()
            .find(|&t| t > resumed)
            .unwrap();
        assert!(after - resumed >= interval);
    }

    #[test]
    fn resize_skips_the_draw_and_reconciles() {
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(10, 5).quiet_frames(2).then_key(Key::Char('q'));
        surface.sizes.push_back((10, 5));
        surface.sizes.push_back((6, 4));
        // Saturated density so the first frame seeds droplets that may
        // straddle the shrink boundary.
        let mut rain = make_rain(10, 5, 10);
        run(&mut surface, &mut rain, &palette, &opts()).unwrap();
        assert_eq!((rain.width, rain.height), (6, 4));
        assert!(rain.droplets().iter().all(|d| d.col < 6));
        assert_eq!(surface.clears, 1);
        // Resize iterations skip the draw, so only the three ordinary
        // frames flushed (the resize frame also skipped the key poll).
        assert_eq!(surface.flushes, 3);
    }

    #[test]
    fn screensaver_exits_on_any_key() {
        let palette = build_palette(ColorName::Green);
        let mut surface = FakeSurface::new(20, 10)
            .quiet_frames(1)
            .then_key(Key::Char('x'));
        let mut rain = make_rain(20, 10, 5);
        let opts = SimOptions {
            screensaver: true,
            ..opts()
        };
        run(&mut surface, &mut rain, &palette, &opts).unwrap();
        assert_eq!(surface.flushes, 2);
    }

    #[test]
    fn duration_stops_the_loop() {
        let palette = build_palette(ColorName::Green);
        // No keys are scripted besides quiet frames, so only the
        // duration can end this run before the fake's fallback q.
        let mut surface = FakeSurface::new(20, 10).quiet_frames(100_000);
        let mut rain = make_rain(20, 10, 5);
        let opts = SimOptions {
            duration: Some(Duration::from_millis(20)),
            ..opts()
        };
        run(&mut surface, &mut rain, &palette, &opts).unwrap();
        // The script was not exhausted, so the duration ended the run,
        // not the fake's fallback quit.
        assert!(!surface.keys.is_empty());
        assert!(surface.flushes >= 1);
    }

    #[test]
    fn duration_deadline_excludes_paused_time() {
        let palette = build_palette(ColorName::Green);
        // The pause outlasts the whole duration; the run must still
        // get its remaining frames once resumed.
        let mut surface = SlowResume::new(
            FakeSurface::new(20, 10)
                .then_key(Key::Char('p'))
                .then_key(Key::Char('x'))
                .quiet_frames(1)
                .then_key(Key::Char('q')),
            Duration::from_millis(120),
        );
        let mut rain = make_rain(20, 10, 5);
        let opts = SimOptions {
            duration: Some(Duration::from_millis(50)),
            ..opts()
        };
        run(&mut surface, &mut rain, &palette, &opts).unwrap();
        // One frame before the pause, the quiet and q frames after.
        assert_eq!(surface.inner.flushes, 3);
    }
}

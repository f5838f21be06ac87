// Copyright (c) 2026 termrain contributors

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    event::{Event, KeyCode, KeyEventKind},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::surface::{Key, Surface};

/// The real terminal behind the [`Surface`] trait. Raw mode, alternate
/// screen and hidden cursor are acquired in `new` and restored in
/// `Drop`, so every exit path releases the terminal.
pub struct TerminalSurface {
    stdout: Stdout,
    frame: Frame,
    last: Option<Frame>,
}

impl TerminalSurface {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        let (w, h) = terminal::size()?;
        Ok(Self {
            stdout: out,
            frame: Frame::new(w, h),
            last: None,
        })
    }

    fn key_of(ev: Event) -> Option<Key> {
        match ev {
            Event::Resize(..) => Some(Key::Resize),
            Event::Key(k) if k.kind == KeyEventKind::Press => Some(match k.code {
                KeyCode::Char(c) => Key::Char(c),
                _ => Key::Other,
            }),
            _ => None,
        }
    }
}

impl Surface for TerminalSurface {
    fn size(&mut self) -> Result<(u16, u16)> {
        let (w, h) = terminal::size()?;
        if (w, h) != (self.frame.width, self.frame.height) {
            self.frame = Frame::new(w, h);
            self.last = None;
        }
        Ok((w, h))
    }

    fn erase_all(&mut self) {
        self.frame.erase();
    }

    fn clear(&mut self) -> Result<()> {
        self.frame.erase();
        self.last = None;
        self.stdout
            .execute(terminal::Clear(terminal::ClearType::All))?;
        self.stdout.flush()?;
        Ok(())
    }

    fn draw(&mut self, x: u16, y: u16, cell: Cell) {
        self.frame.set(x, y, cell);
    }

    fn flush(&mut self) -> Result<()> {
        let full_redraw = self
            .last
            .as_ref()
            .map(|l| l.width != self.frame.width || l.height != self.frame.height)
            .unwrap_or(true);

        if full_redraw {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }

        // Cursor and style state are tracked across cells so unchanged
        // runs cost nothing but a Print.
        let mut cur_fg: Option<Color> = None;
        let mut cur_bold = false;
        let mut cur_pos: Option<(u16, u16)> = None;

        for y in 0..self.frame.height {
            for x in 0..self.frame.width {
                let idx = y as usize * self.frame.width as usize + x as usize;
                let cell = self.frame.cell_at_index(idx);

                if !full_redraw {
                    if let Some(last) = &self.last {
                        if last.cell_at_index(idx) == cell {
                            continue;
                        }
                    }
                }

                if cur_pos != Some((x, y)) {
                    self.stdout.queue(cursor::MoveTo(x, y))?;
                }
                if cell.fg != cur_fg {
                    self.stdout
                        .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = cell.fg;
                }
                if cell.bold != cur_bold {
                    self.stdout.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    cur_bold = cell.bold;
                }
                self.stdout.queue(Print(cell.ch))?;

                cur_pos = if x + 1 < self.frame.width {
                    Some((x + 1, y))
                } else {
                    None
                };
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.last = Some(self.frame.clone());
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        while event::poll(timeout)? {
            if let Some(key) = Self::key_of(event::read()?) {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    fn wait_key(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = Self::key_of(event::read()?) {
                // Resize while paused is swallowed here; the size check
                // at the top of the next frame picks it up.
                if key != Key::Resize {
                    return Ok(key);
                }
            }
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

/// Used by the panic hook and signal handlers, which cannot reach the
/// live `TerminalSurface`.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

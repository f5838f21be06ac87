// Copyright (c) 2026 termrain contributors

use std::io;
use std::time::Duration;

use crate::cell::Cell;

/// A terminal event reduced to what the simulation loop cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Resize,
    Other,
}

/// Capability interface over the output device. The loop and the
/// droplet renderer only ever talk to this, so tests inject a fake.
pub trait Surface {
    /// Current (width, height) in cells.
    fn size(&mut self) -> io::Result<(u16, u16)>;

    /// Blank the back buffer; nothing reaches the device until `flush`.
    fn erase_all(&mut self);

    /// Hard-clear the device itself (used after a resize).
    fn clear(&mut self) -> io::Result<()>;

    /// Write one styled cell. Out-of-bounds positions are silently
    /// ignored; drawing never fails a frame.
    fn draw(&mut self, x: u16, y: u16, cell: Cell);

    /// Push the back buffer to the device.
    fn flush(&mut self) -> io::Result<()>;

    /// Bounded key poll; `Duration::ZERO` makes it non-blocking.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;

    /// Block until the next key press (resize events are consumed).
    fn wait_key(&mut self) -> io::Result<Key>;
}

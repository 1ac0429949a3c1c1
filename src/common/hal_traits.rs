// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A monotonic point in time produced by [`Sdi12Timer::now`].
///
/// Every wait in this crate is a deadline computed from `now()`, so a test
/// timer can drive a virtual clock instead of the wall clock.
pub trait Sdi12Instant:
    Copy + Add<Duration, Output = Self> + Sub<Self, Output = Duration> + PartialOrd
{
}

impl<T> Sdi12Instant for T where
    T: Copy + Add<Duration, Output = T> + Sub<T, Output = Duration> + PartialOrd
{
}

/// Abstraction for timer/delay operations required by the sensor exchange.
pub trait Sdi12Timer {
    type Instant: Sdi12Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current monotonic time.
    fn now(&self) -> Self::Instant;
}

/// Contract of the half-duplex SDI-12 transport the session drives.
///
/// The transport owns the line discipline (break, 1200 baud 7E1 framing,
/// inter-character gaps) and buffers incoming reply bytes. The session only
/// needs command writes plus buffered, peekable byte reads; line assembly
/// and timeouts are layered on top with [`Sdi12Timer`].
pub trait Sdi12Bus {
    /// Associated error type for transport errors.
    type Error: Debug;

    /// Sends a formatted command, including the trailing `!`. The transport
    /// handles the preceding break and line turnaround.
    fn send_command(&mut self, command: &[u8]) -> Result<(), Self::Error>;

    /// Number of reply bytes buffered and ready to read.
    fn available(&self) -> usize;

    /// Pops the next buffered reply byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while the buffer is empty.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Returns the next buffered reply byte without consuming it.
    fn peek_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Discards all buffered reply bytes.
    fn clear_buffer(&mut self);
}

// src/session/io_helpers.rs

use arrayvec::ArrayVec;
use core::time::Duration;

use super::Ap2000Session;
use crate::common::{
    command::Command,
    error::Ap2000Error,
    hal_traits::{Sdi12Bus, Sdi12Timer},
    timing,
};
use crate::reply::values;

/// Room for the longest reply line (the 33-character identity) plus slack.
pub(super) const REPLY_BUFFER_LEN: usize = 64;

/// Longest numeric token worth keeping; the bus format caps values well
/// below this.
const VALUE_TOKEN_MAX: usize = 16;

const LINE_TERMINATOR: u8 = b'\n';

// Implementation block for I/O related helpers
impl<IF> Ap2000Session<IF>
where
    IF: Sdi12Bus + Sdi12Timer,
{
    /// Formats and sends one command.
    pub(super) fn send(&mut self, command: &Command) -> Result<(), Ap2000Error<IF::Error>> {
        let buffer = command.format_into()?;
        log::trace!("-> {}", buffer.as_str());
        self.interface
            .send_command(buffer.as_bytes())
            .map_err(Ap2000Error::Io)
    }

    /// Post-command settle window, letting the probe start its reply before
    /// the buffer is inspected.
    pub(super) fn settle(&mut self) {
        let ms = self.config.settle_delay.as_millis() as u32;
        self.interface.delay_ms(ms);
    }

    /// Bounded poll until at least `count` reply bytes are buffered or the
    /// deadline passes. Falls through silently either way; the caller
    /// decides what an empty buffer means.
    pub(super) fn wait_for_available(&mut self, count: usize, timeout: Duration) {
        let deadline = self.interface.now() + timeout;
        while self.interface.available() < count {
            if self.interface.now() >= deadline {
                break;
            }
            self.interface.delay_us(timing::POLL_INTERVAL.as_micros() as u32);
        }
    }

    /// Pops the next buffered byte, `None` when the buffer is empty.
    pub(super) fn take_byte(&mut self) -> Result<Option<u8>, Ap2000Error<IF::Error>> {
        match self.interface.read_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(Ap2000Error::Io(e)),
        }
    }

    /// Peeks the next buffered byte without consuming it.
    pub(super) fn peek(&mut self) -> Result<Option<u8>, Ap2000Error<IF::Error>> {
        match self.interface.peek_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(Ap2000Error::Io(e)),
        }
    }

    /// Reads a reply line up to (and excluding) the terminator.
    ///
    /// A deadline without a terminator hands back whatever arrived; short
    /// lines are the decoder's problem, not a transport error.
    pub(super) fn read_reply_line<'buf>(
        &mut self,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], Ap2000Error<IF::Error>> {
        let deadline = self.interface.now() + self.config.reply_timeout;
        let mut filled = 0;
        loop {
            if filled >= buffer.len() {
                return Err(Ap2000Error::BufferOverflow {
                    needed: filled + 1,
                    got: buffer.len(),
                });
            }

            match self.interface.read_byte() {
                Ok(LINE_TERMINATOR) => return Ok(&buffer[..filled]),
                Ok(byte) => {
                    buffer[filled] = byte;
                    filled += 1;
                }
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Ok(&buffer[..filled]);
                    }
                    self.interface.delay_us(timing::POLL_INTERVAL.as_micros() as u32);
                }
                Err(nb::Error::Other(e)) => return Err(Ap2000Error::Io(e)),
            }
        }
    }

    /// Consumes one numeric token from the reply stream: an optional
    /// leading `-`, digits, at most one decimal point. Stops at the first
    /// byte that cannot extend the token, leaving it buffered.
    pub(super) fn scan_value(&mut self) -> Result<f32, Ap2000Error<IF::Error>> {
        let mut token: ArrayVec<u8, VALUE_TOKEN_MAX> = ArrayVec::new();
        let mut seen_point = false;

        if let Some(b'-') = self.peek()? {
            let _ = self.take_byte()?;
            let _ = token.try_push(b'-');
        }

        while let Some(byte) = self.peek()? {
            if !values::continues_value(byte, seen_point) {
                break;
            }
            let _ = self.take_byte()?;
            if byte == b'.' {
                seen_point = true;
            }
            if token.try_push(byte).is_err() {
                break;
            }
        }

        Ok(values::parse_value(&token))
    }
}

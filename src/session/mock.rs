// src/session/mock.rs
//
// Staged-reply bus and virtual clock shared by the session and node tests.
// Each sent command delivers the next staged reply into the read buffer;
// time only moves when the code under test sleeps or polls.

use core::time::Duration;
use std::collections::VecDeque;

use crate::common::hal_traits::{Sdi12Bus, Sdi12Timer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockBusError;

pub(crate) struct MockInterface {
    /// Commands sent, in wire order.
    pub commands: Vec<String>,
    staged: VecDeque<Vec<u8>>,
    buffer: VecDeque<u8>,
    /// Virtual clock, microseconds.
    pub now_us: u64,
    /// Times the reply buffer was cleared.
    pub clear_count: u32,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            commands: Vec::new(),
            staged: VecDeque::new(),
            buffer: VecDeque::new(),
            now_us: 0,
            clear_count: 0,
        }
    }

    /// Queues the reply delivered by the next sent command. Stage an empty
    /// reply to leave a command unanswered.
    pub fn stage_reply(&mut self, bytes: &[u8]) {
        self.staged.push_back(bytes.to_vec());
    }
}

impl Sdi12Timer for MockInterface {
    type Instant = MockInstant;

    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us = self.now_us.saturating_add(u64::from(ms) * 1000);
    }

    fn now(&self) -> Self::Instant {
        MockInstant(self.now_us)
    }
}

impl Sdi12Bus for MockInterface {
    type Error = MockBusError;

    fn send_command(&mut self, command: &[u8]) -> Result<(), Self::Error> {
        self.commands
            .push(String::from_utf8_lossy(command).into_owned());
        if let Some(reply) = self.staged.pop_front() {
            self.buffer.extend(reply);
        }
        Ok(())
    }

    fn available(&self) -> usize {
        self.buffer.len()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.buffer.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn peek_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.buffer.front().copied().ok_or(nb::Error::WouldBlock)
    }

    fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.clear_count += 1;
    }
}

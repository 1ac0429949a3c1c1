// src/common/timing.rs

use core::time::Duration;

// Nominal values for the AP-2000 exchange. The session takes its working
// copies from `SessionConfig`, so deployments can stretch these for long
// cable runs without touching the protocol code.

/// Settle time between sending a command and expecting the first reply byte.
pub const COMMAND_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Deadline for a data-retrieval command to produce the minimum reply
/// (echoed address plus sign and first digit) before the round is skipped.
pub const DATA_READY_TIMEOUT: Duration = Duration::from_millis(1500);

/// Pause after each character-level decision while draining a value list.
/// One character takes ~8.3 ms on the wire, so polling faster than this
/// only spins.
pub const CHARACTER_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Deadline for a full reply line to arrive once a command has settled.
pub const REPLY_TIMEOUT: Duration = Duration::from_millis(1000);

/// Ping rounds before the probe is declared inactive.
pub const PING_ATTEMPTS: u8 = 3;

/// Poll interval while spinning on a deadline.
pub const POLL_INTERVAL: Duration = Duration::from_micros(100);

// === Byte Timing at 1200 Baud (7E1) ===
// 1 start bit + 7 data bits + 1 parity bit + 1 stop bit = 10 bits per byte.

/// Nominal duration of a single bit at 1200 baud.
pub const BIT_DURATION: Duration = Duration::from_nanos(833_333);
/// Nominal duration of a single byte (10 bits total) at 1200 baud.
pub const BYTE_DURATION: Duration = Duration::from_micros(8333);

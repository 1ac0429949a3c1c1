// src/session/mod.rs

mod io_helpers;
mod retrieval;

#[cfg(test)]
pub(crate) mod mock;

use core::time::Duration;

use crate::common::{
    command::Command,
    error::Ap2000Error,
    hal_traits::{Sdi12Bus, Sdi12Timer},
    timing, Sdi12Addr,
};
use crate::reply::{identity, timing as request_ack, MeasurementRequestInfo, ReplyValidation,
    SensorIdentity};

/// Selects when retrieval issues a fresh start-measurement exchange before
/// reading data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RequestPolicy {
    /// Skip the fresh request only when a measurement is already pending
    /// *and* the caller forced one; every other combination re-requests.
    /// Loggers in the field run this way and re-request on nearly every
    /// retrieval, so it stays the default.
    #[default]
    RequestUnlessForcedPending,
    /// Request only when no measurement is pending or the caller forces
    /// one.
    RequestWhenStale,
}

/// Tunable parameters of one sensor exchange. The defaults are the values
/// the probe has been polled with in the field.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub address: Sdi12Addr,
    /// Wait between a command and the first expected reply byte.
    pub settle_delay: Duration,
    /// Deadline for a full reply line.
    pub reply_timeout: Duration,
    /// Deadline for a data command to produce its minimum reply.
    pub data_ready_timeout: Duration,
    /// Pause after each character-level decision while draining values.
    pub character_delay: Duration,
    /// Ping rounds before the probe is declared inactive.
    pub ping_attempts: u8,
    pub request_policy: RequestPolicy,
    pub validation: ReplyValidation,
}

impl SessionConfig {
    pub fn new(address: Sdi12Addr) -> Self {
        SessionConfig {
            address,
            settle_delay: timing::COMMAND_SETTLE_DELAY,
            reply_timeout: timing::REPLY_TIMEOUT,
            data_ready_timeout: timing::DATA_READY_TIMEOUT,
            character_delay: timing::CHARACTER_SETTLE_DELAY,
            ping_attempts: timing::PING_ATTEMPTS,
            request_policy: RequestPolicy::default(),
            validation: ReplyValidation::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(Sdi12Addr::default())
    }
}

/// A session against one AP-2000 on the bus.
///
/// Owns the transport and the "measurement requested but not yet
/// retrieved" state; exactly one exchange is in flight at a time by
/// program order.
#[derive(Debug)]
pub struct Ap2000Session<IF>
where
    IF: Sdi12Bus + Sdi12Timer,
{
    interface: IF,
    config: SessionConfig,
    measurement_pending: bool,
}

impl<IF> Ap2000Session<IF>
where
    IF: Sdi12Bus + Sdi12Timer,
{
    pub fn new(interface: IF, config: SessionConfig) -> Self {
        Ap2000Session {
            interface,
            config,
            measurement_pending: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True while a start-measurement exchange has not yet been retrieved.
    pub fn measurement_pending(&self) -> bool {
        self.measurement_pending
    }

    /// Hands the transport back, ending the session.
    pub fn release(self) -> IF {
        self.interface
    }

    /// Pings the probe until it answers, up to the configured number of
    /// attempts. Returns true on the first attempt where any reply byte
    /// appears; the reply buffer is cleared after every attempt, so no
    /// partial reply is reused across attempts.
    pub fn probe_active(&mut self) -> Result<bool, Ap2000Error<IF::Error>> {
        let command = Command::Ping { address: self.config.address };
        for attempt in 1..=self.config.ping_attempts {
            self.send(&command)?;
            self.settle();
            let replied = self.interface.available() > 0;
            self.interface.clear_buffer();
            if replied {
                log::debug!("probe answered ping on attempt {}", attempt);
                return Ok(true);
            }
        }
        log::debug!("probe silent after {} pings", self.config.ping_attempts);
        Ok(false)
    }

    /// Queries the probe's identity line and decodes it at its fixed
    /// offsets.
    pub fn query_identity(&mut self) -> Result<SensorIdentity, Ap2000Error<IF::Error>> {
        self.send(&Command::Identify { address: self.config.address })?;
        self.settle();

        let mut buffer = [0u8; io_helpers::REPLY_BUFFER_LEN];
        let line = self.read_reply_line(&mut buffer)?;
        let decoded = identity::decode(line.trim_ascii(), self.config.validation)?;
        self.interface.clear_buffer();

        log::debug!("identity: {}", decoded);
        Ok(decoded)
    }

    /// Starts a measurement and decodes the acknowledgment. The probe
    /// answers immediately with the wait time and value count; the
    /// measurement itself completes in the background.
    pub fn request_measurement(
        &mut self,
    ) -> Result<MeasurementRequestInfo, Ap2000Error<IF::Error>> {
        self.send(&Command::StartMeasurement { address: self.config.address })?;
        self.settle();

        let mut buffer = [0u8; io_helpers::REPLY_BUFFER_LEN];
        let line = self.read_reply_line(&mut buffer)?;
        let info = request_ack::decode(line.trim_ascii(), self.config.validation)?;
        self.interface.clear_buffer();
        self.measurement_pending = true;

        log::debug!(
            "measurement requested: {} values in {}s",
            info.value_count,
            info.wait_seconds
        );
        Ok(info)
    }

    /// Starts a measurement and blocks for the announced wait, so the
    /// values are ready to retrieve on return. Callers that only need the
    /// pacing ignore the returned info.
    pub fn request_measurement_and_wait(
        &mut self,
    ) -> Result<MeasurementRequestInfo, Ap2000Error<IF::Error>> {
        let info = self.request_measurement()?;
        self.interface.delay_ms(u32::from(info.wait_seconds) * 1000);
        Ok(info)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::mock::MockInterface;
    use super::*;
    use crate::reply::ReplyParseError;

    fn session(interface: MockInterface) -> Ap2000Session<MockInterface> {
        Ap2000Session::new(interface, SessionConfig::default())
    }

    #[test]
    fn test_probe_active_first_attempt() {
        let mut interface = MockInterface::new();
        interface.stage_reply(b"0\r\n");
        let mut session = session(interface);

        assert_eq!(session.probe_active().unwrap(), true);
        assert_eq!(session.interface.commands, ["0!"]);
        assert_eq!(session.interface.clear_count, 1);
        assert_eq!(session.interface.available(), 0);
    }

    #[test]
    fn test_probe_active_second_attempt() {
        let mut interface = MockInterface::new();
        interface.stage_reply(b""); // first ping goes unanswered
        interface.stage_reply(b"0\r\n");
        let mut session = session(interface);

        assert_eq!(session.probe_active().unwrap(), true);
        assert_eq!(session.interface.commands, ["0!", "0!"]);
        assert_eq!(session.interface.clear_count, 2);
    }

    #[test]
    fn test_probe_inactive_after_three_pings() {
        let mut session = session(MockInterface::new());

        assert_eq!(session.probe_active().unwrap(), false);
        assert_eq!(session.interface.commands, ["0!", "0!", "0!"]);
        assert_eq!(session.interface.clear_count, 3);
        // Each silent attempt costs one settle window.
        assert!(session.interface.now_us >= 3 * 100_000);
    }

    #[test]
    fn test_query_identity() {
        let mut interface = MockInterface::new();
        interface.stage_reply(b"013AQUAREADAP20001130001234567890\r\n");
        let mut session = session(interface);

        let identity = session.query_identity().unwrap();
        assert_eq!(session.interface.commands, ["0I!"]);
        assert_eq!(identity.vendor_id.as_str(), "AQUAREAD");
        assert_eq!(identity.model.as_str(), "AP2000");
        assert!((identity.sdi_version - 1.3).abs() < 1e-6);
        assert!((identity.firmware_version - 1.13).abs() < 1e-6);
        assert_eq!(identity.serial_number.as_str(), "0001234567890");
        assert_eq!(session.interface.clear_count, 1);
    }

    #[test]
    fn test_query_identity_strict_rejects_short_reply() {
        let mut interface = MockInterface::new();
        interface.stage_reply(b"013AQUA\r\n");
        let mut config = SessionConfig::default();
        config.validation = ReplyValidation::Strict;
        let mut session = Ap2000Session::new(interface, config);

        let result = session.query_identity();
        assert!(matches!(
            result,
            Err(Ap2000Error::Reply(ReplyParseError::TooShort { needed: 20, got: 7 }))
        ));
    }

    #[test]
    fn test_request_measurement_sets_pending() {
        let mut interface = MockInterface::new();
        interface.stage_reply(b"003916\r\n");
        let mut session = session(interface);
        assert!(!session.measurement_pending());

        let info = session.request_measurement().unwrap();
        assert_eq!(session.interface.commands, ["0C!"]);
        assert_eq!(info.wait_seconds, 39);
        assert_eq!(info.value_count, 16);
        assert!(session.measurement_pending());
        assert_eq!(session.interface.clear_count, 1);
    }

    #[test]
    fn test_request_and_wait_blocks_for_announced_time() {
        let mut interface = MockInterface::new();
        interface.stage_reply(b"000216\r\n");
        let mut session = session(interface);

        let before = session.interface.now_us;
        let info = session.request_measurement_and_wait().unwrap();
        assert_eq!(info.wait_seconds, 2);
        let elapsed = session.interface.now_us - before;
        assert!(elapsed >= 2_000_000, "waited only {}us", elapsed);
    }

    #[test]
    fn test_request_measurement_permissive_malformed_reply() {
        // The bus has no negative acknowledgment; a garbled line decodes to
        // zeroed fields and the exchange proceeds.
        let mut interface = MockInterface::new();
        interface.stage_reply(b"0\r\n");
        let mut session = session(interface);

        let info = session.request_measurement().unwrap();
        assert_eq!(info.wait_seconds, 0);
        assert_eq!(info.value_count, 0);
        assert!(session.measurement_pending());
    }
}

// src/node.rs
//! Compiled-in node configuration and the glue for one poll cycle. The
//! outer scheduler (fixed-delay loop, RTC sleep) stays with the firmware
//! entry point; nothing here decides when a cycle runs.

use core::fmt::Debug;

use crate::common::{error::Ap2000Error, hal_traits::{Sdi12Bus, Sdi12Timer}, Sdi12Addr};
use crate::measurement::{MeasurementReport, CHANNEL_COUNT};
use crate::session::{Ap2000Session, SessionConfig};
use crate::uplink::{LorawanModem, UplinkPayload};

/// Build-time configuration of one node. Passed in explicitly at startup;
/// nothing in the crate reads process-wide state.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// MCU pin wired to the SDI-12 data line; consumed by the board
    /// support code that constructs the bus.
    pub bus_pin: u8,
    pub sensor_address: Sdi12Addr,
    /// LoRaWAN application EUI for the OTAA join.
    pub app_eui: [u8; 8],
    /// LoRaWAN application key for the OTAA join.
    pub app_key: [u8; 16],
}

impl NodeConfig {
    /// Default session parameters for the configured sensor address.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.sensor_address)
    }
}

/// One cycle failed before a payload went out.
#[derive(Debug, thiserror::Error)]
pub enum CycleError<BE, ME>
where
    BE: Debug,
    ME: Debug,
{
    /// The sensor exchange itself failed.
    #[error("sensor exchange failed: {0}")]
    Sensor(Ap2000Error<BE>),

    /// The probe answered none of its pings.
    #[error("sensor did not answer any ping")]
    SensorInactive,

    /// The modem refused the uplink.
    #[error("radio error: {0:?}")]
    Radio(ME),
}

/// What one completed cycle produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub report: MeasurementReport,
    pub payload: UplinkPayload,
}

/// Joins the network with the configured OTAA credentials. Called once at
/// startup, before the first cycle.
pub fn join_network<M>(modem: &mut M, config: &NodeConfig) -> Result<(), M::Error>
where
    M: LorawanModem,
{
    modem.join_otaa(&config.app_eui, &config.app_key)
}

/// Runs one poll cycle: probe the sensor, retrieve the full channel set,
/// pack the uplink, transmit.
///
/// A partial channel set is logged and transmitted anyway (missing
/// channels go out as zero); a silent sensor aborts the cycle instead of
/// uplinking a record of blanks.
pub fn run_cycle<IF, M>(
    session: &mut Ap2000Session<IF>,
    modem: &mut M,
) -> Result<CycleReport, CycleError<IF::Error, M::Error>>
where
    IF: Sdi12Bus + Sdi12Timer,
    M: LorawanModem,
{
    if !session.probe_active().map_err(CycleError::Sensor)? {
        return Err(CycleError::SensorInactive);
    }

    let report = session
        .retrieve_measurements(CHANNEL_COUNT, false)
        .map_err(CycleError::Sensor)?;
    if !report.is_complete() {
        log::warn!("cycle delivered {}/{} values", report.received, report.expected);
    }

    let payload = UplinkPayload::encode(&report.values);
    modem.transmit(payload.as_bytes()).map_err(CycleError::Radio)?;

    Ok(CycleReport { report, payload })
}

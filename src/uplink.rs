// src/uplink.rs
//! The packed uplink payload and the seam to the LoRaWAN modem.

use core::fmt::Debug;

use crate::measurement::{Channel, MeasurementSet};

/// Size of the uplink payload in bytes.
pub const UPLINK_PAYLOAD_LEN: usize = 10;

/// Channels carried in the uplink, in payload order.
pub const UPLINK_CHANNELS: [Channel; 5] = [
    Channel::Temperature,
    Channel::DissolvedOxygenSaturation,
    Channel::Salinity,
    Channel::Turbidity,
    Channel::Ph,
];

/// Ten bytes: five big-endian `u16` fixed-point values, value x 100, in
/// [`UPLINK_CHANNELS`] order. Blank channels encode as zero.
///
/// This is a closed, versionless wire contract with the network-side
/// decoder; any layout change needs a coordinated change there.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UplinkPayload([u8; UPLINK_PAYLOAD_LEN]);

/// The five transmitted channels, unpacked on the receiving side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UplinkReadings {
    pub temperature: f32,
    pub dissolved_oxygen_saturation: f32,
    pub salinity: f32,
    pub turbidity: f32,
    pub ph: f32,
}

impl UplinkPayload {
    /// Packs the transmitted channels of a measurement record.
    pub fn encode(set: &MeasurementSet) -> Self {
        let mut bytes = [0u8; UPLINK_PAYLOAD_LEN];
        for (i, channel) in UPLINK_CHANNELS.iter().enumerate() {
            let value = set.get(*channel).value().unwrap_or(0.0);
            let word = fixed_point(value).to_be_bytes();
            bytes[2 * i] = word[0];
            bytes[2 * i + 1] = word[1];
        }
        UplinkPayload(bytes)
    }

    /// Unpacks a payload back into the five transmitted channels.
    pub fn decode(&self) -> UplinkReadings {
        let mut values = [0f32; 5];
        for (i, value) in values.iter_mut().enumerate() {
            let word = u16::from_be_bytes([self.0[2 * i], self.0[2 * i + 1]]);
            *value = f32::from(word) / 100.0;
        }
        UplinkReadings {
            temperature: values[0],
            dissolved_oxygen_saturation: values[1],
            salinity: values[2],
            turbidity: values[3],
            ph: values[4],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Scales into the x100 fixed-point word, rounding, saturating at the
// representable range. Negative values saturate to zero; every carried
// channel is non-negative in water.
fn fixed_point(value: f32) -> u16 {
    let scaled = value * 100.0 + 0.5;
    if scaled <= 0.0 {
        0
    } else if scaled >= f32::from(u16::MAX) {
        u16::MAX
    } else {
        scaled as u16
    }
}

/// The black-box LoRaWAN modem the node hands payloads to. Implemented by
/// the board support code; a mock stands in for it under test.
pub trait LorawanModem {
    /// Associated error type for radio failures.
    type Error: Debug;

    /// Performs the over-the-air activation join. Called once at startup.
    fn join_otaa(&mut self, app_eui: &[u8; 8], app_key: &[u8; 16]) -> Result<(), Self::Error>;

    /// Transmits one uplink payload.
    fn transmit(&mut self, payload: &[u8]) -> Result<(), Self::Error>;
}

// src/measurement.rs

use core::fmt;

/// Number of channels the probe reports in one measurement cycle.
pub const CHANNEL_COUNT: usize = 16;

/// Raw value the probe sends for a channel with no valid reading.
pub const BLANK_SENTINEL: f32 = -9999.0;

/// The probe's channels, in the order they arrive on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    BarometricPressure,
    Temperature,
    Ph,
    RedoxPotential,
    Conductivity,
    ConductivityAt20,
    ConductivityAt25,
    Resistivity,
    Salinity,
    TotalDissolvedSolids,
    SeawaterSpecificGravity,
    DissolvedOxygen,
    DissolvedOxygenSaturation,
    Turbidity,
    Auxiliary,
    Ammonia,
}

impl Channel {
    /// All channels in wire order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::BarometricPressure,
        Channel::Temperature,
        Channel::Ph,
        Channel::RedoxPotential,
        Channel::Conductivity,
        Channel::ConductivityAt20,
        Channel::ConductivityAt25,
        Channel::Resistivity,
        Channel::Salinity,
        Channel::TotalDissolvedSolids,
        Channel::SeawaterSpecificGravity,
        Channel::DissolvedOxygen,
        Channel::DissolvedOxygenSaturation,
        Channel::Turbidity,
        Channel::Auxiliary,
        Channel::Ammonia,
    ];

    /// Wire slot of this channel.
    pub fn index(&self) -> usize {
        match self {
            Channel::BarometricPressure => 0,
            Channel::Temperature => 1,
            Channel::Ph => 2,
            Channel::RedoxPotential => 3,
            Channel::Conductivity => 4,
            Channel::ConductivityAt20 => 5,
            Channel::ConductivityAt25 => 6,
            Channel::Resistivity => 7,
            Channel::Salinity => 8,
            Channel::TotalDissolvedSolids => 9,
            Channel::SeawaterSpecificGravity => 10,
            Channel::DissolvedOxygen => 11,
            Channel::DissolvedOxygenSaturation => 12,
            Channel::Turbidity => 13,
            Channel::Auxiliary => 14,
            Channel::Ammonia => 15,
        }
    }

    /// Unit the probe reports this channel in.
    pub fn unit(&self) -> &'static str {
        match self {
            Channel::BarometricPressure => "mBar",
            Channel::Temperature => "°C",
            Channel::Ph => "ph",
            Channel::RedoxPotential => "mV",
            Channel::Conductivity => "uS/cm",
            Channel::ConductivityAt20 => "uS/cm",
            Channel::ConductivityAt25 => "uS/cm",
            Channel::Resistivity => "kO.cm",
            Channel::Salinity => "PSU",
            Channel::TotalDissolvedSolids => "mg/L",
            Channel::SeawaterSpecificGravity => "Sig_t",
            Channel::DissolvedOxygen => "mg/L",
            Channel::DissolvedOxygenSaturation => "%",
            Channel::Turbidity => "NTU",
            Channel::Auxiliary => "none",
            Channel::Ammonia => "none",
        }
    }
}

/// One channel's reading. The probe marks channels it could not measure
/// with [`BLANK_SENTINEL`]; that marker becomes a blank reading here so it
/// can never leak into arithmetic or the received-value count.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Reading(Option<f32>);

impl Reading {
    pub const BLANK: Reading = Reading(None);

    /// Wraps a raw wire value, mapping the sentinel to a blank reading.
    pub fn from_raw(value: f32) -> Self {
        if value == BLANK_SENTINEL {
            Reading(None)
        } else {
            Reading(Some(value))
        }
    }

    pub fn value(&self) -> Option<f32> {
        self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "--"),
        }
    }
}

/// A full measurement record: exactly [`CHANNEL_COUNT`] slots in fixed
/// channel order. Slots the probe never filled stay blank.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementSet {
    readings: [Reading; CHANNEL_COUNT],
}

impl MeasurementSet {
    pub fn get(&self, channel: Channel) -> Reading {
        self.readings[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, reading: Reading) {
        self.readings[channel.index()] = reading;
    }

    /// Writes a reading at a wire slot. Out-of-range slots are ignored; the
    /// probe cannot address more channels than the record holds.
    pub(crate) fn store_slot(&mut self, slot: usize, reading: Reading) {
        if let Some(entry) = self.readings.get_mut(slot) {
            *entry = reading;
        }
    }

    /// Channels and their readings in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, Reading)> + '_ {
        Channel::ALL.iter().map(move |c| (*c, self.readings[c.index()]))
    }
}

/// Outcome of one retrieval pass: the record plus how much of it the probe
/// actually delivered. Partial sets are a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementReport {
    pub values: MeasurementSet,
    /// Non-blank values received across all data commands.
    pub received: usize,
    /// Count the caller asked for.
    pub expected: usize,
}

impl MeasurementReport {
    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }
}

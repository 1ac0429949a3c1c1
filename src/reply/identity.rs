// src/reply/identity.rs

use core::fmt;

use heapless::String;

use super::error::ReplyParseError;
use super::values;
use super::ReplyValidation;
use crate::common::address::Sdi12Addr;

/// Shortest identity line that fills every fixed field.
pub const IDENTITY_MIN_LEN: usize = 20;

// Fixed character offsets of the identity line:
// 0 address, 1-2 version, 3-10 vendor, 11-16 model, 17-19 firmware,
// 20 onward serial number.
const VERSION_START: usize = 1;
const VENDOR_START: usize = 3;
const MODEL_START: usize = 11;
const FIRMWARE_START: usize = 17;
const SERIAL_START: usize = 20;

const VENDOR_LEN: usize = 8;
const MODEL_LEN: usize = 6;
const SERIAL_LEN: usize = 13;

/// The probe's identity record, decoded from one `aI!` reply line.
///
/// Immutable once constructed; a fresh record is decoded per query.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorIdentity {
    pub address: Sdi12Addr,
    /// SDI-12 protocol version, two digits scaled by 10 (e.g. `13` -> 1.3).
    pub sdi_version: f32,
    /// Vendor identification, 8 characters space padded.
    pub vendor_id: String<VENDOR_LEN>,
    /// Model code, 6 characters.
    pub model: String<MODEL_LEN>,
    /// Firmware version, three digits scaled by 100 (e.g. `113` -> 1.13).
    pub firmware_version: f32,
    /// Serial number, up to 13 characters.
    pub serial_number: String<SERIAL_LEN>,
}

/// Decodes a trimmed identity line at its fixed offsets.
///
/// Permissive validation clamps every field to whatever arrived, so a short
/// line produces truncated or zeroed trailing fields. Strict validation
/// rejects lines shorter than [`IDENTITY_MIN_LEN`] and non-address leading
/// characters.
pub fn decode(
    line: &[u8],
    validation: ReplyValidation,
) -> Result<SensorIdentity, ReplyParseError> {
    if validation == ReplyValidation::Strict {
        if line.len() < IDENTITY_MIN_LEN {
            return Err(ReplyParseError::TooShort {
                needed: IDENTITY_MIN_LEN,
                got: line.len(),
            });
        }
        let leading = line[0] as char;
        if !Sdi12Addr::is_valid_address_char(leading) {
            return Err(ReplyParseError::InvalidAddress(leading));
        }
    }

    let address = line
        .first()
        .and_then(|b| Sdi12Addr::new(*b as char).ok())
        .unwrap_or_default();

    let sdi_version =
        values::leading_number(values::clamped(line, VERSION_START, VENDOR_START)) as f32 / 10.0;
    let vendor_id = text_field(values::clamped(line, VENDOR_START, MODEL_START));
    let model = text_field(values::clamped(line, MODEL_START, FIRMWARE_START));
    let firmware_version =
        values::leading_number(values::clamped(line, FIRMWARE_START, SERIAL_START)) as f32 / 100.0;
    let serial_number = text_field(values::clamped(line, SERIAL_START, SERIAL_START + SERIAL_LEN));

    Ok(SensorIdentity {
        address,
        sdi_version,
        vendor_id,
        model,
        firmware_version,
        serial_number,
    })
}

// Copies an already width-clamped field, dropping any non-ASCII noise.
fn text_field<const N: usize>(bytes: &[u8]) -> String<N> {
    let mut out = String::new();
    for &b in bytes.iter().take(N) {
        if b.is_ascii() {
            let _ = out.push(b as char);
        }
    }
    out
}

impl fmt::Display for SensorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "addr {} sdi-12 v{:.1} vendor '{}' model '{}' fw v{:.2} serial '{}'",
            self.address,
            self.sdi_version,
            self.vendor_id,
            self.model,
            self.firmware_version,
            self.serial_number,
        )
    }
}

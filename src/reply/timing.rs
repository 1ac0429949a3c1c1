// src/reply/timing.rs

use super::error::ReplyParseError;
use super::values;
use super::ReplyValidation;

/// Shortest start-measurement acknowledgment that fills both fields
/// (address, three wait digits, at least one count digit).
pub const REQUEST_ACK_MIN_LEN: usize = 5;

const WAIT_START: usize = 1;
const COUNT_START: usize = 4;

/// The start-measurement acknowledgment: how long until the values are
/// ready and how many the probe will produce. Consumed immediately to pace
/// the wait before retrieval.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeasurementRequestInfo {
    /// Announced wait until the measurement completes, in seconds (ttt).
    pub wait_seconds: u16,
    /// Announced number of values the probe will produce.
    pub value_count: u16,
}

/// Decodes a trimmed `aC!` acknowledgment line.
///
/// Permissive validation decodes a malformed line to zeroed fields and lets
/// the caller proceed; strict validation rejects lines shorter than
/// [`REQUEST_ACK_MIN_LEN`].
pub fn decode(
    line: &[u8],
    validation: ReplyValidation,
) -> Result<MeasurementRequestInfo, ReplyParseError> {
    if validation == ReplyValidation::Strict && line.len() < REQUEST_ACK_MIN_LEN {
        return Err(ReplyParseError::TooShort {
            needed: REQUEST_ACK_MIN_LEN,
            got: line.len(),
        });
    }

    let wait_seconds =
        values::leading_number(values::clamped(line, WAIT_START, COUNT_START)).min(u16::MAX as u32)
            as u16;
    let value_count = values::leading_number(values::clamped(line, COUNT_START, line.len()))
        .min(u16::MAX as u32) as u16;

    Ok(MeasurementRequestInfo { wait_seconds, value_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ack() {
        let info = decode(b"003916", ReplyValidation::Permissive).unwrap();
        assert_eq!(info.wait_seconds, 39);
        assert_eq!(info.value_count, 16);
    }

    #[test]
    fn test_decode_single_digit_count() {
        let info = decode(b"01204", ReplyValidation::Permissive).unwrap();
        assert_eq!(info.wait_seconds, 120);
        assert_eq!(info.value_count, 4);
    }

    #[test]
    fn test_permissive_short_ack_zeroes() {
        let info = decode(b"0", ReplyValidation::Permissive).unwrap();
        assert_eq!(info.wait_seconds, 0);
        assert_eq!(info.value_count, 0);

        let empty = decode(b"", ReplyValidation::Permissive).unwrap();
        assert_eq!(empty.wait_seconds, 0);
        assert_eq!(empty.value_count, 0);
    }

    #[test]
    fn test_strict_rejects_short_ack() {
        assert_eq!(
            decode(b"0039", ReplyValidation::Strict),
            Err(ReplyParseError::TooShort { needed: 5, got: 4 })
        );
        assert!(decode(b"00391", ReplyValidation::Strict).is_ok());
    }
}

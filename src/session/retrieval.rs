// src/session/retrieval.rs

use super::{Ap2000Session, RequestPolicy};
use crate::common::{
    command::{Command, DataIndex},
    error::Ap2000Error,
    hal_traits::{Sdi12Bus, Sdi12Timer},
};
use crate::measurement::{MeasurementReport, MeasurementSet, Reading};
use crate::reply::values;

/// Minimum data reply worth inspecting: echoed address, sign, first digit.
const DATA_MIN_REPLY_BYTES: usize = 3;

impl<IF> Ap2000Session<IF>
where
    IF: Sdi12Bus + Sdi12Timer,
{
    /// Retrieves the current measurement into a fixed-order record.
    ///
    /// Walks the data commands `aD0!` through `aD9!`, parsing the
    /// sign-prefixed value list of each reply, until `expected_count`
    /// values arrived or the command family is exhausted. Values equal to
    /// the blank sentinel occupy their slot but never advance the received
    /// count. A command round that stays silent past its deadline
    /// contributes nothing and the walk moves on; there is no retry and no
    /// way to tell a glitch from "no more data".
    ///
    /// The returned report carries the partial record and the received
    /// count; an incomplete set is a normal outcome.
    pub fn retrieve_measurements(
        &mut self,
        expected_count: usize,
        force_new_request: bool,
    ) -> Result<MeasurementReport, Ap2000Error<IF::Error>> {
        let needs_request = match self.config.request_policy {
            // Kept from the deployed guard: the OR means a fresh request is
            // issued unless a measurement is pending AND one was forced.
            RequestPolicy::RequestUnlessForcedPending => {
                !self.measurement_pending || !force_new_request
            }
            RequestPolicy::RequestWhenStale => !self.measurement_pending || force_new_request,
        };
        if needs_request {
            self.request_measurement_and_wait()?;
        }

        let mut record = MeasurementSet::default();
        let mut received = 0usize;

        for index in DataIndex::ALL {
            if received >= expected_count {
                break;
            }
            self.send(&Command::SendData { address: self.config.address, index })?;
            self.wait_for_available(DATA_MIN_REPLY_BYTES, self.config.data_ready_timeout);

            // The probe echoes its address ahead of the value list; the
            // first value's sign rides with it and the scanner does not
            // need either.
            let _ = self.take_byte()?;
            if let Some(byte) = self.peek()? {
                if byte == b'+' || byte == b'-' {
                    let _ = self.take_byte()?;
                }
            }

            while self.interface.available() > 0 {
                match self.peek()? {
                    Some(byte) if values::starts_value(byte) => {
                        let raw = self.scan_value()?;
                        log::trace!("D{}: {}", index.as_u8(), raw);
                        let reading = Reading::from_raw(raw);
                        record.store_slot(received, reading);
                        if !reading.is_blank() {
                            received += 1;
                        }
                    }
                    Some(_) => {
                        // Stray delimiter or line-end noise.
                        let _ = self.take_byte()?;
                    }
                    None => break,
                }
                let delay = self.config.character_delay.as_millis() as u32;
                self.interface.delay_ms(delay);
            }
        }

        self.measurement_pending = false;
        log::debug!("retrieved {}/{} values", received, expected_count);
        Ok(MeasurementReport { values: record, received, expected: expected_count })
    }
}

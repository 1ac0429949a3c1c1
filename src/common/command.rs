//! Commands understood by the AP-2000.
//!
//! The probe answers the small fixed set below; general SDI-12 bus features
//! (address changes, verification, CRC variants) are out of scope for this
//! node.

use core::fmt;
use core::fmt::Write;

use arrayvec::ArrayString;

use super::address::Sdi12Addr;

/// Longest formatted command, `aDn!`.
pub const COMMAND_MAX_LEN: usize = 4;

/// Index of a `aD<n>!` data-retrieval command, 0-9.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataIndex(u8);

impl DataIndex {
    /// All indices in retrieval order. A full measurement cycle walks these
    /// until the expected value count is met.
    pub const ALL: [DataIndex; 10] = [
        DataIndex(0),
        DataIndex(1),
        DataIndex(2),
        DataIndex(3),
        DataIndex(4),
        DataIndex(5),
        DataIndex(6),
        DataIndex(7),
        DataIndex(8),
        DataIndex(9),
    ];

    pub const fn new(index: u8) -> Option<Self> {
        if index <= 9 {
            Some(DataIndex(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

/// One command on the wire. The `Display` implementation produces the
/// standard SDI-12 command string (e.g. `0!`, `0I!`, `0C!`, `0D3!`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Acknowledge-active ping (`a!`) - any reply means the probe is awake.
    Ping { address: Sdi12Addr },

    /// Identify command (`aI!`) - requests the fixed-width identity line.
    Identify { address: Sdi12Addr },

    /// Start-measurement command (`aC!`) - the AP-2000 takes the concurrent
    /// form; the acknowledgment carries wait time and value count.
    StartMeasurement { address: Sdi12Addr },

    /// Send-data command (`aD0!`..`aD9!`) - requests one batch of values
    /// from the completed measurement.
    SendData { address: Sdi12Addr, index: DataIndex },
}

/// Formatting a command into its fixed buffer failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("command did not fit its wire encoding")]
pub struct CommandFormatError;

impl Command {
    /// Returns the address the command is directed to.
    pub fn address(&self) -> Sdi12Addr {
        match self {
            Command::Ping { address } => *address,
            Command::Identify { address } => *address,
            Command::StartMeasurement { address } => *address,
            Command::SendData { address, .. } => *address,
        }
    }

    /// Formats the command into a stack buffer ready for the bus.
    pub fn format_into(&self) -> Result<ArrayString<COMMAND_MAX_LEN>, CommandFormatError> {
        let mut buffer = ArrayString::new();
        write!(buffer, "{}", self).map_err(|_| CommandFormatError)?;
        Ok(buffer)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Ping { address } => write!(f, "{}!", address),
            Command::Identify { address } => write!(f, "{}I!", address),
            Command::StartMeasurement { address } => write!(f, "{}C!", address),
            Command::SendData { address, index } => {
                write!(f, "{}D{}!", address, index.as_u8())
            }
        }
    }
}

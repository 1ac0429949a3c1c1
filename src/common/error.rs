// src/common/error.rs

use super::command::CommandFormatError;
use crate::reply::ReplyParseError;

/// Error surface of a sensor exchange, generic over the bus error type.
#[derive(Debug, thiserror::Error)]
pub enum Ap2000Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the bus implementation.
    #[error("bus I/O error: {0:?}")]
    Io(E),

    /// Provided address character is not a valid SDI-12 address.
    #[error("invalid SDI-12 address character: '{0}'")]
    InvalidAddress(char),

    /// A command failed to format into its wire encoding.
    #[error("command formatting failed: {0}")]
    CommandFormat(CommandFormatError),

    /// Reply buffer provided was too small for the incoming line.
    #[error("reply buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// A reply arrived but did not decode under the configured validation.
    #[error("malformed reply: {0}")]
    Reply(ReplyParseError),
}

impl<E: core::fmt::Debug> From<ReplyParseError> for Ap2000Error<E> {
    fn from(e: ReplyParseError) -> Self {
        Ap2000Error::Reply(e)
    }
}

impl<E: core::fmt::Debug> From<CommandFormatError> for Ap2000Error<E> {
    fn from(e: CommandFormatError) -> Self {
        Ap2000Error::CommandFormat(e)
    }
}

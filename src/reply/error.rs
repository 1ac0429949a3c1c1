// src/reply/error.rs

/// Error type specific to reply decoding under strict validation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ReplyParseError {
    /// Reply is shorter than its fixed layout requires.
    #[error("reply too short: needed {needed} characters, got {got}")]
    TooShort { needed: usize, got: usize },

    /// Leading address character is not a valid SDI-12 address.
    #[error("invalid address character '{0}' in reply")]
    InvalidAddress(char),
}

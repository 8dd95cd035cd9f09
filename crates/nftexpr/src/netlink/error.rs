//! Error types for netlink attribute encoding and decoding.

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while framing or parsing attributes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input ended before a complete header or payload.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes needed to continue.
        expected: usize,
        /// Bytes remaining in the buffer.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// An expression of a different kind was found on the wire.
    #[error("unexpected expression: expected {expected:?}, got {actual:?}")]
    UnexpectedExpression {
        /// The expression name the caller asked for.
        expected: &'static str,
        /// The expression name carried in the message.
        actual: String,
    },

    /// Attribute does not fit the 16-bit length field.
    #[error("attribute too large: {len} bytes exceeds 65535")]
    AttributeTooLarge {
        /// Total attribute length including header.
        len: usize,
    },

    /// A raw expression was given a name that has a typed variant.
    #[error("expression {name:?} has a typed variant and cannot be kept raw")]
    RegisteredExpression {
        /// The expression name.
        name: String,
    },
}

impl Error {
    /// Check if this error came from reading a malformed stream.
    pub fn is_decode_error(&self) -> bool {
        !self.is_encode_error()
    }

    /// Check if this error came from framing outgoing attributes.
    pub fn is_encode_error(&self) -> bool {
        matches!(
            self,
            Self::AttributeTooLarge { .. } | Self::RegisteredExpression { .. }
        )
    }

    /// Check if the input ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

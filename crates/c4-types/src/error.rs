use thiserror::Error;

/// Errors produced when parsing or constructing C4 values.
///
/// Positions and lengths are counted in characters, so a multi-byte
/// character in the input still occupies a single position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum C4Error {
    #[error("non c4 id character at position {0}")]
    BadChar(usize),

    #[error("c4 ids must be 90 characters long, input length {0}")]
    BadLength(usize),

    #[error("digest input too long: {0} bytes exceeds 64")]
    OversizedInput(usize),

    /// The text is well formed but its value needs more than 512 bits.
    #[error("c4 id value does not fit in 64 bytes")]
    OutOfRange,

    #[error("unexpected nil id")]
    UnexpectedNil,

    #[error("invalid tree data")]
    InvalidTree,
}

/// Convenience alias for C4 results.
pub type C4Result<T> = Result<T, C4Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_tooling() {
        assert_eq!(
            C4Error::BadChar(5).to_string(),
            "non c4 id character at position 5"
        );
        assert_eq!(
            C4Error::BadLength(50).to_string(),
            "c4 ids must be 90 characters long, input length 50"
        );
        assert_eq!(C4Error::UnexpectedNil.to_string(), "unexpected nil id");
        assert_eq!(C4Error::InvalidTree.to_string(), "invalid tree data");
    }

    #[test]
    fn oversized_reports_length() {
        let msg = C4Error::OversizedInput(65).to_string();
        assert!(msg.contains("65"));
    }
}

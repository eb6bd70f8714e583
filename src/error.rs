//! Error type shared by the value algebra and the synthesizer.

use std::fmt;

use crate::gate::GateKind;

/// Errors raised by operations that are not total.
///
/// All of these are configuration or programming errors: they are surfaced
/// synchronously and never retried.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// A value (or a structural limit) wider than the supported maximum.
    CapacityExceeded { requested: usize, max: usize },
    /// A gate kind that the requested pass cannot lower.
    UnsupportedGateKind(GateKind),
    /// A gate without inputs, which no pass can lower.
    EmptyGate(GateKind),
    /// An operand whose width does not fit the operation.
    WidthMismatch { expected: usize, actual: usize },
    /// A bit index outside the width of the value.
    IndexOutOfRange { index: usize, width: usize },
    /// Malformed textual input.
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded { requested, max } => {
                write!(f, "Capacity exceeded: {} requested, at most {} supported", requested, max)
            }
            Error::UnsupportedGateKind(kind) => write!(f, "Unsupported gate kind: {}", kind),
            Error::EmptyGate(kind) => write!(f, "Gate {} has no inputs", kind),
            Error::WidthMismatch { expected, actual } => {
                write!(f, "Width mismatch: expected {}, got {}", expected, actual)
            }
            Error::IndexOutOfRange { index, width } => {
                write!(f, "Bit index {} out of range for width {}", index, width)
            }
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::CapacityExceeded { requested: 33, max: 32 };
        assert_eq!(e.to_string(), "Capacity exceeded: 33 requested, at most 32 supported");

        let e = Error::UnsupportedGateKind(GateKind::Xor);
        assert_eq!(e.to_string(), "Unsupported gate kind: XOR");
    }
}

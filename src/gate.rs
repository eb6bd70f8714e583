use std::fmt::{Display, Formatter};

/// Default (and maximal) number of inputs for a gate.
pub const MAX_INPUTS: usize = 32;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Not,
    OddParity,
    EvenParity,
}

/// Static metadata associated with a [`GateKind`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GateInfo {
    pub name: &'static str,
    pub min_inputs: usize,
    pub max_inputs: usize,
    /// Multi-input XOR-like gates of this kind compute a parity function.
    pub parity: bool,
}

impl GateKind {
    pub const ALL: [GateKind; 9] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::Not,
        GateKind::OddParity,
        GateKind::EvenParity,
    ];

    pub const fn info(self) -> GateInfo {
        const fn nary(name: &'static str, parity: bool) -> GateInfo {
            GateInfo {
                name,
                min_inputs: 2,
                max_inputs: MAX_INPUTS,
                parity,
            }
        }
        match self {
            GateKind::And => nary("AND", false),
            GateKind::Or => nary("OR", false),
            GateKind::Xor => nary("XOR", true),
            GateKind::Nand => nary("NAND", false),
            GateKind::Nor => nary("NOR", false),
            GateKind::Xnor => nary("XNOR", true),
            GateKind::Not => GateInfo {
                name: "NOT",
                min_inputs: 1,
                max_inputs: 1,
                parity: false,
            },
            GateKind::OddParity => nary("ODD_PARITY", true),
            GateKind::EvenParity => nary("EVEN_PARITY", true),
        }
    }

    pub const fn name(self) -> &'static str {
        self.info().name
    }

    /// Kind without the output inversion, used for the inner nodes of a split gate.
    pub const fn base(self) -> GateKind {
        match self {
            GateKind::Nand => GateKind::And,
            GateKind::Nor => GateKind::Or,
            GateKind::Xnor => GateKind::Xor,
            GateKind::EvenParity => GateKind::OddParity,
            other => other,
        }
    }

    /// Kind computing the complement, if it exists as a single gate.
    pub const fn inverted(self) -> Option<GateKind> {
        match self {
            GateKind::And => Some(GateKind::Nand),
            GateKind::Nand => Some(GateKind::And),
            GateKind::Or => Some(GateKind::Nor),
            GateKind::Nor => Some(GateKind::Or),
            GateKind::Xor => Some(GateKind::Xnor),
            GateKind::Xnor => Some(GateKind::Xor),
            GateKind::OddParity => Some(GateKind::EvenParity),
            GateKind::EvenParity => Some(GateKind::OddParity),
            GateKind::Not => None,
        }
    }

    /// Parity gate equivalent to a multi-input `XOR`/`XNOR`.
    pub const fn parity(self) -> Option<GateKind> {
        match self {
            GateKind::Xor => Some(GateKind::OddParity),
            GateKind::Xnor => Some(GateKind::EvenParity),
            _ => None,
        }
    }

    /// Checks whether the output is the complement of the base function.
    pub const fn is_negated(self) -> bool {
        matches!(
            self,
            GateKind::Nand | GateKind::Nor | GateKind::Xnor | GateKind::EvenParity | GateKind::Not
        )
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base() {
        assert_eq!(GateKind::Nand.base(), GateKind::And);
        assert_eq!(GateKind::Nor.base(), GateKind::Or);
        assert_eq!(GateKind::And.base(), GateKind::And);
        assert_eq!(GateKind::OddParity.base(), GateKind::OddParity);
        assert_eq!(GateKind::Xnor.base(), GateKind::Xor);
        assert_eq!(GateKind::EvenParity.base(), GateKind::OddParity);
        assert_eq!(GateKind::Xor.base(), GateKind::Xor);
    }

    #[test]
    fn test_inverted_is_involution() {
        for kind in GateKind::ALL {
            if let Some(inv) = kind.inverted() {
                assert_eq!(inv.inverted(), Some(kind));
                assert_ne!(kind.is_negated(), inv.is_negated());
            }
        }
    }

    #[test]
    fn test_info() {
        assert_eq!(GateKind::Not.info().max_inputs, 1);
        assert!(GateKind::Xor.info().parity);
        assert!(!GateKind::And.info().parity);
        assert_eq!(GateKind::EvenParity.to_string(), "EVEN_PARITY");
    }
}

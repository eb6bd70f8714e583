//! Combinational evaluation of a single gate instance.
//!
//! Each simulation step, the scheduler collects the values present on the
//! input ports of a gate and calls [`propagate`] (or [`evaluate`] directly).
//! The result is committed to the output port after [`Propagation::delay`]
//! time units; ordering across gates is the scheduler's business.
//!
//! # Examples
//!
//! ```
//! use gate_synth::eval::{evaluate, DrivePolicy, UndefinedPolicy};
//! use gate_synth::gate::GateKind;
//! use gate_synth::value::Value;
//!
//! let out = evaluate(
//!     GateKind::Nand,
//!     0,
//!     &[Some(Value::TRUE), Some(Value::TRUE)],
//!     DrivePolicy::Driven,
//!     UndefinedPolicy::Ignore,
//!     1,
//! );
//! assert_eq!(out, Value::FALSE);
//! ```

use log::debug;

use crate::gate::GateKind;
use crate::value::{Value, MAX_WIDTH};

/// Propagation delay of a gate, in simulator time units.
pub const DEFAULT_DELAY: u32 = 1;

/// How the output stage drives its wire.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DrivePolicy {
    /// Drives both `0` and `1`.
    #[default]
    Driven,
    /// Can only pull low; `1` floats.
    OpenDrain,
    /// Can only pull high; `0` floats.
    OpenSource,
}

/// What an unconnected input port means.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum UndefinedPolicy {
    /// Unconnected inputs are left out of the computation.
    #[default]
    Ignore,
    /// Any unconnected input makes the output an error.
    Error,
}

/// Per-instance gate configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GateConfig {
    pub kind: GateKind,
    /// Data width of every port.
    pub width: usize,
    /// Bit `i` set means input port `i` is negated before use.
    pub negated: u64,
    pub drive: DrivePolicy,
    pub undefined: UndefinedPolicy,
    pub delay: u32,
}

impl GateConfig {
    pub fn new(kind: GateKind, width: usize) -> Self {
        Self {
            kind,
            width,
            negated: 0,
            drive: DrivePolicy::default(),
            undefined: UndefinedPolicy::default(),
            delay: DEFAULT_DELAY,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(GateKind::And, 1)
    }
}

/// Output value and the delay after which it is committed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Propagation {
    pub value: Value,
    pub delay: u32,
}

/// Applies the gate function of `kind` to already collected inputs.
///
/// `NOT` uses only its first input. Returns [`Value::ERROR`] for no inputs.
pub fn compute(kind: GateKind, inputs: &[Value]) -> Value {
    let fold = |f: fn(&Value, &Value) -> Value| inputs.iter().copied().reduce(|a, b| f(&a, &b));
    let result = match kind {
        GateKind::And => fold(Value::and),
        GateKind::Or => fold(Value::or),
        GateKind::Xor | GateKind::OddParity => fold(Value::xor),
        GateKind::Nand => fold(Value::and).map(|v| !v),
        GateKind::Nor => fold(Value::or).map(|v| !v),
        GateKind::Xnor | GateKind::EvenParity => fold(Value::xor).map(|v| !v),
        GateKind::Not => inputs.first().map(|v| !v),
    };
    result.unwrap_or(Value::ERROR)
}

/// Applies the output drive policy.
pub fn pull_output(value: Value, drive: DrivePolicy) -> Value {
    let width = value.width();
    let (error, unknown, ones) = (value.error_bits(), value.unknown_bits(), value.value_bits());
    match drive {
        DrivePolicy::Driven => value,
        DrivePolicy::OpenDrain => Value::normalized(width, error, unknown | ones, 0),
        DrivePolicy::OpenSource => {
            let zeros = !ones & !unknown & !error;
            Value::normalized(width, error, unknown | zeros, ones)
        }
    }
}

/// Evaluates one gate for one simulation step.
///
/// `inputs[i]` is the value on input port `i`, or `None` if the port is not
/// connected. Bit `i` of `negated` inverts port `i`.
///
/// An error result has `width` bits, clamped to [`MAX_WIDTH`].
pub fn evaluate(
    kind: GateKind,
    negated: u64,
    inputs: &[Option<Value>],
    drive: DrivePolicy,
    undefined: UndefinedPolicy,
    width: usize,
) -> Value {
    let mut connected = Vec::with_capacity(inputs.len());
    let mut missing = false;
    for (i, input) in inputs.iter().enumerate() {
        match input {
            Some(v) if i < 64 && (negated >> i) & 1 == 1 => connected.push(!v),
            Some(v) => connected.push(*v),
            None => missing = true,
        }
    }

    if connected.is_empty() || (missing && undefined == UndefinedPolicy::Error) {
        debug!(
            "evaluate({}): {} of {} inputs connected, result is an error",
            kind,
            connected.len(),
            inputs.len()
        );
        return Value::create_error(width.min(MAX_WIDTH));
    }

    pull_output(compute(kind, &connected), drive)
}

/// Evaluates a configured gate instance and attaches its propagation delay.
pub fn propagate(config: &GateConfig, inputs: &[Option<Value>]) -> Propagation {
    let value = evaluate(
        config.kind,
        config.negated,
        inputs,
        config.drive,
        config.undefined,
        config.width,
    );
    Propagation {
        value,
        delay: config.delay,
    }
}

//! # gate-synth: four-valued signals and gate synthesis
//!
//! **`gate-synth`** provides the two computational cores of a digital logic simulator:
//!
//! - a **four-valued bit-vector algebra** ([`Value`][crate::value::Value]) where every bit is
//!   `0`, `1`, unknown (`x`) or error (`E`), together with the per-gate evaluation rules
//!   used by the simulation engine,
//! - a **gate synthesizer** that turns a Boolean [`Expr`][crate::expr::Expr] into a tree of
//!   logic gates and legalizes it for a target library (fan-in limit, two-input gates,
//!   NAND-only).
//!
//! ## Values
//!
//! ```rust
//! use gate_synth::value::Value;
//!
//! let a = Value::create_known(4, 0b1100);
//! let b = Value::parse(4, "10x0").unwrap();
//!
//! // A defined 0 wins over anything in AND.
//! assert_eq!((a & b).to_binary_string(), "1000");
//! // Ambiguity poisons XOR.
//! assert_eq!((a ^ b).to_binary_string(), "01E0");
//! assert_eq!(a.to_hex_string(), "c");
//! ```
//!
//! ## Synthesis
//!
//! ```rust
//! use gate_synth::expr::Expr;
//! use gate_synth::synth::{SynthOptions, Synthesizer};
//!
//! let expr: Expr = "A & (B | ~C)".parse().unwrap();
//! let synth = Synthesizer::default();
//!
//! let tree = synth.synthesize(&expr, SynthOptions::default()).unwrap();
//! assert_eq!(tree.to_string(), "AND(A, OR(B, NOT(C)))");
//!
//! let nands = synth
//!     .synthesize(&expr, SynthOptions { two_inputs: true, use_nands: true })
//!     .unwrap();
//! assert!(nands.gates().all(|g| g.children().len() == 2));
//! ```
//!
//! ## Core Components
//!
//! - **[`value`]** and **[`format`]**: the value algebra and its textual forms.
//! - **[`cache`]**: optional caller-owned interning of values.
//! - **[`eval`]**: evaluation of a single gate instance for one simulation step.
//! - **[`expr`]**, **[`tree`]**, **[`synth`]**: expressions, gate trees, and the passes between them.
//! - **[`dot`]**: Graphviz export of gate trees.

pub mod cache;
pub mod dot;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod gate;
pub mod synth;
pub mod tree;
pub mod utils;
pub mod value;

//! Gate synthesis from Boolean expressions.
//!
//! [`Synthesizer::build`] turns an [`Expr`] into a [`Node`] tree, flattening
//! chains of the same operator into one wide gate. The legalization passes
//! then reshape the tree for a target library:
//!
//! - [`Synthesizer::repair`] enforces the fan-in limit and turns wide
//!   `XOR`/`XNOR` gates into parity gates,
//! - [`Synthesizer::convert_to_two_inputs`] rewrites every gate into a
//!   balanced tree of two-input gates,
//! - [`Synthesizer::convert_to_nands`] lowers everything to two-input `NAND`s.
//!
//! Each pass consumes a tree and returns a new one.

use log::debug;

use crate::error::{Error, Result};
use crate::expr::{Expr, Visitor};
use crate::gate::{GateKind, MAX_INPUTS};
use crate::tree::Node;

/// Default fan-in limit of the synthesized gates.
pub const DEFAULT_MAX_INPUTS: usize = 9;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SynthConfig {
    /// Maximum number of children of any gate after [`Synthesizer::repair`].
    pub max_inputs: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_inputs: DEFAULT_MAX_INPUTS,
        }
    }
}

/// Which optional passes [`Synthesizer::synthesize`] runs after `repair`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SynthOptions {
    pub two_inputs: bool,
    pub use_nands: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    /// Fails with [`Error::CapacityExceeded`] unless `2 <= max_inputs <= 32`.
    pub fn new(config: SynthConfig) -> Result<Self> {
        if config.max_inputs < 2 || config.max_inputs > MAX_INPUTS {
            return Err(Error::CapacityExceeded {
                requested: config.max_inputs,
                max: MAX_INPUTS,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Builds, repairs, and optionally normalizes a gate tree for `expr`.
    pub fn synthesize(&self, expr: &Expr, options: SynthOptions) -> Result<Node> {
        let mut node = self.repair(self.build(expr));
        if options.two_inputs {
            node = self.convert_to_two_inputs(node);
        }
        if options.use_nands {
            node = self.convert_to_nands(node)?;
        }
        debug!(
            "synthesize({}): {} gates, depth {}, max fan-in {}",
            expr,
            node.gate_count(),
            node.depth(),
            node.max_fan_in()
        );
        Ok(node)
    }

    pub fn build(&self, expr: &Expr) -> Node {
        expr.visit(&mut Builder)
    }
}

struct Builder;

impl Builder {
    fn binary(&mut self, kind: GateKind, a: &Expr, b: &Expr) -> Node {
        let left = a.visit(self);
        let right = b.visit(self);
        match (left, right) {
            (
                Node::Gate {
                    kind: lk,
                    children: mut left_children,
                },
                Node::Gate {
                    kind: rk,
                    children: right_children,
                },
            ) if lk == kind && rk == kind => {
                left_children.extend(right_children);
                Node::gate(kind, left_children)
            }
            (Node::Gate { kind: lk, mut children }, right) if lk == kind => {
                children.push(right);
                Node::gate(kind, children)
            }
            (left, Node::Gate { kind: rk, mut children }) if rk == kind => {
                children.insert(0, left);
                Node::gate(kind, children)
            }
            (left, right) => Node::gate(kind, vec![left, right]),
        }
    }
}

impl Visitor for Builder {
    type Output = Node;

    fn visit_and(&mut self, a: &Expr, b: &Expr) -> Node {
        self.binary(GateKind::And, a, b)
    }

    fn visit_or(&mut self, a: &Expr, b: &Expr) -> Node {
        self.binary(GateKind::Or, a, b)
    }

    fn visit_xor(&mut self, a: &Expr, b: &Expr) -> Node {
        self.binary(GateKind::Xor, a, b)
    }

    // XNOR is not associative over more than two operands, so it never coalesces.
    fn visit_xnor(&mut self, a: &Expr, b: &Expr) -> Node {
        Node::gate(GateKind::Xnor, vec![a.visit(self), b.visit(self)])
    }

    fn visit_eq(&mut self, a: &Expr, b: &Expr) -> Node {
        self.visit_xnor(a, b)
    }

    fn visit_not(&mut self, a: &Expr) -> Node {
        match a.visit(self) {
            Node::Gate { kind, children } if matches!(kind, GateKind::And | GateKind::Or | GateKind::Xor) => {
                let flipped = match kind {
                    GateKind::And => GateKind::Nand,
                    GateKind::Or => GateKind::Nor,
                    _ => GateKind::Xnor,
                };
                Node::gate(flipped, children)
            }
            other => Node::gate(GateKind::Not, vec![other]),
        }
    }

    fn visit_variable(&mut self, name: &str) -> Node {
        Node::input(name)
    }

    fn visit_constant(&mut self, value: i32) -> Node {
        Node::constant(value)
    }
}

// Fan-in repair
impl Synthesizer {
    /// Splits every gate wider than the fan-in limit and retags wide
    /// `XOR`/`XNOR` gates as parity gates.
    pub fn repair(&self, node: Node) -> Node {
        match node {
            Node::Gate { kind, mut children } => {
                while children.len() > self.config.max_inputs {
                    children = self.group(kind, children);
                }
                let kind = match kind.parity() {
                    Some(parity) if children.len() > 2 => parity,
                    _ => kind,
                };
                let children = children.into_iter().map(|c| self.repair(c)).collect();
                Node::gate(kind, children)
            }
            leaf => leaf,
        }
    }

    fn group(&self, kind: GateKind, children: Vec<Node>) -> Vec<Node> {
        let n = children.len();
        let count = n.div_ceil(self.config.max_inputs);
        let size = n / count;
        let extra = n % count;
        debug!(
            "repair: splitting {} with {} inputs into {} groups of {}..={}",
            kind,
            n,
            count,
            size,
            size + (extra > 0) as usize
        );

        let base = kind.base();
        let mut rest = children.into_iter();
        (0..count)
            .map(|i| {
                let mut group: Vec<Node> = rest.by_ref().take(size + (i < extra) as usize).collect();
                if group.len() == 1 {
                    group.remove(0)
                } else {
                    Node::gate(base, group)
                }
            })
            .collect()
    }
}

// Two-input normalization
impl Synthesizer {
    /// Rewrites every gate into a balanced tree of gates with at most two inputs.
    ///
    /// Only the top node of each split keeps an inverting kind.
    pub fn convert_to_two_inputs(&self, node: Node) -> Node {
        match node {
            Node::Gate { kind, children } => {
                let children = children.into_iter().map(|c| self.convert_to_two_inputs(c)).collect();
                Node::gate(kind, split_in_halves(kind.base(), children))
            }
            leaf => leaf,
        }
    }
}

fn split_in_halves(base: GateKind, mut children: Vec<Node>) -> Vec<Node> {
    if children.len() <= 2 {
        return children;
    }
    let right = children.split_off((children.len() + 1) / 2);
    vec![half(base, children), half(base, right)]
}

fn half(base: GateKind, mut children: Vec<Node>) -> Node {
    if children.len() == 1 {
        children.remove(0)
    } else {
        Node::gate(base, split_in_halves(base, children))
    }
}

// NAND normalization
impl Synthesizer {
    /// Lowers the tree to two-input `NAND` gates only.
    ///
    /// Fails with [`Error::UnsupportedGateKind`] on `XOR`, `XNOR` and parity
    /// gates, and with [`Error::EmptyGate`] on a gate without inputs.
    pub fn convert_to_nands(&self, node: Node) -> Result<Node> {
        lower(self.convert_to_two_inputs(node))
    }
}

fn lower(node: Node) -> Result<Node> {
    let (kind, children) = match node {
        Node::Gate { kind, children } => (kind, children),
        leaf => return Ok(leaf),
    };
    if children.is_empty() {
        return Err(Error::EmptyGate(kind));
    }
    let children = children.into_iter().map(lower).collect::<Result<Vec<_>>>()?;

    let lowered = match kind {
        GateKind::Nand => nand(children),
        GateKind::And => invert(nand(children)),
        GateKind::Not => {
            let mut children = children;
            invert(children.swap_remove(0))
        }
        GateKind::Or => nand(children.into_iter().map(invert).collect()),
        GateKind::Nor => invert(nand(children.into_iter().map(invert).collect())),
        GateKind::Xor | GateKind::Xnor | GateKind::OddParity | GateKind::EvenParity => {
            return Err(Error::UnsupportedGateKind(kind));
        }
    };
    Ok(lowered)
}

/// `NAND` over one or two inputs; a single input is tied to both pins.
fn nand(mut children: Vec<Node>) -> Node {
    if children.len() == 1 {
        let x = children.remove(0);
        Node::nand2(x.clone(), x)
    } else {
        Node::gate(GateKind::Nand, children)
    }
}

/// Complement of `x`: constants flip, an existing inverter is unwrapped.
fn invert(x: Node) -> Node {
    match x {
        Node::Constant { value } => Node::constant(i32::from(value == 0)),
        inverter if inverter.is_nand_not() => inverter.children()[0].clone(),
        other => Node::nand2(other.clone(), other),
    }
}

//! Gate trees produced by the synthesizer.
//!
//! A [`Node`] is either a gate over child nodes, a named input, or a constant.
//! Structural invariants (fan-in limits, two-input form, NAND-only form) are
//! established by the passes in [`crate::synth`], not by the type itself.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::eval;
use crate::expr::Assignments;
use crate::gate::GateKind;
use crate::value::Value;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Node {
    Gate { kind: GateKind, children: Vec<Node> },
    Input { name: String },
    Constant { value: i32 },
}

// Constructors
impl Node {
    pub fn gate(kind: GateKind, children: Vec<Node>) -> Self {
        Node::Gate { kind, children }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Node::Input { name: name.into() }
    }

    pub fn constant(value: i32) -> Self {
        Node::Constant { value }
    }

    /// Two-input NAND gate.
    pub fn nand2(a: Node, b: Node) -> Self {
        Node::gate(GateKind::Nand, vec![a, b])
    }
}

// Getters
impl Node {
    pub fn kind(&self) -> Option<GateKind> {
        match self {
            Node::Gate { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Gate { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_gate(&self) -> bool {
        matches!(self, Node::Gate { .. })
    }

    /// Checks whether this is a NAND with both inputs tied together, i.e. an inverter.
    pub fn is_nand_not(&self) -> bool {
        match self {
            Node::Gate {
                kind: GateKind::Nand,
                children,
            } => children.len() == 2 && children[0] == children[1],
            _ => false,
        }
    }

    /// Number of gate nodes (shared subtrees are counted once per occurrence).
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    /// Length of the longest path from this node to a leaf, counted in gates.
    pub fn depth(&self) -> usize {
        match self {
            Node::Gate { children, .. } => 1 + children.iter().map(Node::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Largest number of children of any gate in the tree.
    pub fn max_fan_in(&self) -> usize {
        self.gates().map(|g| g.children().len()).max().unwrap_or(0)
    }

    /// Iterates over all gate nodes in pre-order.
    pub fn gates(&self) -> Gates<'_> {
        Gates { stack: vec![self] }
    }
}

pub struct Gates<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Gates<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Gate { children, .. } = node {
                self.stack.extend(children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

// Evaluation
impl Node {
    /// Two-valued evaluation; unassigned inputs are `false`.
    pub fn evaluate(&self, assignments: &Assignments) -> bool {
        match self {
            Node::Input { name } => assignments.get(name).copied().unwrap_or(false),
            Node::Constant { value } => *value != 0,
            Node::Gate { kind, children } => {
                let mut inputs = children.iter().map(|c| c.evaluate(assignments));
                match kind {
                    GateKind::And => inputs.all(|x| x),
                    GateKind::Or => inputs.any(|x| x),
                    GateKind::Nand => !inputs.all(|x| x),
                    GateKind::Nor => !inputs.any(|x| x),
                    GateKind::Xor | GateKind::OddParity => inputs.fold(false, |acc, x| acc ^ x),
                    GateKind::Xnor | GateKind::EvenParity => !inputs.fold(false, |acc, x| acc ^ x),
                    GateKind::Not => !inputs.next().unwrap_or(false),
                }
            }
        }
    }

    /// Four-valued evaluation with the gate semantics of [`eval::compute`].
    ///
    /// Unassigned inputs read as [`Value::UNKNOWN`].
    pub fn evaluate_value(&self, assignments: &HashMap<String, Value>) -> Value {
        match self {
            Node::Input { name } => assignments.get(name).copied().unwrap_or(Value::UNKNOWN),
            Node::Constant { value } => Value::from(*value != 0),
            Node::Gate { kind, children } => {
                let inputs: Vec<Value> = children.iter().map(|c| c.evaluate_value(assignments)).collect();
                eval::compute(*kind, &inputs)
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Input { name } => write!(f, "{}", name),
            Node::Constant { value } => write!(f, "{}", value),
            Node::Gate { kind, children } => {
                write!(f, "{}(", kind)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        // AND(A, OR(B, NOT(C)))
        Node::gate(
            GateKind::And,
            vec![
                Node::input("A"),
                Node::gate(
                    GateKind::Or,
                    vec![Node::input("B"), Node::gate(GateKind::Not, vec![Node::input("C")])],
                ),
            ],
        )
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "AND(A, OR(B, NOT(C)))");
        assert_eq!(Node::constant(1).to_string(), "1");
    }

    #[test]
    fn test_structure_queries() {
        let t = sample();
        assert_eq!(t.gate_count(), 3);
        assert_eq!(t.depth(), 3);
        assert_eq!(t.max_fan_in(), 2);
        let kinds: Vec<_> = t.gates().filter_map(Node::kind).collect();
        assert_eq!(kinds, vec![GateKind::And, GateKind::Or, GateKind::Not]);
        assert_eq!(Node::input("A").depth(), 0);
        assert!(Node::input("A").children().is_empty());
    }

    #[test]
    fn test_is_nand_not() {
        assert!(Node::nand2(Node::input("A"), Node::input("A")).is_nand_not());
        assert!(!Node::nand2(Node::input("A"), Node::input("B")).is_nand_not());
        assert!(!Node::gate(GateKind::And, vec![Node::input("A"), Node::input("A")]).is_nand_not());
    }

    #[test]
    fn test_evaluate() {
        let t = sample();
        let a: Assignments = [("A", true), ("B", false), ("C", false)]
            .iter()
            .map(|&(k, v)| (k.to_string(), v))
            .collect();
        assert!(t.evaluate(&a));

        let parity = Node::gate(
            GateKind::EvenParity,
            vec![Node::constant(1), Node::constant(1), Node::constant(0)],
        );
        assert!(parity.evaluate(&Assignments::new()));
    }

    #[test]
    fn test_evaluate_value() {
        let t = sample();
        let mut a = HashMap::new();
        a.insert("A".to_string(), Value::TRUE);
        a.insert("B".to_string(), Value::TRUE);
        assert_eq!(t.evaluate_value(&a), Value::TRUE);

        a.insert("B".to_string(), Value::FALSE);
        // C is unassigned, so NOT(C) is an error and so is the OR.
        assert_eq!(t.evaluate_value(&a), Value::ERROR);

        a.insert("A".to_string(), Value::FALSE);
        assert_eq!(t.evaluate_value(&a), Value::FALSE);
    }
}

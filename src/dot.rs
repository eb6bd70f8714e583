//! Gate tree to DOT (Graphviz) conversion.
//!
//! The generated graph is laid out bottom-up:
//! - **Inputs** are ellipses on the bottom rank, one per distinct name,
//! - **Gates** are boxes labeled with their kind,
//! - **Constants** are squares,
//! - the **output** is a rectangle on the top rank,
//! - edges point from a child to the gate it drives.
//!
//! # Examples
//!
//! ```
//! use gate_synth::synth::{SynthOptions, Synthesizer};
//!
//! let expr = "A & (B | ~C)".parse().unwrap();
//! let tree = Synthesizer::default().synthesize(&expr, SynthOptions::default()).unwrap();
//! let dot = tree.to_dot().unwrap();
//! // Render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::fmt::Write as _;

use crate::tree::Node;

/// Configuration options for DOT output generation.
///
/// ```
/// use gate_synth::dot::DotConfig;
/// use gate_synth::tree::Node;
///
/// let config = DotConfig {
///     merge_inputs: false,
///     ..DotConfig::default()
/// };
/// let dot = Node::input("A").to_dot_with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for gates (default: "box")
    pub gate_shape: &'static str,
    /// Shape for inputs (default: "ellipse")
    pub input_shape: &'static str,
    /// Shape for constants (default: "square")
    pub constant_shape: &'static str,
    /// Shape for the output node (default: "rect")
    pub output_shape: &'static str,
    /// Draw each input name once, shared by all gates reading it (default: true)
    pub merge_inputs: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            gate_shape: "box",
            input_shape: "ellipse",
            constant_shape: "square",
            output_shape: "rect",
            merge_inputs: true,
        }
    }
}

impl Node {
    /// Converts a gate tree to DOT format with the default [`DotConfig`].
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut writer = DotWriter {
            dot: String::new(),
            config,
            inputs: Vec::new(),
            next_gate: 0,
            next_leaf: 0,
        };
        writeln!(writer.dot, "digraph {{")?;
        writeln!(writer.dot, "rankdir=BT;")?;
        writeln!(writer.dot, "node [shape={}];", config.gate_shape)?;

        let root = writer.node(self)?;

        let DotWriter { mut dot, inputs, .. } = writer;
        if !inputs.is_empty() {
            writeln!(dot, "{{ rank=min")?;
            for (id, name) in inputs.iter() {
                writeln!(dot, "{} [shape={}, label=\"{}\"];", id, config.input_shape, escape(name))?;
            }
            writeln!(dot, "}}")?;
        }

        writeln!(dot, "{{ rank=max")?;
        writeln!(dot, "out [shape={}, label=\"out\"];", config.output_shape)?;
        writeln!(dot, "}}")?;
        writeln!(dot, "{} -> out;", root)?;

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

struct DotWriter<'a> {
    dot: String,
    config: &'a DotConfig,
    inputs: Vec<(String, &'a str)>,
    next_gate: usize,
    next_leaf: usize,
}

impl<'a> DotWriter<'a> {
    /// Writes `node` and its subtree, returning the DOT id of `node`.
    fn node(&mut self, node: &'a Node) -> Result<String, std::fmt::Error> {
        match node {
            Node::Input { name } => {
                if self.config.merge_inputs {
                    if let Some((id, _)) = self.inputs.iter().find(|(_, n)| *n == name) {
                        return Ok(id.clone());
                    }
                }
                let id = format!("i{}", self.inputs.len());
                self.inputs.push((id.clone(), name.as_str()));
                Ok(id)
            }
            Node::Constant { value } => {
                let id = format!("c{}", self.next_leaf);
                self.next_leaf += 1;
                writeln!(
                    self.dot,
                    "{} [shape={}, label=\"{}\"];",
                    id, self.config.constant_shape, value
                )?;
                Ok(id)
            }
            Node::Gate { kind, children } => {
                let id = format!("g{}", self.next_gate);
                self.next_gate += 1;
                writeln!(self.dot, "{} [label=\"{}\"];", id, kind)?;
                for child in children {
                    let child_id = self.node(child)?;
                    writeln!(self.dot, "{} -> {};", child_id, id)?;
                }
                Ok(id)
            }
        }
    }
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    fn sample() -> Node {
        // AND(A, OR(A, NOT(B)))
        Node::gate(
            GateKind::And,
            vec![
                Node::input("A"),
                Node::gate(
                    GateKind::Or,
                    vec![Node::input("A"), Node::gate(GateKind::Not, vec![Node::input("B")])],
                ),
            ],
        )
    }

    #[test]
    fn test_to_dot_basic() {
        let dot = sample().to_dot().unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("g0 [label=\"AND\"];"));
        assert!(dot.contains("g2 [label=\"NOT\"];"));
        assert!(dot.contains("g0 -> out;"));
        assert!(dot.contains("g1 -> g0;"));
    }

    #[test]
    fn test_to_dot_merges_inputs() {
        let dot = sample().to_dot().unwrap();
        assert_eq!(dot.matches("label=\"A\"").count(), 1);
        assert!(dot.contains("i0 -> g0;"));
        assert!(dot.contains("i0 -> g1;"));
    }

    #[test]
    fn test_to_dot_with_config() {
        let config = DotConfig {
            merge_inputs: false,
            gate_shape: "circle",
            ..DotConfig::default()
        };
        let dot = sample().to_dot_with_config(&config).unwrap();
        assert_eq!(dot.matches("label=\"A\"").count(), 2);
        assert!(dot.contains("node [shape=circle];"));
    }

    #[test]
    fn test_to_dot_leaves() {
        let dot = Node::constant(1).to_dot().unwrap();
        assert!(dot.contains("c0 [shape=square, label=\"1\"];"));
        assert!(dot.contains("c0 -> out;"));

        let dot = Node::input("say \"hi\"").to_dot().unwrap();
        assert!(dot.contains("label=\"say \\\"hi\\\"\""));
    }
}

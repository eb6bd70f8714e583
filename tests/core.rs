//! End-to-end tests for the value algebra, the gate evaluator and the synthesizer.

use std::collections::HashMap;

use gate_synth::cache::ValueCache;
use gate_synth::error::Error;
use gate_synth::eval::{evaluate, propagate, DrivePolicy, GateConfig, UndefinedPolicy};
use gate_synth::expr::{Assignments, Expr};
use gate_synth::gate::GateKind;
use gate_synth::synth::{SynthConfig, SynthOptions, Synthesizer};
use gate_synth::tree::Node;
use gate_synth::value::Value;

const BITS: [Value; 4] = [Value::FALSE, Value::TRUE, Value::UNKNOWN, Value::ERROR];

fn all_assignments(names: &[String]) -> Vec<Assignments> {
    (0u32..(1 << names.len()))
        .map(|bits| {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), (bits >> i) & 1 == 1))
                .collect()
        })
        .collect()
}

fn equivalent(expr: &Expr, node: &Node) -> bool {
    let names: Vec<String> = expr.variables().into_iter().collect();
    all_assignments(&names)
        .iter()
        .all(|a| node.evaluate(a) == expr.evaluate(a))
}

// ─── Value Algebra ─────────────────────────────────────────────────────────────

#[test]
fn and_or_are_commutative() {
    for a in BITS {
        for b in BITS {
            assert_eq!(a & b, b & a);
            assert_eq!(a | b, b | a);
            assert_eq!(a ^ b, b ^ a);
        }
    }
}

#[test]
fn dominating_bits_win() {
    for x in BITS {
        assert_eq!(Value::FALSE & x, Value::FALSE);
        assert_eq!(Value::TRUE | x, Value::TRUE);
    }
}

#[test]
fn multi_bit_operations_keep_widths() {
    let a = Value::parse(8, "0xa5").unwrap();
    let b = Value::parse(8, "0x0f").unwrap();
    assert_eq!((a & b).to_hex_string(), "05");
    assert_eq!((a | b).to_hex_string(), "af");
    assert_eq!((a ^ b).to_hex_string(), "aa");
    assert_eq!((!a).to_hex_string(), "5a");
    assert_eq!((a & b).width(), 8);
}

#[test]
fn combine_models_tied_drivers() {
    let driven = Value::parse(4, "10xx").unwrap();
    let other = Value::parse(4, "1x0x").unwrap();
    assert_eq!(driven.combine(&other).to_binary_string(), "100x");

    let conflict = Value::parse(4, "0000").unwrap();
    assert_eq!(driven.combine(&conflict).to_binary_string(), "E000");
}

#[test]
fn interned_values_equal_fresh_ones() {
    let mut cache = ValueCache::default();
    for width in [2, 8, 16, 32] {
        let fresh = Value::create(width, 0x1, 0x2, 0xFFFF_FFFF).unwrap();
        let interned = cache.create(width, 0x1, 0x2, 0xFFFF_FFFF).unwrap();
        assert_eq!(fresh, interned);
        assert_eq!(fresh.to_binary_string(), interned.to_binary_string());
    }
}

// ─── Gate Evaluation ───────────────────────────────────────────────────────────

#[test]
fn evaluator_matches_value_algebra() {
    for a in BITS {
        for b in BITS {
            let inputs = [Some(a), Some(b)];
            let eval = |kind| evaluate(kind, 0, &inputs, DrivePolicy::Driven, UndefinedPolicy::Ignore, 1);
            assert_eq!(eval(GateKind::And), a & b);
            assert_eq!(eval(GateKind::Or), a | b);
            assert_eq!(eval(GateKind::Xor), a ^ b);
            assert_eq!(eval(GateKind::Nand), !(a & b));
            assert_eq!(eval(GateKind::Nor), !(a | b));
            assert_eq!(eval(GateKind::Xnor), !(a ^ b));
        }
    }
}

#[test]
fn undefined_input_policy() {
    let mut config = GateConfig::new(GateKind::And, 1);
    let inputs = [Some(Value::TRUE), None, Some(Value::TRUE)];

    assert_eq!(propagate(&config, &inputs).value, Value::TRUE);

    config.undefined = UndefinedPolicy::Error;
    assert_eq!(propagate(&config, &inputs).value, Value::ERROR);
}

#[test]
fn open_drain_output() {
    let mut config = GateConfig::new(GateKind::Or, 4);
    config.drive = DrivePolicy::OpenDrain;
    let a = Value::parse(4, "1100").unwrap();
    let b = Value::parse(4, "1010").unwrap();
    let out = propagate(&config, &[Some(a), Some(b)]).value;
    assert_eq!(out.to_binary_string(), "xxx0");
}

// ─── Synthesis ─────────────────────────────────────────────────────────────────

#[test]
fn synthesize_and_of_or_of_not() {
    let expr = Expr::var("A") & (Expr::var("B") | !Expr::var("C"));
    let synth = Synthesizer::default();

    let tree = synth.synthesize(&expr, SynthOptions::default()).unwrap();
    assert_eq!(tree.to_string(), "AND(A, OR(B, NOT(C)))");
    assert!(equivalent(&expr, &tree));

    let nands = synth
        .synthesize(
            &expr,
            SynthOptions {
                two_inputs: false,
                use_nands: true,
            },
        )
        .unwrap();
    assert!(nands.gates().all(|g| g.kind() == Some(GateKind::Nand)));
    assert!(nands.gates().all(|g| g.children().len() == 2));
    assert!(equivalent(&expr, &nands));
}

#[test]
fn every_pass_preserves_semantics() {
    let texts = [
        "A & B & C & D & ~A",
        "(A | B) & (C | D) & (A | ~D)",
        "~(A | B | C | D)",
        "~(A & B) | ~(C & D)",
        "A ^ B ^ C ^ D",
        "~(A ^ B ^ C)",
        "(A = B) | (C ~^ D)",
    ];
    for max_inputs in [2, 3, 9] {
        let synth = Synthesizer::new(SynthConfig { max_inputs }).unwrap();
        for text in texts {
            let expr: Expr = text.parse().unwrap();
            let repaired = synth.synthesize(&expr, SynthOptions::default()).unwrap();
            assert!(repaired.max_fan_in() <= max_inputs, "{}", repaired);
            assert!(equivalent(&expr, &repaired), "{} -> {}", text, repaired);

            let two = synth.convert_to_two_inputs(repaired.clone());
            assert!(two.max_fan_in() <= 2, "{}", two);
            assert!(equivalent(&expr, &two), "{} -> {}", text, two);

            match synth.convert_to_nands(repaired) {
                Ok(nands) => {
                    assert!(nands.gates().all(|g| g.kind() == Some(GateKind::Nand)));
                    assert!(equivalent(&expr, &nands), "{} -> {}", text, nands);
                }
                Err(e) => assert!(matches!(e, Error::UnsupportedGateKind(_)), "{}: {}", text, e),
            }
        }
    }
}

#[test]
fn four_valued_evaluation_of_trees() {
    let expr: Expr = "A & (B | ~C)".parse().unwrap();
    let tree = Synthesizer::default()
        .synthesize(
            &expr,
            SynthOptions {
                two_inputs: true,
                use_nands: true,
            },
        )
        .unwrap();

    let mut values = HashMap::new();
    values.insert("A".to_string(), Value::FALSE);
    values.insert("B".to_string(), Value::UNKNOWN);
    values.insert("C".to_string(), Value::UNKNOWN);
    // A defined 0 on A decides the AND regardless of the rest.
    assert_eq!(tree.evaluate_value(&values), Value::FALSE);
}

#[test]
fn wide_parity() {
    let names: Vec<String> = (0..10).map(|i| format!("x{}", i)).collect();
    let expr = names.iter().map(Expr::var).reduce(Expr::xor).unwrap();
    let tree = Synthesizer::default().synthesize(&expr, SynthOptions::default()).unwrap();
    // Two groups of five; the two-input top stays a plain XOR.
    assert_eq!(tree.kind(), Some(GateKind::Xor));
    assert_eq!(tree.children().len(), 2);
    for group in tree.children() {
        assert_eq!(group.kind(), Some(GateKind::OddParity));
        assert_eq!(group.children().len(), 5);
    }
    assert!(equivalent(&expr, &tree));
}

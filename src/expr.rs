//! Boolean expression trees.
//!
//! [`Expr`] is the input of the synthesizer. Consumers walk it through the
//! double-dispatch [`Visitor`] contract: [`Expr::visit`] calls exactly one
//! `visit_*` method, handing over the operand sub-expressions.
//!
//! Expressions can be built with constructors, with the `&`, `|`, `^`, `!`
//! operators, or parsed from text:
//!
//! ```
//! use gate_synth::expr::Expr;
//!
//! let e1 = Expr::var("A") & (Expr::var("B") | !Expr::var("C"));
//! let e2: Expr = "A & (B | ~C)".parse().unwrap();
//! assert_eq!(e1, e2);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::str::FromStr;

use crate::error::Error;

/// Variable assignment used for evaluation; unassigned variables are `false`.
pub type Assignments = HashMap<String, bool>;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    Variable(String),
    Constant(i32),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Xnor(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
}

pub trait Visitor {
    type Output;

    fn visit_and(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_or(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_xor(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_xnor(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_eq(&mut self, a: &Expr, b: &Expr) -> Self::Output;
    fn visit_not(&mut self, a: &Expr) -> Self::Output;
    fn visit_variable(&mut self, name: &str) -> Self::Output;
    fn visit_constant(&mut self, value: i32) -> Self::Output;
}

// Constructors
impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn constant(value: i32) -> Self {
        Expr::Constant(value)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(a: Self) -> Self {
        Expr::Not(Box::new(a))
    }

    pub fn and(a: Self, b: Self) -> Self {
        Expr::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Self, b: Self) -> Self {
        Expr::Or(Box::new(a), Box::new(b))
    }

    pub fn xor(a: Self, b: Self) -> Self {
        Expr::Xor(Box::new(a), Box::new(b))
    }

    pub fn xnor(a: Self, b: Self) -> Self {
        Expr::Xnor(Box::new(a), Box::new(b))
    }

    pub fn eq(a: Self, b: Self) -> Self {
        Expr::Eq(Box::new(a), Box::new(b))
    }
}

impl Expr {
    pub fn visit<V: Visitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Variable(name) => visitor.visit_variable(name),
            Expr::Constant(value) => visitor.visit_constant(*value),
            Expr::Not(a) => visitor.visit_not(a),
            Expr::And(a, b) => visitor.visit_and(a, b),
            Expr::Or(a, b) => visitor.visit_or(a, b),
            Expr::Xor(a, b) => visitor.visit_xor(a, b),
            Expr::Xnor(a, b) => visitor.visit_xnor(a, b),
            Expr::Eq(a, b) => visitor.visit_eq(a, b),
        }
    }

    pub fn evaluate(&self, assignments: &Assignments) -> bool {
        self.visit(&mut Evaluate { assignments })
    }

    /// Names of all variables, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Expr::Variable(name) => {
                vars.insert(name.clone());
            }
            Expr::Constant(_) => {}
            Expr::Not(a) => a.collect_variables(vars),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Xor(a, b) | Expr::Xnor(a, b) | Expr::Eq(a, b) => {
                a.collect_variables(vars);
                b.collect_variables(vars);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Eq(..) => 0,
            Expr::Or(..) => 1,
            Expr::Xor(..) | Expr::Xnor(..) => 2,
            Expr::And(..) => 3,
            Expr::Not(..) | Expr::Variable(_) | Expr::Constant(_) => 4,
        }
    }
}

struct Evaluate<'a> {
    assignments: &'a Assignments,
}

impl Visitor for Evaluate<'_> {
    type Output = bool;

    fn visit_and(&mut self, a: &Expr, b: &Expr) -> bool {
        a.visit(self) & b.visit(self)
    }

    fn visit_or(&mut self, a: &Expr, b: &Expr) -> bool {
        a.visit(self) | b.visit(self)
    }

    fn visit_xor(&mut self, a: &Expr, b: &Expr) -> bool {
        a.visit(self) ^ b.visit(self)
    }

    fn visit_xnor(&mut self, a: &Expr, b: &Expr) -> bool {
        !(a.visit(self) ^ b.visit(self))
    }

    fn visit_eq(&mut self, a: &Expr, b: &Expr) -> bool {
        a.visit(self) == b.visit(self)
    }

    fn visit_not(&mut self, a: &Expr) -> bool {
        !a.visit(self)
    }

    fn visit_variable(&mut self, name: &str) -> bool {
        self.assignments.get(name).copied().unwrap_or(false)
    }

    fn visit_constant(&mut self, value: i32) -> bool {
        value != 0
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        Expr::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        Expr::or(self, rhs)
    }
}

impl BitXor for Expr {
    type Output = Expr;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Expr::xor(self, rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

impl Expr {
    fn fmt_operand(&self, f: &mut Formatter<'_>, parent: u8, strict: bool) -> std::fmt::Result {
        let prec = self.precedence();
        if prec < parent || (strict && prec == parent) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    // Left operands may share the precedence level, right ones may not.
    fn fmt_binary(&self, f: &mut Formatter<'_>, a: &Expr, op: &str, b: &Expr) -> std::fmt::Result {
        a.fmt_operand(f, self.precedence(), false)?;
        write!(f, " {} ", op)?;
        b.fmt_operand(f, self.precedence(), true)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Constant(value) => write!(f, "{}", value),
            Expr::Not(a) => {
                write!(f, "~")?;
                a.fmt_operand(f, self.precedence(), false)
            }
            Expr::And(a, b) => self.fmt_binary(f, a, "&", b),
            Expr::Or(a, b) => self.fmt_binary(f, a, "|", b),
            Expr::Xor(a, b) => self.fmt_binary(f, a, "^", b),
            Expr::Xnor(a, b) => self.fmt_binary(f, a, "~^", b),
            Expr::Eq(a, b) => self.fmt_binary(f, a, "=", b),
        }
    }
}

impl FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_eq()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(Error::Parse(format!("unexpected token {:?}", token))),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Token {
    Ident(String),
    Number(i32),
    Not,
    And,
    Or,
    Xor,
    Xnor,
    Eq,
    LParen,
    RParen,
}

fn tokenize(s: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '~' | '!' => {
                chars.next();
                if chars.peek() == Some(&'^') {
                    chars.next();
                    tokens.push(Token::Xnor);
                } else {
                    tokens.push(Token::Not);
                }
            }
            '&' | '*' => {
                chars.next();
                tokens.push(Token::And);
            }
            '|' | '+' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Xor);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(d);
                    chars.next();
                }
                let value = digits
                    .parse()
                    .map_err(|_| Error::Parse(format!("invalid constant {:?}", digits)))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_alphanumeric() || **d == '_') {
                    name.push(d);
                    chars.next();
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(Error::Parse(format!("unexpected character {:?}", other))),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_eq(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_or()?;
        while self.eat(&Token::Eq) {
            lhs = Expr::eq(lhs, self.parse_or()?);
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_xor()?;
        while self.eat(&Token::Or) {
            lhs = Expr::or(lhs, self.parse_xor()?);
        }
        Ok(lhs)
    }

    fn parse_xor(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_and()?;
        loop {
            if self.eat(&Token::Xor) {
                lhs = Expr::xor(lhs, self.parse_and()?);
            } else if self.eat(&Token::Xnor) {
                lhs = Expr::xnor(lhs, self.parse_and()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_not()?;
        while self.eat(&Token::And) {
            lhs = Expr::and(lhs, self.parse_not()?);
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, Error> {
        if self.eat(&Token::Not) {
            Ok(Expr::not(self.parse_not()?))
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, Error> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        match token {
            Some(Token::Ident(name)) => Ok(Expr::Variable(name)),
            Some(Token::Number(value)) => Ok(Expr::Constant(value)),
            Some(Token::LParen) => {
                let inner = self.parse_eq()?;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    Err(Error::Parse("expected ')'".to_string()))
                }
            }
            Some(other) => Err(Error::Parse(format!("unexpected token {:?}", other))),
            None => Err(Error::Parse("unexpected end of input".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn assign(pairs: &[(&str, bool)]) -> Assignments {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_evaluate() {
        let e = Expr::var("A") & (Expr::var("B") | !Expr::var("C"));
        assert!(e.evaluate(&assign(&[("A", true), ("B", false), ("C", false)])));
        assert!(!e.evaluate(&assign(&[("A", true), ("B", false), ("C", true)])));
        assert!(!e.evaluate(&assign(&[("A", false), ("B", true)])));
    }

    #[test]
    fn test_evaluate_xnor_eq_constant() {
        let a = assign(&[("A", true), ("B", true)]);
        assert!(Expr::xnor(Expr::var("A"), Expr::var("B")).evaluate(&a));
        assert!(Expr::eq(Expr::var("A"), Expr::constant(1)).evaluate(&a));
        assert!(!Expr::eq(Expr::var("A"), Expr::constant(0)).evaluate(&a));
        assert!(!(Expr::var("A") ^ Expr::var("B")).evaluate(&a));
    }

    #[test]
    fn test_variables() {
        let e: Expr = "C & (A | ~B) ^ A".parse().unwrap();
        let vars: Vec<_> = e.variables().into_iter().collect();
        assert_eq!(vars, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_precedence() {
        let e: Expr = "A | B & C".parse().unwrap();
        assert_eq!(e, Expr::var("A") | (Expr::var("B") & Expr::var("C")));

        let e: Expr = "~A ^ B".parse().unwrap();
        assert_eq!(e, !Expr::var("A") ^ Expr::var("B"));

        let e: Expr = "A ~^ 1".parse().unwrap();
        assert_eq!(e, Expr::xnor(Expr::var("A"), Expr::constant(1)));
    }

    #[test]
    fn test_parse_errors() {
        assert!("A &".parse::<Expr>().is_err());
        assert!("(A | B".parse::<Expr>().is_err());
        assert!("A B".parse::<Expr>().is_err());
        assert!("A $ B".parse::<Expr>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for text in ["A & (B | ~C)", "~(A & B) | C", "A ^ (B ^ C)", "(A = B) = C", "A ~^ B"] {
            let e: Expr = text.parse().unwrap();
            let again: Expr = e.to_string().parse().unwrap();
            assert_eq!(e, again, "{}", text);
        }
        let e: Expr = "A & (B | ~C)".parse().unwrap();
        assert_eq!(e.to_string(), "A & (B | ~C)");
    }
}

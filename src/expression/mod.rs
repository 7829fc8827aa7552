//! Compiler for user-supplied hill formulas
//!
//! Turns infix text such as `(H/L)*(L-x)*cos(2*pi*x/L)` into an [`Expression`]
//! that can be evaluated at any `x`. Supported: numbers, the variable `x`, the
//! constant `pi`, the hill parameters `H` and `L`, binary `+ - * / ^`
//! (`^` is right associative), unary minus and the functions `sin`, `cos`,
//! `sqrt`. A function applies to the following factor, so `sin x^2` is
//! `sin(x^2)`.

mod parser;

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("division by zero")]
    DivisionByZero,

    /// `H` or `L` used without hill parameters bound
    #[error("unbound variable `{0}`")]
    UnboundVariable(&'static str),
}

impl ExprError {
    fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Sin,
    Cos,
    Sqrt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    Height,
    Length,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    X,
    Pi,
    Param(Param),
    Neg(Box<Node>),
    Call(Function, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
}

/// Values for the hill parameters an expression may reference
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bindings {
    pub height: Option<f64>,
    pub length: Option<f64>,
}

impl Bindings {
    pub fn hill(height: f64, length: f64) -> Self {
        Self {
            height: Some(height),
            length: Some(length),
        }
    }
}

/// A compiled formula `y(x)`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

/// Compile `text` into an evaluable expression
pub fn compile(text: &str) -> Result<Expression, ExprError> {
    let root = parser::parse(text)?;
    Ok(Expression {
        source: text.trim().to_string(),
        root,
    })
}

impl Expression {
    pub fn evaluate(&self, x: f64) -> Result<f64, ExprError> {
        self.evaluate_with(x, &Bindings::default())
    }

    pub fn evaluate_with(&self, x: f64, bindings: &Bindings) -> Result<f64, ExprError> {
        eval(&self.root, x, bindings)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn eval(node: &Node, x: f64, bindings: &Bindings) -> Result<f64, ExprError> {
    let value = match node {
        Node::Number(v) => *v,
        Node::X => x,
        Node::Pi => PI,
        Node::Param(Param::Height) => bindings.height.ok_or(ExprError::UnboundVariable("H"))?,
        Node::Param(Param::Length) => bindings.length.ok_or(ExprError::UnboundVariable("L"))?,
        Node::Neg(inner) => -eval(inner, x, bindings)?,
        Node::Call(function, arg) => {
            let a = eval(arg, x, bindings)?;
            match function {
                Function::Sin => a.sin(),
                Function::Cos => a.cos(),
                Function::Sqrt => a.sqrt(),
            }
        }
        Node::Binary(op, lhs, rhs) => {
            let a = eval(lhs, x, bindings)?;
            let b = eval(rhs, x, bindings)?;
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => {
                    if b == 0.0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    a / b
                }
                BinaryOp::Pow => a.powf(b),
            }
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(compile("1 + 2 * 3").unwrap().evaluate(0.0), Ok(7.0));
        assert_eq!(compile("(1 + 2) * 3").unwrap().evaluate(0.0), Ok(9.0));
        assert_eq!(compile("2 ^ 3 ^ 2").unwrap().evaluate(0.0), Ok(512.0));
        assert_eq!(compile("8 / 4 / 2").unwrap().evaluate(0.0), Ok(1.0));
        assert_eq!(compile("-x^2").unwrap().evaluate(3.0), Ok(-9.0));
        assert_eq!(compile("(-x)^2").unwrap().evaluate(3.0), Ok(9.0));
        assert_eq!(compile("2^-1").unwrap().evaluate(0.0), Ok(0.5));
    }

    #[test]
    fn functions_and_constants() {
        let e = compile("sin(pi/2) + cos(0) + sqrt(x)").unwrap();
        assert_relative_eq!(e.evaluate(16.0).unwrap(), 6.0, epsilon = 1e-12);

        // a function takes the whole factor, exponent included
        let e = compile("sin x^2").unwrap();
        assert_relative_eq!(e.evaluate(3.0).unwrap(), 9.0_f64.sin(), epsilon = 1e-12);
        let e = compile("sin(x)^2").unwrap();
        assert_relative_eq!(e.evaluate(3.0).unwrap(), 9.0_f64.sin(), epsilon = 1e-12);
        let e = compile("(sin x)^2 + (cos x)^2").unwrap();
        assert_relative_eq!(e.evaluate(0.7).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_hill_formula_with_bindings() {
        let e = compile("(H/L)*(L-x)").unwrap();
        let y = e.evaluate_with(30.0, &Bindings::hill(15.0, 60.0)).unwrap();
        assert_relative_eq!(y, 7.5);
    }

    #[test]
    fn unbound_hill_parameter() {
        let e = compile("H - x").unwrap();
        assert_eq!(e.evaluate(1.0), Err(ExprError::UnboundVariable("H")));
    }

    #[test]
    fn division_by_zero_is_an_evaluation_error() {
        let e = compile("1/x").unwrap();
        assert_eq!(e.evaluate(2.0), Ok(0.5));
        assert_eq!(e.evaluate(0.0), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn parse_errors_are_distinct_from_evaluation_errors() {
        assert!(matches!(compile("(x"), Err(ExprError::Parse { .. })));
        assert!(matches!(compile("x # 2"), Err(ExprError::Parse { .. })));
    }

    #[test]
    fn source_is_kept_for_display() {
        let e = compile("  x*x ").unwrap();
        assert_eq!(e.to_string(), "x*x");
    }
}

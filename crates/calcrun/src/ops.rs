//! # Operators and reference arithmetic
//!
//! The semantics shared by guest components, native host components, and the
//! CLI: 32-bit wraparound arithmetic, with the adder unsigned and the
//! subtractor signed (two's complement).

use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub enum Error {
    UnknownOp(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOp(op) => write!(f, "Unknown operation: {}", op),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Expression operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
}

impl Op {
    /// The enum case name as declared in the `calc:demo/calculate` interface.
    pub fn case_name(&self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
        }
    }
}

impl FromStr for Op {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" | "+" => Ok(Op::Add),
            "sub" | "-" => Ok(Op::Sub),
            other => Err(Error::UnknownOp(other.to_string())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add => write!(f, "+"),
            Op::Sub => write!(f, "-"),
        }
    }
}

/// Unsigned 32-bit addition, wrapping on overflow.
pub fn add(x: u32, y: u32) -> u32 {
    x.wrapping_add(y)
}

/// Signed 32-bit subtraction, wrapping on overflow.
pub fn sub(x: i32, y: i32) -> i32 {
    x.wrapping_sub(y)
}

/// Evaluates `x <op> y` over unsigned operands.
///
/// Subtraction reinterprets the operands as signed (two's complement) and the
/// result back as unsigned; both views agree mod 2^32.
pub fn eval(op: Op, x: u32, y: u32) -> u32 {
    match op {
        Op::Add => add(x, y),
        Op::Sub => sub(x as i32, y as i32) as u32,
    }
}

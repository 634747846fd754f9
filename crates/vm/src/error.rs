//! Errors for the stackm engine.
//!
//! [`Fault`]s are captured: the engine records them as its top element,
//! freezes, traces the post-state, and only then returns them wrapped in
//! [`StackError::Fault`]. Every other [`StackError`] variant is raised
//! immediately and never touches engine state.

use stackm_common::{DecodeError, Slot};
use thiserror::Error;

/// A runtime failure captured onto the stack before being raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    /// Result does not fit in the configured width.
    #[error("integer overflow")]
    Overflow,

    /// Negative value in unsigned mode.
    #[error("integer underflow")]
    Underflow,

    /// Not enough operands on the stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// `div` with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// `shl` or `shr` with a negative shift count.
    #[error("negative shift count")]
    NegativeShift,

    /// `load` from a register slot that was never stored.
    #[error("register {slot} is not set")]
    UnsetRegister { slot: Slot },
}

impl Fault {
    /// Name of the error marker as it appears in a trace snapshot.
    pub fn marker_name(&self) -> &'static str {
        match self {
            Fault::Overflow => "OverflowError",
            Fault::Underflow => "UnderflowError",
            Fault::StackUnderflow => "StackUnderflowError",
            Fault::DivisionByZero => "ZeroDivisionError",
            Fault::NegativeShift => "NegativeShiftError",
            Fault::UnsetRegister { .. } => "KeyError",
        }
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// A captured runtime fault, re-raised after it was recorded.
    #[error(transparent)]
    Fault(#[from] Fault),

    /// An instruction was issued to a frozen engine.
    #[error("stack is frozen")]
    Frozen,

    /// Dynamic dispatch named an instruction that does not exist.
    #[error("Invalid instruction: '{name}'")]
    InvalidInstruction { name: String },

    /// Dynamic dispatch supplied operands the instruction cannot take.
    #[error(transparent)]
    Decode(DecodeError),

    /// A trace rendering was requested with no records.
    #[error("trace is empty")]
    EmptyTrace,

    /// The configured width is outside `1..=127`.
    #[error("unsupported width of {bits} bits (expected 1..=127)")]
    InvalidWidth { bits: u32 },

    /// A program's finished engine was requested before any invocation.
    #[error("program has not been invoked")]
    NotInvoked,
}

impl StackError {
    /// True when the error was captured onto the stack before being raised.
    pub fn is_captured(&self) -> bool {
        matches!(self, StackError::Fault(_))
    }

    /// The captured fault, if any.
    pub fn fault(&self) -> Option<Fault> {
        match self {
            StackError::Fault(fault) => Some(*fault),
            _ => None,
        }
    }
}

impl From<DecodeError> for StackError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownMnemonic(name) => StackError::InvalidInstruction { name },
            other => StackError::Decode(other),
        }
    }
}

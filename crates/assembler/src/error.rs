//! Error types for the stackm assembler.

use thiserror::Error;

/// Errors produced while assembling a listing into statements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized instruction mnemonic was encountered.
    #[error("line {line}: unknown instruction '{token}'")]
    UnknownInstruction { line: usize, token: String },

    /// An instruction did not have enough operands.
    #[error("line {line}: {mnemonic} expects {expected} operand(s)")]
    MissingOperand {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
    },

    /// A numeric literal could not be parsed.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A numeric operand is outside the range the instruction accepts.
    #[error("line {line}: {mnemonic} operand {value} out of range")]
    OperandOutOfRange {
        line: usize,
        mnemonic: &'static str,
        value: i128,
    },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
}

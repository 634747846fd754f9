//! Decode errors for stackm instructions.

use thiserror::Error;

/// Errors that occur while turning a mnemonic plus operands into an
/// [`Instruction`](crate::Instruction).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The mnemonic does not name any instruction.
    #[error("Invalid instruction: '{0}'")]
    UnknownMnemonic(String),

    /// The instruction was given the wrong number of operands.
    #[error("{mnemonic} expects {expected} operand(s), got {found}")]
    ArityMismatch {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    /// A register slot operand was negative or too large.
    #[error("{mnemonic} operand {value} is not a valid register slot")]
    OperandOutOfRange { mnemonic: &'static str, value: i128 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_mnemonic() {
        assert_eq!(
            DecodeError::UnknownMnemonic("not_a_real_op".to_string()).to_string(),
            "Invalid instruction: 'not_a_real_op'"
        );
    }

    #[test]
    fn display_arity_mismatch() {
        let e = DecodeError::ArityMismatch {
            mnemonic: "push",
            expected: 1,
            found: 0,
        };
        assert_eq!(e.to_string(), "push expects 1 operand(s), got 0");
    }

    #[test]
    fn display_operand_out_of_range() {
        let e = DecodeError::OperandOutOfRange {
            mnemonic: "load",
            value: -3,
        };
        assert_eq!(e.to_string(), "load operand -3 is not a valid register slot");
    }
}

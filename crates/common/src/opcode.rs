//! Opcode definitions for the stackm instruction set.
//!
//! The opcode is the tag half of an [`Instruction`](crate::Instruction).
//! Mnemonics are the lowercase names used by dynamic dispatch, rendered
//! traces, and assembly listings.

use crate::error::DecodeError;

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Stack manipulation
    /// Push an immediate value.
    Push,
    /// Remove and discard the top value.
    Pop,
    /// Push a copy of the top value.
    Dup,

    // Arithmetic
    /// Pop two values, push `base + other`.
    Add,
    /// Pop two values, push `base - other`.
    Sub,
    /// Pop two values, push `base * other`.
    Mul,
    /// Pop two values, push `base / other` rounded toward negative infinity.
    Div,
    /// Pop two values, push `base << other`.
    Shl,
    /// Pop two values, push `base >> other`.
    Shr,

    // Registers
    /// Copy the top value into a register slot without popping it.
    Store,
    /// Push the value held in a register slot.
    Load,
}

/// All valid opcodes, in definition order. This is the single lookup table
/// that dynamic dispatch resolves mnemonics against.
pub const ALL_OPCODES: [Opcode; 11] = [
    Opcode::Push,
    Opcode::Pop,
    Opcode::Dup,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Shl,
    Opcode::Shr,
    Opcode::Store,
    Opcode::Load,
];

impl Opcode {
    /// Returns the mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Dup => "dup",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Shl => "shl",
            Opcode::Shr => "shr",
            Opcode::Store => "store",
            Opcode::Load => "load",
        }
    }

    /// Number of operands the instruction takes.
    pub fn arity(&self) -> usize {
        match self {
            Opcode::Push | Opcode::Store | Opcode::Load => 1,
            _ => 0,
        }
    }

    /// True for the two-operand arithmetic instructions.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Shl | Opcode::Shr
        )
    }

    /// Resolve a mnemonic to its opcode. Matching is exact (lowercase).
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, DecodeError> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
            .ok_or_else(|| DecodeError::UnknownMnemonic(mnemonic.to_string()))
    }
}

impl std::str::FromStr for Opcode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::from_mnemonic(s)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

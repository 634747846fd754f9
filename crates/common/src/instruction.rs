//! Instructions: an opcode together with its operands.

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A stack value. Wide enough to hold every value of any configured width
/// up to 127 bits, signed or unsigned.
pub type Word = i128;

/// A register slot identifier.
pub type Slot = u32;

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Push(Word),
    Pop,
    Dup,
    Add,
    Sub,
    Mul,
    Div,
    Shl,
    Shr,
    Store(Slot),
    Load(Slot),
}

impl Instruction {
    /// The opcode tag of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Push(_) => Opcode::Push,
            Instruction::Pop => Opcode::Pop,
            Instruction::Dup => Opcode::Dup,
            Instruction::Add => Opcode::Add,
            Instruction::Sub => Opcode::Sub,
            Instruction::Mul => Opcode::Mul,
            Instruction::Div => Opcode::Div,
            Instruction::Shl => Opcode::Shl,
            Instruction::Shr => Opcode::Shr,
            Instruction::Store(_) => Opcode::Store,
            Instruction::Load(_) => Opcode::Load,
        }
    }

    /// The mnemonic of this instruction's opcode.
    pub fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// The operands this instruction was issued with, in order.
    pub fn operands(&self) -> Vec<Word> {
        match *self {
            Instruction::Push(value) => vec![value],
            Instruction::Store(slot) | Instruction::Load(slot) => vec![Word::from(slot)],
            _ => Vec::new(),
        }
    }

    /// Build an instruction from an opcode and raw operands.
    ///
    /// The operand count must match [`Opcode::arity`]; register operands must
    /// fit in a [`Slot`].
    pub fn decode(opcode: Opcode, operands: &[Word]) -> Result<Self, DecodeError> {
        if operands.len() != opcode.arity() {
            return Err(DecodeError::ArityMismatch {
                mnemonic: opcode.mnemonic(),
                expected: opcode.arity(),
                found: operands.len(),
            });
        }

        let instr = match opcode {
            Opcode::Push => Instruction::Push(operands[0]),
            Opcode::Pop => Instruction::Pop,
            Opcode::Dup => Instruction::Dup,
            Opcode::Add => Instruction::Add,
            Opcode::Sub => Instruction::Sub,
            Opcode::Mul => Instruction::Mul,
            Opcode::Div => Instruction::Div,
            Opcode::Shl => Instruction::Shl,
            Opcode::Shr => Instruction::Shr,
            Opcode::Store => Instruction::Store(to_slot(opcode, operands[0])?),
            Opcode::Load => Instruction::Load(to_slot(opcode, operands[0])?),
        };
        Ok(instr)
    }

    /// Resolve a mnemonic and decode its operands in one step.
    pub fn parse(mnemonic: &str, operands: &[Word]) -> Result<Self, DecodeError> {
        Self::decode(Opcode::from_mnemonic(mnemonic)?, operands)
    }
}

fn to_slot(opcode: Opcode, value: Word) -> Result<Slot, DecodeError> {
    Slot::try_from(value).map_err(|_| DecodeError::OperandOutOfRange {
        mnemonic: opcode.mnemonic(),
        value,
    })
}

/// `name args...`, operands joined by single spaces.
impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())?;
        for operand in self.operands() {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

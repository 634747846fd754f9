//! stackm common types.
//!
//! This crate provides the instruction set shared by the engine and the
//! assembler:
//!
//! - [`Opcode`]: the instruction tags and their mnemonic table
//! - [`Instruction`]: an opcode together with its operands
//! - [`Statement`]: an instruction or a comment, as replayed from a listing
//! - [`Word`] / [`Slot`]: stack values and register identifiers
//! - [`DecodeError`]: errors from resolving mnemonics and operands

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod statement;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::{Instruction, Slot, Word};
pub use opcode::Opcode;
pub use statement::Statement;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(&opcode::ALL_OPCODES[..])
    }

    /// Strategy that generates a random valid Instruction.
    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (arb_opcode(), any::<i64>(), any::<u32>()).prop_map(|(op, value, slot)| {
            let operand = match op {
                Opcode::Push => Word::from(value),
                _ => Word::from(slot),
            };
            let operands = vec![operand; op.arity()];
            Instruction::decode(op, &operands).unwrap()
        })
    }

    proptest! {
        /// Decoding an instruction's own opcode and operands yields it back.
        #[test]
        fn decode_operands_roundtrip(instr in arb_instruction()) {
            let decoded = Instruction::decode(instr.opcode(), &instr.operands()).unwrap();
            prop_assert_eq!(instr, decoded);
        }

        /// Any mnemonic string either resolves to an opcode whose mnemonic
        /// is that string, or is rejected as unknown.
        #[test]
        fn arbitrary_mnemonic_resolves(name in "[a-z_]{0,8}") {
            match Opcode::from_mnemonic(&name) {
                Ok(op) => prop_assert_eq!(op.mnemonic(), name.as_str()),
                Err(e) => prop_assert_eq!(e, DecodeError::UnknownMnemonic(name.clone())),
            }
        }
    }
}

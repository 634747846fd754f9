//! Statements: the replayable unit of a stackm listing.
//!
//! A listing is a sequence of instructions interleaved with free-text
//! comments. Comments have no effect on machine state but are kept so a
//! replayed run produces the same trace as the original.

use crate::instruction::Instruction;

/// One line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// An instruction to dispatch.
    Instruction(Instruction),
    /// Comment text, without the leading `; ` marker.
    Comment(String),
}

impl Statement {
    /// Create a comment statement.
    pub fn comment(text: impl Into<String>) -> Self {
        Statement::Comment(text.into())
    }

    /// Returns the instruction, if this statement is one.
    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            Statement::Instruction(instr) => Some(instr),
            Statement::Comment(_) => None,
        }
    }

    /// True for comment statements.
    pub fn is_comment(&self) -> bool {
        matches!(self, Statement::Comment(_))
    }
}

impl From<Instruction> for Statement {
    fn from(instr: Instruction) -> Self {
        Statement::Instruction(instr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_instruction() {
        let stmt: Statement = Instruction::Dup.into();
        assert_eq!(stmt.as_instruction(), Some(&Instruction::Dup));
        assert!(!stmt.is_comment());
    }

    #[test]
    fn comment_has_no_instruction() {
        let stmt = Statement::comment("x = 500");
        assert!(stmt.is_comment());
        assert_eq!(stmt.as_instruction(), None);
    }
}

//! Disassembler: statements → canonical listing text.
//!
//! One statement per line, no indentation, no snapshot column. Comments are
//! written as `; text`.

use stackm_common::Statement;

/// Disassemble statements into canonical listing text.
///
/// The output is guaranteed to reassemble to the same statements
/// (`assemble(disassemble(s)) == s`) as long as no comment spans lines.
pub fn disassemble(statements: &[Statement]) -> String {
    let mut text = String::new();
    for statement in statements {
        match statement {
            Statement::Comment(comment) => {
                text.push_str("; ");
                text.push_str(comment);
            }
            Statement::Instruction(instr) => text.push_str(&instr.to_string()),
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackm_common::Instruction;

    #[test]
    fn empty() {
        assert_eq!(disassemble(&[]), "");
    }

    #[test]
    fn instructions_and_comments() {
        let statements = vec![
            Statement::comment("square"),
            Instruction::Push(-3).into(),
            Instruction::Dup.into(),
            Instruction::Mul.into(),
            Instruction::Store(1).into(),
        ];
        assert_eq!(
            disassemble(&statements),
            "; square\npush -3\ndup\nmul\nstore 1\n"
        );
    }
}

//! stackm assembler: text listings ⇄ statements.
//!
//! The assembler accepts both hand-written listings and rendered traces.
//! A trace's `# [...]` snapshot column is ignored, so a rendered trace can
//! be assembled and replayed into a fresh engine.
//!
//! # Usage
//!
//! ```
//! use stackm_assembler::{assemble, disassemble};
//! use stackm_common::{Instruction, Statement};
//!
//! let text = "; sum\npush 500\npush 200\nadd\n";
//! let statements = assemble(text).unwrap();
//! assert_eq!(statements[0], Statement::comment("sum"));
//! assert_eq!(statements[3], Statement::Instruction(Instruction::Add));
//! assert_eq!(disassemble(&statements), text);
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use parser::parse_line;
use stackm_common::Statement;

/// Assemble listing text into statements.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Vec<Statement>, AsmError> {
    let mut statements = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = tokenize_line(line, line_num)?;
        if let Some(statement) = parse_line(line, line_num)? {
            statements.push(statement);
        }
    }

    Ok(statements)
}

/// Disassemble statements into canonical listing text.
pub fn disassemble(statements: &[Statement]) -> String {
    disassembler::disassemble(statements)
}

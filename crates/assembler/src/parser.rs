//! Parser for stackm listing tokens → statements.

use crate::error::AsmError;
use crate::lexer::{Line, Token};
use stackm_common::{DecodeError, Instruction, Opcode, Statement, Word};

/// Parse a classified line into a statement.
///
/// Returns `Ok(None)` for blank lines.
pub(crate) fn parse_line(line: Line, line_num: usize) -> Result<Option<Statement>, AsmError> {
    let tokens = match line {
        Line::Blank => return Ok(None),
        Line::Comment(text) => return Ok(Some(Statement::Comment(text))),
        Line::Tokens(tokens) => tokens,
    };

    let mnemonic = match &tokens[0] {
        Token::Ident(s) => s.as_str(),
        Token::Number(n) => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: n.to_string(),
            })
        }
    };

    let opcode = Opcode::from_mnemonic(mnemonic).map_err(|_| AsmError::UnknownInstruction {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let args = &tokens[1..];
    let arity = opcode.arity();
    let mut operands = Vec::with_capacity(arity);
    for idx in 0..arity {
        operands.push(expect_number(args, idx, line_num, opcode)?);
    }
    expect_end(&args[arity..], line_num)?;

    let instr = Instruction::decode(opcode, &operands).map_err(|e| match e {
        DecodeError::OperandOutOfRange { mnemonic, value } => AsmError::OperandOutOfRange {
            line: line_num,
            mnemonic,
            value,
        },
        DecodeError::ArityMismatch {
            mnemonic, expected, ..
        } => AsmError::MissingOperand {
            line: line_num,
            mnemonic,
            expected,
        },
        DecodeError::UnknownMnemonic(token) => AsmError::UnknownInstruction {
            line: line_num,
            token,
        },
    })?;

    Ok(Some(Statement::Instruction(instr)))
}

/// Extract a number from the token at position `idx`.
fn expect_number(
    args: &[Token],
    idx: usize,
    line: usize,
    opcode: Opcode,
) -> Result<Word, AsmError> {
    match args.get(idx) {
        Some(Token::Number(n)) => Ok(*n),
        Some(Token::Ident(s)) => Err(AsmError::UnexpectedToken {
            line,
            token: s.clone(),
        }),
        None => Err(AsmError::MissingOperand {
            line,
            mnemonic: opcode.mnemonic(),
            expected: opcode.arity(),
        }),
    }
}

/// Check that there are no extra tokens.
fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    if let Some(tok) = remaining.first() {
        let token = match tok {
            Token::Ident(s) => s.clone(),
            Token::Number(n) => n.to_string(),
        };
        return Err(AsmError::UnexpectedToken { line, token });
    }
    Ok(())
}

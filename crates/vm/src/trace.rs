//! Trace recorder: an append-only log of executed instructions and comments.
//!
//! Rendered listings look like:
//!
//! ```text
//! ; x = 500
//! push 500 # [500]
//! push 200 # [500, 200]
//! add      # [700]
//! ```
//!
//! Column widths are computed once over every instruction record and reused
//! for each line. Comments do not contribute to the widths.

use std::fmt;

use stackm_common::{Instruction, Statement, Word};

use crate::error::{Fault, StackError};

/// The full engine state captured after an instruction ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Stack values, bottom first.
    pub values: Vec<Word>,
    /// The error marker on top of the values, if the instruction faulted.
    pub fault: Option<Fault>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        if let Some(fault) = self.fault {
            if !self.values.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "{}()", fault.marker_name())?;
        }
        f.write_str("]")
    }
}

/// One entry of the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    /// Free-text comment.
    Comment(String),
    /// An executed instruction and the state it left behind.
    Instruction {
        instruction: Instruction,
        snapshot: Snapshot,
    },
}

/// Ordered log of everything an engine executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    records: Vec<TraceRecord>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_instruction(&mut self, instruction: Instruction, snapshot: Snapshot) {
        self.records.push(TraceRecord::Instruction {
            instruction,
            snapshot,
        });
    }

    pub(crate) fn record_comment(&mut self, text: String) {
        self.records.push(TraceRecord::Comment(text));
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The trace as a replayable statement list. Snapshots are dropped.
    pub fn statements(&self) -> Vec<Statement> {
        self.records
            .iter()
            .map(|record| match record {
                TraceRecord::Comment(text) => Statement::Comment(text.clone()),
                TraceRecord::Instruction { instruction, .. } => {
                    Statement::Instruction(*instruction)
                }
            })
            .collect()
    }

    /// Render the aligned textual listing, one line per record.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::EmptyTrace`] if nothing was recorded.
    pub fn render(&self) -> Result<String, StackError> {
        if self.records.is_empty() {
            return Err(StackError::EmptyTrace);
        }

        let mut name_width = 0;
        let mut args_width = 0;
        for record in &self.records {
            if let TraceRecord::Instruction { instruction, .. } = record {
                name_width = name_width.max(instruction.mnemonic().len());
                args_width = args_width.max(args_repr_len(&instruction.operands()) - 2);
            }
        }

        let lines: Vec<String> = self
            .records
            .iter()
            .map(|record| match record {
                TraceRecord::Comment(text) => format!("; {text}"),
                TraceRecord::Instruction {
                    instruction,
                    snapshot,
                } => {
                    let operands = join_operands(&instruction.operands());
                    format!(
                        "{:<name_width$} {:<args_width$}# {}",
                        instruction.mnemonic(),
                        operands,
                        snapshot
                    )
                }
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

impl fmt::Display for Trace {
    /// Renders the listing; an empty trace displays as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(_) => Ok(()),
        }
    }
}

fn join_operands(operands: &[Word]) -> String {
    operands
        .iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Length of the operands written as a parenthesised tuple: `()`, `(5,)`,
/// `(1, 2)`. The column width is this minus the two brackets, which leaves
/// one extra column for single-operand instructions.
fn args_repr_len(operands: &[Word]) -> usize {
    let digits: usize = operands.iter().map(|op| op.to_string().len()).sum();
    match operands.len() {
        0 => 2,
        1 => digits + 3,
        n => digits + 2 * (n - 1) + 2,
    }
}

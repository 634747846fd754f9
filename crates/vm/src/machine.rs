//! Engine state: value stack, freeze state, registers, trace.

use std::fmt;

use stackm_common::Word;
use tracing::debug;

use crate::config::StackConfig;
use crate::error::{Fault, StackError};
use crate::registers::RegisterBank;
use crate::trace::{Snapshot, Trace};

/// Lifecycle of an engine. Both frozen states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Accepting instructions.
    Active,
    /// Frozen by a captured fault, which sits on top of the values.
    Errored(Fault),
    /// Frozen without a fault, e.g. by the end of a scoped invocation.
    Closed,
}

/// What [`Stack::peek`] sees on top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Top {
    Value(Word),
    Fault(Fault),
}

/// The stack engine.
///
/// Instructions return `&mut Self` so calls can be chained:
///
/// ```
/// use stackm_vm::Stack;
///
/// let mut stack = Stack::default();
/// stack.push(500)?.push(200)?.add()?;
/// assert_eq!(stack, [700]);
/// # Ok::<(), stackm_vm::StackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Stack {
    pub(crate) config: StackConfig,
    pub(crate) values: Vec<Word>,
    pub(crate) status: Status,
    pub(crate) trace: Trace,
    pub(crate) registers: RegisterBank,
}

impl Default for Stack {
    fn default() -> Self {
        Self::with_config(StackConfig::default())
    }
}

impl Stack {
    /// Create an empty, active engine.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::InvalidWidth`] if `config.bits` is outside `1..=127`.
    pub fn new(config: StackConfig) -> Result<Self, StackError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: StackConfig) -> Self {
        Self {
            config,
            values: Vec::new(),
            status: Status::Active,
            trace: Trace::new(),
            registers: RegisterBank::new(),
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Stack values, bottom first. A captured fault is not included; see
    /// [`Stack::peek`] and [`Stack::fault`].
    pub fn values(&self) -> &[Word] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_frozen(&self) -> bool {
        self.status != Status::Active
    }

    /// The captured fault, if the engine is errored.
    pub fn fault(&self) -> Option<Fault> {
        match self.status {
            Status::Errored(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Render the trace listing. Fails with [`StackError::EmptyTrace`] if
    /// nothing was recorded.
    pub fn render_trace(&self) -> Result<String, StackError> {
        self.trace.render()
    }

    /// The top of the stack: a captured fault if errored, otherwise the
    /// last pushed value, or `None` when empty. Never fails or traces.
    pub fn peek(&self) -> Option<Top> {
        match self.status {
            Status::Errored(fault) => Some(Top::Fault(fault)),
            _ => self.values.last().copied().map(Top::Value),
        }
    }

    /// Freeze the engine. An errored engine keeps its fault.
    pub fn freeze(&mut self) {
        if self.status == Status::Active {
            debug!(depth = self.values.len(), "stack closed");
            self.status = Status::Closed;
        }
    }

    /// Append a comment to the trace. Comments bypass the freeze check and
    /// are dropped when tracing is disabled.
    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        if self.config.trace_enabled {
            self.trace.record_comment(text.into());
        }
        self
    }

    /// Record `fault` as the new top element and freeze.
    pub(crate) fn capture(&mut self, fault: Fault) {
        debug!(%fault, depth = self.values.len(), "fault captured");
        self.status = Status::Errored(fault);
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.values.clone(),
            fault: self.fault(),
        }
    }

    /// Pop the top value or fail with a stack underflow.
    pub(crate) fn pop_value(&mut self) -> Result<Word, Fault> {
        self.values.pop().ok_or(Fault::StackUnderflow)
    }

    /// Copy of the top value, or a stack underflow.
    pub(crate) fn top_value(&self) -> Result<Word, Fault> {
        self.values.last().copied().ok_or(Fault::StackUnderflow)
    }

    /// Check that `value` is representable under the configured width and
    /// signedness.
    pub(crate) fn check_width(&self, value: Word) -> Result<Word, Fault> {
        if !self.config.signed && value < 0 {
            return Err(Fault::Underflow);
        }
        if magnitude_bits(value) > self.config.magnitude_limit() {
            return Err(Fault::Overflow);
        }
        Ok(value)
    }
}

/// Minimal number of bits needed to represent `|value|`.
pub(crate) fn magnitude_bits(value: Word) -> u32 {
    u128::BITS - value.unsigned_abs().leading_zeros()
}

/// Equal when active or closed with the same values; an errored engine
/// never equals a plain list of integers.
impl PartialEq<[Word]> for Stack {
    fn eq(&self, other: &[Word]) -> bool {
        self.fault().is_none() && self.values.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[Word; N]> for Stack {
    fn eq(&self, other: &[Word; N]) -> bool {
        *self == other[..]
    }
}

impl PartialEq<Vec<Word>> for Stack {
    fn eq(&self, other: &Vec<Word>) -> bool {
        *self == other[..]
    }
}

impl fmt::Display for Stack {
    /// `Stack([500, 200])`, with the fault marker shown when errored.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stack({})", self.snapshot())
    }
}

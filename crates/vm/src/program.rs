//! Scoped invocation: one engine per logical call, frozen on every exit.
//!
//! [`CallStack`] is the guard. It freezes the engine it borrows when dropped,
//! which covers normal return, early `?` return, and unwinding alike.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::config::StackConfig;
use crate::error::StackError;
use crate::machine::Stack;

/// Borrowed engine that is frozen when the guard goes out of scope.
pub struct CallStack<'a> {
    stack: &'a mut Stack,
}

impl<'a> CallStack<'a> {
    pub fn new(stack: &'a mut Stack) -> Self {
        Self { stack }
    }
}

impl Deref for CallStack<'_> {
    type Target = Stack;

    fn deref(&self) -> &Stack {
        self.stack
    }
}

impl DerefMut for CallStack<'_> {
    fn deref_mut(&mut self) -> &mut Stack {
        self.stack
    }
}

impl Drop for CallStack<'_> {
    fn drop(&mut self) {
        debug!(
            depth = self.stack.len(),
            errored = self.stack.fault().is_some(),
            "call stack released"
        );
        self.stack.freeze();
    }
}

/// A finished invocation: the frozen engine and what the body returned.
#[derive(Debug)]
pub struct Invocation<T> {
    pub stack: Stack,
    pub result: Result<T, StackError>,
}

/// Run `body` against a fresh engine built from `config`.
///
/// The engine is frozen when `body` returns, whether it succeeded or not,
/// and is handed back for inspection alongside the body's result.
///
/// # Errors
///
/// Only fails if `config` is invalid; errors from `body` are reported in
/// [`Invocation::result`].
pub fn invoke<T>(
    config: StackConfig,
    body: impl FnOnce(&mut Stack) -> Result<T, StackError>,
) -> Result<Invocation<T>, StackError> {
    let mut stack = Stack::new(config)?;
    let result = {
        let mut scope = CallStack::new(&mut stack);
        body(&mut *scope)
    };
    Ok(Invocation { stack, result })
}

/// State a [`Program`] carries between calls: its configuration and the
/// engine from the most recent call.
#[derive(Debug, Clone)]
pub struct ProgramState {
    pub config: StackConfig,
    stack: Option<Stack>,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new(StackConfig::program())
    }
}

impl ProgramState {
    pub fn new(config: StackConfig) -> Self {
        Self {
            config,
            stack: None,
        }
    }
}

/// A caller-defined instruction sequence run through scoped invocation.
///
/// ```
/// use stackm_vm::{Program, ProgramState, Stack, StackError, Word};
///
/// #[derive(Default)]
/// struct Square {
///     state: ProgramState,
/// }
///
/// impl Program for Square {
///     type Input = Word;
///
///     fn state(&self) -> &ProgramState {
///         &self.state
///     }
///
///     fn state_mut(&mut self) -> &mut ProgramState {
///         &mut self.state
///     }
///
///     fn call(&mut self, x: Word) -> Result<&Stack, StackError> {
///         {
///             let mut stack = self.call_stack()?;
///             stack.push(x)?.dup()?.mul()?;
///         }
///         self.finished()
///     }
/// }
///
/// let mut square = Square::default();
/// assert_eq!(*square.call(12)?, [144]);
/// assert!(square.finished()?.is_frozen());
/// # Ok::<(), StackError>(())
/// ```
pub trait Program {
    type Input;

    fn state(&self) -> &ProgramState;

    fn state_mut(&mut self) -> &mut ProgramState;

    /// Issue this program's instructions for `input`.
    fn call(&mut self, input: Self::Input) -> Result<&Stack, StackError>;

    fn config(&self) -> StackConfig {
        self.state().config
    }

    /// Start a new invocation. The fresh engine replaces the previous one
    /// and stays reachable through [`Program::finished`] after the guard
    /// is dropped.
    fn call_stack(&mut self) -> Result<CallStack<'_>, StackError> {
        let config = self.config();
        let stack = self.state_mut().stack.insert(Stack::new(config)?);
        Ok(CallStack::new(stack))
    }

    /// The engine from the most recent invocation.
    fn finished(&self) -> Result<&Stack, StackError> {
        self.state().stack.as_ref().ok_or(StackError::NotInvoked)
    }
}

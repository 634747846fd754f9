//! stackm engine: a deterministic integer stack machine.
//!
//! The engine is a LIFO value stack with:
//! - A configurable word width and signedness, checked after every result
//! - A register bank that outlives pops
//! - An append-only trace that renders as an aligned listing
//! - A freeze state: once a fault is captured, or the enclosing scoped
//!   invocation ends, no further instruction is accepted
//!
//! # Usage
//!
//! ```
//! use stackm_vm::{invoke, StackConfig};
//!
//! let done = invoke(StackConfig::default(), |stack| {
//!     stack.comment("x = 500");
//!     stack.push(500)?.push(200)?.add()?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(done.stack, [700]);
//! assert!(done.stack.is_frozen());
//! assert_eq!(
//!     done.stack.render_trace().unwrap(),
//!     "; x = 500\npush 500 # [500]\npush 200 # [500, 200]\nadd      # [700]"
//! );
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod machine;
pub mod program;
pub mod registers;
pub mod trace;

pub use config::StackConfig;
pub use error::{Fault, StackError};
pub use machine::{Stack, Status, Top};
pub use program::{invoke, CallStack, Invocation, Program, ProgramState};
pub use registers::RegisterBank;
pub use trace::{Snapshot, Trace, TraceRecord};

pub use stackm_common::{Instruction, Opcode, Slot, Statement, Word};

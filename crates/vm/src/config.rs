//! Engine construction parameters.

use crate::error::StackError;

/// Widest supported configuration. Every in-range value of a 127-bit
/// signed or unsigned word fits in an `i128`.
pub const MAX_BITS: u32 = 127;

/// Default word width.
pub const DEFAULT_BITS: u32 = 64;

/// Immutable configuration of a single engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackConfig {
    /// Word width in bits.
    pub bits: u32,
    /// Whether values are interpreted as signed.
    pub signed: bool,
    /// Whether instructions and comments are recorded in the trace.
    pub trace_enabled: bool,
}

impl Default for StackConfig {
    /// 64-bit unsigned with tracing on.
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            signed: false,
            trace_enabled: true,
        }
    }
}

impl StackConfig {
    /// Configuration used by [`Program`](crate::Program)s unless they
    /// override it: 64-bit unsigned with tracing off.
    pub fn program() -> Self {
        Self {
            trace_enabled: false,
            ..Self::default()
        }
    }

    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn with_trace(mut self, trace_enabled: bool) -> Self {
        self.trace_enabled = trace_enabled;
        self
    }

    /// Reject widths the engine cannot represent.
    pub fn validate(&self) -> Result<(), StackError> {
        if (1..=MAX_BITS).contains(&self.bits) {
            Ok(())
        } else {
            Err(StackError::InvalidWidth { bits: self.bits })
        }
    }

    /// Largest magnitude, in bits, a value may have under this config.
    pub(crate) fn magnitude_limit(&self) -> u32 {
        if self.signed {
            self.bits - 1
        } else {
            self.bits
        }
    }
}

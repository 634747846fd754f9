//! Instruction dispatch and semantics.
//!
//! Every instruction goes through [`Stack::dispatch`], which in order:
//! 1. rejects the call if the engine is frozen (nothing traced),
//! 2. runs the handler, capturing any [`Fault`] onto the stack,
//! 3. appends the instruction and its post-state to the trace,
//! 4. re-raises the fault if one is now on top.

use stackm_common::{Instruction, Slot, Statement, Word};
use tracing::trace;

use crate::error::{Fault, StackError};
use crate::machine::{magnitude_bits, Stack, Top};

impl Stack {
    /// Run one instruction under the freeze/capture/trace protocol.
    pub fn dispatch(&mut self, instr: Instruction) -> Result<&mut Self, StackError> {
        if self.is_frozen() {
            return Err(StackError::Frozen);
        }
        trace!(instruction = %instr, depth = self.values.len(), "dispatch");

        if let Err(fault) = self.apply(instr) {
            self.capture(fault);
        }

        if self.config.trace_enabled {
            let snapshot = self.snapshot();
            self.trace.record_instruction(instr, snapshot);
        }

        match self.peek() {
            Some(Top::Fault(fault)) => Err(fault.into()),
            _ => Ok(self),
        }
    }

    /// Dispatch an instruction by mnemonic.
    ///
    /// # Errors
    ///
    /// [`StackError::InvalidInstruction`] for an unknown name and
    /// [`StackError::Decode`] for bad operands; both leave the engine
    /// untouched. Otherwise as [`Stack::dispatch`].
    pub fn exec(&mut self, name: &str, operands: &[Word]) -> Result<&mut Self, StackError> {
        let instr = Instruction::parse(name, operands)?;
        self.dispatch(instr)
    }

    /// Replay a statement list, stopping at the first error.
    pub fn run(&mut self, statements: &[Statement]) -> Result<&mut Self, StackError> {
        for statement in statements {
            match statement {
                Statement::Comment(text) => {
                    self.comment(text.as_str());
                }
                Statement::Instruction(instr) => {
                    self.dispatch(*instr)?;
                }
            }
        }
        Ok(self)
    }

    pub fn push(&mut self, value: Word) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Push(value))
    }

    pub fn pop(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Pop)
    }

    pub fn dup(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Dup)
    }

    pub fn add(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Add)
    }

    pub fn sub(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Sub)
    }

    pub fn mul(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Mul)
    }

    /// Floor division: rounds toward negative infinity.
    pub fn div(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Div)
    }

    pub fn shl(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Shl)
    }

    pub fn shr(&mut self) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Shr)
    }

    /// Copy the top value into `slot`. The value stays on the stack.
    pub fn store(&mut self, slot: Slot) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Store(slot))
    }

    pub fn load(&mut self, slot: Slot) -> Result<&mut Self, StackError> {
        self.dispatch(Instruction::Load(slot))
    }

    fn apply(&mut self, instr: Instruction) -> Result<(), Fault> {
        match instr {
            Instruction::Push(value) => self.exec_push(value),
            Instruction::Pop => self.pop_value().map(drop),
            Instruction::Dup => self.exec_dup(),
            Instruction::Add => self.exec_binary(|a, b| a.checked_add(b).ok_or(Fault::Overflow)),
            Instruction::Sub => self.exec_binary(|a, b| a.checked_sub(b).ok_or(Fault::Overflow)),
            Instruction::Mul => self.exec_binary(|a, b| a.checked_mul(b).ok_or(Fault::Overflow)),
            Instruction::Div => self.exec_binary(floor_div),
            Instruction::Shl => self.exec_binary(shift_left),
            Instruction::Shr => self.exec_binary(shift_right),
            Instruction::Store(slot) => self.exec_store(slot),
            Instruction::Load(slot) => self.exec_load(slot),
        }
    }

    fn exec_push(&mut self, value: Word) -> Result<(), Fault> {
        let value = self.check_width(value)?;
        self.values.push(value);
        Ok(())
    }

    fn exec_dup(&mut self) -> Result<(), Fault> {
        let top = self.top_value()?;
        self.values.push(top);
        Ok(())
    }

    /// Pop `other`, pop `base`, push `op(base, other)` after a width check.
    /// Both operands are consumed even when the result is rejected.
    fn exec_binary(&mut self, op: impl Fn(Word, Word) -> Result<Word, Fault>) -> Result<(), Fault> {
        if self.values.len() < 2 {
            return Err(Fault::StackUnderflow);
        }
        let other = self.pop_value()?;
        let base = self.pop_value()?;
        let result = self.check_width(op(base, other)?)?;
        self.values.push(result);
        Ok(())
    }

    fn exec_store(&mut self, slot: Slot) -> Result<(), Fault> {
        let top = self.top_value()?;
        self.registers.store(slot, top);
        Ok(())
    }

    fn exec_load(&mut self, slot: Slot) -> Result<(), Fault> {
        let value = self
            .registers
            .load(slot)
            .ok_or(Fault::UnsetRegister { slot })?;
        self.values.push(value);
        Ok(())
    }
}

fn floor_div(base: Word, other: Word) -> Result<Word, Fault> {
    if other == 0 {
        return Err(Fault::DivisionByZero);
    }
    let quotient = base.checked_div(other).ok_or(Fault::Overflow)?;
    if base % other != 0 && ((base < 0) != (other < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

fn shift_left(base: Word, count: Word) -> Result<Word, Fault> {
    if count < 0 {
        return Err(Fault::NegativeShift);
    }
    if base == 0 {
        return Ok(0);
    }
    // |base << count| needs magnitude_bits(base) + count bits.
    let needed = Word::from(magnitude_bits(base))
        .checked_add(count)
        .ok_or(Fault::Overflow)?;
    if needed > Word::from(Word::BITS - 1) {
        return Err(Fault::Overflow);
    }
    Ok(base << count)
}

fn shift_right(base: Word, count: Word) -> Result<Word, Fault> {
    if count < 0 {
        return Err(Fault::NegativeShift);
    }
    if count >= Word::from(Word::BITS) {
        return Ok(if base < 0 { -1 } else { 0 });
    }
    Ok(base >> count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;
    use crate::machine::Status;

    fn signed() -> Stack {
        Stack::new(StackConfig::default().signed(true)).unwrap()
    }

    #[test]
    fn floor_div_rounds_down() {
        assert_eq!(floor_div(7, 2), Ok(3));
        assert_eq!(floor_div(-7, 2), Ok(-4));
        assert_eq!(floor_div(7, -2), Ok(-4));
        assert_eq!(floor_div(-7, -2), Ok(3));
        assert_eq!(floor_div(-8, 2), Ok(-4));
        assert_eq!(floor_div(1, 0), Err(Fault::DivisionByZero));
        assert_eq!(floor_div(Word::MIN, -1), Err(Fault::Overflow));
    }

    #[test]
    fn shift_left_bounds() {
        assert_eq!(shift_left(500, 2), Ok(2000));
        assert_eq!(shift_left(-3, 1), Ok(-6));
        assert_eq!(shift_left(0, 1000), Ok(0));
        assert_eq!(shift_left(1, 126), Ok(1 << 126));
        assert_eq!(shift_left(1, 127), Err(Fault::Overflow));
        assert_eq!(shift_left(1, -1), Err(Fault::NegativeShift));
        assert_eq!(shift_left(1, Word::MAX), Err(Fault::Overflow));
        assert_eq!(shift_left(-1, Word::MAX), Err(Fault::Overflow));
    }

    #[test]
    fn shl_by_max_count_is_captured_at_full_width() {
        let mut stack = Stack::new(StackConfig::default().with_bits(127)).unwrap();
        stack.push(1).unwrap().push(Word::MAX).unwrap();
        assert_eq!(stack.shl().unwrap_err(), StackError::Fault(Fault::Overflow));
        assert_eq!(stack.peek(), Some(Top::Fault(Fault::Overflow)));
        assert!(stack.is_frozen());
    }

    #[test]
    fn shift_right_floors() {
        assert_eq!(shift_right(500, 2), Ok(125));
        assert_eq!(shift_right(-5, 1), Ok(-3));
        assert_eq!(shift_right(5, 500), Ok(0));
        assert_eq!(shift_right(-5, 500), Ok(-1));
        assert_eq!(shift_right(5, -2), Err(Fault::NegativeShift));
    }

    #[test]
    fn binary_underflow_keeps_operand() {
        let mut stack = Stack::default();
        stack.push(500).unwrap();
        assert_eq!(stack.add().unwrap_err(), StackError::Fault(Fault::StackUnderflow));
        assert_eq!(stack.values(), &[500]);
    }

    #[test]
    fn rejected_result_consumes_operands() {
        let mut stack = Stack::default();
        stack.push(500).unwrap().push(700).unwrap();
        assert_eq!(stack.sub().unwrap_err(), StackError::Fault(Fault::Underflow));
        assert!(stack.values().is_empty());
        assert_eq!(stack.peek(), Some(Top::Fault(Fault::Underflow)));
    }

    #[test]
    fn signed_negative_results() {
        let mut stack = signed();
        stack.push(200).unwrap().push(500).unwrap().sub().unwrap();
        assert_eq!(stack, [-300]);
        stack.push(-7).unwrap().push(2).unwrap().div().unwrap();
        assert_eq!(stack, [-300, -4]);
    }

    #[test]
    fn signed_negative_shift_is_captured() {
        let mut stack = signed();
        stack.push(1).unwrap().push(-1).unwrap();
        assert_eq!(stack.shl().unwrap_err(), StackError::Fault(Fault::NegativeShift));
        assert_eq!(stack.status(), Status::Errored(Fault::NegativeShift));
    }

    #[test]
    fn division_by_zero_is_captured() {
        let mut stack = Stack::default();
        stack.push(1).unwrap().push(0).unwrap();
        assert_eq!(stack.div().unwrap_err(), StackError::Fault(Fault::DivisionByZero));
        assert_eq!(stack.peek(), Some(Top::Fault(Fault::DivisionByZero)));
        assert!(stack.is_frozen());
    }

    #[test]
    fn push_checks_width() {
        let mut stack = Stack::new(StackConfig::default().with_bits(8)).unwrap();
        stack.push(255).unwrap();
        assert_eq!(stack.push(256).unwrap_err(), StackError::Fault(Fault::Overflow));
        assert_eq!(stack.values(), &[255]);
    }

    #[test]
    fn unsigned_push_negative_is_underflow() {
        let mut stack = Stack::default();
        assert_eq!(stack.push(-1).unwrap_err(), StackError::Fault(Fault::Underflow));
        assert_eq!(stack.peek(), Some(Top::Fault(Fault::Underflow)));
    }

    #[test]
    fn overflow_at_configured_width() {
        let mut stack = Stack::new(StackConfig::default().with_bits(8)).unwrap();
        stack.push(200).unwrap().push(100).unwrap();
        assert_eq!(stack.add().unwrap_err(), StackError::Fault(Fault::Overflow));
        assert_eq!(
            stack.render_trace().unwrap().lines().last(),
            Some("add      # [OverflowError()]")
        );
    }

    #[test]
    fn pop_on_empty_is_captured() {
        let mut stack = Stack::default();
        assert_eq!(stack.pop().unwrap_err(), StackError::Fault(Fault::StackUnderflow));
        assert_eq!(stack.render_trace().unwrap(), "pop # [StackUnderflowError()]");
    }

    #[test]
    fn store_does_not_pop() {
        let mut stack = Stack::default();
        stack.push(9).unwrap().store(3).unwrap();
        assert_eq!(stack, [9]);
        assert_eq!(stack.registers().load(3), Some(9));
    }

    #[test]
    fn store_on_empty_is_captured() {
        let mut stack = Stack::default();
        assert_eq!(stack.store(0).unwrap_err(), StackError::Fault(Fault::StackUnderflow));
        assert!(stack.registers().is_empty());
    }

    #[test]
    fn load_unset_register_is_captured() {
        let mut stack = Stack::default();
        stack.push(1).unwrap();
        assert_eq!(
            stack.load(5).unwrap_err(),
            StackError::Fault(Fault::UnsetRegister { slot: 5 })
        );
        assert_eq!(stack.peek(), Some(Top::Fault(Fault::UnsetRegister { slot: 5 })));
        assert_eq!(
            stack.render_trace().unwrap().lines().last(),
            Some("load 5 # [1, KeyError()]")
        );
    }

    #[test]
    fn frozen_rejects_without_tracing() {
        let mut stack = Stack::default();
        stack.push(1).unwrap();
        stack.freeze();
        assert_eq!(stack.push(2).unwrap_err(), StackError::Frozen);
        assert_eq!(stack.trace().len(), 1);
        assert_eq!(stack, [1]);
    }

    #[test]
    fn exec_validates_before_dispatch() {
        let mut stack = Stack::default();
        assert!(matches!(
            stack.exec("push", &[]).unwrap_err(),
            StackError::Decode(_)
        ));
        assert_eq!(
            stack.exec("peek", &[]).unwrap_err(),
            StackError::InvalidInstruction {
                name: "peek".to_string()
            }
        );
        assert!(stack.trace().is_empty());
        assert!(!stack.is_frozen());
    }

    #[test]
    fn run_replays_comments_and_instructions() {
        let mut stack = Stack::default();
        stack
            .run(&[
                Statement::comment("x"),
                Instruction::Push(2).into(),
                Instruction::Dup.into(),
                Instruction::Mul.into(),
            ])
            .unwrap();
        assert_eq!(stack, [4]);
        assert_eq!(stack.trace().len(), 4);
    }

    #[test]
    fn run_stops_at_first_error() {
        let mut stack = Stack::default();
        let err = stack
            .run(&[
                Statement::Instruction(Instruction::Pop),
                Statement::Instruction(Instruction::Push(1)),
            ])
            .unwrap_err();
        assert_eq!(err, StackError::Fault(Fault::StackUnderflow));
        assert_eq!(stack.trace().len(), 1);
    }
}

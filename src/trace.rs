// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Optional tracing of executed instructions
//!
//! Tracing is opt-in: a [Machine] records nothing until
//! [start_trace](Machine::start_trace) is called, and each executed
//! instruction then appends a [TracedStep] describing what it resolved to
//! and did.

use std::fmt::{self, Display};

use super::asm::Instr;
use super::Machine;

/// What a single executed instruction did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEffect {
    /// A `cpy`, `inc`, or `dec` left this value in its register
    Stored(i64),
    /// A `jnz` jumped, with this program-counter displacement
    Jumped(i64),
    /// A `jnz` whose condition resolved to zero fell through
    NoJump,
    /// A `tgl` rewrote the instruction at this index, or targeted an
    /// address outside the program
    Toggled(Option<usize>),
    /// An `out` emitted this value
    Emitted(i64),
    /// The instruction was not executable (a literal where a register is
    /// required) and was skipped
    Skipped,
}

/// A record of one executed instruction, as it existed at execution time
///
/// Holding the instruction by value matters for self-modifying programs: a
/// later toggle can rewrite the program slot the step was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracedStep {
    instr_ptr: i64,
    instr: Instr,
    effect: StepEffect,
}

impl TracedStep {
    /// The program counter's position when the traced instruction executed
    pub fn instr_ptr(&self) -> i64 {
        self.instr_ptr
    }

    /// The instruction that executed
    pub fn instr(&self) -> Instr {
        self.instr
    }

    /// What the instruction did
    pub fn effect(&self) -> StepEffect {
        self.effect
    }

    /// If the instruction stored a value into a register, that value
    pub fn stored_val(&self) -> Option<i64> {
        match self.effect {
            StepEffect::Stored(val) => Some(val),
            _ => None,
        }
    }
}

impl Display for TracedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ran instruction at {:0>4}: [{}] ", self.instr_ptr, self.instr)?;
        match self.effect {
            StepEffect::Stored(val) => write!(f, "(stored {val})"),
            StepEffect::Jumped(displacement) => write!(f, "(jumped by {displacement})"),
            StepEffect::NoJump => write!(f, "(didn't jump)"),
            StepEffect::Toggled(Some(index)) => write!(f, "(toggled instruction {index})"),
            StepEffect::Toggled(None) => write!(f, "(toggle target out of bounds)"),
            StepEffect::Emitted(val) => write!(f, "(emitted {val})"),
            StepEffect::Skipped => write!(f, "(skipped)"),
        }
    }
}

/// A log of the instructions a [Machine] has executed since a call to
/// [Machine::start_trace]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trace(pub Vec<TracedStep>);

impl Trace {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

impl Machine {
    /// Begin a [Trace] of executed instructions. If a trace is already
    /// running, this replaces that trace and returns it in a [`Some`],
    /// otherwise, it returns [`None`].
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing and return the collected [Trace]. If no trace was
    /// active, returns [`None`]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    pub(crate) fn record(&mut self, instr_ptr: i64, instr: Instr, effect: StepEffect) {
        if let Some(trace) = self.trace.as_mut() {
            trace.0.push(TracedStep {
                instr_ptr,
                instr,
                effect,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::parse_program;

    #[test]
    fn trace_records_resolved_effects() {
        let program = parse_program("cpy 2 a\ndec a\njnz a -1\nout a").unwrap();
        let mut machine = Machine::new(program);
        machine.start_trace();
        machine.run();

        let Trace(steps) = machine.end_trace().expect("trace was started");
        let effects: Vec<(i64, StepEffect)> = steps
            .iter()
            .map(|step| (step.instr_ptr(), step.effect()))
            .collect();
        assert_eq!(
            effects,
            vec![
                (0, StepEffect::Stored(2)),
                (1, StepEffect::Stored(1)),
                (2, StepEffect::Jumped(-1)),
                (1, StepEffect::Stored(0)),
                (2, StepEffect::NoJump),
                (3, StepEffect::Emitted(0)),
            ]
        );
    }

    #[test]
    fn no_trace_without_start() {
        let mut machine = Machine::new(parse_program("inc a").unwrap());
        machine.run();
        assert_eq!(machine.end_trace(), None);
    }

    #[test]
    fn step_display() {
        let program = parse_program("tgl 5").unwrap();
        let mut machine = Machine::new(program);
        machine.start_trace();
        machine.run();
        let trace = machine.show_trace().expect("trace is active");
        assert_eq!(
            trace.0[0].to_string(),
            "ran instruction at 0000: [tgl 5] (toggle target out of bounds)"
        );
    }
}

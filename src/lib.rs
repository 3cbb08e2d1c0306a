// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing an interpreter for the assembunny register machine
//!
//! The machine executes a small fixed instruction set (`cpy`, `inc`, `dec`,
//! `jnz`, `tgl`, `out`) over four integer registers and a program counter.
//! The `tgl` instruction rewrites the program in place, so each [Machine]
//! owns its program exclusively; the [asm] module parses source text into
//! that owned form, and the [search] module drives repeated bounded runs to
//! find a clock-signal seed.
//!
//! # Example
//!
//! ```rust
//! use assembunny::prelude::*;
//! use assembunny::asm::parse_program;
//!
//! let program = parse_program("cpy 41 a\ninc a\ninc a\ndec a\njnz a 2\ndec a").unwrap();
//! let mut machine = Machine::new(program);
//! machine.run();
//! assert_eq!(machine.register(Register::A), 42);
//! ```
//!
//! Bounded runs collect the signal emitted by `out` instructions:
//!
//! ```rust
//! use assembunny::prelude::*;
//! use assembunny::asm::parse_program;
//!
//! let program = parse_program("out 0\nout 1\njnz 1 -2").unwrap();
//! let mut machine = Machine::new(program);
//! assert_eq!(machine.run_signal(6), State::OutputLimit);
//! assert_eq!(machine.output(), [0, 1, 0, 1, 0, 1]);
//! ```

pub mod asm;
mod internals;
pub mod search;
pub mod trace;

use asm::{Instr, Operand, Register};
use trace::{StepEffect, Trace};

/// A small module that re-exports items needed when working with the machine
pub mod prelude {
    pub use crate::asm::Register;
    pub use crate::{Machine, State, StepOutcome};
}

/// The outcome of a single [step](Machine::step)
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepOutcome {
    /// The program counter still points into the program
    Running,
    /// The program counter has left the program; nothing more will execute
    Halted,
}

/// Why a [bounded run](Machine::run_signal) stopped
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// The program counter left the program
    Halted,
    /// The output buffer reached the configured limit
    OutputLimit,
    /// Two consecutive emitted values were equal, so the output can no
    /// longer be a strictly alternating signal
    BrokenSignal,
}

/// An assembunny machine: an owned, mutable program plus the register file,
/// program counter, and output buffer for one run.
///
/// The program is owned by value because `tgl` mutates it in place. A
/// machine is created fresh for each run and discarded afterwards; nothing
/// survives across runs except what the caller reads back out.
#[derive(Debug, Clone)]
pub struct Machine {
    program: Vec<Instr>,
    registers: [i64; Register::COUNT],
    pc: i64,
    output: Vec<i64>,
    pub(crate) trace: Option<Trace>,
}

// ignore the trace field
impl PartialEq for Machine {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program
            && self.registers == other.registers
            && self.pc == other.pc
            && self.output == other.output
    }
}

impl Machine {
    /// Create a new machine with all registers zeroed and the program
    /// counter at 0
    pub fn new(program: Vec<Instr>) -> Self {
        Self {
            program,
            registers: [0; Register::COUNT],
            pc: 0,
            output: Vec::new(),
            trace: None,
        }
    }

    /// Create a new machine with the given registers overridden; all others
    /// start at 0
    pub fn with_registers(
        program: Vec<Instr>,
        overrides: impl IntoIterator<Item = (Register, i64)>,
    ) -> Self {
        let mut machine = Self::new(program);
        for (register, value) in overrides {
            machine.set_register(register, value);
        }
        machine
    }

    /// The current value of `register`
    pub fn register(&self, register: Register) -> i64 {
        self.registers[register.index()]
    }

    /// Set `register` to `value`
    pub fn set_register(&mut self, register: Register, value: i64) {
        self.registers[register.index()] = value;
    }

    /// The program as it currently exists in memory, with any toggles that
    /// have been applied so far
    pub fn program(&self) -> &[Instr] {
        &self.program
    }

    /// The values emitted by `out` instructions so far, in order
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Execute the instruction under the program counter
    ///
    /// Returns [StepOutcome::Halted] without executing anything if the
    /// program counter is outside the program.
    pub fn step(&mut self) -> StepOutcome {
        let at = self.pc;
        let Some(instr) = usize::try_from(at)
            .ok()
            .and_then(|i| self.program.get(i))
            .copied()
        else {
            return StepOutcome::Halted;
        };

        let effect = match instr {
            Instr::Cpy(src, Operand::Register(dst)) => {
                let val = self.value(src);
                self.registers[dst.index()] = val;
                StepEffect::Stored(val)
            }
            Instr::Inc(Operand::Register(r)) => {
                self.registers[r.index()] += 1;
                StepEffect::Stored(self.registers[r.index()])
            }
            Instr::Dec(Operand::Register(r)) => {
                self.registers[r.index()] -= 1;
                StepEffect::Stored(self.registers[r.index()])
            }
            Instr::Jnz(x, offset) => {
                if self.value(x) != 0 {
                    let displacement = self.value(offset);
                    // a displacement that overflows the counter can't land
                    // inside the program; any out-of-range counter halts
                    self.pc = self.pc.checked_add(displacement).unwrap_or(-1);
                    self.record(at, instr, StepEffect::Jumped(displacement));
                    return StepOutcome::Running;
                }
                StepEffect::NoJump
            }
            Instr::Tgl(x) => {
                let offset = self.value(x);
                StepEffect::Toggled(self.apply_toggle(offset))
            }
            Instr::Out(x) => {
                let val = self.value(x);
                self.output.push(val);
                StepEffect::Emitted(val)
            }
            // a toggle can leave a literal where a register is required;
            // such an instruction is skipped, not an error
            Instr::Cpy(_, Operand::Literal(_))
            | Instr::Inc(Operand::Literal(_))
            | Instr::Dec(Operand::Literal(_)) => StepEffect::Skipped,
        };
        self.record(at, instr, effect);
        self.pc += 1;
        StepOutcome::Running
    }

    /// Run until the program counter leaves the program
    ///
    /// Not guarded against non-terminating programs; use
    /// [run_signal](Machine::run_signal) when a bound is needed.
    pub fn run(&mut self) {
        while self.step() == StepOutcome::Running {}
    }

    /// Run at most `max_steps` instructions
    ///
    /// Returns [StepOutcome::Halted] if the program counter left the
    /// program before the cap was reached, and [StepOutcome::Running]
    /// otherwise. Unlike [run_signal](Machine::run_signal), this bounds
    /// programs that loop without ever emitting output.
    pub fn run_steps(&mut self, max_steps: usize) -> StepOutcome {
        for _ in 0..max_steps {
            if self.step() == StepOutcome::Halted {
                return StepOutcome::Halted;
            }
        }
        StepOutcome::Running
    }

    /// Run until the program halts, the output buffer holds `limit` values,
    /// or two consecutive emitted values are equal
    ///
    /// The repeated-value early exit exists because the signal being
    /// searched for is strictly alternating: once two equal values appear
    /// there is no point running further.
    pub fn run_signal(&mut self, limit: usize) -> State {
        if self.output.len() >= limit {
            return State::OutputLimit;
        }
        loop {
            let emitted = self.output.len();
            if self.step() == StepOutcome::Halted {
                return State::Halted;
            }
            if self.output.len() != emitted {
                if let [.., prev, last] = self.output[..] {
                    if prev == last {
                        return State::BrokenSignal;
                    }
                }
                if self.output.len() >= limit {
                    return State::OutputLimit;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::parse_program;

    fn machine(src: &str) -> Machine {
        Machine::new(parse_program(src).expect("test program parses"))
    }

    #[test]
    fn copy_then_cancel_out() {
        let mut m = machine("cpy 2 a\ninc a\ndec a\ndec a");
        m.run();
        assert_eq!(m.register(Register::A), 2);
    }

    /// An instruction with a literal where a register is required advances
    /// the program counter without any other effect
    #[test]
    fn invalid_instruction_is_skipped() {
        let mut m = machine("cpy 1 2\ninc 5\ndec -1\ninc a");
        m.run();
        assert_eq!(m.register(Register::A), 1);
    }

    #[test]
    fn registers_default_to_zero_with_overrides() {
        let m = Machine::with_registers(vec![], [(Register::C, 1)]);
        assert_eq!(m.register(Register::A), 0);
        assert_eq!(m.register(Register::B), 0);
        assert_eq!(m.register(Register::C), 1);
        assert_eq!(m.register(Register::D), 0);
    }

    #[test]
    fn jnz_ignores_zero_condition() {
        let mut m = machine("jnz a 2\ninc b\ninc b");
        m.run();
        assert_eq!(m.register(Register::B), 2);
    }

    #[test]
    fn negative_pc_halts() {
        let mut m = machine("jnz 1 -5\ninc a");
        assert_eq!(m.step(), StepOutcome::Running);
        assert_eq!(m.step(), StepOutcome::Halted);
        assert_eq!(m.register(Register::A), 0);
    }

    /// A jump whose displacement overflows the program counter leaves the
    /// program rather than panicking
    #[test]
    fn jump_offset_overflow_halts() {
        let mut m = machine("inc a\njnz 1 9223372036854775807\ninc a");
        m.run();
        assert_eq!(m.register(Register::A), 1);

        let mut m = machine("inc a\ninc a\njnz 1 -9223372036854775808");
        m.run();
        assert_eq!(m.register(Register::A), 2);
    }

    /// A toggle whose offset overflows the program counter can't point
    /// anywhere inside the program, so it does nothing
    #[test]
    fn toggle_offset_overflow_is_a_no_op() {
        let src = "inc a\ntgl 9223372036854775807\ninc a";
        let mut m = machine(src);
        m.run();
        assert_eq!(m.register(Register::A), 2);
        assert_eq!(m.program(), parse_program(src).expect("test program parses"));
    }

    /// A program that loops without emitting anything still stops once the
    /// step cap is reached
    #[test]
    fn step_cap_stops_silent_loop() {
        let mut m = machine("cpy 0 a\njnz 1 -1");
        assert_eq!(m.run_steps(50), StepOutcome::Running);
        assert!(m.output().is_empty());
        assert_eq!(m.register(Register::A), 0);
    }

    #[test]
    fn step_cap_unreached_by_halting_program() {
        let mut m = machine("inc a\ninc a");
        assert_eq!(m.run_steps(50), StepOutcome::Halted);
        assert_eq!(m.register(Register::A), 2);
    }

    #[test]
    fn broken_signal_stops_early() {
        let mut m = machine("out 1\njnz 1 -1");
        assert_eq!(m.run_signal(100), State::BrokenSignal);
        assert_eq!(m.output(), [1, 1]);
    }

    #[test]
    fn halting_generator_reports_halt() {
        let mut m = machine("out a\nout 1");
        assert_eq!(m.run_signal(5), State::Halted);
        assert_eq!(m.output(), [0, 1]);
    }
}

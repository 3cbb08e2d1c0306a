// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::*;

impl Machine {
    /// The concrete value of `operand`: a register read, or the literal
    /// itself
    pub(crate) fn value(&self, operand: Operand) -> i64 {
        match operand {
            Operand::Register(r) => self.registers[r.index()],
            Operand::Literal(n) => n,
        }
    }

    /// Flip the opcode of the instruction `offset` instructions away from
    /// the current program counter.
    ///
    /// Returns the index of the rewritten instruction, or [None] if the
    /// target lies outside the program (in which case nothing happens).
    /// An offset large enough to overflow the addition can't land inside
    /// the program either, so it falls under the same rule.
    /// Rewriting the instruction currently being executed is fine: the
    /// caller has already copied it out, so the new opcode only takes
    /// effect on later visits.
    pub(crate) fn apply_toggle(&mut self, offset: i64) -> Option<usize> {
        let index = usize::try_from(self.pc.checked_add(offset)?).ok()?;
        let instr = self.program.get_mut(index)?;
        *instr = instr.toggled();
        Some(index)
    }
}

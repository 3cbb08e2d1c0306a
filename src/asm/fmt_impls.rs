// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::{Instr, Operand, Register};

use std::fmt::{self, Display};

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "{r}"),
            Operand::Literal(n) => write!(f, "{n}"),
        }
    }
}

impl Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Cpy(x, y) => write!(f, "cpy {x} {y}"),
            Instr::Inc(x) => write!(f, "inc {x}"),
            Instr::Dec(x) => write!(f, "dec {x}"),
            Instr::Jnz(x, y) => write!(f, "jnz {x} {y}"),
            Instr::Tgl(x) => write!(f, "tgl {x}"),
            Instr::Out(x) => write!(f, "out {x}"),
        }
    }
}

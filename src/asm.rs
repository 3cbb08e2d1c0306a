// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! The assembunny source language: data types and parser
//!
//! Programs are plain text, one instruction per line, with an opcode followed
//! by whitespace-separated operands. Operands are either a register name
//! (`a` through `d`) or a signed integer literal. Blank lines and `;` line
//! comments are accepted and ignored.
//!
//! # Example
//!
//! ```rust
//! use assembunny::asm::{parse_program, Instr, Operand, Register};
//!
//! let program = parse_program("cpy 2 a\ninc a ; one more").unwrap();
//! assert_eq!(
//!     program,
//!     vec![
//!         Instr::Cpy(Operand::Literal(2), Operand::Register(Register::A)),
//!         Instr::Inc(Operand::Register(Register::A)),
//!     ]
//! );
//! ```

use chumsky::prelude::*;
use chumsky::text::Char;

use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

mod fmt_impls;

/// One of the four machine registers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Register {
    /// Register `a`, the conventional result and seed register
    A,
    /// Register `b`
    B,
    /// Register `c`
    C,
    /// Register `d`
    D,
}

impl Register {
    /// The number of registers in the machine
    pub const COUNT: usize = 4;

    /// All registers, in name order
    pub const ALL: [Self; Self::COUNT] = [Self::A, Self::B, Self::C, Self::D];

    /// The single-letter name of the register
    pub const fn name(self) -> char {
        (b'a' + self as u8) as char
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// The error returned when parsing a [Register] from text that isn't one of
/// the four register names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegister(String);

impl Display for UnknownRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown register {:?}: expected one of a, b, c, d", self.0)
    }
}

impl Error for UnknownRegister {}

impl FromStr for Register {
    type Err = UnknownRegister;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            _ => Err(UnknownRegister(s.into())),
        }
    }
}

/// An instruction argument: a register reference or a literal integer
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operand {
    /// The current value of a register
    Register(Register),
    /// A literal integer value
    Literal(i64),
}

/// A single decoded instruction
///
/// Operand arity is fixed by the variant shape, so a program can only hold
/// well-formed instructions. Combinations that are well-formed but not
/// executable (a [`Cpy`](Instr::Cpy) whose destination is a literal, or an
/// [`Inc`](Instr::Inc)/[`Dec`](Instr::Dec) whose operand is a literal) are
/// representable on purpose: [toggling](Instr::toggled) produces them, and
/// the machine skips them when executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Instr {
    /// `cpy x y`: copy the value of `x` into register `y`
    Cpy(Operand, Operand),
    /// `inc x`: add 1 to register `x`
    Inc(Operand),
    /// `dec x`: subtract 1 from register `x`
    Dec(Operand),
    /// `jnz x y`: if the value of `x` is nonzero, jump `y` instructions away
    Jnz(Operand, Operand),
    /// `tgl x`: flip the opcode of the instruction `x` instructions away
    Tgl(Operand),
    /// `out x`: emit the value of `x` as the next clock signal value
    Out(Operand),
}

impl Instr {
    /// The instruction this one becomes when targeted by a `tgl`
    ///
    /// One-operand opcodes: `inc` becomes `dec`, and everything else becomes
    /// `inc`. Two-operand opcodes: `jnz` becomes `cpy`, and everything else
    /// becomes `jnz`. Operands are never altered.
    ///
    /// Note that this is only self-inverting for `inc`/`dec` and the
    /// two-operand opcodes; toggling a `tgl` or `out` twice yields `dec`,
    /// not the original opcode.
    ///
    /// ```rust
    /// use assembunny::asm::{Instr, Operand, Register};
    ///
    /// let a = Operand::Register(Register::A);
    /// assert_eq!(Instr::Inc(a).toggled(), Instr::Dec(a));
    /// assert_eq!(Instr::Out(a).toggled(), Instr::Inc(a));
    /// assert_eq!(
    ///     Instr::Jnz(Operand::Literal(1), a).toggled(),
    ///     Instr::Cpy(Operand::Literal(1), a)
    /// );
    /// ```
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Inc(x) => Self::Dec(x),
            Self::Dec(x) | Self::Tgl(x) | Self::Out(x) => Self::Inc(x),
            Self::Jnz(x, y) => Self::Cpy(x, y),
            Self::Cpy(x, y) => Self::Jnz(x, y),
        }
    }
}

macro_rules! padded {
    ($inner: expr) => {{
        $inner.padded_by(text::inline_whitespace())
    }};
}

macro_rules! with_sep {
    ($inner: expr) => {{
        $inner.then_ignore(text::inline_whitespace().at_least(1))
    }};
}

type RichErr<'a> = chumsky::extra::Err<Rich<'a, char>>;

fn register<'a>() -> impl Parser<'a, &'a str, Register, RichErr<'a>> + Clone {
    choice((
        just('a').to(Register::A),
        just('b').to(Register::B),
        just('c').to(Register::C),
        just('d').to(Register::D),
    ))
    .labelled("register")
}

fn literal<'a>() -> impl Parser<'a, &'a str, i64, RichErr<'a>> + Clone {
    just('-')
        .or_not()
        .then(text::int(10))
        .to_slice()
        .try_map(|s: &str, span| {
            s.parse::<i64>()
                .map_err(|e| Rich::custom(span, format!("error parsing {s} as i64: {e}")))
        })
        .labelled("integer literal")
}

fn operand<'a>() -> impl Parser<'a, &'a str, Operand, RichErr<'a>> + Clone {
    choice((
        register().map(Operand::Register),
        literal().map(Operand::Literal),
    ))
    .labelled("operand")
    .as_context()
}

fn mnemonic<'a>(kw: &'static str) -> impl Parser<'a, &'a str, (), RichErr<'a>> {
    text::ascii::ident().try_map(move |s: &'a str, span| {
        if s.eq_ignore_ascii_case(kw) {
            Ok(())
        } else {
            Err(Rich::custom(span, format!("failed to match keyword {kw}")))
        }
    })
}

fn instr<'a>() -> impl Parser<'a, &'a str, Instr, RichErr<'a>> {
    macro_rules! op {
        ($name: literal, $variant: ident::<1>) => {
            with_sep!(mnemonic($name).labelled($name))
                .ignore_then(operand().map(Instr::$variant))
                .labelled(concat!($name, " instruction operand"))
        };
        ($name: literal, $variant: ident::<2>) => {
            with_sep!(mnemonic($name).labelled($name))
                .ignore_then(with_sep!(operand()).then(operand()))
                .map(|(x, y)| Instr::$variant(x, y))
                .labelled(concat!("2 ", $name, " instruction operands"))
        };
    }

    choice((
        op!("cpy", Cpy::<2>),
        op!("inc", Inc::<1>),
        op!("dec", Dec::<1>),
        op!("jnz", Jnz::<2>),
        op!("tgl", Tgl::<1>),
        op!("out", Out::<1>),
    ))
    .labelled("instruction")
    .as_context()
}

fn line<'a>() -> impl Parser<'a, &'a str, Option<Instr>, RichErr<'a>> {
    padded!(instr().or_not())
        .then_ignore(
            (padded!(just(';')).then((any().filter(|c: &char| !c.is_newline())).repeated()))
                .labelled("comment")
                .or_not(),
        )
        .labelled("line")
}

fn grammar<'a>() -> impl Parser<'a, &'a str, Vec<Instr>, RichErr<'a>> {
    line()
        .separated_by(just('\n').labelled("newline"))
        .collect::<Vec<_>>()
        .map(|lines| lines.into_iter().flatten().collect())
}

/// Parse assembunny source text into a program
///
/// Accepts blank lines and `;` line comments. Any malformed line (an unknown
/// opcode, an unknown register name, or a wrong operand count) makes the
/// whole parse fail; the returned [Rich] errors carry spans suitable for
/// diagnostic reporting.
pub fn parse_program(src: &str) -> Result<Vec<Instr>, Vec<Rich<'_, char>>> {
    grammar().parse(src).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! reg {
        ($r: ident) => {
            Operand::Register(Register::$r)
        };
    }

    macro_rules! lit {
        ($n: literal) => {
            Operand::Literal($n)
        };
    }

    #[test]
    fn parse_each_opcode() {
        assert_eq!(
            parse_program("cpy 41 a\ninc a\ndec b\njnz a 2\ntgl c\nout -1").unwrap(),
            vec![
                Instr::Cpy(lit!(41), reg!(A)),
                Instr::Inc(reg!(A)),
                Instr::Dec(reg!(B)),
                Instr::Jnz(reg!(A), lit!(2)),
                Instr::Tgl(reg!(C)),
                Instr::Out(lit!(-1)),
            ]
        );
    }

    #[test]
    fn blank_lines_and_comments() {
        let src = "; clock generator\n\nout d\n   \njnz 1 -1 ; loop forever\n";
        assert_eq!(
            parse_program(src).unwrap(),
            vec![Instr::Out(reg!(D)), Instr::Jnz(lit!(1), lit!(-1))]
        );
    }

    #[test]
    fn uppercase_mnemonics() {
        assert_eq!(
            parse_program("CPY 1 a").unwrap(),
            vec![Instr::Cpy(lit!(1), reg!(A))]
        );
    }

    /// `cpy 1 2` is well-formed (it's what toggling a `jnz 1 2` produces),
    /// so the parser accepts it; the machine skips it at runtime.
    #[test]
    fn literal_destination_parses() {
        assert_eq!(
            parse_program("cpy 1 2").unwrap(),
            vec![Instr::Cpy(lit!(1), lit!(2))]
        );
    }

    #[test]
    fn rejects_unknown_opcode() {
        assert!(parse_program("mov 1 a").is_err());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(parse_program("cpy 1").is_err());
        assert!(parse_program("inc a 1").is_err());
    }

    #[test]
    fn rejects_unknown_register() {
        assert!(parse_program("inc e").is_err());
    }

    #[test]
    fn register_from_str() {
        for r in Register::ALL {
            assert_eq!(r.name().to_string().parse(), Ok(r));
        }
        assert!("pc".parse::<Register>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let src = "cpy 2 a\ntgl a\njnz -3 d\nout 0";
        let program = parse_program(src).unwrap();
        let rendered: Vec<String> = program.iter().map(ToString::to_string).collect();
        assert_eq!(rendered.join("\n"), src);
    }
}

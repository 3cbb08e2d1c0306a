// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an assembunny program to halt and print a register's final value

use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use assembunny::asm::{parse_program, Register};
use assembunny::prelude::*;
use chumsky::error::{Rich, RichPattern};
use clap::Parser;
use itertools::Itertools;
use std::fs::read_to_string;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Assembunny interpreter", long_about = None)]
struct Args {
    #[arg(help = "The source file to run")]
    source: PathBuf,
    #[arg(short, long = "register", value_name = "REG=VALUE")]
    #[arg(help = "Initial register values, e.g. -r c=1")]
    register: Vec<RegisterOverride>,
    #[arg(short, long, default_value = "a")]
    #[arg(help = "Register whose final value is printed")]
    print: Register,
    #[arg(short = 's', long, value_name = "N")]
    #[arg(help = "Stop after at most N instructions, even if the program hasn't halted")]
    max_steps: Option<usize>,
    #[arg(long, help = "Write a trace of executed instructions to stderr")]
    trace: bool,
    #[arg(long, help = "Print the program, with any toggles applied, after the run")]
    dump: bool,
}

#[derive(Clone)]
struct RegisterOverride {
    register: Register,
    value: i64,
}

impl FromStr for RegisterOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((register, value)) = s.split_once('=') else {
            return Err(format!("expected REG=VALUE, got {s:?}"));
        };
        Ok(Self {
            register: register.parse().map_err(|e| format!("{e}"))?,
            value: value
                .parse()
                .map_err(|e| format!("invalid value {value:?}: {e}"))?,
        })
    }
}

fn report_parse_err(err: Rich<'_, char>, file: &str, source: &str) {
    use std::fmt::Write;

    let mut builder = Report::build(ReportKind::Error, (file, err.span().into_range()))
        .with_message(format!("Failed to parse {}", file.fg(Color::Red)));

    if let Some(found) = err.found() {
        builder = builder.with_label(
            Label::new((file, err.span().into_range()))
                .with_message(format!(
                    "Found token '{}'",
                    found.escape_default().fg(Color::Cyan)
                ))
                .with_color(Color::Yellow),
        );
    }

    // make sure that "something else" is the last listed entry
    let mut expected: Vec<_> = err.expected().collect();
    expected.sort_unstable_by(|&a, &b| {
        use std::cmp::Ordering;
        match (a, b) {
            (RichPattern::SomethingElse, _) => Ordering::Greater,
            (_, RichPattern::SomethingElse) => Ordering::Less,
            (a, b) => a.cmp(b),
        }
    });

    match &expected[..] {
        &[] => (),
        &[pat] => {
            builder = builder.with_note(format!("Expected \"{}\"", pat.fg(Color::Blue)));
        }
        pats => {
            let mut note = String::from("Expected one of the following:\n");
            for pat in pats {
                writeln!(&mut note, "- {}", pat.fg(Color::Blue)).expect("can write to &mut String");
            }
            builder = builder.with_note(note);
        }
    }

    builder
        .finish()
        .eprint((file, Source::from(source)))
        .expect("failed to print to stderr");
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match read_to_string(&args.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.source.display());
            return ExitCode::FAILURE;
        }
    };
    let file = args.source.to_string_lossy();

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(errs) => {
            for err in errs {
                report_parse_err(err, &file, &source);
            }
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::with_registers(
        program,
        args.register.iter().map(|o| (o.register, o.value)),
    );
    if args.trace {
        machine.start_trace();
    }
    match args.max_steps {
        Some(cap) => {
            if machine.run_steps(cap) == StepOutcome::Running {
                eprintln!("stopped after {cap} steps without halting");
            }
        }
        None => machine.run(),
    }
    if let Some(trace) = machine.end_trace() {
        for step in &trace.0 {
            eprintln!("{step}");
        }
    }
    if args.dump {
        eprintln!("{}", machine.program().iter().format("\n"));
    }
    println!("{}", machine.register(args.print));
    ExitCode::SUCCESS
}

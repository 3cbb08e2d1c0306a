// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Search for the smallest seed value that makes a signal-generator program
//! emit an alternating 0, 1, 0, 1, ... clock signal

use assembunny::asm::{parse_program, Register};
use assembunny::search::find_minimal_seed;
use clap::Parser;
use std::fs::read_to_string;
use std::path::PathBuf;
use std::process::ExitCode;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Assembunny clock-signal seed search", long_about = None)]
struct Args {
    #[arg(help = "The signal-generator source file")]
    source: PathBuf,
    #[arg(short, long, default_value = "a")]
    #[arg(help = "Register seeded with each candidate value")]
    register: Register,
    #[arg(short = 'n', long, default_value_t = 100)]
    #[arg(help = "Number of output values that must match the 0,1 pattern")]
    pattern_length: usize,
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

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(errs) => {
            for err in errs {
                eprintln!("parse error: {err}");
            }
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{}",
        find_minimal_seed(&program, args.register, args.pattern_length)
    );
    ExitCode::SUCCESS
}

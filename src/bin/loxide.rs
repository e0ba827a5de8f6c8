//! Lox interpreter command line.
//!
//! When called without argument it drops into an interactive
//! read-evaluate-print loop.  When called with a script path it interprets
//! the file and exits: 0 on success, 1 when the script fails at any
//! pipeline stage.  Anything else is an argv error, which clap reports
//! with exit code 2.

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;

use loxide::interpreter::Interpreter;

/// Tree-walking interpreter for the Lox scripting language.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Script to interpret; starts an interactive prompt when omitted.
    script: Option<PathBuf>,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    match args.script {
        Some(path) => run_file(&path),
        None => run_prompt().map_err(Into::into),
    }
}

fn run_file(path: &Path) -> Result<(), anyhow::Error> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    if let Err(e) = interp.eval(BufReader::new(file)) {
        eprintln!("{}", e);
        process::exit(1);
    }
    Ok(())
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        if let Err(e) = interp.eval(input.as_bytes()) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}

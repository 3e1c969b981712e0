//! CLI command implementations.
//!
//! Each command returns `Err(code)` with the process exit status after
//! printing its own `error:` line.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use tracing::info;
use triad_common::Program;
use triad_vm::{Io, LineSource, Lines};

/// Assemble, load, and execute a program.
pub fn run(source: &Path, input: Option<&Path>) -> Result<(), i32> {
    let program = load_program(source)?;

    let mut lines: Box<dyn LineSource> = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{}': {e}", path.display());
                1
            })?;
            Box::new(Lines::new(BufReader::new(file)))
        }
        None => Box::new(Lines::new(io::stdin().lock())),
    };
    let mut out = BufWriter::new(io::stdout().lock());
    let mut diag = io::stderr();

    info!(source = %source.display(), instructions = program.len(), "running");
    let result = triad_vm::run(&program, Io::new(lines.as_mut(), &mut out, &mut diag));
    drop(out);

    match result {
        Ok(0) => Ok(()),
        Ok(code) => Err(code),
        Err(e) => {
            eprintln!("error: {e}");
            Err(e.class().exit_code())
        }
    }
}

/// Assemble and load only.
pub fn check(source: &Path) -> Result<(), i32> {
    let program = load_program(source)?;
    println!(
        "OK: {} ({} instructions, {} labels)",
        source.display(),
        program.len(),
        program.labels.len()
    );
    Ok(())
}

/// Print the densely numbered listing.
pub fn listing(source: &Path) -> Result<(), i32> {
    let program = load_program(source)?;
    print!("{}", triad_assembler::listing(&program));
    Ok(())
}

// ---- Helpers ----

fn load_program(source: &Path) -> Result<Program, i32> {
    let text = fs::read_to_string(source).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", source.display());
        1
    })?;

    let nodes = triad_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        e.class().exit_code()
    })?;

    triad_loader::load(&nodes).map_err(|e| {
        eprintln!("error: {e}");
        e.class().exit_code()
    })
}

//! Demo command implementation.

use crate::commands::run::{run_script, RunOptions, RunSummary};
use crate::error::CliError;
use std::io::{self, Write};

/// The demonstration session: every legal and illegal transition once.
pub const DEMO_SCRIPT: &str = "\
# Unknown keys read as absent
GET A
# Writes outside a transaction are rejected
PUT A 5
BEGIN
PUT A 5
# Reads inside the transaction see its own writes
GET A
PUT A 6
COMMIT
GET A
# Nothing is open any more
COMMIT
ROLLBACK
GET B
BEGIN
PUT B 10
ROLLBACK
# Rolled back writes never land
GET B
";

/// Runs the demonstration session, echoing each command.
pub fn run() -> Result<RunSummary, CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = demo_to(&mut out)?;
    out.flush()?;
    Ok(summary)
}

fn demo_to<W: Write>(out: &mut W) -> Result<RunSummary, CliError> {
    let options = RunOptions {
        echo: true,
        dump: true,
        ..RunOptions::default()
    };
    run_script(DEMO_SCRIPT.as_bytes(), out, &options)
}

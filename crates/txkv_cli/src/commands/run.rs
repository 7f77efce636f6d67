//! Run command implementation.

use crate::error::CliError;
use crate::script::parse_line;
use crate::session::Session;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Output format for the final dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `key = value` lines.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

/// Options controlling script execution.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop at the first rejected operation.
    pub fail_fast: bool,
    /// Print the committed state when the script ends.
    pub dump: bool,
    /// Format of the dump.
    pub format: OutputFormat,
    /// Print each command before its result.
    pub echo: bool,
}

/// Counts gathered while running a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Commands executed (accepted or rejected).
    pub executed: usize,
    /// Commands the store rejected.
    pub rejected: usize,
}

/// Committed state as written by `--dump --format json`.
#[derive(Debug, Serialize)]
struct Dump<'a> {
    committed_seq: u64,
    entries: BTreeMap<&'a str, &'a str>,
    summary: &'a RunSummary,
}

/// Runs a script from a file, or from stdin when `path` is `None`.
pub fn run(path: Option<&Path>, options: &RunOptions) -> Result<RunSummary, CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = match path {
        Some(path) => {
            info!("Running script {:?}", path);
            let file = File::open(path)?;
            run_script(BufReader::new(file), &mut out, options)?
        }
        None => {
            let stdin = io::stdin();
            run_script(stdin.lock(), &mut out, options)?
        }
    };

    info!(
        executed = summary.executed,
        rejected = summary.rejected,
        "script finished"
    );
    Ok(summary)
}

/// Executes every command read from `input`, writing results to `out`.
pub fn run_script<R, W>(input: R, out: &mut W, options: &RunOptions) -> Result<RunSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut session = Session::new();
    let mut summary = RunSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| CliError::Read {
            line: line_no,
            source,
        })?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(source) => {
                return Err(CliError::Parse {
                    line: line_no,
                    source,
                })
            }
        };

        if options.echo {
            writeln!(out, "> {}", line.trim())?;
        }
        debug!(line = line_no, command = ?command, "executing");
        summary.executed += 1;

        match session.execute(&command) {
            Ok(result) => writeln!(out, "{result}")?,
            Err(source) => {
                summary.rejected += 1;
                warn!(line = line_no, error = %source, "operation rejected");
                if options.fail_fast {
                    return Err(CliError::Store {
                        line: line_no,
                        source,
                    });
                }
                writeln!(out, "(error) {source}")?;
            }
        }
    }

    if options.dump {
        write_dump(&session, &summary, out, options.format)?;
    }

    Ok(summary)
}

fn write_dump<W: Write>(
    session: &Session,
    summary: &RunSummary,
    out: &mut W,
    format: OutputFormat,
) -> Result<(), CliError> {
    let entries = session.committed();
    match format {
        OutputFormat::Text => {
            writeln!(
                out,
                "--- committed ({}) ---",
                session.store().committed_seq()
            )?;
            for (key, value) in &entries {
                writeln!(out, "{key} = {value}")?;
            }
        }
        OutputFormat::Json => {
            let dump = Dump {
                committed_seq: session.store().committed_seq().as_u64(),
                entries,
                summary,
            };
            serde_json::to_writer_pretty(&mut *out, &dump)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_str(script: &str, options: &RunOptions) -> (Result<RunSummary, CliError>, String) {
        let mut out = Vec::new();
        let result = run_script(Cursor::new(script), &mut out, options);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn runs_script_and_continues_past_rejections() {
        let script = "PUT A 5\nBEGIN\nPUT A 6\nCOMMIT\nCOMMIT\nGET A\n";
        let (result, output) = run_str(script, &RunOptions::default());

        let summary = result.unwrap();
        assert_eq!(summary.executed, 6);
        assert_eq!(summary.rejected, 2);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "(error) no transaction is currently active (cannot put)",
                "BEGIN txn:1",
                "OK",
                "COMMIT seq:1",
                "(error) no transaction is currently active (cannot commit)",
                "6",
            ]
        );
    }

    #[test]
    fn fail_fast_stops_with_line_number() {
        let script = "# comment\n\nBEGIN\nBEGIN\nPUT A 1\n";
        let options = RunOptions {
            fail_fast: true,
            ..RunOptions::default()
        };
        let (result, output) = run_str(script, &options);

        match result {
            Err(CliError::Store { line, source }) => {
                assert_eq!(line, 4);
                assert!(source.is_conflict());
            }
            other => panic!("expected store error, got {other:?}"),
        }
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn parse_errors_abort() {
        let (result, _) = run_str("BEGIN\nFROB x\n", &RunOptions::default());
        assert!(matches!(result, Err(CliError::Parse { line: 2, .. })));
    }

    #[test]
    fn unreadable_line_reports_line_number() {
        let input = Cursor::new(b"BEGIN\nPUT A \xff\xfe\n".to_vec());
        let mut out = Vec::new();
        let result = run_script(input, &mut out, &RunOptions::default());

        match result {
            Err(CliError::Read { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("expected read error, got {other:?}"),
        }
        assert_eq!(String::from_utf8(out).unwrap(), "BEGIN txn:1\n");
    }

    #[test]
    fn dumps_committed_state_as_text() {
        let options = RunOptions {
            dump: true,
            ..RunOptions::default()
        };
        let script = "BEGIN\nPUT b 2\nPUT a 1\nCOMMIT\nBEGIN\nPUT c 3\nROLLBACK\n";
        let (result, output) = run_str(script, &options);

        result.unwrap();
        let tail: Vec<_> = output.lines().rev().take(3).collect();
        assert_eq!(tail, vec!["b = 2", "a = 1", "--- committed (seq:1) ---"]);
    }

    #[test]
    fn dumps_committed_state_as_json() {
        let options = RunOptions {
            dump: true,
            format: OutputFormat::Json,
            ..RunOptions::default()
        };
        let script = "BEGIN\nPUT greeting hello world\nCOMMIT\n";
        let (result, output) = run_str(script, &options);
        result.unwrap();

        let json_start = output.find('{').unwrap();
        let value: serde_json::Value = serde_json::from_str(&output[json_start..]).unwrap();
        assert_eq!(value["committed_seq"], 1);
        assert_eq!(value["entries"]["greeting"], "hello world");
        assert_eq!(value["summary"]["executed"], 3);
    }

    #[test]
    fn echo_prefixes_commands() {
        let options = RunOptions {
            echo: true,
            ..RunOptions::default()
        };
        let (_, output) = run_str("get A\n", &options);
        assert_eq!(output, "> get A\n(nil)\n");
    }

    #[test]
    fn runs_script_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BEGIN").unwrap();
        writeln!(file, "PUT k v").unwrap();
        writeln!(file, "COMMIT").unwrap();
        file.flush().unwrap();

        let input = BufReader::new(File::open(file.path()).unwrap());
        let mut out = Vec::new();
        let summary = run_script(input, &mut out, &RunOptions::default()).unwrap();
        assert_eq!(summary.executed, 3);
        assert_eq!(summary.rejected, 0);
    }
}

//! Line-oriented command scripts.
//!
//! One command per line, verbs are case-insensitive:
//!
//! ```text
//! # comment
//! BEGIN
//! PUT <key> <value...>
//! GET <key>
//! COMMIT
//! ROLLBACK
//! STATS
//! ```
//!
//! The value of `PUT` is the rest of the line after the key, trimmed.

use std::str::FromStr;
use thiserror::Error;

/// A parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Open a transaction.
    Begin,
    /// Record a write.
    Put {
        /// Key.
        key: String,
        /// Value.
        value: String,
    },
    /// Read a key.
    Get {
        /// Key.
        key: String,
    },
    /// Commit the open transaction.
    Commit,
    /// Roll back the open transaction.
    Rollback,
    /// Print store statistics.
    Stats,
}

/// Errors produced while parsing a script line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line holds no command.
    #[error("empty command")]
    Empty,

    /// The verb is not recognised.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// The verb got the wrong number of arguments.
    #[error("`{command}` expects {expected}")]
    Arity {
        /// The verb.
        command: &'static str,
        /// Description of the expected arguments.
        expected: &'static str,
    },
}

impl FromStr for ScriptCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        if verb.is_empty() {
            return Err(ParseError::Empty);
        }

        let no_args = |command: &'static str, cmd: ScriptCommand| {
            if rest.is_empty() {
                Ok(cmd)
            } else {
                Err(ParseError::Arity {
                    command,
                    expected: "no arguments",
                })
            }
        };

        match verb.to_ascii_uppercase().as_str() {
            "BEGIN" => no_args("BEGIN", Self::Begin),
            "COMMIT" => no_args("COMMIT", Self::Commit),
            "ROLLBACK" => no_args("ROLLBACK", Self::Rollback),
            "STATS" => no_args("STATS", Self::Stats),
            "GET" => {
                if rest.is_empty() || rest.contains(char::is_whitespace) {
                    return Err(ParseError::Arity {
                        command: "GET",
                        expected: "exactly one key",
                    });
                }
                Ok(Self::Get {
                    key: rest.to_string(),
                })
            }
            "PUT" => match rest.split_once(char::is_whitespace) {
                Some((key, value)) if !value.trim().is_empty() => Ok(Self::Put {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                }),
                _ => Err(ParseError::Arity {
                    command: "PUT",
                    expected: "a key and a value",
                }),
            },
            _ => Err(ParseError::UnknownCommand(verb.to_string())),
        }
    }
}

/// Parses one script line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_verb() {
        assert_eq!("BEGIN".parse(), Ok(ScriptCommand::Begin));
        assert_eq!("commit".parse(), Ok(ScriptCommand::Commit));
        assert_eq!("Rollback".parse(), Ok(ScriptCommand::Rollback));
        assert_eq!("stats".parse(), Ok(ScriptCommand::Stats));
        assert_eq!(
            "GET A".parse(),
            Ok(ScriptCommand::Get {
                key: "A".to_string(),
            })
        );
    }

    #[test]
    fn put_value_is_rest_of_line() {
        assert_eq!(
            "put greeting   hello  world ".parse(),
            Ok(ScriptCommand::Put {
                key: "greeting".to_string(),
                value: "hello  world".to_string(),
            })
        );
    }

    #[test]
    fn rejects_bad_arity() {
        assert!(matches!(
            "PUT A".parse::<ScriptCommand>(),
            Err(ParseError::Arity { command: "PUT", .. })
        ));
        assert!(matches!(
            "GET".parse::<ScriptCommand>(),
            Err(ParseError::Arity { command: "GET", .. })
        ));
        assert!(matches!(
            "GET A B".parse::<ScriptCommand>(),
            Err(ParseError::Arity { command: "GET", .. })
        ));
        assert!(matches!(
            "BEGIN now".parse::<ScriptCommand>(),
            Err(ParseError::Arity { command: "BEGIN", .. })
        ));
    }

    #[test]
    fn rejects_unknown_verb() {
        assert_eq!(
            "DELETE A".parse::<ScriptCommand>(),
            Err(ParseError::UnknownCommand("DELETE".to_string()))
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# BEGIN"), Ok(None));
        assert_eq!(parse_line("  BEGIN  "), Ok(Some(ScriptCommand::Begin)));
    }
}

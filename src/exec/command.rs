// src/exec/command.rs

//! The command to supervise, parsed once from `--command`.

use std::fmt;

use crate::errors::{Result, WatchrunError};

/// Program plus argument vector.
///
/// Built by splitting the raw flag value on literal spaces. There is no
/// shell quoting, so an argument can never contain a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Parse `"cmd arg1 arg2"` into a spec.
    ///
    /// Runs of spaces do not produce empty arguments. A blank string is
    /// rejected with [`WatchrunError::MissingCommand`].
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(' ').filter(|s| !s.is_empty()).map(str::to_string);
        let program = parts.next().ok_or(WatchrunError::MissingCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_program_and_args_on_spaces() {
        let spec = CommandSpec::parse("echo hello").unwrap();
        assert_eq!(spec.program(), "echo");
        assert_eq!(spec.args(), ["hello".to_string()]);
        assert_eq!(spec.argv(), vec!["echo".to_string(), "hello".to_string()]);
    }

    #[test]
    fn quotes_are_not_interpreted() {
        let spec = CommandSpec::parse("sh -c 'echo hi'").unwrap();
        assert_eq!(spec.argv(), vec!["sh", "-c", "'echo", "hi'"]);
    }

    #[test]
    fn repeated_spaces_do_not_create_empty_args() {
        let spec = CommandSpec::parse("  go   run  . ").unwrap();
        assert_eq!(spec.argv(), vec!["go", "run", "."]);
        assert_eq!(spec.to_string(), "go run .");
    }

    #[test]
    fn tabs_are_part_of_an_argument() {
        let spec = CommandSpec::parse("a\tb c").unwrap();
        assert_eq!(spec.argv(), vec!["a\tb", "c"]);
    }

    #[test]
    fn blank_command_is_rejected() {
        for raw in ["", "   "] {
            match CommandSpec::parse(raw) {
                Err(WatchrunError::MissingCommand) => {}
                other => panic!("expected MissingCommand for {raw:?}, got {other:?}"),
            }
        }
    }
}

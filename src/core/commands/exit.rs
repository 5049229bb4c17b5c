use super::{Command, CommandError, Flow};
use crate::core::env::EnvVarManager;
use std::io::Write;

/// Ends the session. Arguments are ignored and the shell always exits with
/// success.
#[derive(Clone, Debug)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(
        &self,
        _args: &[&str],
        _env: &mut EnvVarManager,
        _out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}

use super::{Command, CommandError, Flow};
use crate::core::env::EnvVarManager;
use std::env;
use std::io::Write;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CdCommand;

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    /// `HOME` from the shell environment, falling back to the account's home
    /// directory when the variable is unset.
    fn home_dir(&self, env: &EnvVarManager) -> Result<PathBuf, CommandError> {
        match env.get_os("HOME") {
            Some(home) => Ok(PathBuf::from(home)),
            None => dirs::home_dir().ok_or(CommandError::HomeDirNotFound),
        }
    }
}

impl Command for CdCommand {
    fn execute(
        &self,
        args: &[&str],
        env: &mut EnvVarManager,
        _out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let target = match args.first() {
            Some(path) => PathBuf::from(*path),
            None => self.home_dir(env)?,
        };

        env::set_current_dir(&target).map_err(|source| CommandError::ChangeDir {
            path: target.display().to_string(),
            source,
        })?;

        log::debug!("cwd is now {}", target.display());
        Ok(Flow::Continue)
    }
}

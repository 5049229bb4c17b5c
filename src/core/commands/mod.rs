use std::collections::BTreeMap;
use std::io::{self, Write};

mod cd;
mod environ;
mod exit;

pub use cd::CdCommand;
pub use environ::{EnvironCommand, GetenvCommand, SetenvCommand, UnsetenvCommand};
pub use exit::ExitCommand;

use crate::core::config::ShellConfig;
use crate::core::env::{EnvError, EnvVarManager};
use crate::input::ArgVector;
use crate::process::{ChildStatus, ProcessError, ProcessExecutor};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cd: home directory not found")]
    HomeDirNotFound,
    #[error("{0}")]
    Env(#[from] EnvError),
    #[error("{0}")]
    Process(#[from] ProcessError),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// What the loop should do after a command has run.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait Command {
    fn execute(
        &self,
        args: &[&str],
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError>;
}

#[derive(Clone, Debug)]
enum CommandType {
    Exit(ExitCommand),
    Cd(CdCommand),
    Environ(EnvironCommand),
    Getenv(GetenvCommand),
    Setenv(SetenvCommand),
    Unsetenv(UnsetenvCommand),
}

impl Command for CommandType {
    fn execute(
        &self,
        args: &[&str],
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        match self {
            CommandType::Exit(cmd) => cmd.execute(args, env, out),
            CommandType::Cd(cmd) => cmd.execute(args, env, out),
            CommandType::Environ(cmd) => cmd.execute(args, env, out),
            CommandType::Getenv(cmd) => cmd.execute(args, env, out),
            CommandType::Setenv(cmd) => cmd.execute(args, env, out),
            CommandType::Unsetenv(cmd) => cmd.execute(args, env, out),
        }
    }
}

/// Classifies each argument vector as a built-in or an external program and
/// runs it.
#[derive(Clone, Debug)]
pub struct CommandExecutor {
    commands: BTreeMap<&'static str, CommandType>,
    process_executor: ProcessExecutor,
}

impl CommandExecutor {
    pub fn new(config: &ShellConfig) -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("environ", CommandType::Environ(EnvironCommand));
        commands.insert("getenv", CommandType::Getenv(GetenvCommand));
        commands.insert("setenv", CommandType::Setenv(SetenvCommand));
        commands.insert("unsetenv", CommandType::Unsetenv(UnsetenvCommand));

        Self {
            commands,
            process_executor: ProcessExecutor::new(config),
        }
    }

    /// Runs one command line. Failures are reported on `err` and never reach
    /// the caller; only `exit` changes the flow.
    pub fn execute(
        &self,
        argv: &ArgVector<'_>,
        env: &mut EnvVarManager,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Flow {
        match self.dispatch(argv, env, out) {
            Ok(flow) => flow,
            Err(e) => {
                let _ = out.flush();
                let _ = writeln!(err, "cash: {}", e);
                Flow::Continue
            }
        }
    }

    /// Like [`CommandExecutor::execute`] but hands failures back.
    pub fn dispatch(
        &self,
        argv: &ArgVector<'_>,
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let Some(name) = argv.command() else {
            return Ok(Flow::Continue);
        };

        if let Some(cmd) = self.commands.get(name) {
            log::trace!("builtin: {}", name);
            return cmd.execute(argv.args(), env, out);
        }

        log::trace!("external: {}", name);
        out.flush()?;
        let status: ChildStatus = self.process_executor.spawn(argv.as_slice(), env)?;
        if status.success() {
            log::trace!("{} {}", name, status);
        } else {
            log::debug!("{} {}", name, status);
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cwd_lock;
    use pretty_assertions::assert_eq;
    use std::env;
    use std::path::PathBuf;

    fn setup_test_env() -> (CommandExecutor, EnvVarManager) {
        let executor = CommandExecutor::new(&ShellConfig::default());
        (executor, EnvVarManager::new())
    }

    fn run(
        executor: &CommandExecutor,
        env: &mut EnvVarManager,
        line: &str,
    ) -> (Flow, String, String) {
        let argv = ArgVector::parse(line).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let flow = executor.execute(&argv, env, &mut out, &mut err);
        (
            flow,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_empty_line_is_noop() {
        let (executor, mut env) = setup_test_env();
        let before = env.len();
        let (flow, out, err) = run(&executor, &mut env, "   \n");
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty() && err.is_empty());
        assert_eq!(env.len(), before);
    }

    #[test]
    fn test_exit_returns_exit_flow() {
        let (executor, mut env) = setup_test_env();
        let (flow, _, _) = run(&executor, &mut env, "exit\n");
        assert_eq!(flow, Flow::Exit);

        let (flow, _, _) = run(&executor, &mut env, "exit 3\n");
        assert_eq!(flow, Flow::Exit);
    }

    #[test]
    fn test_env_session() {
        let (executor, mut env) = setup_test_env();

        let (_, out, _) = run(&executor, &mut env, "setenv CASH_DISPATCH_FOO bar");
        assert_eq!(out, "The variable has been created\n");
        let (_, out, _) = run(&executor, &mut env, "getenv CASH_DISPATCH_FOO");
        assert_eq!(out, "bar\n");

        let (_, out, _) = run(&executor, &mut env, "setenv CASH_DISPATCH_FOO baz");
        assert_eq!(out, "The variable has been overwritten\n");
        let (_, out, _) = run(&executor, &mut env, "getenv CASH_DISPATCH_FOO");
        assert_eq!(out, "baz\n");

        let (_, out, _) = run(&executor, &mut env, "environ");
        assert!(out.lines().any(|l| l == "CASH_DISPATCH_FOO=baz"));

        let (_, out, _) = run(&executor, &mut env, "unsetenv CASH_DISPATCH_FOO");
        assert_eq!(out, "The variable has been erased\n");
        let (flow, out, _) = run(&executor, &mut env, "getenv CASH_DISPATCH_FOO");
        assert_eq!(out, "The variable does not exist\n");
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn test_invalid_name_reported_on_err() {
        let (executor, mut env) = setup_test_env();
        let (flow, out, err) = run(&executor, &mut env, "setenv A=B value");
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert_eq!(err, "cash: invalid variable name: \"A=B\"\n");
        assert_eq!(env.get("A=B"), None);
    }

    #[test]
    fn test_execute_cd() {
        let _guard = cwd_lock();
        let original = env::current_dir().unwrap();
        let (executor, mut env) = setup_test_env();
        let temp_dir = env::temp_dir().canonicalize().unwrap();
        env.set("HOME", temp_dir.to_str().unwrap()).unwrap();

        let (_, _, err) = run(&executor, &mut env, "cd /");
        assert!(err.is_empty());
        assert_eq!(env::current_dir().unwrap(), PathBuf::from("/"));

        let (_, _, err) = run(&executor, &mut env, "cd");
        assert!(err.is_empty());
        assert_eq!(env::current_dir().unwrap(), temp_dir);

        let (flow, _, err) = run(&executor, &mut env, "cd /path/that/does/not/exist");
        assert_eq!(flow, Flow::Continue);
        assert!(err.starts_with("cash: cd: /path/that/does/not/exist: "));
        assert_eq!(env::current_dir().unwrap(), temp_dir);

        env::set_current_dir(original).unwrap();
    }

    #[test]
    fn test_external_command_returns_to_loop() {
        let (executor, mut env) = setup_test_env();
        let (flow, out, err) = run(&executor, &mut env, "true");
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty() && err.is_empty());

        let (flow, _, err) = run(&executor, &mut env, "cash-no-such-program --flag");
        assert_eq!(flow, Flow::Continue);
        assert!(err.is_empty());
    }

    #[test]
    fn test_dispatch_reports_errors() {
        let (executor, mut env) = setup_test_env();
        let argv = ArgVector::parse("cd /path/that/does/not/exist").unwrap();
        let result = executor.dispatch(&argv, &mut env, &mut Vec::new());
        assert!(matches!(result, Err(CommandError::ChangeDir { .. })));
    }

    #[test]
    fn test_builtin_command_detection() {
        let (executor, _) = setup_test_env();
        for cmd in ["exit", "cd", "environ", "getenv", "setenv", "unsetenv"] {
            assert!(executor.commands.contains_key(cmd));
        }
        assert!(!executor.commands.contains_key("echo"));
        assert!(!executor.commands.contains_key("export"));
        assert_eq!(executor.commands.len(), 6);
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::HomeDirNotFound,
            CommandError::ChangeDir {
                path: "/nope".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            },
            CommandError::Process(ProcessError::EmptyCommand),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}

use std::env;
use std::io::{self, BufRead, Write};

mod prompt;

pub use prompt::{hostname, Prompt, PromptError, FALLBACK_PROMPT};

use crate::{
    core::{
        commands::{CommandExecutor, Flow},
        config::ShellConfig,
        env::EnvVarManager,
    },
    error::ShellError,
    input::{ArgVector, LineReader},
};

/// Why [`Shell::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Exit,
    EndOfInput,
}

/// The read-eval loop. Owns the environment table for the whole session.
pub struct Shell<R, W> {
    pub(crate) reader: LineReader<R>,
    pub(crate) out: W,
    pub(crate) env: EnvVarManager,
    pub(crate) prompt: Prompt,
    pub(crate) config: ShellConfig,
    pub(crate) executor: CommandExecutor,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: ShellConfig, input: R, out: W, env: EnvVarManager) -> Self {
        Self {
            reader: LineReader::new(input),
            out,
            env,
            prompt: Prompt::new(config.color),
            executor: CommandExecutor::new(&config),
            config,
        }
    }

    /// Prompts, reads and runs lines until `exit` or end-of-input.
    ///
    /// Command failures are reported and the loop goes on. An error here means
    /// the shell cannot keep talking to its terminal or could not hold a line.
    pub fn run(&mut self) -> Result<ExitReason, ShellError> {
        self.register_as_shell();

        loop {
            self.show_prompt()?;

            let Some(line) = self.reader.read_line()? else {
                writeln!(self.out)?;
                self.out.flush()?;
                return Ok(ExitReason::EndOfInput);
            };

            let argv = ArgVector::parse(&line)?;
            let flow = self.executor.execute(
                &argv,
                &mut self.env,
                &mut self.out,
                &mut io::stderr(),
            );

            if flow == Flow::Exit {
                self.out.flush()?;
                return Ok(ExitReason::Exit);
            }
        }
    }

    pub fn env(&self) -> &EnvVarManager {
        &self.env
    }

    /// Points the self-registration variable at the startup directory.
    fn register_as_shell(&mut self) {
        let cwd = match env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                log::warn!("cannot register {}: {}", self.config.self_var, e);
                return;
            }
        };

        if let Err(e) = self
            .env
            .set(self.config.self_var, &cwd.to_string_lossy())
        {
            log::warn!("cannot register {}: {}", self.config.self_var, e);
        }
    }

    fn show_prompt(&mut self) -> io::Result<()> {
        match self.prompt.render(&self.env) {
            Ok(prompt) => write!(self.out, "{}", prompt)?,
            Err(e) => {
                eprintln!("cash: {}", e);
                write!(self.out, "{}", FALLBACK_PROMPT)?;
            }
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cwd_lock;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn run_shell(input: &str) -> (ExitReason, String, EnvVarManager, PathBuf) {
        let _guard = cwd_lock();
        let cwd = env::current_dir().unwrap();
        let env = EnvVarManager::from_vars([("LOGNAME", "tester"), ("PATH", "/usr/bin:/bin")])
            .unwrap();
        let mut shell = Shell::new(
            ShellConfig::default(),
            Cursor::new(input.to_string()),
            Vec::new(),
            env,
        );
        let reason = shell.run().unwrap();
        let env = shell.env().clone();
        (reason, String::from_utf8(shell.out).unwrap(), env, cwd)
    }

    #[test]
    fn test_end_of_input() {
        let (reason, out, _, _) = run_shell("");
        assert_eq!(reason, ExitReason::EndOfInput);
        assert!(out.starts_with("tester@"));
        assert!(out.ends_with("> \n"));
    }

    #[test]
    fn test_exit_stops_reading() {
        let (reason, out, env, _) = run_shell("setenv CASH_LOOP_VAR one\nexit\nsetenv CASH_LOOP_VAR two\n");
        assert_eq!(reason, ExitReason::Exit);
        assert_eq!(env.get("CASH_LOOP_VAR"), Some("one"));
        assert_eq!(out.matches("The variable has been").count(), 1);
        assert_eq!(out.matches("tester@").count(), 2);
    }

    #[test]
    fn test_one_prompt_per_line() {
        let (reason, out, _, _) = run_shell("\n\n   \n");
        assert_eq!(reason, ExitReason::EndOfInput);
        assert_eq!(out.matches("tester@").count(), 4);
    }

    #[test]
    fn test_registers_shell_variable() {
        let (_, out, env, cwd) = run_shell("getenv SHELL\n");
        assert_eq!(env.get("SHELL"), Some(&*cwd.to_string_lossy()));
        assert!(out.contains(&format!("{}\n", cwd.display())));
    }

    #[test]
    fn test_builtin_errors_do_not_stop_loop() {
        let (reason, out, _, _) = run_shell("setenv =bad x\ngetenv\nunsetenv NOPE\n");
        assert_eq!(reason, ExitReason::EndOfInput);
        assert!(out.contains("Not enough input arguments\n"));
        assert!(out.contains("The variable does not exist\n"));
    }
}

//! `environ`, `getenv`, `setenv` and `unsetenv`.
//!
//! Status lines go to standard output as regular command output; only invalid
//! names surface as errors.

use super::{Command, CommandError, Flow};
use crate::core::env::{EnvVarManager, SetOutcome, UnsetOutcome};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

const NOT_ENOUGH_ARGUMENTS: &str = "Not enough input arguments";
const DOES_NOT_EXIST: &str = "The variable does not exist";
const CREATED: &str = "The variable has been created";
const OVERWRITTEN: &str = "The variable has been overwritten";
const ERASED: &str = "The variable has been erased";

/// Prints every `NAME=value` pair, one per line, bytes as stored.
#[derive(Clone, Debug)]
pub struct EnvironCommand;

impl Command for EnvironCommand {
    fn execute(
        &self,
        _args: &[&str],
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        for (name, value) in env.iter() {
            out.write_all(name.as_bytes())?;
            out.write_all(b"=")?;
            out.write_all(value.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(Clone, Debug)]
pub struct GetenvCommand;

impl Command for GetenvCommand {
    fn execute(
        &self,
        args: &[&str],
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let Some(name) = args.first() else {
            writeln!(out, "{}", NOT_ENOUGH_ARGUMENTS)?;
            return Ok(Flow::Continue);
        };

        match env.get_os(name) {
            Some(value) => {
                out.write_all(value.as_bytes())?;
                out.write_all(b"\n")?;
            }
            None => writeln!(out, "{}", DOES_NOT_EXIST)?,
        }
        Ok(Flow::Continue)
    }
}

/// `setenv NAME [VALUE]`. A missing value stores the empty string.
#[derive(Clone, Debug)]
pub struct SetenvCommand;

impl Command for SetenvCommand {
    fn execute(
        &self,
        args: &[&str],
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let Some(name) = args.first() else {
            writeln!(out, "{}", NOT_ENOUGH_ARGUMENTS)?;
            return Ok(Flow::Continue);
        };
        let value = args.get(1).copied().unwrap_or("");

        match env.set(name, value)? {
            SetOutcome::Created => writeln!(out, "{}", CREATED)?,
            SetOutcome::Overwritten => writeln!(out, "{}", OVERWRITTEN)?,
        }
        Ok(Flow::Continue)
    }
}

#[derive(Clone, Debug)]
pub struct UnsetenvCommand;

impl Command for UnsetenvCommand {
    fn execute(
        &self,
        args: &[&str],
        env: &mut EnvVarManager,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        let Some(name) = args.first() else {
            writeln!(out, "{}", NOT_ENOUGH_ARGUMENTS)?;
            return Ok(Flow::Continue);
        };

        match env.unset(name) {
            UnsetOutcome::Erased => writeln!(out, "{}", ERASED)?,
            UnsetOutcome::Missing => writeln!(out, "{}", DOES_NOT_EXIST)?,
        }
        Ok(Flow::Continue)
    }
}

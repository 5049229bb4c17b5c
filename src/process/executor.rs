use std::ffi::{CString, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use libc::{c_char, c_int};

use super::{ChildStatus, ProcessError};
use crate::core::config::ShellConfig;
use crate::core::env::EnvVarManager;

const EXIT_NOT_FOUND: c_int = 127;
const EXIT_CANNOT_EXECUTE: c_int = 126;

/// Runs external programs in a forked child and waits for them.
#[derive(Clone, Debug)]
pub struct ProcessExecutor {
    default_path: Box<OsStr>,
}

/// Everything the child needs. Built before `fork` so the child never allocates.
struct ExecPlan {
    candidates: Vec<CString>,
    argv: Vec<CString>,
    envp: Vec<CString>,
    not_found: Vec<u8>,
    denied: Vec<u8>,
    cannot_execute: Vec<u8>,
}

impl ProcessExecutor {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            default_path: OsStr::new(config.default_path).into(),
        }
    }

    /// Forks, execs `args[0]` with `args` as its argument vector and `env` as
    /// its environment, then blocks until the child exits or stops.
    ///
    /// A program that cannot be loaded is not an error here: the child reports
    /// it and exits with 127 (not found) or 126 (not executable).
    ///
    /// `std::process::Command` is not used because it reports a failed exec to
    /// the parent as a spawn error and never leaves a child behind, while here
    /// the child itself must report and pick the 127/126 status.
    ///
    /// Callers flush their own buffered output first; the child inherits the
    /// descriptors as they are.
    pub fn spawn(&self, args: &[&str], env: &EnvVarManager) -> Result<ChildStatus, ProcessError> {
        let plan = self.plan(args, env)?;
        let argv = null_terminated(&plan.argv);
        let envp = null_terminated(&plan.envp);

        // SAFETY: the child branch only calls execve, write and _exit on memory
        // that was fully prepared before the fork.
        let pid = unsafe { libc::fork() };
        match pid {
            -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
            0 => unsafe { exec_child(&plan, &argv, &envp) },
            pid => {
                log::debug!("spawned {} as pid {}", args[0], pid);
                let status = wait_for(pid)?;
                log::debug!("pid {} {}", pid, status);
                Ok(status)
            }
        }
    }

    fn plan(&self, args: &[&str], env: &EnvVarManager) -> Result<ExecPlan, ProcessError> {
        let command = *args.first().ok_or(ProcessError::EmptyCommand)?;

        let argv = args
            .iter()
            .map(|arg| to_cstring(arg.as_bytes(), command))
            .collect::<Result<Vec<_>, _>>()?;

        let envp = env
            .iter()
            .map(|(name, value)| {
                let mut entry = Vec::with_capacity(name.len() + value.len() + 1);
                entry.extend_from_slice(name.as_bytes());
                entry.push(b'=');
                entry.extend_from_slice(value.as_bytes());
                to_cstring(&entry, command)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let search_path = env.get_os("PATH").unwrap_or(&*self.default_path);
        let candidates = resolve_candidates(command, search_path)
            .iter()
            .map(|path| to_cstring(path.as_os_str().as_bytes(), command))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExecPlan {
            candidates,
            argv,
            envp,
            not_found: format!("cash: {}: command not found\n", command).into_bytes(),
            denied: format!("cash: {}: permission denied\n", command).into_bytes(),
            cannot_execute: format!("cash: {}: cannot execute\n", command).into_bytes(),
        })
    }
}

/// Paths to try for `command`, in order. Names containing a slash are used
/// as-is; anything else is looked up in each `PATH` entry.
pub(crate) fn resolve_candidates(command: &str, search_path: &OsStr) -> Vec<PathBuf> {
    if command.contains('/') {
        return vec![PathBuf::from(command)];
    }

    search_path
        .as_bytes()
        .split(|b| *b == b':')
        .map(|dir| Path::new(OsStr::from_bytes(dir)).join(command))
        .collect()
}

fn to_cstring(bytes: &[u8], command: &str) -> Result<CString, ProcessError> {
    CString::new(bytes).map_err(|_| ProcessError::InvalidArgument(command.to_string()))
}

fn null_terminated(strings: &[CString]) -> Vec<*const c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr())
        .chain(std::iter::once(std::ptr::null()))
        .collect()
}

/// Child side of `spawn`. Never returns.
///
/// Must only run in a freshly forked child: it restricts itself to execve,
/// write and _exit.
unsafe fn exec_child(plan: &ExecPlan, argv: &[*const c_char], envp: &[*const c_char]) -> ! {
    let mut denied = false;
    let mut message = &plan.not_found;
    let mut code = EXIT_NOT_FOUND;

    for candidate in &plan.candidates {
        libc::execve(candidate.as_ptr(), argv.as_ptr(), envp.as_ptr());

        match io::Error::last_os_error().raw_os_error() {
            Some(libc::ENOENT) | Some(libc::ENOTDIR) => {}
            Some(libc::EACCES) => denied = true,
            _ => {
                message = &plan.cannot_execute;
                code = EXIT_CANNOT_EXECUTE;
                break;
            }
        }
    }

    if denied && code == EXIT_NOT_FOUND {
        message = &plan.denied;
        code = EXIT_CANNOT_EXECUTE;
    }

    let _ = libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
    libc::_exit(code)
}

fn wait_for(pid: libc::pid_t) -> Result<ChildStatus, ProcessError> {
    let mut status: c_int = 0;
    loop {
        // SAFETY: `pid` is our own child and `status` is a valid out-pointer.
        let ret = unsafe { libc::waitpid(pid, &mut status, libc::WUNTRACED) };
        if ret == pid {
            return Ok(ChildStatus::from_raw(status));
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(ProcessError::Wait(err));
        }
    }
}

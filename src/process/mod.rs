use std::fmt;
use std::io;

pub mod executor;

pub use executor::ProcessExecutor;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("no command given")]
    EmptyCommand,
    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),
    #[error("fork failed: {0}")]
    Fork(#[source] io::Error),
    #[error("waitpid failed: {0}")]
    Wait(#[source] io::Error),
}

/// How a waited-on child changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
}

impl ChildStatus {
    pub(crate) fn from_raw(status: libc::c_int) -> Self {
        if libc::WIFEXITED(status) {
            ChildStatus::Exited(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            ChildStatus::Signaled(libc::WTERMSIG(status))
        } else {
            ChildStatus::Stopped(libc::WSTOPSIG(status))
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ChildStatus::Exited(0))
    }
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildStatus::Exited(code) => write!(f, "exited with status {}", code),
            ChildStatus::Signaled(sig) => write!(f, "killed by signal {}", sig),
            ChildStatus::Stopped(sig) => write!(f, "stopped by signal {}", sig),
        }
    }
}

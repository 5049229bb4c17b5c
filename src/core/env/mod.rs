mod vars;

pub use vars::{EnvVarManager, SetOutcome, UnsetOutcome};

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("invalid variable name: {0:?}")]
    InvalidName(String),
    #[error("invalid value for {0}: contains a NUL byte")]
    InvalidValue(String),
}

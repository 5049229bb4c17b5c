use crate::input::TokenizerError;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Tokenizer(#[from] TokenizerError),
}

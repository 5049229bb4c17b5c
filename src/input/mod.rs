mod reader;
pub mod tokenizer;

pub use reader::LineReader;
pub use tokenizer::{ArgVector, TokenizerError, INITIAL_CAPACITY};

use std::collections::TryReserveError;

/// Number of token slots reserved before the first growth.
pub const INITIAL_CAPACITY: usize = 64;

const SEPARATORS: [char; 2] = [' ', '\n'];

#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    #[error("could not allocate memory for {requested} arguments")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Whitespace-split view of one input line. Index 0 is the command name.
///
/// Tokens borrow from the line they were parsed from, so the vector can never
/// outlive the buffer it points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector<'line> {
    tokens: Vec<&'line str>,
}

impl<'line> ArgVector<'line> {
    pub fn parse(line: &'line str) -> Result<Self, TokenizerError> {
        Self::parse_with_capacity(line, INITIAL_CAPACITY)
    }

    /// Splits `line` starting from `capacity` slots, doubling before any push
    /// that would not fit.
    pub fn parse_with_capacity(line: &'line str, capacity: usize) -> Result<Self, TokenizerError> {
        let mut tokens: Vec<&'line str> = Vec::new();
        reserve(&mut tokens, capacity.max(1))?;

        for token in line.split(SEPARATORS).filter(|t| !t.is_empty()) {
            if tokens.len() == tokens.capacity() {
                let additional = tokens.capacity();
                reserve(&mut tokens, additional)?;
            }
            tokens.push(token);
        }

        Ok(Self { tokens })
    }

    /// The command name, or `None` for a blank line.
    pub fn command(&self) -> Option<&'line str> {
        self.tokens.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'line str] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[&'line str] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }
}

fn reserve(tokens: &mut Vec<&str>, additional: usize) -> Result<(), TokenizerError> {
    tokens
        .try_reserve_exact(additional)
        .map_err(|source| TokenizerError::Allocation {
            requested: tokens.len().saturating_add(additional),
            source,
        })
}

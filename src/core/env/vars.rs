use super::EnvError;
use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Created,
    Overwritten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetOutcome {
    Erased,
    Missing,
}

/// The shell's environment table.
///
/// Owned by the read-eval loop and handed out by reference; programs launched
/// by the shell receive exactly this table as their environment.
///
/// Entries are kept as raw OS strings so inherited variables that are not
/// valid UTF-8 still reach child programs byte for byte.
#[derive(Clone, Debug, Default)]
pub struct EnvVarManager {
    vars: BTreeMap<Box<OsStr>, Box<OsStr>>,
}

impl EnvVarManager {
    /// Adopts the inherited process environment.
    pub fn new() -> Self {
        Self::from_vars_os(env::vars_os())
    }

    pub(crate) fn from_vars_os<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut manager = Self::default();
        for (key, value) in vars {
            if key.is_empty() || key.as_bytes().contains(&b'=') {
                log::warn!("skipping inherited variable {:?}", key);
                continue;
            }
            manager
                .vars
                .insert(key.into_boxed_os_str(), value.into_boxed_os_str());
        }
        manager
    }

    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, EnvError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut manager = Self::default();
        for (key, value) in vars {
            manager.set(key.as_ref(), value.as_ref())?;
        }
        Ok(manager)
    }

    /// The value of `name`, if it is set and valid UTF-8.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_os(name).and_then(OsStr::to_str)
    }

    pub fn get_os(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(name)).map(|s| s.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(OsStr::new(name))
    }

    /// Sets `name`, reporting whether it already existed before the write.
    pub fn set(&mut self, name: &str, value: &str) -> Result<SetOutcome, EnvError> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return Err(EnvError::InvalidName(name.to_string()));
        }
        if value.contains('\0') {
            return Err(EnvError::InvalidValue(name.to_string()));
        }

        let outcome = if self.contains(name) {
            SetOutcome::Overwritten
        } else {
            SetOutcome::Created
        };

        self.vars
            .insert(OsStr::new(name).into(), OsStr::new(value).into());
        Ok(outcome)
    }

    pub fn unset(&mut self, name: &str) -> UnsetOutcome {
        match self.vars.remove(OsStr::new(name)) {
            Some(_) => UnsetOutcome::Erased,
            None => UnsetOutcome::Missing,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

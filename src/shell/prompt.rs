use std::ffi::CStr;
use std::io;

use inksac::prelude::*;

use crate::core::env::EnvVarManager;

/// Printed instead of the full prompt when a lookup fails.
pub const FALLBACK_PROMPT: &str = "> ";

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("hostname: {0}")]
    Hostname(#[source] io::Error),
    #[error("getcwd: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Renders `user@host:cwd> `, identity in green and location in blue.
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    color: bool,
}

impl Prompt {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn render(&self, env: &EnvVarManager) -> Result<String, PromptError> {
        let user = env.get("LOGNAME").unwrap_or_default();
        let host = hostname().map_err(PromptError::Hostname)?;
        let cwd = std::env::current_dir().map_err(PromptError::CurrentDir)?;
        Ok(self.format(user, &host, &cwd.display().to_string()))
    }

    pub fn format(&self, user: &str, host: &str, cwd: &str) -> String {
        let identity = format!("{}@{}", user, host);
        let location = format!("{}> ", cwd);

        if !self.color {
            return format!("{}:{}", identity, location);
        }

        let identity_style = Style::builder()
            .foreground(Color::Green)
            .bold()
            .build();
        let location_style = Style::builder()
            .foreground(Color::Blue)
            .bold()
            .build();

        format!(
            "{}:{}",
            identity.style(identity_style),
            location.style(location_style)
        )
    }
}

pub fn hostname() -> io::Result<String> {
    let mut buf = [0u8; 256];
    // SAFETY: `buf` is writable for `buf.len()` bytes.
    let ret = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }

    let name = CStr::from_bytes_until_nul(&buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cwd_lock;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_format() {
        let prompt = Prompt::new(false);
        assert_eq!(prompt.format("tester", "box", "/tmp"), "tester@box:/tmp> ");
    }

    #[test]
    fn test_colored_format_keeps_text() {
        let rendered = Prompt::new(true).format("tester", "box", "/tmp");
        assert!(rendered.contains("tester@box"));
        assert!(rendered.contains("/tmp> "));
    }

    #[test]
    fn test_render_uses_environment() {
        let _guard = cwd_lock();
        let env = EnvVarManager::from_vars([("LOGNAME", "tester")]).unwrap();
        let cwd = std::env::current_dir().unwrap();

        let rendered = Prompt::new(false).render(&env).unwrap();
        assert!(rendered.starts_with("tester@"));
        assert!(rendered.ends_with(&format!(":{}> ", cwd.display())));
    }

    #[test]
    fn test_render_without_logname() {
        let _guard = cwd_lock();
        let rendered = Prompt::new(false).render(&EnvVarManager::default()).unwrap();
        assert!(rendered.starts_with('@'));
    }

    #[test]
    fn test_hostname_not_empty() {
        assert!(!hostname().unwrap().is_empty());
    }
}

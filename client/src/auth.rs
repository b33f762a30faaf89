use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Read side of the credential store. Consulted once per request; `None`
/// sends the request unauthenticated.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Always unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl TokenProvider for NoAuth {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token handed in at construction, typically flag- or
/// environment-sourced.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Bearer token persisted as a single line on disk.
///
/// Reading never fails: a missing, unreadable, or empty file simply means
/// no credential. Writes go through [`TokenFile::save`] and surface their
/// errors, since losing a credential silently would be worse.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional location inside a dossier home directory.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join("token"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the token, creating parent directories as needed.
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{token}\n"))
    }

    /// Removes the stored token. A file that is already gone is fine.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

impl TokenProvider for TokenFile {
    fn bearer_token(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

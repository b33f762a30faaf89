use crate::error::ClientError;
use std::io;
use std::path::PathBuf;
use url::Url;

pub const DOSSIER_HOME_ENV_VAR: &str = "DOSSIER_HOME";

/// Connection settings for one archive backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
}

impl ClientConfig {
    /// Parses and normalizes the API root. A trailing slash is enforced so
    /// endpoint paths append to the root instead of replacing its final
    /// segment when joined.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves one endpoint path against the API root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}

/// Returns the directory holding per-user dossier state, currently just the
/// stored bearer token. `$DOSSIER_HOME` overrides the default `~/.dossier`.
pub fn find_dossier_home() -> io::Result<PathBuf> {
    if let Ok(home) = std::env::var(DOSSIER_HOME_ENV_VAR)
        && !home.trim().is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    let mut home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
    })?;
    home.push(".dossier");
    Ok(home)
}

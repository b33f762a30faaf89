//! Typed client for the case-file archive backend.
//!
//! REST endpoints share one envelope-unwrapping gateway; the streaming
//! import path bypasses the envelope (progress arrives as raw event frames)
//! but shares the same credential provider and error taxonomy, so failures
//! from either path present identically.

mod auth;
mod config;
mod endpoints;
mod error;
mod gateway;
mod import;
mod notify;

pub use dossier_protocol as protocol;

pub use auth::NoAuth;
pub use auth::StaticToken;
pub use auth::TokenFile;
pub use auth::TokenProvider;
pub use config::ClientConfig;
pub use config::DOSSIER_HOME_ENV_VAR;
pub use config::find_dossier_home;
pub use endpoints::SearchResults;
pub use error::ClientError;
pub use gateway::Client;
pub use import::ImportFile;
pub use import::ImportOptions;
pub use notify::Notifier;
pub use notify::StderrNotifier;

//! Persisted admin credential table.
//!
//! The table lives in a single file holding base64-encoded JSON. Passwords
//! are stored as bcrypt hashes and never kept in plain text.

use base64::Engine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AdminConfig;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("credential file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("admin password must be at most {MAX_PASSWORD_BYTES} bytes with no NUL characters")]
    UnsupportedPassword,
}

/// bcrypt only hashes this many bytes, so anything past it would be ignored
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Passwords bcrypt can tell apart exactly. Longer ones collide on their
/// first 72 bytes, and a NUL collides with the terminator bcrypt appends.
fn hashable(password: &str) -> bool {
    password.len() <= MAX_PASSWORD_BYTES && !password.contains('\0')
}

/// One row of the credential table
#[derive(Clone, Serialize, Deserialize)]
struct StoredAdmin {
    id: Uuid,
    username: String,
    password_hash: String,
    display_name: String,
}

/// An admin whose credentials checked out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

pub struct CredentialStore {
    admins: RwLock<Vec<StoredAdmin>>,
}

impl CredentialStore {
    /// A store nobody can log into
    pub fn empty() -> Self {
        Self {
            admins: RwLock::new(Vec::new()),
        }
    }

    /// Seed the table if the file does not exist yet, then load it.
    pub fn open_or_seed(
        path: &Path,
        seed: &AdminConfig,
    ) -> Result<(Self, SeedOutcome), CredentialError> {
        let outcome = seed_file(path, seed)?;
        let admins = read_file(path)?;
        Ok((
            Self {
                admins: RwLock::new(admins),
            },
            outcome,
        ))
    }

    /// Startup entry point. A table that cannot be opened or seeded is logged
    /// and replaced by an empty store, so the service still starts but every
    /// login fails until the file is repaired.
    pub fn open_or_disable(config: &AdminConfig) -> Self {
        let path = &config.credentials_file;
        match Self::open_or_seed(path, config) {
            Ok((store, SeedOutcome::Created)) => {
                tracing::info!(path = %path.display(), username = %config.username, "seeded admin credentials");
                store
            }
            Ok((store, SeedOutcome::AlreadyPresent)) => {
                if store.is_empty() {
                    tracing::warn!(path = %path.display(), "credential table has no admins, logins will fail");
                }
                store
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "could not open or seed admin credentials, logins will fail until the file is fixed"
                );
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.admins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.read().is_empty()
    }

    /// Exact username match plus a password that verifies against the stored hash
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Admin>, CredentialError> {
        if !hashable(password) {
            return Ok(None);
        }

        let candidate = self
            .admins
            .read()
            .iter()
            .find(|a| a.username == username)
            .cloned();

        let Some(stored) = candidate else {
            return Ok(None);
        };

        if bcrypt::verify(password, &stored.password_hash)? {
            Ok(Some(Admin {
                id: stored.id,
                username: stored.username,
                display_name: stored.display_name,
            }))
        } else {
            Ok(None)
        }
    }
}

/// Create the credential file with the configured admin. `create_new` makes
/// the existence check and the creation one step, so an existing table is
/// never overwritten.
fn seed_file(path: &Path, seed: &AdminConfig) -> Result<SeedOutcome, CredentialError> {
    if path.exists() {
        return Ok(SeedOutcome::AlreadyPresent);
    }
    if !hashable(&seed.password) {
        return Err(CredentialError::UnsupportedPassword);
    }

    let record = StoredAdmin {
        id: Uuid::new_v4(),
        username: seed.username.clone(),
        password_hash: bcrypt::hash(&seed.password, seed.bcrypt_cost)?,
        display_name: seed.display_name.clone(),
    };
    let encoded = encode(&[record])?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(SeedOutcome::AlreadyPresent),
        Err(e) => return Err(e.into()),
    };

    let written = file
        .write_all(encoded.as_bytes())
        .and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }

    Ok(SeedOutcome::Created)
}

fn encode(admins: &[StoredAdmin]) -> Result<String, CredentialError> {
    let json = serde_json::to_string(admins)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(json.as_bytes()))
}

fn read_file(path: &Path) -> Result<Vec<StoredAdmin>, CredentialError> {
    let data = fs::read_to_string(path)?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
    Ok(serde_json::from_slice(&decoded)?)
}

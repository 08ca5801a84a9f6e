// Copyright 2020 - developers of the `grammers` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Persistence for the credentials a session runtime needs to resume
//! without repeating the authorization-key handshake.
//!
//! The contract is intentionally narrow: a store only knows how to
//! [`get`](SessionStore::get) and [`set`](SessionStore::set) a
//! [`Credentials`] value. What a session does with those credentials, and
//! when it calls back into the store, is the session runtime's concern.
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Everything a session needs to resume an encrypted connection without
/// generating a new authorization key.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct Credentials {
    /// The 2048-bit authorization key shared with the server.
    pub auth_key: [u8; 256],

    /// The lower 64 bits of `SHA1(auth_key)`, sent with every encrypted
    /// message so the server can look up the key without re-deriving it.
    pub auth_key_hash: [u8; 8],

    /// The salt currently used to sign outgoing messages.
    pub server_salt: i64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_key", &"<256 bytes>")
            .field("auth_key_hash", &self.auth_key_hash)
            .field("server_salt", &self.server_salt)
            .finish()
    }
}

/// A place to persist and recall [`Credentials`] across connections.
///
/// Implementations must be safe to call from the reader task of a running
/// session: the runtime calls [`set`](SessionStore::set) serially, so no
/// internal synchronization beyond interior mutability is required.
pub trait SessionStore: Send + Sync {
    /// Returns the previously stored credentials, if any.
    fn get(&self) -> Option<Credentials>;

    /// Persists `credentials`, replacing whatever was stored before.
    fn set(&self, credentials: Credentials);
}

/// A [`SessionStore`] that keeps credentials in memory only. This is the
/// default store used when a [`Configuration`](tlcore_session) does not
/// point at a persistent one: every new connection re-runs the handshake.
#[derive(Default)]
pub struct NoopStore;

impl SessionStore for NoopStore {
    fn get(&self) -> Option<Credentials> {
        None
    }

    fn set(&self, _credentials: Credentials) {}
}

/// Errors that can occur while reading or writing a [`JsonFileStore`].
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "session store IO error: {e}"),
            Self::Json(e) => write!(f, "session store format error: {e}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

/// A [`SessionStore`] backed by a single JSON file on disk, holding a
/// `{"auth_key": [...], "auth_key_hash": [...], "server_salt": ...}`
/// object.
///
/// Credentials are cached in memory and written to disk on every
/// [`set`](SessionStore::set); reads never touch the filesystem.
pub struct JsonFileStore {
    path: PathBuf,
    cached: Mutex<Option<Credentials>>,
}

impl JsonFileStore {
    /// Opens `path`, loading any existing credentials from it. The file
    /// does not need to exist yet; it is created on the first
    /// [`set`](SessionStore::set).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let cached = match fs::read(&path) {
            Ok(bytes) => Some(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            cached: Mutex::new(cached),
        })
    }
}

impl SessionStore for JsonFileStore {
    fn get(&self) -> Option<Credentials> {
        self.cached.lock().unwrap().clone()
    }

    fn set(&self, credentials: Credentials) {
        let bytes =
            serde_json::to_vec_pretty(&credentials).expect("Credentials always serializes");
        if let Err(e) = fs::write(&self.path, &bytes) {
            log::warn!("failed to persist session credentials to {:?}: {e}", self.path);
            return;
        }
        *self.cached.lock().unwrap() = Some(credentials);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Credentials {
        Credentials {
            auth_key: [7; 256],
            auth_key_hash: [1, 2, 3, 4, 5, 6, 7, 8],
            server_salt: 123456789,
        }
    }

    #[test]
    fn noop_store_never_recalls_anything() {
        let store = NoopStore;
        store.set(sample());
        assert!(store.get().is_none());
    }

    #[test]
    fn json_file_store_round_trips_credentials() {
        let dir = std::env::temp_dir().join(format!(
            "tlcore-store-test-{:?}",
            std::thread::current().id()
        ));
        let path = dir.with_extension("json");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get().is_none());

        store.set(sample());
        assert_eq!(store.get().unwrap().server_salt, 123456789);

        // A fresh handle should recover the same credentials from disk.
        let reopened = JsonFileStore::open(&path).unwrap();
        let recovered = reopened.get().unwrap();
        assert_eq!(recovered.server_salt, 123456789);
        assert_eq!(recovered.auth_key_hash, [1, 2, 3, 4, 5, 6, 7, 8]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn json_file_store_missing_file_starts_empty() {
        let path = std::env::temp_dir().join("tlcore-store-nonexistent.json");
        let _ = fs::remove_file(&path);
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get().is_none());
    }
}

//! Storage for push tokens
//!
//! Tokens are stored in a single JSON object keyed by email:
//! `{ "a@b.com": ["token-1", "token-2"] }`.
//!
//! Every operation reads the file fresh and every change rewrites it whole.
//! Read-modify-write cycles on one host are serialized through an exclusive
//! lock on a sidecar `.lock` file; without it the store is last-writer-wins.

use crate::error::RelayError;
use crate::file_storage::{read_json, write_json};
use fs2::FileExt;
use std::collections::{BTreeMap, HashSet};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// In-memory form of the token file
pub type TokenMap = BTreeMap<String, Vec<String>>;

/// Whether `add_token` changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStatus {
    AlreadyPresent,
    Added,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    pub status: AddStatus,
    /// False when a real change could not be written
    pub committed: bool,
}

/// Whether `remove_token` changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStatus {
    NotFound,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub status: RemoveStatus,
    /// False when a real change could not be written
    pub committed: bool,
}

/// File-backed registry of push tokens per user
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tokens.json".into());
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Take the cross-thread/cross-process write lock.
    ///
    /// Returns `None` (and logs) when the lock file cannot be opened, in which
    /// case the caller proceeds unlocked.
    fn lock(&self) -> Option<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Failed to create token store directory {:?}: {}", parent, e);
                }
            }
        }

        let file = match OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
        {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Token store lock unavailable, continuing unlocked: {}", e);
                return None;
            }
        };

        if let Err(e) = file.lock_exclusive() {
            log::warn!("Failed to lock token store, continuing unlocked: {}", e);
            return None;
        }
        Some(file)
    }

    fn try_load(&self) -> Result<TokenMap, RelayError> {
        if !self.path.exists() {
            return Ok(TokenMap::new());
        }
        let mut map: TokenMap = read_json(&self.path).map_err(RelayError::StorageRead)?;
        map.retain(|_, tokens| !tokens.is_empty());
        Ok(map)
    }

    /// Load the whole store.
    ///
    /// A missing file is an empty store. A corrupt file is logged and also
    /// treated as empty; the next save overwrites it.
    pub fn load(&self) -> TokenMap {
        match self.try_load() {
            Ok(map) => map,
            Err(e) => {
                log::error!("{}; continuing with an empty store", e);
                TokenMap::new()
            }
        }
    }

    /// Overwrite the whole store. Returns false if the write failed.
    pub fn save(&self, map: &TokenMap) -> bool {
        match write_json(&self.path, map) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{}", RelayError::StorageWrite(e));
                false
            }
        }
    }

    /// Register a token for a user, keeping insertion order and no duplicates
    pub fn add_token(&self, user: &str, token: &str) -> AddOutcome {
        let _guard = self.lock();
        let mut map = self.load();

        let tokens = map.entry(user.to_string()).or_default();
        if tokens.iter().any(|t| t == token) {
            return AddOutcome {
                status: AddStatus::AlreadyPresent,
                committed: true,
            };
        }
        tokens.push(token.to_string());

        let committed = self.save(&map);
        if committed {
            log::info!("Registered push token for {} (total: {})", user, map[user].len());
        }
        AddOutcome {
            status: AddStatus::Added,
            committed,
        }
    }

    /// Remove a token from a user, dropping the user once no tokens remain
    pub fn remove_token(&self, user: &str, token: &str) -> RemoveOutcome {
        let _guard = self.lock();
        let mut map = self.load();

        let removed = remove_from(&mut map, user, |t| t == token) > 0;
        if !removed {
            return RemoveOutcome {
                status: RemoveStatus::NotFound,
                committed: true,
            };
        }

        let committed = self.save(&map);
        if committed {
            log::info!("Removed push token for {}", user);
        }
        RemoveOutcome {
            status: RemoveStatus::Removed,
            committed,
        }
    }

    /// Tokens registered for a user, in registration order
    pub fn list_tokens(&self, user: &str) -> Vec<String> {
        self.load().remove(user).unwrap_or_default()
    }

    /// Drop tokens the provider reported as invalid.
    ///
    /// Re-reads the store so tokens registered since the send are kept.
    /// Returns how many tokens were actually removed; zero when a concurrent
    /// change already dropped them or the write failed. Failures are logged
    /// only.
    pub fn prune_tokens(&self, user: &str, invalid: &HashSet<String>) -> usize {
        if invalid.is_empty() {
            return 0;
        }

        let _guard = self.lock();
        let mut map = self.load();

        let pruned = remove_from(&mut map, user, |t| invalid.contains(t));
        if pruned == 0 {
            log::debug!("No stale tokens left to prune for {}", user);
            return 0;
        }

        if self.save(&map) {
            log::info!("Pruned {} invalid push token(s) for {}", pruned, user);
            pruned
        } else {
            log::warn!("Could not persist pruning of {} token(s) for {}", pruned, user);
            0
        }
    }
}

/// Remove matching tokens for `user`, deleting the key if it empties.
/// Returns how many tokens were removed.
fn remove_from<F>(map: &mut TokenMap, user: &str, matches: F) -> usize
where
    F: Fn(&str) -> bool,
{
    let Some(tokens) = map.get_mut(user) else {
        return 0;
    };

    let before = tokens.len();
    tokens.retain(|t| !matches(t));
    let removed = before - tokens.len();

    if tokens.is_empty() {
        map.remove(user);
    }
    removed
}

//! User service - the in-memory user store

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

use super::snapshot::{
    materialize, read_snapshot, render_snapshot, write_snapshot, ExportOutcome, ImportReport,
};

/// Users keyed by id, remembering insertion order
#[derive(Debug, Default)]
struct UserStore {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
}

impl UserStore {
    fn contains(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Insert or replace; a replaced user keeps its position
    fn upsert(&mut self, user: User) -> bool {
        let id = user.id();
        let replaced = self.users.insert(id, user).is_some();
        if !replaced {
            self.order.push(id);
        }
        replaced
    }

    fn remove(&mut self, id: UserId) -> Option<User> {
        let removed = self.users.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(removed)
    }

    fn clear(&mut self) -> usize {
        let count = self.users.len();
        self.users.clear();
        self.order.clear();
        count
    }

    fn len(&self) -> usize {
        self.users.len()
    }

    fn iter(&self) -> impl Iterator<Item = &User> {
        self.order.iter().filter_map(|id| self.users.get(id))
    }
}

/// Concurrency-safe registry of users
///
/// A single mutex guards the whole store. Every operation holds it only for
/// its in-memory work; file reads and writes happen outside the lock.
#[derive(Debug, Default)]
pub struct UserService {
    store: Mutex<UserStore>,
}

impl UserService {
    /// Create an empty service
    pub fn new() -> Self {
        info!("UserService initialized");
        Self::default()
    }

    /// Create a service with initial users, later entries replacing earlier ones
    pub fn with_users(users: Vec<User>) -> Self {
        let mut store = UserStore::default();
        for user in users {
            store.upsert(user);
        }

        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserStore>, DomainError> {
        self.store
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire user store lock: {}", e)))
    }

    /// Add a user, failing if the id is already taken
    pub fn add_user(&self, user: User) -> Result<(), DomainError> {
        let mut store = self.lock()?;
        debug!(user_id = %user.id(), "Lock acquired for add");

        if store.contains(user.id()) {
            warn!(user_id = %user.id(), "User already exists");
            return Err(DomainError::duplicate_user(user.id()));
        }

        info!("User added: {}", user);
        store.upsert(user);

        Ok(())
    }

    /// Remove a user by id and return it
    pub fn remove_user_by_id(&self, id: i64) -> Result<User, DomainError> {
        let mut store = self.lock()?;
        debug!(user_id = id, "Lock acquired for removal");

        let removed = UserId::new(id).ok().and_then(|user_id| store.remove(user_id));

        match removed {
            Some(user) => {
                info!("User removed: {}", user);
                Ok(user)
            }
            None => {
                warn!(user_id = id, "User not found for removal");
                Err(DomainError::user_not_found(id))
            }
        }
    }

    /// Look up a single user
    pub fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        let Ok(user_id) = UserId::new(id) else {
            return Ok(None);
        };

        let store = self.lock()?;
        Ok(store.get(user_id).cloned())
    }

    /// Snapshot of every user in insertion order
    pub fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let store = self.lock()?;
        Ok(store.iter().cloned().collect())
    }

    /// Number of users in the store
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    /// Drop every user, returning how many were removed
    pub fn clear(&self) -> Result<usize, DomainError> {
        let removed = self.lock()?.clear();
        info!(removed, "User store cleared");
        Ok(removed)
    }

    /// Apply a batch of already validated users in one critical section
    ///
    /// With `clear_existing` the current contents are discarded first.
    /// Incoming users replace stored users with the same id.
    pub fn merge_users(&self, users: Vec<User>, clear_existing: bool) -> Result<usize, DomainError> {
        let mut store = self.lock()?;
        debug!(count = users.len(), clear_existing, "Lock acquired for batch merge");

        if clear_existing {
            store.clear();
            debug!("Cleared existing users before merge");
        }

        let count = users.len();
        for user in users {
            let user_id = user.id();
            if store.upsert(user) {
                info!(user_id = %user_id, "Overwriting existing user");
            }
        }

        Ok(count)
    }

    /// Load users from a JSON snapshot file
    ///
    /// The file is read and every entry validated before the lock is taken.
    /// Invalid entries are skipped and reported; only an unreadable file, bad
    /// JSON or a non-object root fails the whole import, and in that case the
    /// store is left untouched.
    pub fn load_users_from_json(
        &self,
        path: impl AsRef<Path>,
        clear_existing: bool,
    ) -> Result<ImportReport, DomainError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading users from JSON");

        let entries = read_snapshot(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to read user data");
        })?;
        debug!(entries = entries.len(), "Processing entries for preparation");

        let (users, skipped) = materialize(&entries);
        for entry in &skipped {
            error!(
                key = %entry.key,
                path = %path.display(),
                reason = %entry.reason,
                "Skipping invalid user data entry with key '{}' in {} during preparation",
                entry.key,
                path.display()
            );
        }

        let loaded = self.merge_users(users, clear_existing)?;

        info!(
            path = %path.display(),
            loaded,
            skipped = skipped.len(),
            "Finished atomic update from JSON"
        );

        Ok(ImportReport { loaded, skipped })
    }

    /// Export the current users to a JSON snapshot file
    ///
    /// The store is copied under the lock and written afterwards, so changes
    /// made after the copy are not part of this export. An empty store writes
    /// nothing.
    pub fn export_users_json(&self, path: impl AsRef<Path>) -> Result<ExportOutcome, DomainError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Exporting users to JSON");

        let users = self.list_users()?;
        debug!(count = users.len(), "Snapshot taken for export");

        if users.is_empty() {
            info!("No users to export");
            return Ok(ExportOutcome::Empty);
        }

        let contents = render_snapshot(&users).map_err(|source| {
            error!(path = %path.display(), error = %source, "Failed to serialize users");
            DomainError::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;

        write_snapshot(path, &contents).map_err(|source| {
            error!(path = %path.display(), error = %source, "Failed to write user data");
            DomainError::WriteFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(path = %path.display(), count = users.len(), "User data exported");

        Ok(ExportOutcome::Written { count: users.len() })
    }
}

impl fmt::Display for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let users: Vec<User> = {
            let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            store.iter().cloned().collect()
        };

        if users.is_empty() {
            return write!(f, "No users in service.");
        }

        for (index, user) in users.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", index + 1, user)?;
        }

        Ok(())
    }
}

//! In-memory mirror of the remote user directory.
//!
//! The store is only updated after the gateway confirmed a change; it never
//! talks to the network itself.

use serde::{Deserialize, Serialize};

use crate::model::{UserRecord, normalize_phone};
use crate::search;

/// Errors raised by [`UserDirectoryStore`] guards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("user id {0} is already present in the directory")]
    DuplicateId(u64),
}

/// Ordered list of user records for the current session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDirectoryStore {
    users: Vec<UserRecord>,
}

impl UserDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list, normalizing every phone number on the way in.
    pub fn load(&mut self, records: Vec<UserRecord>) {
        self.users = records
            .into_iter()
            .map(|mut r| {
                r.phone = normalize_phone(&r.phone);
                r
            })
            .collect();
    }

    /// Append a freshly created record.
    ///
    /// A record whose id is already present is refused and the list stays as it was.
    pub fn insert(&mut self, record: UserRecord) -> Result<(), StoreError> {
        if self.contains(record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.users.push(record);
        Ok(())
    }

    /// Replace the entry with the same id in place. Returns `false` when no entry matched.
    pub fn replace_by_id(&mut self, record: UserRecord) -> bool {
        match self.users.iter_mut().find(|u| u.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`, if any.
    pub fn remove_by_id(&mut self, id: u64) -> Option<UserRecord> {
        let idx = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(idx))
    }

    /// Case-insensitive name filter; see [`search::filter_by_name`].
    pub fn filter_by_name_substring(&self, query: &str) -> Vec<&UserRecord> {
        search::filter_by_name(&self.users, query)
    }

    pub fn get(&self, id: u64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter()
    }

    pub fn as_slice(&self) -> &[UserRecord] {
        &self.users
    }
}

//! In-process gateway.
//!
//! Behaves like the REST collection: ids are assigned on create, unknown ids
//! fail on update and delete. `set_failing(true)` turns every call into a
//! [`NetworkError`] so callers can exercise their failure paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{NetworkError, Operation, UserGateway};
use crate::model::{UserDraft, UserRecord};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    users: Mutex<Vec<UserRecord>>,
    failing: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Copy of the records currently held.
    pub async fn snapshot(&self) -> Vec<UserRecord> {
        self.users.lock().await.clone()
    }

    fn check(&self, op: Operation) -> Result<(), NetworkError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(NetworkError::new(op, "gateway unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserGateway for MemoryGateway {
    async fn list_users(&self) -> Result<Vec<UserRecord>, NetworkError> {
        self.check(Operation::List)?;
        Ok(self.users.lock().await.clone())
    }

    async fn create_user(&self, candidate: &UserDraft) -> Result<UserRecord, NetworkError> {
        self.check(Operation::Create)?;
        let mut users = self.users.lock().await;
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let record = candidate.clone().into_record(id);
        users.push(record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        id: u64,
        candidate: &UserRecord,
    ) -> Result<UserRecord, NetworkError> {
        self.check(Operation::Update)?;
        let mut users = self.users.lock().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| NetworkError::new(Operation::Update, format!("no user with id {id}")))?;
        *slot = UserRecord {
            id,
            ..candidate.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_user(&self, id: u64) -> Result<(), NetworkError> {
        self.check(Operation::Delete)?;
        let mut users = self.users.lock().await;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| NetworkError::new(Operation::Delete, format!("no user with id {id}")))?;
        users.remove(idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_next_id() {
        let gw = MemoryGateway::new();
        let a = gw.create_user(&UserDraft::default()).await.unwrap();
        let b = gw.create_user(&UserDraft::default()).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(gw.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn update_keeps_path_id() {
        let gw = MemoryGateway::with_users(vec![UserRecord {
            id: 5,
            ..UserRecord::default()
        }]);
        let candidate = UserRecord {
            id: 99,
            name: "Renamed".into(),
            ..UserRecord::default()
        };
        let updated = gw.update_user(5, &candidate).await.unwrap();
        assert_eq!(updated.id, 5);
        assert_eq!(updated.name, "Renamed");
        assert!(gw.update_user(6, &candidate).await.is_err());
    }

    #[tokio::test]
    async fn failing_switch_affects_every_call() {
        let gw = MemoryGateway::new();
        gw.set_failing(true);
        assert_eq!(gw.list_users().await.unwrap_err().operation, Operation::List);
        assert!(gw.create_user(&UserDraft::default()).await.is_err());
        assert!(gw.snapshot().await.is_empty());
        gw.set_failing(false);
        assert!(gw.list_users().await.is_ok());
    }
}

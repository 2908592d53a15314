//! Remote user directory access.
//!
//! [`UserGateway`] is the only boundary the rest of the crate sees. Two
//! transports implement it: [`http::HttpGateway`] talks to a REST `/users`
//! collection and [`memory::MemoryGateway`] keeps everything in process.
//!
//! The UI never awaits a gateway directly. It emits a [`GatewayRequest`], the
//! run loop hands it to [`dispatch`] on the async runtime, and the resulting
//! [`GatewayOutcome`] is folded back into the application state.

pub mod http;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{UserDraft, UserRecord};

pub use http::HttpGateway;
pub use memory::MemoryGateway;

/// Which gateway call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list users",
            Operation::Create => "create user",
            Operation::Update => "update user",
            Operation::Delete => "delete user",
        })
    }
}

/// Any failure of a gateway call. Transient and permanent failures are not told apart.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {detail}")]
pub struct NetworkError {
    pub operation: Operation,
    pub detail: String,
}

impl NetworkError {
    pub fn new(operation: Operation, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}

/// The four calls the application makes against the directory.
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, NetworkError>;

    /// The server assigns the id of the returned record.
    async fn create_user(&self, candidate: &UserDraft) -> Result<UserRecord, NetworkError>;

    async fn update_user(&self, id: u64, candidate: &UserRecord)
    -> Result<UserRecord, NetworkError>;

    async fn delete_user(&self, id: u64) -> Result<(), NetworkError>;
}

/// Description of a gateway call, produced by the key handler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GatewayRequest {
    ListUsers,
    CreateUser(UserDraft),
    UpdateUser { id: u64, user: UserRecord },
    DeleteUser { id: u64 },
}

/// Result of a [`GatewayRequest`], fed back into the application state.
#[derive(Clone, Debug, PartialEq)]
pub enum GatewayOutcome {
    Listed(Result<Vec<UserRecord>, NetworkError>),
    Created(Result<UserRecord, NetworkError>),
    Updated {
        id: u64,
        result: Result<UserRecord, NetworkError>,
    },
    Deleted {
        id: u64,
        result: Result<(), NetworkError>,
    },
}

/// Run one request against `gateway`. Failures are returned, never retried.
pub async fn dispatch(gateway: &dyn UserGateway, request: GatewayRequest) -> GatewayOutcome {
    match request {
        GatewayRequest::ListUsers => GatewayOutcome::Listed(gateway.list_users().await),
        GatewayRequest::CreateUser(draft) => {
            GatewayOutcome::Created(gateway.create_user(&draft).await)
        }
        GatewayRequest::UpdateUser { id, user } => GatewayOutcome::Updated {
            id,
            result: gateway.update_user(id, &user).await,
        },
        GatewayRequest::DeleteUser { id } => GatewayOutcome::Deleted {
            id,
            result: gateway.delete_user(id).await,
        },
    }
}

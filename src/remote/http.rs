//! Reqwest-backed REST transport.
//!
//! Maps the four gateway calls onto `GET/POST/PUT/DELETE` against
//! `{base}/users` and `{base}/users/{id}`. Transport errors, non-2xx statuses
//! and undecodable bodies all come back as [`NetworkError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{NetworkError, Operation, UserGateway};
use crate::model::{UserDraft, UserRecord};

/// Public demo API the application talks to unless configured otherwise.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// Build a gateway for `base_url` with a client-level request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the URL does not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> crate::Result<Self> {
        let mut base = Url::parse(base_url)?;
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn collection_url(&self, op: Operation) -> Result<Url, NetworkError> {
        self.base
            .join("users")
            .map_err(|e| NetworkError::new(op, format!("bad url: {e}")))
    }

    fn item_url(&self, op: Operation, id: u64) -> Result<Url, NetworkError> {
        self.base
            .join(&format!("users/{id}"))
            .map_err(|e| NetworkError::new(op, format!("bad url: {e}")))
    }

    async fn send(
        &self,
        op: Operation,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, NetworkError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(%op, error = %e, "request failed");
                NetworkError::new(op, e.to_string())
            })?;
        let status = response.status();
        if !status.is_success() {
            warn!(%op, %status, "unexpected status");
            return Err(NetworkError::new(op, format!("HTTP {status}")));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        op: Operation,
        request: RequestBuilder,
    ) -> Result<T, NetworkError> {
        let response = self.send(op, request).await?;
        response.json::<T>().await.map_err(|e| {
            warn!(%op, error = %e, "undecodable response body");
            NetworkError::new(op, format!("invalid response body: {e}"))
        })
    }
}

#[async_trait]
impl UserGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserRecord>, NetworkError> {
        let url = self.collection_url(Operation::List)?;
        debug!(%url, "GET");
        let users: Vec<UserRecord> = self
            .send_json(Operation::List, self.client.get(url))
            .await?;
        debug!(count = users.len(), "users fetched");
        Ok(users)
    }

    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    async fn create_user(&self, candidate: &UserDraft) -> Result<UserRecord, NetworkError> {
        let url = self.collection_url(Operation::Create)?;
        debug!(%url, "POST");
        let created: UserRecord = self
            .send_json(Operation::Create, self.client.post(url).json(candidate))
            .await?;
        debug!(id = created.id, "user created");
        Ok(created)
    }

    #[instrument(skip(self, candidate))]
    async fn update_user(
        &self,
        id: u64,
        candidate: &UserRecord,
    ) -> Result<UserRecord, NetworkError> {
        let url = self.item_url(Operation::Update, id)?;
        debug!(%url, "PUT");
        self.send_json(Operation::Update, self.client.put(url).json(candidate))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: u64) -> Result<(), NetworkError> {
        let url = self.item_url(Operation::Delete, id)?;
        debug!(%url, "DELETE");
        self.send(Operation::Delete, self.client.delete(url)).await?;
        Ok(())
    }
}

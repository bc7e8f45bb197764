//! HTTP user directory client

use super::{AssignableUser, DirectoryError, UserDirectory};
use reqwest::{Client, Url, header};
use std::future::Future;
use std::pin::Pin;

/// Reads assignable users with a single `GET` against a fixed endpoint
///
/// The endpoint must answer with a JSON array of objects carrying at least
/// `id` and `name`.
#[derive(Clone, Debug)]
pub struct HttpUserDirectory {
    client: Client,
    endpoint: Url,
}

impl HttpUserDirectory {
    /// Create a directory client for `endpoint`
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Create a directory client reusing an existing `reqwest` client
    #[must_use]
    pub const fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// The endpoint users are fetched from
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get_users(&self) -> Result<Vec<AssignableUser>, DirectoryError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching assignable users");

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DirectoryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<AssignableUser>>()
            .await
            .map_err(|e| DirectoryError::ResponseParseFailed(e.to_string()))
    }
}

impl UserDirectory for HttpUserDirectory {
    fn fetch_users(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AssignableUser>, DirectoryError>> + Send + '_>> {
        Box::pin(self.get_users())
    }
}

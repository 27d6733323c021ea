//! Typed client for the memory API.
//!
//! This is what a presentation shell holds to talk to the vault: the same
//! five operations as the HTTP surface, with missing records resolved to
//! `None` on lookup and non-success statuses surfaced as typed errors.

use serde::Deserialize;

use crate::memory::{Memory, MemoryDraft, MemoryPatch};
use crate::{Error, Result};

/// Health check payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
}

/// Client for a vault server, rooted at an API base URL such as
/// `http://localhost:5000/api`.
#[derive(Debug, Clone)]
pub struct VaultClient {
    base_url: String,
    client: reqwest::Client,
}

impl VaultClient {
    pub fn new(base_url: impl Into<String>) -> VaultClient {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        VaultClient {
            base_url,
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// All memories, newest first.
    pub async fn get_all(&self) -> Result<Vec<Memory>> {
        let response = self
            .client
            .get(format!("{}/memories", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// A single memory, or `None` when the id does not exist.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Memory>> {
        let response = self
            .client
            .get(format!("{}/memories/{id}", self.base_url))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(Some(response.json().await?))
    }

    /// Persist a new memory; returns the stored record with its
    /// server-assigned id and timestamps.
    pub async fn save(&self, draft: &MemoryDraft) -> Result<Memory> {
        let response = self
            .client
            .post(format!("{}/memories", self.base_url))
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Apply a partial update; returns the updated record.
    pub async fn update(&self, id: &str, patch: &MemoryPatch) -> Result<Memory> {
        let response = self
            .client
            .put(format!("{}/memories/{id}", self.base_url))
            .json(patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Delete a memory by id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/memories/{id}", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    pub async fn health(&self) -> Result<Health> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into a typed error, preferring the server's
/// `{"message"}` body when it parses.
async fn api_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or(body);
    Error::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = VaultClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url, "http://localhost:5000/api");
    }
}

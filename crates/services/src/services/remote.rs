//! HTTP client for the migration document store.

use std::time::Duration;

use async_trait::async_trait;
use models::migration::{Migration, UpdateMigration};
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RemoteStoreError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}")]
    Http {
        status: u16,
        message: Option<String>,
    },
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl RemoteStoreError {
    /// Best-effort human-readable message: the server-provided one when
    /// the failure body carried it, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// The remote document store as the session layer sees it. The store is
/// the system of record; both operations return the server's copy of the
/// document.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    async fn fetch_migration(&self, id: &str) -> Result<Migration, RemoteStoreError>;

    async fn save_migration(
        &self,
        id: &str,
        changes: &UpdateMigration,
    ) -> Result<Migration, RemoteStoreError>;
}

/// Failure body shape the REST layer uses. Both fields are optional; a
/// body that is not even JSON is tolerated.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// reqwest-backed implementation against the REST layer.
#[derive(Debug, Clone)]
pub struct HttpMigrationStore {
    http: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpMigrationStore {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, RemoteStoreError> {
        let base_url =
            Url::parse(base_url).map_err(|e| RemoteStoreError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("migration-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteStoreError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            auth_token,
        })
    }

    fn migration_url(&self, id: &str) -> Result<Url, RemoteStoreError> {
        self.base_url
            .join(&format!("api/migrations/{id}"))
            .map_err(|e| RemoteStoreError::InvalidUrl(e.to_string()))
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_migration(res: reqwest::Response) -> Result<Migration, RemoteStoreError> {
        match res.status() {
            s if s.is_success() => res
                .json::<Migration>()
                .await
                .map_err(|e| RemoteStoreError::Serde(e.to_string())),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(RemoteStoreError::Http {
                    status,
                    message: extract_error_message(&body),
                })
            }
        }
    }
}

#[async_trait]
impl MigrationStore for HttpMigrationStore {
    async fn fetch_migration(&self, id: &str) -> Result<Migration, RemoteStoreError> {
        let url = self.migration_url(id)?;
        let res = self
            .with_auth(self.http.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::read_migration(res).await
    }

    async fn save_migration(
        &self,
        id: &str,
        changes: &UpdateMigration,
    ) -> Result<Migration, RemoteStoreError> {
        let url = self.migration_url(id)?;
        let res = self
            .with_auth(self.http.put(url))
            .json(changes)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::read_migration(res).await
    }
}

fn map_reqwest_error(e: reqwest::Error) -> RemoteStoreError {
    if e.is_timeout() {
        RemoteStoreError::Timeout
    } else {
        RemoteStoreError::Transport(e.to_string())
    }
}

/// Pull the conventional `message` (or `error`) field out of a failure
/// body. Anything unparseable yields nothing rather than an error.
fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_conventional_field() {
        let body = r#"{"message": "Migration not found"}"#;
        assert_eq!(
            extract_error_message(body),
            Some("Migration not found".to_string())
        );
    }

    #[test]
    fn test_extract_error_message_error_field_fallback() {
        let body = r#"{"error": "ValidationError: questions required"}"#;
        assert_eq!(
            extract_error_message(body),
            Some("ValidationError: questions required".to_string())
        );
    }

    #[test]
    fn test_extract_error_message_tolerates_non_json() {
        assert_eq!(extract_error_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(extract_error_message(""), None);
    }

    #[test]
    fn test_extract_error_message_ignores_blank_message() {
        assert_eq!(extract_error_message(r#"{"message": "  "}"#), None);
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = RemoteStoreError::Http {
            status: 404,
            message: Some("Migration not found".to_string()),
        };
        assert_eq!(
            err.user_message("Failed to load migration"),
            "Migration not found"
        );
    }

    #[test]
    fn test_user_message_falls_back_when_absent() {
        let err = RemoteStoreError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(
            err.user_message("Failed to load migration"),
            "Failed to load migration"
        );
        assert_eq!(
            RemoteStoreError::Timeout.user_message("Failed to save migration"),
            "Failed to save migration"
        );
    }
}

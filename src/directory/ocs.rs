use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::trace;
use ureq::Agent;

use crate::errors::{MentionError, Result};
use crate::types::{Account, OcsResponse, OcsUser, UserResponse};

use super::{ApiProvider, ApiProviderFactory, DirectoryClient};

/// Base path of the OCS cloud API, relative to the server URL.
pub const DEFAULT_BASE_PATH: &str = "/ocs/v2.php/cloud/";

/// Directory client talking to the Nextcloud OCS user endpoint.
pub struct OcsDirectoryClient {
    agent: Agent,
    endpoint: String,
    authorization: String,
}

impl OcsDirectoryClient {
    /// Creates a client for `account`, resolving users below `base_path`.
    pub fn new(account: &Account, base_path: &str, timeout: Duration) -> Result<Self> {
        let server = account.url.trim_end_matches('/');
        if server.is_empty() {
            return Err(MentionError::Config {
                message: format!("account '{}' has no server url", account.name),
            });
        }

        let base_path = base_path.trim_matches('/');
        let endpoint = if base_path.is_empty() {
            format!("{}/users/", server)
        } else {
            format!("{}/{}/users/", server, base_path)
        };

        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        let credentials = format!("{}:{}", account.user_id, account.token);

        Ok(Self {
            agent: Agent::new_with_config(config),
            endpoint,
            authorization: format!("Basic {}", STANDARD.encode(credentials)),
        })
    }

    /// Returns the URL queried for `username`.
    pub fn user_url(&self, username: &str) -> String {
        format!("{}{}", self.endpoint, urlencoding::encode(username))
    }
}

impl DirectoryClient for OcsDirectoryClient {
    fn get_user(&self, username: &str) -> Result<UserResponse> {
        let url = self.user_url(username);
        trace!(%url, "requesting user");

        let mut response = self
            .agent
            .get(url.as_str())
            .query("format", "json")
            .header("OCS-APIRequest", "true")
            .header("Accept", "application/json")
            .header("Authorization", self.authorization.as_str())
            .call()
            .map_err(|e| MentionError::Transport {
                username: username.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let message = status.canonical_reason().unwrap_or("").to_string();

        if !status.is_success() {
            return Ok(UserResponse {
                status: status.as_u16(),
                message,
                body: None,
            });
        }

        let body = response
            .body_mut()
            .read_json::<OcsResponse<OcsUser>>()
            .map_err(|e| MentionError::Transport {
                username: username.to_string(),
                message: format!("failed to decode user response: {e}"),
            })?;

        Ok(UserResponse {
            status: status.as_u16(),
            message,
            body: Some(body),
        })
    }
}

/// Provider holding one [`OcsDirectoryClient`].
pub struct OcsApiProvider {
    client: Arc<OcsDirectoryClient>,
}

impl ApiProvider for OcsApiProvider {
    fn get_api(&self) -> Arc<dyn DirectoryClient> {
        self.client.clone()
    }
}

/// Creates [`OcsApiProvider`]s with a shared request timeout.
#[derive(Debug, Clone)]
pub struct OcsApiProviderFactory {
    timeout: Duration,
}

impl OcsApiProviderFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for OcsApiProviderFactory {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl ApiProviderFactory for OcsApiProviderFactory {
    fn create_api_provider(
        &self,
        account: &Account,
        base_path: &str,
    ) -> Result<Box<dyn ApiProvider>> {
        let client = OcsDirectoryClient::new(account, base_path, self.timeout)?;
        Ok(Box::new(OcsApiProvider {
            client: Arc::new(client),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("alice", "https://cloud.example.com/", "secret")
    }

    #[test]
    fn test_user_url_default_base_path() {
        let client =
            OcsDirectoryClient::new(&account(), DEFAULT_BASE_PATH, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.user_url("bob"),
            "https://cloud.example.com/ocs/v2.php/cloud/users/bob"
        );
    }

    #[test]
    fn test_user_url_is_percent_encoded() {
        let client =
            OcsDirectoryClient::new(&account(), DEFAULT_BASE_PATH, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.user_url("jane doe"),
            "https://cloud.example.com/ocs/v2.php/cloud/users/jane%20doe"
        );
    }

    #[test]
    fn test_authorization_header() {
        let client =
            OcsDirectoryClient::new(&account(), DEFAULT_BASE_PATH, Duration::from_secs(1)).unwrap();
        assert_eq!(client.authorization, "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn test_missing_server_url() {
        let mut account = account();
        account.url = String::new();
        let result = OcsDirectoryClient::new(&account, DEFAULT_BASE_PATH, Duration::from_secs(1));
        assert!(matches!(result, Err(MentionError::Config { .. })));
    }
}

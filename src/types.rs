use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Mapping from username to display name, holding only resolved candidates.
pub type DisplayNames = HashMap<String, String>;

/// A user session on a Nextcloud server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Local name of the account, e.g. `alice@cloud.example.com`.
    pub name: String,
    /// User id used for authenticating against the server.
    pub user_id: String,
    /// Server base URL without a trailing slash.
    pub url: String,
    /// App password or token.
    pub token: String,
}

impl Account {
    /// Creates an account, deriving its local name from the user id and URL.
    pub fn new(user_id: &str, url: &str, token: &str) -> Self {
        let url = url.trim_end_matches('/').to_string();
        let host = url
            .split("://")
            .nth(1)
            .unwrap_or(url.as_str())
            .to_string();
        Self {
            name: format!("{}@{}", user_id, host),
            user_id: user_id.to_string(),
            url,
            token: token.to_string(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("user_id", &self.user_id)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A single `@name` occurrence inside a text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpan {
    /// Byte offset of the `@` marker.
    pub start: usize,
    /// Byte offset one past the last character of the username.
    pub end: usize,
    pub username: String,
}

impl MentionSpan {
    /// Byte offset where the username begins (just after the marker).
    pub fn username_start(&self) -> usize {
        self.start + 1
    }
}

/// Envelope of every OCS API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcsResponse<T> {
    pub ocs: OcsWrapper<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcsWrapper<T> {
    #[serde(default)]
    pub meta: OcsMeta,
    pub data: T,
}

/// Status block of an OCS response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsMeta {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub statuscode: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// User record as returned by `GET /cloud/users/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcsUser {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "displayname", alias = "display-name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Outcome of one directory lookup.
///
/// Mirrors an HTTP exchange: the status code decides success, the body is only
/// meaningful for successful responses.
#[derive(Debug, Clone)]
pub struct UserResponse {
    pub status: u16,
    pub message: String,
    pub body: Option<OcsResponse<OcsUser>>,
}

impl UserResponse {
    /// Creates a successful (200) response carrying the given user.
    pub fn ok(user: OcsUser) -> Self {
        Self {
            status: 200,
            message: "OK".to_string(),
            body: Some(OcsResponse {
                ocs: OcsWrapper {
                    meta: OcsMeta {
                        status: "ok".to_string(),
                        statuscode: 200,
                        message: Some("OK".to_string()),
                    },
                    data: user,
                },
            }),
        }
    }

    /// Creates an unsuccessful response without a body.
    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            body: None,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the user's display name, if the body carries a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        self.body
            .as_ref()?
            .ocs
            .data
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::join_all;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::directory::{ApiProviderFactory, DirectoryClient, DEFAULT_BASE_PATH};
use crate::errors::{MentionError, Result};
use crate::executor::{Executor, Task};
use crate::types::{Account, DisplayNames};

use super::cache::DisplayNameCache;

/// Resolves candidate usernames into display names.
///
/// Every candidate is looked up independently on the injected [`Executor`]
/// through a directory client obtained once per batch from the injected
/// [`ApiProviderFactory`]. Failed lookups are left out of the result; only a
/// failure to dispatch the lookups fails a batch.
pub struct MentionResolver {
    factory: Arc<dyn ApiProviderFactory>,
    executor: Arc<dyn Executor>,
    cache: Arc<DisplayNameCache>,
    base_path: String,
}

impl MentionResolver {
    pub fn new(factory: Arc<dyn ApiProviderFactory>, executor: Arc<dyn Executor>) -> Self {
        Self {
            factory,
            executor,
            cache: Arc::new(DisplayNameCache::new()),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Overrides the API base path handed to the provider factory.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = base_path.to_string();
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn cache(&self) -> &DisplayNameCache {
        &self.cache
    }

    /// Switches the current account, discarding everything cached so far.
    pub fn set_current_account(&self, account: Option<&Account>) {
        self.cache.reset(account);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Looks up the display names of `usernames` for `account`.
    ///
    /// Waits for every lookup to finish and returns the successful ones.
    /// Candidates that could not be resolved are absent from the mapping.
    pub async fn fetch_display_names(
        &self,
        account: &Account,
        usernames: &HashSet<String>,
    ) -> Result<DisplayNames> {
        if usernames.is_empty() {
            return Ok(DisplayNames::new());
        }

        self.cache.bind(account);

        let provider = self
            .factory
            .create_api_provider(account, &self.base_path)
            .map_err(|e| MentionError::Dispatch {
                message: format!("failed to create api provider for {}: {}", account.name, e),
            })?;
        let client = provider.get_api();

        let candidates: Vec<&String> = usernames.iter().collect();
        let pending: Vec<PendingDisplayName> = candidates
            .iter()
            .map(|username| self.fetch_display_name(Arc::clone(&client), username))
            .collect();

        let outcomes = join_all(pending).await;

        let mut display_names = DisplayNames::with_capacity(candidates.len());
        for (username, outcome) in candidates.into_iter().zip(outcomes) {
            match outcome {
                Ok(display_name) => {
                    display_names.insert(username.clone(), display_name);
                }
                Err(e) if e.is_dispatch() => return Err(e),
                Err(MentionError::Resolution { message, .. }) => {
                    debug!(%username, %message, "mention not resolved");
                }
                Err(e) => {
                    warn!(%username, error = %e, "could not fetch display name");
                }
            }
        }

        debug!(
            account = %account.name,
            requested = usernames.len(),
            resolved = display_names.len(),
            "resolved display names"
        );

        Ok(display_names)
    }

    /// Looks up the display name of a single user.
    ///
    /// Served from the cache when possible, otherwise a single `get_user` call
    /// is submitted to the executor. The returned future fails with
    /// [`MentionError::Resolution`] when the directory has no usable display
    /// name for the user.
    pub fn fetch_display_name(
        &self,
        client: Arc<dyn DirectoryClient>,
        username: &str,
    ) -> PendingDisplayName {
        if let Some(display_name) = self.cache.display_name(username) {
            trace!(%username, "display name served from cache");
            return PendingDisplayName::ready(username, Ok(display_name));
        }

        if self.cache.is_missing(username) {
            return PendingDisplayName::ready(
                username,
                Err(MentionError::Resolution {
                    username: username.to_string(),
                    message: "user is known not to exist".to_string(),
                }),
            );
        }

        let (tx, rx) = oneshot::channel();
        let cache = Arc::clone(&self.cache);
        let generation = cache.generation();
        let name = username.to_string();

        let task: Task = Box::new(move || {
            let result = lookup(client.as_ref(), &name, &cache, generation);
            // The receiver may already be gone if the caller stopped waiting.
            let _ = tx.send(result);
        });

        match self.executor.execute(task) {
            Ok(()) => PendingDisplayName::waiting(username, rx),
            Err(e) => {
                let e = if e.is_dispatch() {
                    e
                } else {
                    MentionError::Dispatch {
                        message: format!("failed to submit lookup for {}: {}", username, e),
                    }
                };
                PendingDisplayName::ready(username, Err(e))
            }
        }
    }
}

/// Performs one blocking directory lookup and records the outcome in `cache`.
fn lookup(
    client: &dyn DirectoryClient,
    username: &str,
    cache: &DisplayNameCache,
    generation: u64,
) -> Result<String> {
    let response = client.get_user(username)?;

    if !response.is_successful() {
        if response.status == 404 {
            cache.mark_missing(generation, username);
        }
        return Err(MentionError::Resolution {
            username: username.to_string(),
            message: format!("HTTP {}: {}", response.status, response.message),
        });
    }

    if response.body.is_none() {
        return Err(MentionError::Resolution {
            username: username.to_string(),
            message: "response body was empty".to_string(),
        });
    }

    match response.display_name() {
        Some(display_name) => {
            cache.insert(generation, username, display_name);
            Ok(display_name.to_string())
        }
        None => Err(MentionError::Resolution {
            username: username.to_string(),
            message: "user has no display name".to_string(),
        }),
    }
}

/// Future of a single display-name lookup.
pub struct PendingDisplayName {
    username: String,
    state: PendingState,
}

enum PendingState {
    Ready(Option<Result<String>>),
    Waiting(oneshot::Receiver<Result<String>>),
}

impl PendingDisplayName {
    fn ready(username: &str, result: Result<String>) -> Self {
        Self {
            username: username.to_string(),
            state: PendingState::Ready(Some(result)),
        }
    }

    fn waiting(username: &str, rx: oneshot::Receiver<Result<String>>) -> Self {
        Self {
            username: username.to_string(),
            state: PendingState::Waiting(rx),
        }
    }

    /// The username being looked up.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Future for PendingDisplayName {
    type Output = Result<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match &mut this.state {
            PendingState::Ready(result) => Poll::Ready(result.take().unwrap_or_else(|| {
                Err(MentionError::Resolution {
                    username: this.username.clone(),
                    message: "lookup polled after completion".to_string(),
                })
            })),
            PendingState::Waiting(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(_)) => Poll::Ready(Err(MentionError::Resolution {
                    username: this.username.clone(),
                    message: "lookup ended without reporting a result".to_string(),
                })),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

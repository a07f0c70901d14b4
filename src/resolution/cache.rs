use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::types::Account;

/// Per-account cache of lookup outcomes.
///
/// Holds the display names of existing users and the usernames the directory
/// reported as unknown. Entries belong to the account the cache is bound to;
/// binding another account discards them. Every reset bumps a generation
/// counter so that lookups dispatched before the reset cannot write stale
/// entries afterwards.
#[derive(Debug, Default)]
pub struct DisplayNameCache {
    state: RwLock<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    account: Option<String>,
    generation: u64,
    users: HashMap<String, String>,
    missing: HashSet<String>,
}

impl CacheState {
    fn reset(&mut self, account: Option<String>) {
        self.account = account;
        self.generation += 1;
        self.users.clear();
        self.missing.clear();
    }
}

impl DisplayNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the cache to `account`, discarding all entries if it was bound to
    /// a different one.
    pub fn bind(&self, account: &Account) {
        if let Ok(mut state) = self.state.write() {
            if state.account.as_deref() != Some(account.name.as_str()) {
                state.reset(Some(account.name.clone()));
            }
        }
    }

    /// Discards all entries and binds the cache to `account` (or to nothing).
    pub fn reset(&self, account: Option<&Account>) {
        if let Ok(mut state) = self.state.write() {
            state.reset(account.map(|a| a.name.clone()));
        }
    }

    /// Discards all entries, keeping the current account binding.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            let account = state.account.take();
            state.reset(account);
        }
    }

    /// Name of the account the cache is bound to.
    pub fn account(&self) -> Option<String> {
        self.state.read().ok()?.account.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().map(|s| s.generation).unwrap_or_default()
    }

    pub fn display_name(&self, username: &str) -> Option<String> {
        self.state.read().ok()?.users.get(username).cloned()
    }

    pub fn is_missing(&self, username: &str) -> bool {
        self.state
            .read()
            .map(|s| s.missing.contains(username))
            .unwrap_or(false)
    }

    /// Records a display name unless one is already cached or the cache has
    /// been reset since `generation`.
    pub fn insert(&self, generation: u64, username: &str, display_name: &str) {
        if let Ok(mut state) = self.state.write() {
            if state.generation == generation {
                state
                    .users
                    .entry(username.to_string())
                    .or_insert_with(|| display_name.to_string());
            }
        }
    }

    /// Records `username` as unknown to the directory unless the cache has
    /// been reset since `generation`.
    pub fn mark_missing(&self, generation: u64, username: &str) {
        if let Ok(mut state) = self.state.write() {
            if state.generation == generation {
                state.missing.insert(username.to_string());
            }
        }
    }

    /// Number of cached display names.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.users.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(user: &str) -> Account {
        Account::new(user, "https://cloud.example.com", "token")
    }

    #[test]
    fn test_insert_keeps_first_value() {
        let cache = DisplayNameCache::new();
        let generation = cache.generation();
        cache.insert(generation, "foo", "Foo Bidoo");
        cache.insert(generation, "foo", "Someone Else");
        assert_eq!(cache.display_name("foo").as_deref(), Some("Foo Bidoo"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bind_same_account_keeps_entries() {
        let cache = DisplayNameCache::new();
        cache.bind(&account("alice"));
        cache.insert(cache.generation(), "foo", "Foo Bidoo");
        cache.bind(&account("alice"));
        assert_eq!(cache.display_name("foo").as_deref(), Some("Foo Bidoo"));
    }

    #[test]
    fn test_bind_other_account_discards_entries() {
        let cache = DisplayNameCache::new();
        cache.bind(&account("alice"));
        cache.insert(cache.generation(), "foo", "Foo Bidoo");
        cache.mark_missing(cache.generation(), "qux");

        cache.bind(&account("bob"));
        assert!(cache.display_name("foo").is_none());
        assert!(!cache.is_missing("qux"));
        assert_eq!(cache.account().as_deref(), Some("bob@cloud.example.com"));
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let cache = DisplayNameCache::new();
        let stale = cache.generation();
        cache.clear();
        cache.insert(stale, "foo", "Foo Bidoo");
        cache.mark_missing(stale, "qux");
        assert!(cache.is_empty());
        assert!(!cache.is_missing("qux"));
    }

    #[test]
    fn test_reset_to_no_account() {
        let cache = DisplayNameCache::new();
        cache.bind(&account("alice"));
        cache.reset(None);
        assert!(cache.account().is_none());
    }
}

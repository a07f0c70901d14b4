/// Display-name resolution module.
///
/// Resolves candidate usernames found by the scanner into display names by
/// querying the user directory, one concurrent lookup per candidate.
mod cache;
mod resolver;

pub use cache::DisplayNameCache;
pub use resolver::{MentionResolver, PendingDisplayName};

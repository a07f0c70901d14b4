/// Mention token extraction.
///
/// Scans rendered text for `@name` tokens and yields the distinct candidate
/// usernames, or the byte spans of every occurrence for in-place substitution.
mod mentions;

pub use mentions::{find_mention_spans, find_potential_mentions, MENTION_MARKER};

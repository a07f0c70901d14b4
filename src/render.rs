//! Substitution of resolved display names into rendered text.

use crate::errors::Result;
use crate::resolution::MentionResolver;
use crate::scanner::{find_mention_spans, find_potential_mentions};
use crate::types::{Account, DisplayNames};

/// Replaces the username of every resolved mention with its display name.
///
/// The `@` marker is kept in front of the display name so hosts can still
/// decorate it (e.g. with an avatar). Mentions missing from `display_names`
/// stay exactly as written.
pub fn replace_display_names(text: &str, display_names: &DisplayNames) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in find_mention_spans(text) {
        if let Some(display_name) = display_names.get(&span.username) {
            out.push_str(&text[cursor..span.username_start()]);
            out.push_str(display_name);
            cursor = span.end;
        }
    }

    out.push_str(&text[cursor..]);
    out
}

/// Returns the URL of a user's avatar at `size` pixels.
pub fn avatar_url(account: &Account, user_id: &str, size: u32) -> String {
    format!(
        "{}/index.php/avatar/{}/{}",
        account.url.trim_end_matches('/'),
        urlencoding::encode(user_id),
        size
    )
}

/// Scans `text`, resolves its mentions for `account` and returns the text with
/// display names substituted.
pub async fn render_mentions(
    resolver: &MentionResolver,
    account: &Account,
    text: &str,
) -> Result<String> {
    let usernames = find_potential_mentions(text);
    let display_names = resolver.fetch_display_names(account, &usernames).await?;
    Ok(replace_display_names(text, &display_names))
}

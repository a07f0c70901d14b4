use std::collections::HashSet;

use crate::types::MentionSpan;

/// Character introducing a mention.
pub const MENTION_MARKER: char = '@';

/// Returns the distinct usernames mentioned in `text`.
///
/// Accepts either a `&str` or an `Option<&str>`; `None` and the empty string
/// both yield an empty set.
///
/// A candidate starts right after an `@` that sits at the start of the text or
/// after whitespace, and runs through the following word characters. Once a
/// candidate has been read the rest of the token is skipped up to the next
/// whitespace, so `"@foo@bar"` yields only `foo`. A marker with no word
/// characters after it yields nothing, and a marker directly following it is
/// still a mention start: `"@@foo"` yields `foo`.
pub fn find_potential_mentions<'a>(text: impl Into<Option<&'a str>>) -> HashSet<String> {
    match text.into() {
        Some(text) if !text.is_empty() => find_mention_spans(text)
            .into_iter()
            .map(|span| span.username)
            .collect(),
        _ => HashSet::new(),
    }
}

/// Returns every mention in `text` in order of appearance, duplicates
/// included.
pub fn find_mention_spans(text: &str) -> Vec<MentionSpan> {
    let mut spans = Vec::new();
    let mut chars = text.char_indices().peekable();
    // The start of the text counts as a boundary.
    let mut at_boundary = true;

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() {
            at_boundary = true;
            continue;
        }

        if c == MENTION_MARKER && at_boundary {
            let start = idx + c.len_utf8();
            let mut end = start;
            while let Some(&(next_idx, next)) = chars.peek() {
                if !is_word_char(next) {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }

            // A bare marker leaves the boundary open, so in `@@foo` the
            // second `@` still starts a candidate.
            if end == start {
                continue;
            }
            spans.push(MentionSpan {
                start: idx,
                end,
                username: text[start..end].to_string(),
            });
        }

        at_boundary = false;
    }

    spans
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('7'));
        assert!(is_word_char('_'));
        assert!(is_word_char('é'));
        assert!(!is_word_char('@'));
        assert!(!is_word_char('-'));
        assert!(!is_word_char(' '));
    }

    #[test]
    fn test_span_offsets() {
        let spans = find_mention_spans("hi @foo!");
        assert_eq!(
            spans,
            vec![MentionSpan {
                start: 3,
                end: 7,
                username: "foo".to_string(),
            }]
        );
        assert_eq!(spans[0].username_start(), 4);
    }

    #[test]
    fn test_span_offsets_multibyte() {
        let text = "ça @zoë va";
        let spans = find_mention_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "@zoë");
    }

    #[test]
    fn test_marker_after_non_whitespace_is_ignored() {
        assert!(find_mention_spans("mail@example.com").is_empty());
        assert!(find_mention_spans("(@foo)").is_empty());
    }

    #[test]
    fn test_double_marker_spans_second() {
        let spans = find_mention_spans("@@foo");
        assert_eq!(
            spans,
            vec![MentionSpan {
                start: 1,
                end: 5,
                username: "foo".to_string(),
            }]
        );
    }

    #[test]
    fn test_bare_marker_then_punctuation() {
        assert!(find_mention_spans("@-foo").is_empty());
        assert!(find_mention_spans("@@").is_empty());
    }
}

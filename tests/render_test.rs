use mentions::render::*;
use mentions::types::{Account, DisplayNames};

fn display_names() -> DisplayNames {
    [("foo", "Foo Bidoo"), ("bar", "Bar Iton")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_replace_resolved_mentions() {
    let rendered = replace_display_names("Hello @foo and @bar!", &display_names());
    assert_eq!(rendered, "Hello @Foo Bidoo and @Bar Iton!");
}

#[test]
fn test_unresolved_mentions_stay_verbatim() {
    let rendered = replace_display_names("@qux meets @foo", &display_names());
    assert_eq!(rendered, "@qux meets @Foo Bidoo");
}

#[test]
fn test_repeated_mentions_are_all_replaced() {
    let rendered = replace_display_names("@foo @foo\n@foo", &display_names());
    assert_eq!(rendered, "@Foo Bidoo @Foo Bidoo\n@Foo Bidoo");
}

#[test]
fn test_absorbed_mentions_are_not_replaced() {
    let rendered = replace_display_names("@foo@bar", &display_names());
    assert_eq!(rendered, "@Foo Bidoo@bar");
}

#[test]
fn test_empty_mapping_returns_input() {
    let text = "nothing @to replace here";
    assert_eq!(replace_display_names(text, &DisplayNames::new()), text);
    assert_eq!(replace_display_names("", &display_names()), "");
}

#[test]
fn test_avatar_url() {
    let account = Account::new("alice", "https://cloud.example.com/", "secret");
    assert_eq!(
        avatar_url(&account, "foo", 64),
        "https://cloud.example.com/index.php/avatar/foo/64"
    );
    assert_eq!(
        avatar_url(&account, "jane doe", 48),
        "https://cloud.example.com/index.php/avatar/jane%20doe/48"
    );
}

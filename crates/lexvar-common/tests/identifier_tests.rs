use super::*;

fn check(raw: &str) -> (bool, String) {
    let result = check_identifier(raw);
    (result.is_legal, result.transformed)
}

#[test]
fn test_check_identifier_replaces_internal_whitespace() {
    assert_eq!(check("test test"), (true, "test_test".to_string()));
    assert_eq!(check("a  \t b"), (true, "a_b".to_string()));
    assert_eq!(check("a\u{a0}b"), (true, "a_b".to_string()));
}

#[test]
fn test_check_identifier_trims() {
    assert_eq!(check("   test   "), (true, "test".to_string()));
}

#[test]
fn test_check_identifier_blank_is_illegal() {
    assert_eq!(check("   "), (false, String::new()));
    assert_eq!(check(""), (false, String::new()));
}

#[test]
fn test_check_identifier_accepts_non_latin_scripts() {
    assert_eq!(check("修改数值"), (true, "修改数值".to_string()));
}

#[test]
fn test_check_identifier_rejects_illegal_start() {
    for raw in [".test", "-test", "\\test", "+test", "[test", "]test", "1abc", "`x"] {
        let result = check_identifier(raw);
        assert!(!result.is_legal, "{raw} should be illegal");
        assert_eq!(result.transformed, raw, "{raw} should not be transformed");
    }
}

#[test]
fn test_check_identifier_digits_and_backtick_allowed_after_start() {
    assert!(check_identifier("abc123").is_legal);
    assert!(check_identifier("a`b").is_legal);
    assert!(check_identifier("_$?~@").is_legal);
}

#[test]
fn test_check_identifier_rejects_operators_anywhere() {
    for raw in ["a+b", "a.b", "a<b", "x{y}", "a,b", "a'b", "a|b"] {
        assert!(!check_identifier(raw).is_legal, "{raw} should be illegal");
    }
}

#[test]
fn test_make_legal_identifier() {
    assert_eq!(make_legal_identifier("test test"), "test_test");
    assert_eq!(make_legal_identifier("   "), "_");
    assert_eq!(make_legal_identifier("1abc"), "name");
    assert_eq!(make_legal_identifier(" x + y "), "name");
}

#[test]
fn test_prefix_suffix() {
    assert_eq!(prefix_suffix("name"), ("name", ""));
    assert_eq!(prefix_suffix("name1"), ("name", "1"));
    assert_eq!(prefix_suffix("name1a"), ("name1a", ""));
    assert_eq!(prefix_suffix("name123"), ("name", "123"));
    assert_eq!(prefix_suffix("42"), ("", "42"));
    assert_eq!(prefix_suffix(""), ("", ""));
}

#[test]
fn test_name_not_in_without_conflict() {
    assert_eq!(name_not_in("foo", &["bar", "cat", "pupper"]), "foo");
    assert_eq!(name_not_in("foo", &["foo1", "foo2", "foo3"]), "foo");
    let empty: [&str; 0] = [];
    assert_eq!(name_not_in("foo", &empty), "foo");
}

#[test]
fn test_name_not_in_picks_smallest_free_suffix() {
    assert_eq!(name_not_in("foo", &["foo", "foo0"]), "foo2");
    assert_eq!(name_not_in("foo", &["foo", "foo1"]), "foo2");
    assert_eq!(name_not_in("foo", &["foo", "foo2"]), "foo3");
    assert_eq!(name_not_in("foo", &["foo", "foo2", "foo4"]), "foo3");
    assert_eq!(name_not_in("foo", &["foo", "foo2", "foo3", "foo4"]), "foo5");
    assert_eq!(
        name_not_in("foo", &["foo", "foo2", "foo", "foo4", "bar3", "cats"]),
        "foo3"
    );
}

#[test]
fn test_name_not_in_prefers_bare_prefix() {
    assert_eq!(name_not_in("foo2", &["foo2", "foo3"]), "foo");
    assert_eq!(name_not_in("x1", &["x1"]), "x");
}

#[test]
fn test_name_not_in_suffixed_candidate_with_bare_taken() {
    assert_eq!(name_not_in("foo2", &["foo", "foo2"]), "foo3");
}

#[test]
fn test_sort_and_remove_duplicates() {
    assert_eq!(
        sort_and_remove_duplicates(&["b", "a", "b", "c", "a"]),
        vec!["a", "b", "c"]
    );
    let empty: [&str; 0] = [];
    assert!(sort_and_remove_duplicates(&empty).is_empty());
}

#[test]
fn test_string_lists_equal() {
    assert!(string_lists_equal(&["a", "b"], &["a".to_string(), "b".to_string()]));
    assert!(!string_lists_equal(&["a", "b"], &["b", "a"]));
    assert!(!string_lists_equal(&["a"], &["a", "b"]));
}

use super::*;

#[test]
fn test_apply_is_identity_outside_domain() {
    let s = Substitution::simple("a", "b");
    assert_eq!(s.apply("a"), "b");
    assert_eq!(s.apply("c"), "c");
    assert_eq!(Substitution::new().apply("x"), "x");
}

#[test]
fn test_map() {
    let s = Substitution::from_pairs([("a", "x"), ("b", "y")]);
    assert_eq!(s.map(&["a", "c", "b"]), vec!["x", "c", "y"]);
}

#[test]
fn test_extend_other_wins() {
    let mut a = Substitution::from_pairs([("p", "1"), ("q", "2")]);
    let b = Substitution::from_pairs([("q", "3"), ("r", "4")]);
    a.extend(&b);
    assert_eq!(a.apply("p"), "1");
    assert_eq!(a.apply("q"), "3");
    assert_eq!(a.apply("r"), "4");
}

#[test]
fn test_extended_composition_law() {
    let a = Substitution::from_pairs([("p", "1"), ("q", "2")]);
    let b = Substitution::from_pairs([("q", "3"), ("r", "4")]);
    let composed = a.extended(&b);
    for x in ["p", "q", "r", "s"] {
        let expected = if b.in_domain(x) { b.apply(x) } else { a.apply(x) };
        assert_eq!(composed.apply(x), expected, "composition differs at {x}");
    }
    assert_eq!(a.apply("q"), "2", "extended must not mutate the receiver");
}

#[test]
fn test_remove_and_removed() {
    let s = Substitution::from_pairs([("a", "x"), ("b", "y")]);
    let removed = s.removed(&["a"]);
    assert_eq!(removed.apply("a"), "a");
    assert_eq!(removed.apply("b"), "y");
    assert_eq!(s.apply("a"), "x");

    let mut chained = s.clone();
    chained.remove(&["a", "b"]).extend(&Substitution::simple("c", "z"));
    assert_eq!(chained.len(), 1);
    assert_eq!(chained.apply("c"), "z");
}

#[test]
fn test_restrict_domain() {
    let s = Substitution::from_pairs([("a", "x"), ("b", "y"), ("c", "z")]);
    let restricted = s.restrict_domain(&["a", "c", "missing"]);
    assert_eq!(restricted.len(), 2);
    assert_eq!(restricted.apply("a"), "x");
    assert_eq!(restricted.apply("b"), "b");
    assert_eq!(restricted.apply("c"), "z");
}

#[test]
fn test_display_sorted() {
    let s = Substitution::from_pairs([("b", "y"), ("a", "x")]);
    assert_eq!(s.to_string(), "Substitution{a->x,b->y}");
}

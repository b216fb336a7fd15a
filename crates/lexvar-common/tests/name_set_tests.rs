use super::*;

fn set(names: &[&str]) -> NameSet {
    NameSet::from_names(names.iter().copied())
}

#[test]
fn test_from_names_collapses_duplicates() {
    let s = set(&["a", "b", "a"]);
    assert_eq!(s.size(), 2);
    assert!(s.is_member("a"));
    assert!(!s.is_member("c"));
}

#[test]
fn test_to_list_is_sorted() {
    assert_eq!(set(&["c", "a", "b"]).to_list(), vec!["a", "b", "c"]);
}

#[test]
fn test_display() {
    assert_eq!(set(&["b", "a"]).to_string(), "NameSet{a,b}");
    assert_eq!(NameSet::new().to_string(), "NameSet{}");
}

#[test]
fn test_insert_and_delete_are_idempotent() {
    let mut s = set(&["a"]);
    s.insert("a");
    assert_eq!(s.size(), 1);
    s.delete_name("missing");
    assert_eq!(s.size(), 1);
    s.delete_name("a");
    assert!(s.is_empty());
}

#[test]
fn test_destructive_operations_mutate_self_only() {
    let other = set(&["b", "c"]);

    let mut united = set(&["a", "b"]);
    united.unite(&other);
    assert_eq!(united.to_list(), vec!["a", "b", "c"]);

    let mut intersected = set(&["a", "b"]);
    intersected.intersect(&other);
    assert_eq!(intersected.to_list(), vec!["b"]);

    let mut subtracted = set(&["a", "b"]);
    subtracted.subtract(&other);
    assert_eq!(subtracted.to_list(), vec!["a"]);

    assert_eq!(other.to_list(), vec!["b", "c"], "argument must be untouched");
}

#[test]
fn test_non_destructive_operations_leave_operands() {
    let a = set(&["a", "b"]);
    let b = set(&["b", "c"]);

    assert_eq!(a.union(&b).to_list(), vec!["a", "b", "c"]);
    assert_eq!(a.intersection(&b).to_list(), vec!["b"]);
    assert_eq!(a.difference(&b).to_list(), vec!["a"]);
    assert_eq!(a.insertion("z").to_list(), vec!["a", "b", "z"]);
    assert_eq!(a.deletion("a").to_list(), vec!["b"]);

    assert_eq!(a.to_list(), vec!["a", "b"]);
    assert_eq!(b.to_list(), vec!["b", "c"]);
}

#[test]
fn test_membership_laws() {
    let a = set(&["a", "b", "x"]);
    let b = set(&["b", "c", "x"]);
    for x in ["a", "b", "c", "x", "y"] {
        assert_eq!(a.union(&b).is_member(x), a.is_member(x) || b.is_member(x));
        assert_eq!(
            a.intersection(&b).is_member(x),
            a.is_member(x) && b.is_member(x)
        );
        assert_eq!(
            a.difference(&b).is_member(x),
            a.is_member(x) && !b.is_member(x)
        );
    }
}

#[test]
fn test_renamed_passes_unmapped_names_through() {
    let s = set(&["a", "b"]);
    let renamed = s.renamed(&Substitution::simple("a", "z"));
    assert_eq!(renamed.to_list(), vec!["b", "z"]);
    assert_eq!(s.to_list(), vec!["a", "b"]);
}

#[test]
fn test_renamed_can_shrink() {
    let s = set(&["a", "b", "c"]);
    let subst = Substitution::from_pairs([("a", "c"), ("b", "c")]);
    assert_eq!(s.renamed(&subst).to_list(), vec!["c"]);
}

#[test]
fn test_rename_in_place() {
    let mut s = set(&["a", "b"]);
    s.rename(&Substitution::simple("b", "q"));
    assert_eq!(s.to_list(), vec!["a", "q"]);
}

#[test]
fn test_union_all_and_intersect_all() {
    let sets = vec![set(&["a", "b"]), set(&["b", "c"]), set(&["b", "d"])];
    assert_eq!(NameSet::union_all(&sets).to_list(), vec!["a", "b", "c", "d"]);
    assert_eq!(NameSet::intersect_all(&sets).to_list(), vec!["b"]);

    let none: Vec<NameSet> = Vec::new();
    assert!(NameSet::union_all(&none).is_empty());
    assert!(NameSet::intersect_all(&none).is_empty());
}

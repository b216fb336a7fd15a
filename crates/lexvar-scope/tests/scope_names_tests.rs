use super::*;
use lexvar_blocks::{BlockArena, BlockDoc};

fn pairs(list: &[&str]) -> Vec<(String, String)> {
    list.iter().map(|s| (s.to_string(), s.to_string())).collect()
}

fn lexical(docs: Vec<BlockDoc>, config: &ScopeConfig) -> Vec<(String, String)> {
    let arena = BlockArena::load(&docs).unwrap();
    let target = arena.lookup("target").unwrap();
    lexical_names_in_scope(&arena, target, config)
}

#[test]
fn test_simple_nesting() {
    let docs = vec![BlockDoc::local("outer", true, vec![("name", None)]).with_input(
        "STACK",
        BlockDoc::local("inner", true, vec![("name2", None)])
            .with_input("STACK", BlockDoc::set("target", "name", None)),
    )];
    assert_eq!(lexical(docs, &ScopeConfig::default()), pairs(&["name", "name2"]));
}

#[test]
fn test_matching_nesting_lists_name_once() {
    let docs = vec![BlockDoc::local("outer", true, vec![("name", None)]).with_input(
        "STACK",
        BlockDoc::local("inner", true, vec![("name", None)])
            .with_input("STACK", BlockDoc::get("target", "name")),
    )];
    assert_eq!(lexical(docs, &ScopeConfig::default()), pairs(&["name"]));
}

#[test]
fn test_initializer_sees_only_enclosing_scopes() {
    // The expression's RETURN is in scope of name2; the outer initializer
    // slot is not in scope of name.
    let expression = BlockDoc::local("expr", false, vec![("name2", None)])
        .with_input("RETURN", BlockDoc::get("target", "name2"));
    let docs = vec![BlockDoc::local("outer", true, vec![("name", Some(expression))])];
    assert_eq!(lexical(docs, &ScopeConfig::default()), pairs(&["name2"]));

    let docs = vec![BlockDoc::local("outer", true, vec![("name", None)]).with_input(
        "STACK",
        BlockDoc::local("inner", true, vec![("name2", Some(BlockDoc::get("target", "x")))]),
    )];
    assert_eq!(lexical(docs, &ScopeConfig::default()), pairs(&["name"]));
}

#[test]
fn test_next_block_is_not_in_scope() {
    let docs = vec![
        BlockDoc::local("decl", true, vec![("a", None)]).with_next(BlockDoc::set("target", "a", None)),
    ];
    assert!(lexical(docs, &ScopeConfig::default()).is_empty());
}

#[test]
fn test_procedure_parameters_and_loop_indices() {
    let docs = vec![BlockDoc::procedure("proc", "p", &["x", "y"], false).with_input(
        "STACK",
        BlockDoc::for_range("loop", "i").with_input("DO", BlockDoc::set("target", "x", None)),
    )];
    assert_eq!(lexical(docs, &ScopeConfig::default()), pairs(&["i", "x", "y"]));
}

#[test]
fn test_shown_prefixes() {
    let docs = || {
        vec![BlockDoc::for_each("loop", "x").with_input(
            "DO",
            BlockDoc::local("decl", true, vec![("x", None)])
                .with_input("STACK", BlockDoc::get("target", "x")),
        )]
    };
    // One namespace: the innermost declaration decides the prefix.
    assert_eq!(
        lexical(docs(), &ScopeConfig::new(true, false)),
        pairs(&["local x"])
    );
    // Separate namespaces: both are visible.
    assert_eq!(
        lexical(docs(), &ScopeConfig::new(true, true)),
        pairs(&["item x", "local x"])
    );
}

#[test]
fn test_names_in_scope_lists_globals_first() {
    let docs = vec![
        BlockDoc::global("g1", "zeta", None),
        BlockDoc::global("g2", "alpha", None),
        BlockDoc::local("decl", true, vec![("a", None)])
            .with_input("STACK", BlockDoc::get("target", "a")),
    ];
    let arena = BlockArena::load(&docs).unwrap();
    let target = arena.lookup("target").unwrap();

    let mut expected = vec![
        ("global alpha".to_string(), "global alpha".to_string()),
        ("global zeta".to_string(), "global zeta".to_string()),
    ];
    expected.extend(pairs(&["a"]));
    assert_eq!(names_in_scope(&arena, target, &ScopeConfig::default()), expected);
}

#[test]
fn test_translated_global_label() {
    let docs = vec![BlockDoc::global("g", "gName", None), BlockDoc::get("target", "x")];
    let arena = BlockArena::load(&docs).unwrap();
    let target = arena.lookup("target").unwrap();
    let config = ScopeConfig::default().with_global_label("testPrefix");

    assert_eq!(
        names_in_scope(&arena, target, &config),
        vec![("testPrefix gName".to_string(), "global gName".to_string())]
    );
}

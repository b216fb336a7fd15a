use super::*;
use lexvar_blocks::BlockDoc;

fn var(arena: &BlockArena, id: &str) -> String {
    arena
        .referenced_name(arena.lookup(id).unwrap())
        .unwrap()
        .to_string()
}

fn nested_references() -> BlockDoc {
    BlockDoc::local("decl", true, vec![("old", Some(BlockDoc::get("1", "global old")))]).with_input(
        "STACK",
        BlockDoc::set("2", "global old", Some(BlockDoc::get("3", "global old"))),
    )
}

#[test]
fn test_simple() {
    let mut arena = BlockArena::load(&[
        BlockDoc::global("rename", "old", None),
        BlockDoc::set("1", "global old", Some(BlockDoc::get("2", "global old"))),
    ])
    .unwrap();
    let rename = arena.lookup("rename").unwrap();

    let chosen = rename_global(&mut arena, rename, "new", &ScopeConfig::default()).unwrap();
    assert_eq!(chosen, "new");
    assert_eq!(var(&arena, "1"), "global new");
    assert_eq!(var(&arena, "2"), "global new");
    assert_eq!(arena.global_names(BlockIndex::NONE), vec!["new".to_string()]);
}

#[test]
fn test_nested_references_ignore_lexical_shadows() {
    let mut arena = BlockArena::load(&[
        BlockDoc::global("rename", "old", None),
        nested_references(),
    ])
    .unwrap();
    let rename = arena.lookup("rename").unwrap();

    rename_global(&mut arena, rename, "new", &ScopeConfig::default()).unwrap();
    for id in ["1", "2", "3"] {
        assert_eq!(var(&arena, id), "global new");
    }
    // The local "old" is a different variable.
    let decl = arena.lookup("decl").unwrap();
    assert_eq!(arena.declared_names(decl), vec!["old".to_string()]);
}

#[test]
fn test_collision_with_other_global() {
    let mut arena = BlockArena::load(&[
        BlockDoc::global("rename", "old", None),
        BlockDoc::global("other", "new", None),
        nested_references(),
    ])
    .unwrap();
    let rename = arena.lookup("rename").unwrap();

    let chosen = rename_global(&mut arena, rename, "new", &ScopeConfig::default()).unwrap();
    assert_eq!(chosen, "new2");
    for id in ["1", "2", "3"] {
        assert_eq!(var(&arena, id), "global new2");
    }
}

#[test]
fn test_translated_label_references_are_normalized() {
    let config = ScopeConfig::default().with_global_label("globale");
    let mut arena = BlockArena::load(&[
        BlockDoc::global("rename", "old", None),
        BlockDoc::set("1", "globale old", None),
    ])
    .unwrap();
    let rename = arena.lookup("rename").unwrap();

    rename_global(&mut arena, rename, "nuovo", &config).unwrap();
    assert_eq!(var(&arena, "1"), "global nuovo");
}

#[test]
fn test_illegal_name_is_legalized() {
    let mut arena = BlockArena::load(&[BlockDoc::global("rename", "old", None)]).unwrap();
    let rename = arena.lookup("rename").unwrap();

    let chosen = rename_global(&mut arena, rename, " total count ", &ScopeConfig::default()).unwrap();
    assert_eq!(chosen, "total_count");
}

#[test]
fn test_non_global_is_rejected() {
    let mut arena = BlockArena::load(&[BlockDoc::get("get", "x")]).unwrap();
    let get = arena.lookup("get").unwrap();

    let err = rename_global(&mut arena, get, "y", &ScopeConfig::default()).unwrap_err();
    assert!(matches!(err, ScopeError::NotADeclaration { .. }));
}

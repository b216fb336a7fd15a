use super::*;
use crate::document::BlockDoc;

fn load(docs: Vec<BlockDoc>) -> BlockArena {
    BlockArena::load(&docs).unwrap()
}

fn index(arena: &BlockArena, id: &str) -> BlockIndex {
    arena.lookup(id).unwrap()
}

#[test]
fn test_roles() {
    let arena = load(vec![
        BlockDoc::local("decl", true, vec![("a", None)])
            .with_input("STACK", BlockDoc::set("set", "a", Some(BlockDoc::get("get", "a")))),
        BlockDoc::new("math_number", "num").with_field("NUM", "1"),
    ]);
    assert_eq!(arena.role(index(&arena, "decl")), NodeRole::Declaration);
    assert_eq!(arena.role(index(&arena, "set")), NodeRole::Reference);
    assert_eq!(arena.role(index(&arena, "get")), NodeRole::Reference);
    assert_eq!(arena.role(index(&arena, "num")), NodeRole::Opaque);
    assert_eq!(arena.role(BlockIndex::NONE), NodeRole::Opaque);
}

#[test]
fn test_scoped_and_non_scoped_children_of_range_loop() {
    let arena = load(vec![
        BlockDoc::for_range("loop", "i")
            .with_input("START", BlockDoc::get("start", "a"))
            .with_input("STEP", BlockDoc::get("step", "a"))
            .with_input("DO", BlockDoc::set("body", "i", None)),
    ]);
    let node = index(&arena, "loop");
    assert_eq!(arena.scoped_child(node), index(&arena, "body"));
    assert_eq!(
        arena.non_scoped_children(node).as_slice(),
        &[index(&arena, "start"), BlockIndex::NONE, index(&arena, "step")]
    );
    assert_eq!(
        ScopeNode::children(&arena, node).as_slice(),
        &[index(&arena, "start"), index(&arena, "step"), index(&arena, "body")]
    );
    assert_eq!(arena.declared_names(node), vec!["i".to_string()]);
    assert_eq!(arena.declared_prefix(node), Prefix::LoopCounter);
    assert!(!arena.is_closed(node));
}

#[test]
fn test_setter_value_child() {
    let arena = load(vec![BlockDoc::set(
        "set",
        "x",
        Some(BlockDoc::get("value", "y")),
    )]);
    let set = index(&arena, "set");
    assert_eq!(arena.value_child(set), index(&arena, "value"));
    assert_eq!(arena.referenced_name(set), Some("x"));
    assert_eq!(arena.value_child(index(&arena, "value")), BlockIndex::NONE);
}

#[test]
fn test_scope_covers_only_scoped_input_unless_closed() {
    let arena = load(vec![
        BlockDoc::local("decl", false, vec![("a", Some(BlockDoc::get("init", "a")))])
            .with_input("RETURN", BlockDoc::get("body", "a")),
        BlockDoc::procedure("proc", "p", &["x"], false)
            .with_input("STACK", BlockDoc::set("pbody", "x", None)),
    ]);
    let decl = index(&arena, "decl");
    assert!(arena.scope_covers(decl, index(&arena, "body")));
    assert!(!arena.scope_covers(decl, index(&arena, "init")));

    let proc = index(&arena, "proc");
    assert!(arena.is_closed(proc));
    assert!(arena.scope_covers(proc, index(&arena, "pbody")));
    assert!(!arena.scope_covers(index(&arena, "init"), decl));
}

#[test]
fn test_blocks_in_scope_of_declaration_and_argument() {
    let mut arena = load(vec![
        BlockDoc::local("decl", true, vec![("a", None), ("b", None)])
            .with_input("STACK", BlockDoc::set("body", "a", None)),
    ]);
    let decl = index(&arena, "decl");
    assert_eq!(arena.blocks_in_scope(decl), vec![index(&arena, "body")]);

    let container = arena.open_mutator(decl).unwrap();
    let args = arena.container_args(container);
    assert_eq!(args.len(), 2);
    assert_eq!(arena.role(args[0]), NodeRole::PatternArgument);
    assert!(arena.must_not_rename_capturables(args[0]));
    assert_eq!(arena.blocks_in_scope(args[1]), vec![index(&arena, "body")]);
    assert_eq!(
        arena.declared_names(args[1]),
        vec!["a".to_string(), "b".to_string()]
    );
    assert_eq!(arena.declared_prefix(args[0]), Prefix::Local);
}

#[test]
fn test_global_names_in_workspace_order() {
    let arena = load(vec![
        BlockDoc::global("g1", "zeta", None),
        BlockDoc::set("s", "x", None),
        BlockDoc::global("g2", "alpha", None),
    ]);
    assert_eq!(
        arena.global_names(BlockIndex::NONE),
        vec!["zeta".to_string(), "alpha".to_string()]
    );
    assert_eq!(
        arena.global_names(index(&arena, "g1")),
        vec!["alpha".to_string()]
    );
}

#[test]
fn test_rename_declared_names_updates_open_editor() {
    let mut arena = load(vec![BlockDoc::local(
        "decl",
        true,
        vec![("a", None), ("b", None)],
    )]);
    let decl = index(&arena, "decl");
    let container = arena.open_mutator(decl).unwrap();

    arena.rename_declared_names(decl, &Substitution::simple("a", "c"));
    assert_eq!(
        arena.declared_names(decl),
        vec!["c".to_string(), "b".to_string()]
    );
    assert_eq!(
        arena.container_names(container),
        vec!["c".to_string(), "b".to_string()]
    );
}

#[test]
fn test_rename_procedure_parameters_relabels_callers() {
    let mut arena = load(vec![
        BlockDoc::procedure("proc", "p", &["x", "y"], false),
        BlockDoc::call("call", "p", &["x", "y"], false),
        BlockDoc::call("other", "q", &["x"], false),
    ]);
    arena.rename_declared_names(index(&arena, "proc"), &Substitution::simple("x", "w"));
    assert_eq!(
        arena.call_arg_names(index(&arena, "call")).unwrap(),
        &["w".to_string(), "y".to_string()]
    );
    assert_eq!(
        arena.call_arg_names(index(&arena, "other")).unwrap(),
        &["x".to_string()]
    );
}

#[test]
fn test_renaming_argument_renames_owner() {
    let mut arena = load(vec![BlockDoc::procedure("proc", "p", &["x", "y"], true)]);
    let proc = index(&arena, "proc");
    let container = arena.open_mutator(proc).unwrap();
    let args = arena.container_args(container);

    arena.rename_declared_names(args[1], &Substitution::simple("y", "z"));
    assert_eq!(arena.mutator_arg_name(args[1]), Some("z"));
    assert_eq!(
        arena.declared_names(proc),
        vec!["x".to_string(), "z".to_string()]
    );
}

#[test]
fn test_set_referenced_name() {
    let mut arena = load(vec![BlockDoc::get("get", "x")]);
    let get = index(&arena, "get");
    arena.set_referenced_name(get, "y".to_string());
    assert_eq!(arena.referenced_name(get), Some("y"));
    assert_eq!(arena.describe(get), ("get".to_string(), "lexical_variable_get".to_string()));
}

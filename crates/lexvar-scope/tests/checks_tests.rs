use super::*;
use lexvar_blocks::BlockDoc;

fn problems(docs: Vec<BlockDoc>, config: &ScopeConfig) -> Vec<(String, ReferenceProblemKind)> {
    let arena = BlockArena::load(&docs).unwrap();
    check_references(&arena, config)
        .into_iter()
        .map(|problem| (arena.id_of(problem.block).to_string(), problem.kind))
        .collect()
}

fn prefixed(use_prefix_in_code: bool) -> ScopeConfig {
    ScopeConfig {
        show_prefix_to_user: true,
        use_prefix_in_code,
        ..ScopeConfig::default()
    }
    .validated()
}

#[test]
fn test_references_in_scope_pass() {
    let docs = vec![
        BlockDoc::global("g", "count", None),
        BlockDoc::local("decl", true, vec![("a", None)]).with_input(
            "STACK",
            BlockDoc::set("s", "a", Some(BlockDoc::get("get", "global count"))),
        ),
    ];
    assert!(problems(docs, &ScopeConfig::default()).is_empty());
}

#[test]
fn test_reference_after_its_scope() {
    let docs = vec![
        BlockDoc::local("decl", true, vec![("a", None)])
            .with_input("STACK", BlockDoc::set("inside", "a", None))
            .with_next(BlockDoc::set("after", "a", None)),
    ];
    assert_eq!(
        problems(docs, &ScopeConfig::default()),
        vec![("after".to_string(), ReferenceProblemKind::NotInScope)]
    );
}

#[test]
fn test_missing_global_and_blank_name() {
    let docs = vec![
        BlockDoc::global("g", "count", None),
        BlockDoc::set("missing", "global total", Some(BlockDoc::get("blank", " "))),
    ];
    assert_eq!(
        problems(docs, &ScopeConfig::default()),
        vec![
            ("missing".to_string(), ReferenceProblemKind::NotInScope),
            ("blank".to_string(), ReferenceProblemKind::NotInScope),
        ]
    );
}

#[test]
fn test_reference_in_global_initializer() {
    let docs = vec![
        BlockDoc::global("other", "other", None),
        BlockDoc::global("g", "count", Some(BlockDoc::get("init", "global other"))),
    ];
    assert_eq!(
        problems(docs, &ScopeConfig::default()),
        vec![("init".to_string(), ReferenceProblemKind::InGlobalDefinition)]
    );
}

#[test]
fn test_prefix_must_match_only_with_separate_namespaces() {
    let docs = || {
        vec![BlockDoc::for_each("loop", "x").with_input("DO", BlockDoc::set("s", "local x", None))]
    };
    assert!(problems(docs(), &prefixed(false)).is_empty());
    assert_eq!(
        problems(docs(), &prefixed(true)),
        vec![("s".to_string(), ReferenceProblemKind::NotInScope)]
    );
}

#[test]
fn test_unbound_references_skip_global_initializers() {
    let arena = BlockArena::load(&[
        BlockDoc::global("g", "count", Some(BlockDoc::get("init", "zz"))),
        BlockDoc::set("free", "zz", None),
    ])
    .unwrap();
    assert_eq!(
        unbound_references(&arena, &ScopeConfig::default()),
        vec![arena.lookup("free").unwrap()]
    );
    assert_eq!(ReferenceProblemKind::NotInScope.as_str(), "notInScope");
}

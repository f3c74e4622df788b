mod common;

use common::{codebase, context, declarations, locations, resolve, resolve_type};
use phpantom_definition::{Context, Node};

// ─── Bare Class References ──────────────────────────────────────────────────

#[test]
fn test_goto_definition_imported_class() {
    let codebase = codebase();
    let request = resolve(&codebase, &context(), &Node::name_ref("User"));

    assert_eq!(
        declarations(&request),
        vec![("\\App\\Models\\User".to_string(), false)]
    );
    assert_eq!(
        locations(&codebase, &request),
        vec![("/app/Models/User.php".to_string(), 8)]
    );
}

#[test]
fn test_goto_definition_fully_qualified_class() {
    let codebase = codebase();
    let request = resolve(&codebase, &context(), &Node::name_ref("\\App\\Models\\Post"));
    assert_eq!(
        declarations(&request),
        vec![("\\App\\Models\\Post".to_string(), false)]
    );
}

#[test]
fn test_goto_definition_qualified_class_through_namespace_alias() {
    let codebase = codebase();
    let request = resolve(&codebase, &context(), &Node::name_ref("Models\\Builder"));
    assert_eq!(
        declarations(&request),
        vec![("\\App\\Models\\Builder".to_string(), false)]
    );
}

#[test]
fn test_goto_definition_class_names_are_case_insensitive() {
    let codebase = codebase();
    let request = resolve(&codebase, &context(), &Node::name_ref("\\app\\models\\POST"));
    assert_eq!(locations(&codebase, &request), vec![("/app/Models/Post.php".to_string(), 4)]);
}

#[test]
fn test_goto_definition_native_type_records_nothing() {
    let codebase = codebase();
    for native in ["int", "string", "array", "mixed", "null"] {
        let request = resolve(&codebase, &context(), &Node::name_ref(native));
        assert!(request.is_empty(), "`{native}` has no declaration");
    }
}

#[test]
fn test_goto_definition_unknown_class_records_nothing() {
    let codebase = codebase();
    // Resolves to \App\Http\Request, which is not indexed.
    let request = resolve(&codebase, &context(), &Node::name_ref("Request"));
    assert!(request.is_empty());
}

// ─── self / static / parent ─────────────────────────────────────────────────

#[test]
fn test_goto_definition_self_static_parent() {
    let codebase = codebase();
    let context = Context::in_namespace("App\\Models").with_class("App\\Models\\User");

    for (keyword, expected) in [
        ("self", "\\App\\Models\\User"),
        ("static", "\\App\\Models\\User"),
        ("parent", "\\App\\Models\\Model"),
    ] {
        let request = resolve(&codebase, &context, &Node::name_ref(keyword));
        assert_eq!(
            declarations(&request),
            vec![(expected.to_string(), false)],
            "`{keyword}` should resolve to {expected}"
        );
    }
}

#[test]
fn test_goto_definition_self_outside_class_records_nothing() {
    let codebase = codebase();
    let request = resolve(&codebase, &Context::default(), &Node::name_ref("self"));
    assert!(request.is_empty());
}

// ─── Foo::class ─────────────────────────────────────────────────────────────

#[test]
fn test_class_pseudo_constant_matches_bare_reference() {
    let codebase = codebase();
    let context = context();

    let bare = resolve(&codebase, &context, &Node::name_ref("User"));
    for spelling in ["class", "CLASS", "Class"] {
        let pseudo = resolve(
            &codebase,
            &context,
            &Node::class_const(Node::name_ref("User"), spelling),
        );
        assert_eq!(pseudo.records(), bare.records(), "User::{spelling}");
    }
}

#[test]
fn test_class_pseudo_constant_on_unknown_class_records_nothing() {
    let codebase = codebase();
    let request = resolve(
        &codebase,
        &context(),
        &Node::class_const(Node::name_ref("Missing"), "class"),
    );
    assert!(request.is_empty());
}

// ─── Type Definition ────────────────────────────────────────────────────────

#[test]
fn test_goto_type_definition_class_is_its_own_type() {
    let codebase = codebase();
    let definition = resolve(&codebase, &context(), &Node::name_ref("Profile"));
    let type_definition = resolve_type(&codebase, &context(), &Node::name_ref("Profile"));

    assert_eq!(definition.records(), type_definition.records());
    assert_eq!(
        locations(&codebase, &type_definition),
        vec![("/app/Models/Profile.php".to_string(), 4)]
    );
}
